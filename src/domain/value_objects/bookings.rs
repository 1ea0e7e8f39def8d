use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{
    entities::{
        bookings::{BookingEntity, InsertBookingEntity, UpdateBookingEntity},
        tour_packages::TourPackageEntity,
    },
    value_objects::{
        enums::{payment_methods::PaymentMethod, sort_order::SortOrder},
        query_params::{Pagination, bool_param, non_blank, number_param, parse_ordering},
        validation::{
            NOT_NULL, REQUIRED, ValidationErrors, check_contact_details, integer_of,
            payment_method_value, pk_value, present, text_value,
        },
    },
};

pub const NAME_MAX_LEN: usize = 100;
pub const PHONE_MAX_LEN: usize = 20;
pub const EMAIL_MAX_LEN: usize = 254;

const TRANSACTION_ID_MAX_LEN: usize = 255;
const PAYMENT_STATUS_MAX_LEN: usize = 50;
const AMOUNT_MAX_DIGITS: usize = 12;
const AMOUNT_DECIMAL_PLACES: usize = 2;

/// Client-supplied booking fields. Anything else in the body, `is_paid` included, is ignored.
/// Values stay loosely typed so a wrong type is reported against its field.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct BookingPayload {
    #[serde(default, deserialize_with = "present")]
    pub tour: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub name: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub phone: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub email: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub payment_method: Option<Value>,
}

/// Validated subset of a [`BookingPayload`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingChanges {
    pub tour_id: Option<i64>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub payment_method: Option<PaymentMethod>,
}

impl BookingPayload {
    /// Runs the field rules. With `required` every writable field must be present
    /// (create and full update); without it only supplied fields are checked.
    pub fn check(&self, errors: &mut ValidationErrors, required: bool) -> BookingChanges {
        let tour_id = pk_value(errors, "tour", self.tour.as_ref(), required);
        let name = text_value(errors, "name", self.name.as_ref(), Some(NAME_MAX_LEN), required);
        let phone = text_value(
            errors,
            "phone",
            self.phone.as_ref(),
            Some(PHONE_MAX_LEN),
            required,
        );
        let email = text_value(
            errors,
            "email",
            self.email.as_ref(),
            Some(EMAIL_MAX_LEN),
            required,
        );
        let payment_method = payment_method_value(
            errors,
            "payment_method",
            self.payment_method.as_ref(),
            required,
        );

        check_contact_details(errors, phone.as_deref(), email.as_deref());

        BookingChanges {
            tour_id,
            name,
            phone,
            email,
            payment_method,
        }
    }
}

impl BookingChanges {
    /// Builds the row for a new booking, unpaid. `None` when a field is missing.
    pub fn into_insert_entity(self, now: DateTime<Utc>) -> Option<InsertBookingEntity> {
        Some(InsertBookingEntity {
            tour_id: self.tour_id?,
            name: self.name?,
            phone: self.phone?,
            email: self.email?,
            payment_method: self.payment_method?.to_string(),
            is_paid: false,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn into_update_entity(self, now: DateTime<Utc>) -> UpdateBookingEntity {
        UpdateBookingEntity {
            tour_id: self.tour_id,
            name: self.name,
            phone: self.phone,
            email: self.email,
            payment_method: self.payment_method.map(|method| method.to_string()),
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BookingDto {
    pub id: i64,
    pub tour: i64,
    pub tour_title: String,
    pub tour_price: Decimal,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub payment_method: String,
    pub is_paid: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BookingDto {
    pub fn from_entities(booking: BookingEntity, tour: TourPackageEntity) -> Self {
        Self {
            id: booking.id,
            tour: booking.tour_id,
            tour_title: tour.title,
            tour_price: tour.price,
            name: booking.name,
            phone: booking.phone,
            email: booking.email,
            payment_method: booking.payment_method,
            is_paid: booking.is_paid,
            created_at: booking.created_at,
            updated_at: booking.updated_at,
        }
    }
}

/// Response to a successful booking: what the customer owes and how they chose to pay.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CreatedBookingDto {
    pub booking_id: i64,
    pub tour_title: String,
    pub amount: Decimal,
    pub payment_method: String,
    pub message: String,
}

/// Payment callback body. Types are loose so malformed values become field errors.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct PaymentVerificationPayload {
    #[serde(default, deserialize_with = "present")]
    pub booking_id: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub payment_method: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub transaction_id: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub amount: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub status: Option<Value>,
}

/// What a payment callback declared. None of it is checked against the booking.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentClaim {
    pub booking_id: i64,
    pub payment_method: PaymentMethod,
    pub transaction_id: String,
    pub amount: Decimal,
    pub status: String,
}

impl PaymentVerificationPayload {
    pub fn validate(&self) -> Result<PaymentClaim, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let booking_id = integer_value(&mut errors, "booking_id", self.booking_id.as_ref());
        let payment_method = payment_method_value(
            &mut errors,
            "payment_method",
            self.payment_method.as_ref(),
            true,
        );
        let transaction_id = text_value(
            &mut errors,
            "transaction_id",
            self.transaction_id.as_ref(),
            Some(TRANSACTION_ID_MAX_LEN),
            true,
        );
        let amount = amount_value(&mut errors, "amount", self.amount.as_ref());
        let status = text_value(
            &mut errors,
            "status",
            self.status.as_ref(),
            Some(PAYMENT_STATUS_MAX_LEN),
            true,
        );

        match (booking_id, payment_method, transaction_id, amount, status) {
            (
                Some(booking_id),
                Some(payment_method),
                Some(transaction_id),
                Some(amount),
                Some(status),
            ) if errors.is_empty() => Ok(PaymentClaim {
                booking_id,
                payment_method,
                transaction_id,
                amount,
                status,
            }),
            _ => Err(errors),
        }
    }
}

fn integer_value(errors: &mut ValidationErrors, field: &str, value: Option<&Value>) -> Option<i64> {
    let parsed = match value {
        None => {
            errors.add(field, REQUIRED);
            return None;
        }
        Some(Value::Null) => {
            errors.add(field, NOT_NULL);
            return None;
        }
        Some(other) => integer_of(other),
    };

    if parsed.is_none() {
        errors.add(field, "A valid integer is required.");
    }
    parsed
}

fn amount_value(errors: &mut ValidationErrors, field: &str, value: Option<&Value>) -> Option<Decimal> {
    let parsed = match value {
        None => {
            errors.add(field, REQUIRED);
            return None;
        }
        Some(Value::Null) => {
            errors.add(field, NOT_NULL);
            return None;
        }
        Some(Value::Number(number)) => Decimal::from_str(&number.to_string())
            .or_else(|_| Decimal::from_scientific(&number.to_string()))
            .ok(),
        Some(Value::String(raw)) => Decimal::from_str(raw.trim()).ok(),
        Some(_) => None,
    };

    let Some(amount) = parsed else {
        errors.add(field, "A valid number is required.");
        return None;
    };

    let decimal_places = amount.scale() as usize;
    let total_digits = amount
        .mantissa()
        .unsigned_abs()
        .to_string()
        .len()
        .max(decimal_places);

    let message = if total_digits > AMOUNT_MAX_DIGITS {
        Some(format!(
            "Ensure that there are no more than {} digits in total.",
            AMOUNT_MAX_DIGITS
        ))
    } else if decimal_places > AMOUNT_DECIMAL_PLACES {
        Some(format!(
            "Ensure that there are no more than {} decimal places.",
            AMOUNT_DECIMAL_PLACES
        ))
    } else if total_digits - decimal_places > AMOUNT_MAX_DIGITS - AMOUNT_DECIMAL_PLACES {
        Some(format!(
            "Ensure that there are no more than {} digits before the decimal point.",
            AMOUNT_MAX_DIGITS - AMOUNT_DECIMAL_PLACES
        ))
    } else {
        None
    };

    if let Some(message) = message {
        errors.add(field, message);
        return None;
    }

    Some(amount)
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PaymentConfirmationDto {
    pub message: String,
    pub booking_id: i64,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListBookingsFilter {
    pub payment_method: Option<PaymentMethod>,
    pub is_paid: Option<bool>,
    pub tour_id: Option<i64>,
    /// Direction on `created_at`.
    pub sort_order: SortOrder,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListBookingsQuery {
    pub payment_method: Option<String>,
    pub is_paid: Option<String>,
    pub tour: Option<String>,
    pub ordering: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl ListBookingsQuery {
    pub fn into_filter(self) -> Result<ListBookingsFilter, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let payment_method = non_blank(self.payment_method.as_deref()).and_then(|raw| {
            let method = raw.parse::<PaymentMethod>().ok();
            if method.is_none() {
                errors.add(
                    "payment_method",
                    format!(
                        "Select a valid choice. {} is not one of the available choices.",
                        raw
                    ),
                );
            }
            method
        });

        let sort_order = parse_ordering(self.ordering.as_deref(), |name| {
            (name == "created_at").then_some(())
        })
        .first()
        .map(|term| term.sort_order)
        .unwrap_or_default();

        let filter = ListBookingsFilter {
            payment_method,
            is_paid: bool_param(&mut errors, "is_paid", self.is_paid.as_deref()),
            tour_id: number_param(&mut errors, "tour", self.tour.as_deref()),
            sort_order,
            pagination: Pagination::parse(
                &mut errors,
                self.limit.as_deref(),
                self.offset.as_deref(),
            ),
        };

        errors.into_result(filter)
    }
}
