use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};

use crate::{
    application::usercases::errors::{UseCaseError, UseCaseResult},
    domain::{
        entities::{bookings::BookingEntity, tour_packages::TourPackageEntity},
        repositories::{bookings::BookingRepository, tour_packages::TourPackageRepository},
        value_objects::{
            bookings::{
                BookingDto, BookingPayload, CreatedBookingDto, ListBookingsFilter,
                PaymentConfirmationDto, PaymentVerificationPayload,
            },
            validation::ValidationErrors,
        },
    },
};

pub const BOOKING_CREATED_MESSAGE: &str = "Booking created successfully";
pub const PAYMENT_CONFIRMED_MESSAGE: &str = "Payment confirmed successfully";
pub const PAID_STATUS: &str = "paid";

pub struct BookingUseCase<B, T>
where
    B: BookingRepository + Send + Sync + 'static,
    T: TourPackageRepository + Send + Sync + 'static,
{
    booking_repository: Arc<B>,
    tour_package_repository: Arc<T>,
}

impl<B, T> BookingUseCase<B, T>
where
    B: BookingRepository + Send + Sync + 'static,
    T: TourPackageRepository + Send + Sync + 'static,
{
    pub fn new(booking_repository: Arc<B>, tour_package_repository: Arc<T>) -> Self {
        Self {
            booking_repository,
            tour_package_repository,
        }
    }

    pub async fn create(&self, payload: BookingPayload) -> UseCaseResult<CreatedBookingDto> {
        info!(tour_id = ?payload.tour, "bookings: create requested");

        let mut errors = ValidationErrors::new();
        let changes = payload.check(&mut errors, true);
        let tour = match changes.tour_id {
            Some(tour_id) => self.resolve_tour(tour_id, &mut errors).await?,
            None => None,
        };

        let now = Utc::now();
        let (Some(tour), Some(insert_booking_entity), true) =
            (tour, changes.into_insert_entity(now), errors.is_empty())
        else {
            warn!(fields = %errors, "bookings: rejected invalid booking");
            return Err(UseCaseError::Validation(errors));
        };

        let booking = self
            .booking_repository
            .create(insert_booking_entity)
            .await
            .map_err(|err| {
                error!(tour_id = tour.id, db_error = ?err, "bookings: failed to create booking");
                UseCaseError::Internal(err)
            })?;

        info!(
            booking_id = booking.id,
            tour_id = tour.id,
            payment_method = %booking.payment_method,
            "bookings: booking created"
        );

        Ok(CreatedBookingDto {
            booking_id: booking.id,
            tour_title: tour.title,
            amount: tour.price,
            payment_method: booking.payment_method,
            message: BOOKING_CREATED_MESSAGE.to_string(),
        })
    }

    pub async fn list(&self, filter: ListBookingsFilter) -> UseCaseResult<Vec<BookingDto>> {
        let rows = self
            .booking_repository
            .list(filter)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "bookings: failed to list bookings");
                UseCaseError::Internal(err)
            })?;

        info!(booking_count = rows.len(), "bookings: bookings loaded");
        Ok(rows
            .into_iter()
            .map(|(booking, tour)| BookingDto::from_entities(booking, tour))
            .collect())
    }

    pub async fn retrieve(&self, booking_id: i64) -> UseCaseResult<BookingDto> {
        let (booking, tour) = self.find_booking(booking_id).await?;
        Ok(BookingDto::from_entities(booking, tour))
    }

    /// Applies a full (`partial == false`) or partial update. `is_paid` is never written here.
    pub async fn update(
        &self,
        booking_id: i64,
        payload: BookingPayload,
        partial: bool,
    ) -> UseCaseResult<BookingDto> {
        self.find_booking(booking_id).await?;

        let mut errors = ValidationErrors::new();
        let changes = payload.check(&mut errors, !partial);
        if let Some(tour_id) = changes.tour_id {
            self.resolve_tour(tour_id, &mut errors).await?;
        }
        if !errors.is_empty() {
            warn!(booking_id, fields = %errors, "bookings: rejected invalid update");
            return Err(UseCaseError::Validation(errors));
        }

        self.booking_repository
            .update(booking_id, changes.into_update_entity(Utc::now()))
            .await
            .map_err(|err| {
                error!(booking_id, db_error = ?err, "bookings: failed to update booking");
                UseCaseError::Internal(err)
            })?
            .ok_or(UseCaseError::NotFound("booking"))?;

        info!(booking_id, partial, "bookings: booking updated");
        self.retrieve(booking_id).await
    }

    pub async fn delete(&self, booking_id: i64) -> UseCaseResult<()> {
        let deleted = self
            .booking_repository
            .delete(booking_id)
            .await
            .map_err(|err| {
                error!(booking_id, db_error = ?err, "bookings: failed to delete booking");
                UseCaseError::Internal(err)
            })?;

        if !deleted {
            return Err(UseCaseError::NotFound("booking"));
        }

        info!(booking_id, "bookings: booking deleted");
        Ok(())
    }

    /// Payment callback stub. The declared transaction is only checked for shape; nothing
    /// is compared with the booking or a payment provider before `is_paid` is set.
    pub async fn verify_payment(
        &self,
        booking_id: i64,
        payload: PaymentVerificationPayload,
    ) -> UseCaseResult<PaymentConfirmationDto> {
        self.find_booking(booking_id).await?;

        let claim = payload.validate().map_err(|errors| {
            warn!(booking_id, fields = %errors, "bookings: malformed payment verification");
            UseCaseError::Validation(errors)
        })?;

        info!(
            booking_id,
            declared_booking_id = claim.booking_id,
            payment_method = %claim.payment_method,
            transaction_id = %claim.transaction_id,
            amount = %claim.amount,
            declared_status = %claim.status,
            "bookings: payment verification received"
        );

        let booking = self
            .booking_repository
            .mark_paid(booking_id)
            .await
            .map_err(|err| {
                error!(booking_id, db_error = ?err, "bookings: failed to mark booking paid");
                UseCaseError::Internal(err)
            })?
            .ok_or(UseCaseError::NotFound("booking"))?;

        info!(booking_id = booking.id, "bookings: booking marked as paid");

        Ok(PaymentConfirmationDto {
            message: PAYMENT_CONFIRMED_MESSAGE.to_string(),
            booking_id: booking.id,
            status: PAID_STATUS.to_string(),
        })
    }

    async fn find_booking(
        &self,
        booking_id: i64,
    ) -> UseCaseResult<(BookingEntity, TourPackageEntity)> {
        self.booking_repository
            .find_by_id(booking_id)
            .await
            .map_err(|err| {
                error!(booking_id, db_error = ?err, "bookings: failed to load booking");
                UseCaseError::Internal(err)
            })?
            .ok_or_else(|| {
                info!(booking_id, "bookings: booking not found");
                UseCaseError::NotFound("booking")
            })
    }

    /// Looks up the referenced package, recording a `tour` field error when it is missing.
    async fn resolve_tour(
        &self,
        tour_id: i64,
        errors: &mut ValidationErrors,
    ) -> UseCaseResult<Option<TourPackageEntity>> {
        let tour = self
            .tour_package_repository
            .find_by_id(tour_id)
            .await
            .map_err(|err| {
                error!(tour_id, db_error = ?err, "bookings: failed to load tour");
                UseCaseError::Internal(err)
            })?;

        if tour.is_none() {
            errors.add(
                "tour",
                format!("Invalid pk \"{}\" - object does not exist.", tour_id),
            );
        }
        Ok(tour)
    }
}
