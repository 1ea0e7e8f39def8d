use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{
    entities::contact_messages::{
        ContactMessageEntity, InsertContactMessageEntity, UpdateContactMessageEntity,
    },
    value_objects::{
        bookings::{EMAIL_MAX_LEN, NAME_MAX_LEN, PHONE_MAX_LEN},
        query_params::{OrderingTerm, Pagination, parse_ordering},
        validation::{ValidationErrors, check_contact_details, present, text_value},
    },
};

/// Contact form body. `sent_at` and `is_read` are never taken from the client.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ContactMessagePayload {
    #[serde(default, deserialize_with = "present")]
    pub name: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub email: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub phone: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub message: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactMessageChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub message: Option<String>,
}

impl ContactMessagePayload {
    pub fn check(&self, errors: &mut ValidationErrors, required: bool) -> ContactMessageChanges {
        let name = text_value(errors, "name", self.name.as_ref(), Some(NAME_MAX_LEN), required);
        let email = text_value(
            errors,
            "email",
            self.email.as_ref(),
            Some(EMAIL_MAX_LEN),
            required,
        );
        let phone = text_value(
            errors,
            "phone",
            self.phone.as_ref(),
            Some(PHONE_MAX_LEN),
            required,
        );
        let message = text_value(errors, "message", self.message.as_ref(), None, required);

        check_contact_details(errors, phone.as_deref(), email.as_deref());

        ContactMessageChanges {
            name,
            email,
            phone,
            message,
        }
    }

    pub fn validate(&self, required: bool) -> Result<ContactMessageChanges, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let changes = self.check(&mut errors, required);
        errors.into_result(changes)
    }
}

impl ContactMessageChanges {
    /// Builds an unread message stamped with `now`. `None` when a field is missing.
    pub fn into_insert_entity(self, now: DateTime<Utc>) -> Option<InsertContactMessageEntity> {
        Some(InsertContactMessageEntity {
            name: self.name?,
            email: self.email?,
            phone: self.phone?,
            message: self.message?,
            sent_at: now,
            is_read: false,
        })
    }

    pub fn into_update_entity(self) -> UpdateContactMessageEntity {
        UpdateContactMessageEntity {
            name: self.name,
            email: self.email,
            phone: self.phone,
            message: self.message,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ContactMessageDto {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    pub sent_at: DateTime<Utc>,
    pub is_read: bool,
}

impl From<ContactMessageEntity> for ContactMessageDto {
    fn from(value: ContactMessageEntity) -> Self {
        Self {
            id: value.id,
            name: value.name,
            email: value.email,
            phone: value.phone,
            message: value.message,
            sent_at: value.sent_at,
            is_read: value.is_read,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ContactReceiptDto {
    pub message: String,
    pub contact_id: i64,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct BulkMarkReadPayload {
    #[serde(default)]
    pub ids: Vec<i64>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BulkMarkReadDto {
    pub updated: usize,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactOrderingField {
    SentAt,
    IsRead,
}

impl ContactOrderingField {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "sent_at" => Some(ContactOrderingField::SentAt),
            "is_read" => Some(ContactOrderingField::IsRead),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListContactMessagesFilter {
    /// Empty means newest first.
    pub ordering: Vec<OrderingTerm<ContactOrderingField>>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListContactMessagesQuery {
    pub ordering: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl ListContactMessagesQuery {
    pub fn into_filter(self) -> Result<ListContactMessagesFilter, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let filter = ListContactMessagesFilter {
            ordering: parse_ordering(self.ordering.as_deref(), ContactOrderingField::from_name),
            pagination: Pagination::parse(
                &mut errors,
                self.limit.as_deref(),
                self.offset.as_deref(),
            ),
        };

        errors.into_result(filter)
    }
}
