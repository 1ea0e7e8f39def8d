use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::infrastructure::postgres::schema::bookings;

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = bookings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BookingEntity {
    pub id: i64,
    pub tour_id: i64,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub payment_method: String,
    pub is_paid: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = bookings)]
pub struct InsertBookingEntity {
    pub tour_id: i64,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub payment_method: String,
    pub is_paid: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Columns a client may change on an existing booking. `is_paid` is never part of it,
/// payment verification is its only writer.
#[derive(Debug, Clone, PartialEq, AsChangeset)]
#[diesel(table_name = bookings)]
pub struct UpdateBookingEntity {
    pub tour_id: Option<i64>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub payment_method: Option<String>,
    pub updated_at: DateTime<Utc>,
}
