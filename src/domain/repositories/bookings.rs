use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::{
    entities::{
        bookings::{BookingEntity, InsertBookingEntity, UpdateBookingEntity},
        tour_packages::TourPackageEntity,
    },
    value_objects::bookings::ListBookingsFilter,
};

#[async_trait]
#[automock]
pub trait BookingRepository {
    async fn create(&self, insert_booking_entity: InsertBookingEntity) -> Result<BookingEntity>;
    async fn list(
        &self,
        filter: ListBookingsFilter,
    ) -> Result<Vec<(BookingEntity, TourPackageEntity)>>;
    async fn find_by_id(&self, booking_id: i64)
    -> Result<Option<(BookingEntity, TourPackageEntity)>>;
    async fn update(
        &self,
        booking_id: i64,
        update_booking_entity: UpdateBookingEntity,
    ) -> Result<Option<BookingEntity>>;
    /// Returns `false` when no row had that id.
    async fn delete(&self, booking_id: i64) -> Result<bool>;
    async fn mark_paid(&self, booking_id: i64) -> Result<Option<BookingEntity>>;
}
