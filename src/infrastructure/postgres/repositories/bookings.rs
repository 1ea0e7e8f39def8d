use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{RunQueryDsl, delete, insert_into, prelude::*, update};
use std::sync::Arc;

use crate::{
    domain::{
        entities::{
            bookings::{BookingEntity, InsertBookingEntity, UpdateBookingEntity},
            tour_packages::TourPackageEntity,
        },
        repositories::bookings::BookingRepository,
        value_objects::{bookings::ListBookingsFilter, enums::sort_order::SortOrder},
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{bookings, tour_packages},
    },
};

pub struct BookingPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl BookingPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl BookingRepository for BookingPostgres {
    async fn create(&self, insert_booking_entity: InsertBookingEntity) -> Result<BookingEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(bookings::table)
            .values(&insert_booking_entity)
            .returning(BookingEntity::as_returning())
            .get_result::<BookingEntity>(&mut conn)?;

        Ok(result)
    }

    async fn list(
        &self,
        filter: ListBookingsFilter,
    ) -> Result<Vec<(BookingEntity, TourPackageEntity)>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;
        let mut query = bookings::table
            .inner_join(tour_packages::table)
            .select((BookingEntity::as_select(), TourPackageEntity::as_select()))
            .into_boxed();

        if let Some(payment_method) = filter.payment_method {
            query = query.filter(bookings::payment_method.eq(payment_method.to_string()));
        }

        if let Some(is_paid) = filter.is_paid {
            query = query.filter(bookings::is_paid.eq(is_paid));
        }

        if let Some(tour_id) = filter.tour_id {
            query = query.filter(bookings::tour_id.eq(tour_id));
        }

        query = match filter.sort_order {
            SortOrder::Asc => query.order(bookings::created_at.asc()),
            SortOrder::Desc => query.order(bookings::created_at.desc()),
        };

        if let Some(limit) = filter.pagination.limit {
            query = query.limit(limit);
        }

        if let Some(offset) = filter.pagination.offset {
            query = query.offset(offset);
        }

        let results = query.load::<(BookingEntity, TourPackageEntity)>(&mut conn)?;

        Ok(results)
    }

    async fn find_by_id(
        &self,
        booking_id: i64,
    ) -> Result<Option<(BookingEntity, TourPackageEntity)>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = bookings::table
            .inner_join(tour_packages::table)
            .filter(bookings::id.eq(booking_id))
            .select((BookingEntity::as_select(), TourPackageEntity::as_select()))
            .first::<(BookingEntity, TourPackageEntity)>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn update(
        &self,
        booking_id: i64,
        update_booking_entity: UpdateBookingEntity,
    ) -> Result<Option<BookingEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = update(bookings::table.find(booking_id))
            .set(&update_booking_entity)
            .returning(BookingEntity::as_returning())
            .get_result::<BookingEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn delete(&self, booking_id: i64) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let deleted = delete(bookings::table.find(booking_id)).execute(&mut conn)?;

        Ok(deleted > 0)
    }

    async fn mark_paid(&self, booking_id: i64) -> Result<Option<BookingEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = update(bookings::table.find(booking_id))
            .set((
                bookings::is_paid.eq(true),
                bookings::updated_at.eq(Utc::now()),
            ))
            .returning(BookingEntity::as_returning())
            .get_result::<BookingEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }
}
