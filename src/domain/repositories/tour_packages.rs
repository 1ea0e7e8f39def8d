use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::{
    entities::tour_packages::TourPackageEntity,
    value_objects::tour_packages::ListToursFilter,
};

#[async_trait]
#[automock]
pub trait TourPackageRepository {
    /// Active packages matching `filter`, ordered and paginated as it asks.
    async fn list_active(&self, filter: ListToursFilter) -> Result<Vec<TourPackageEntity>>;
    async fn find_active_by_id(&self, tour_id: i64) -> Result<Option<TourPackageEntity>>;
    /// Looks a package up regardless of `is_active`.
    async fn find_by_id(&self, tour_id: i64) -> Result<Option<TourPackageEntity>>;
}
