use std::sync::Arc;

use tracing::{error, info};

use crate::{
    application::usercases::errors::{UseCaseError, UseCaseResult},
    domain::{
        repositories::tour_packages::TourPackageRepository,
        value_objects::tour_packages::{ListToursFilter, TourPackageDto},
    },
};

/// Read-only access to the public tour catalogue. Only active packages are ever returned.
pub struct TourPackageUseCase<T>
where
    T: TourPackageRepository + Send + Sync + 'static,
{
    tour_package_repository: Arc<T>,
    media_url: String,
}

impl<T> TourPackageUseCase<T>
where
    T: TourPackageRepository + Send + Sync + 'static,
{
    pub fn new(tour_package_repository: Arc<T>, media_url: String) -> Self {
        Self {
            tour_package_repository,
            media_url,
        }
    }

    pub async fn list(&self, filter: ListToursFilter) -> UseCaseResult<Vec<TourPackageDto>> {
        info!(
            search_terms = filter.search_terms.len(),
            location = ?filter.location,
            duration = ?filter.duration,
            "tour_packages: listing active tours"
        );
        self.load(filter).await
    }

    pub async fn search(&self, filter: ListToursFilter) -> UseCaseResult<Vec<TourPackageDto>> {
        info!(
            has_query = !filter.search_terms.is_empty(),
            location = ?filter.location_contains,
            min_price = ?filter.min_price,
            max_price = ?filter.max_price,
            duration = ?filter.duration,
            "tour_packages: searching active tours"
        );
        self.load(filter).await
    }

    pub async fn featured(&self) -> UseCaseResult<Vec<TourPackageDto>> {
        info!("tour_packages: loading featured tours");
        self.load(ListToursFilter::featured()).await
    }

    pub async fn retrieve(&self, tour_id: i64) -> UseCaseResult<TourPackageDto> {
        let tour = self
            .tour_package_repository
            .find_active_by_id(tour_id)
            .await
            .map_err(|err| {
                error!(tour_id, db_error = ?err, "tour_packages: failed to load tour");
                UseCaseError::Internal(err)
            })?
            .ok_or_else(|| {
                info!(tour_id, "tour_packages: active tour not found");
                UseCaseError::NotFound("tour package")
            })?;

        Ok(TourPackageDto::from_entity(tour, &self.media_url))
    }

    async fn load(&self, filter: ListToursFilter) -> UseCaseResult<Vec<TourPackageDto>> {
        let tours = self
            .tour_package_repository
            .list_active(filter)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "tour_packages: failed to list tours");
                UseCaseError::Internal(err)
            })?;

        info!(tour_count = tours.len(), "tour_packages: tours loaded");
        Ok(tours
            .into_iter()
            .map(|tour| TourPackageDto::from_entity(tour, &self.media_url))
            .collect())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, Utc};
    use rust_decimal::Decimal;

    use crate::domain::{
        entities::tour_packages::TourPackageEntity,
        repositories::tour_packages::MockTourPackageRepository,
        value_objects::tour_packages::FEATURED_TOURS_LIMIT,
    };

    pub(crate) fn sample_tour(id: i64, title: &str, price: i64) -> TourPackageEntity {
        let now = Utc::now();
        TourPackageEntity {
            id,
            title: title.to_string(),
            description: "Seven days by the sea".to_string(),
            image: "tour_images/dubai.jpg".to_string(),
            location: "Dubai, UAE".to_string(),
            start_date: NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 5, 8).unwrap(),
            price: Decimal::from(price),
            duration: 7,
            is_active: true,
            created_at: now - Duration::hours(id),
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn featured_asks_for_four_newest_tours() {
        let mut repository = MockTourPackageRepository::new();

        repository
            .expect_list_active()
            .withf(|filter| {
                filter.pagination.limit == Some(FEATURED_TOURS_LIMIT)
                    && filter.ordering.is_empty()
                    && filter.search_terms.is_empty()
            })
            .times(1)
            .returning(|_| {
                let tours = (1..=4)
                    .map(|id| sample_tour(id, "Dubai", 5_000_000))
                    .collect::<Vec<_>>();
                Box::pin(async move { Ok(tours) })
            });

        let usecase = TourPackageUseCase::new(Arc::new(repository), "/media/".to_string());
        let tours = usecase.featured().await.unwrap();

        assert_eq!(tours.len(), 4);
        assert!(tours.iter().all(|tour| tour.is_active));
        assert_eq!(tours[0].image.as_deref(), Some("/media/tour_images/dubai.jpg"));
        assert_eq!(tours[0].price_uzs, "5,000,000 UZS");
    }

    #[tokio::test]
    async fn retrieve_returns_not_found_for_missing_or_inactive_tour() {
        let mut repository = MockTourPackageRepository::new();

        repository
            .expect_find_active_by_id()
            .returning(|_| Box::pin(async { Ok(None) }));

        let usecase = TourPackageUseCase::new(Arc::new(repository), "/media/".to_string());
        let err = usecase.retrieve(42).await.unwrap_err();

        assert!(matches!(err, UseCaseError::NotFound(_)));
        assert_eq!(err.status_code(), axum::http::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn search_passes_filter_through() {
        let mut repository = MockTourPackageRepository::new();

        repository
            .expect_list_active()
            .withf(|filter| {
                filter.min_price == Some(Decimal::from(4_000_000))
                    && filter.max_price == Some(Decimal::from(6_000_000))
                    && filter.location_contains.as_deref() == Some("Dubai")
            })
            .returning(|_| {
                let tours = vec![sample_tour(1, "Dubai Marina", 4_500_000)];
                Box::pin(async move { Ok(tours) })
            });

        let usecase = TourPackageUseCase::new(Arc::new(repository), "/media/".to_string());
        let filter = ListToursFilter {
            min_price: Some(Decimal::from(4_000_000)),
            max_price: Some(Decimal::from(6_000_000)),
            location_contains: Some("Dubai".to_string()),
            ..ListToursFilter::default()
        };

        let tours = usecase.search(filter).await.unwrap();
        assert_eq!(tours.len(), 1);
        assert_eq!(tours[0].title, "Dubai Marina");
    }

    #[tokio::test]
    async fn store_failure_is_internal() {
        let mut repository = MockTourPackageRepository::new();

        repository
            .expect_list_active()
            .returning(|_| Box::pin(async { Err(anyhow::anyhow!("connection refused")) }));

        let usecase = TourPackageUseCase::new(Arc::new(repository), "/media/".to_string());
        let err = usecase.list(ListToursFilter::default()).await.unwrap_err();

        assert!(matches!(err, UseCaseError::Internal(_)));
    }
}
