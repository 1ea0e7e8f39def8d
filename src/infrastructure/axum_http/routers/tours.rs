use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
    response::IntoResponse,
    routing::get,
};
use tracing::info;

use crate::{
    application::usercases::tour_packages::TourPackageUseCase,
    config::config_model::DotEnvyConfig,
    domain::{
        repositories::tour_packages::TourPackageRepository,
        value_objects::tour_packages::{ListToursQuery, SearchToursQuery},
    },
    infrastructure::{
        axum_http::error_responses::AppError,
        postgres::{
            postgres_connection::PgPoolSquad, repositories::tour_packages::TourPackagePostgres,
        },
    },
};

pub fn routes(db_pool: Arc<PgPoolSquad>, config: Arc<DotEnvyConfig>) -> Router {
    let tour_package_repository = TourPackagePostgres::new(Arc::clone(&db_pool));
    let tour_package_usecase = TourPackageUseCase::new(
        Arc::new(tour_package_repository),
        config.media.url.clone(),
    );

    router(Arc::new(tour_package_usecase))
}

pub fn router<T>(tour_package_usecase: Arc<TourPackageUseCase<T>>) -> Router
where
    T: TourPackageRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/api/tours/", get(list::<T>))
        .route("/api/tours/featured/", get(featured::<T>))
        .route("/api/tours/search/", get(search::<T>))
        .route("/api/tours/:id/", get(retrieve::<T>))
        .with_state(tour_package_usecase)
}

pub async fn list<T>(
    State(tour_package_usecase): State<Arc<TourPackageUseCase<T>>>,
    query: Result<Query<ListToursQuery>, QueryRejection>,
) -> Result<impl IntoResponse, AppError>
where
    T: TourPackageRepository + Send + Sync + 'static,
{
    let Query(query) = query?;
    let filter = query.into_filter()?;

    let tours = tour_package_usecase.list(filter).await?;
    Ok(Json(tours))
}

pub async fn featured<T>(
    State(tour_package_usecase): State<Arc<TourPackageUseCase<T>>>,
) -> Result<impl IntoResponse, AppError>
where
    T: TourPackageRepository + Send + Sync + 'static,
{
    let tours = tour_package_usecase.featured().await?;
    Ok(Json(tours))
}

pub async fn search<T>(
    State(tour_package_usecase): State<Arc<TourPackageUseCase<T>>>,
    query: Result<Query<SearchToursQuery>, QueryRejection>,
) -> Result<impl IntoResponse, AppError>
where
    T: TourPackageRepository + Send + Sync + 'static,
{
    let Query(query) = query?;
    info!(q = ?query.q, "tours: search request received");
    let filter = query.into_filter()?;

    let tours = tour_package_usecase.search(filter).await?;
    Ok(Json(tours))
}

pub async fn retrieve<T>(
    State(tour_package_usecase): State<Arc<TourPackageUseCase<T>>>,
    tour_id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, AppError>
where
    T: TourPackageRepository + Send + Sync + 'static,
{
    let Path(tour_id) = tour_id?;

    let tour = tour_package_usecase.retrieve(tour_id).await?;
    Ok(Json(tour))
}
