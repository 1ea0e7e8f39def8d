use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tracing::info;

use crate::{
    application::usercases::bookings::BookingUseCase,
    domain::{
        repositories::{bookings::BookingRepository, tour_packages::TourPackageRepository},
        value_objects::bookings::{BookingPayload, ListBookingsQuery, PaymentVerificationPayload},
    },
    infrastructure::{
        axum_http::error_responses::AppError,
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{bookings::BookingPostgres, tour_packages::TourPackagePostgres},
        },
    },
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let booking_repository = BookingPostgres::new(Arc::clone(&db_pool));
    let tour_package_repository = TourPackagePostgres::new(Arc::clone(&db_pool));
    let booking_usecase = BookingUseCase::new(
        Arc::new(booking_repository),
        Arc::new(tour_package_repository),
    );

    router(Arc::new(booking_usecase))
}

pub fn router<B, T>(booking_usecase: Arc<BookingUseCase<B, T>>) -> Router
where
    B: BookingRepository + Send + Sync + 'static,
    T: TourPackageRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/api/bookings/", get(list::<B, T>).post(create::<B, T>))
        .route(
            "/api/bookings/:id/",
            get(retrieve::<B, T>)
                .put(update::<B, T>)
                .patch(partial_update::<B, T>)
                .delete(destroy::<B, T>),
        )
        .route(
            "/api/bookings/:id/verify-payment/",
            post(verify_payment::<B, T>),
        )
        .with_state(booking_usecase)
}

pub async fn list<B, T>(
    State(booking_usecase): State<Arc<BookingUseCase<B, T>>>,
    query: Result<Query<ListBookingsQuery>, QueryRejection>,
) -> Result<impl IntoResponse, AppError>
where
    B: BookingRepository + Send + Sync + 'static,
    T: TourPackageRepository + Send + Sync + 'static,
{
    let Query(query) = query?;
    let filter = query.into_filter()?;

    let bookings = booking_usecase.list(filter).await?;
    Ok(Json(bookings))
}

pub async fn create<B, T>(
    State(booking_usecase): State<Arc<BookingUseCase<B, T>>>,
    payload: Result<Json<BookingPayload>, JsonRejection>,
) -> Result<impl IntoResponse, AppError>
where
    B: BookingRepository + Send + Sync + 'static,
    T: TourPackageRepository + Send + Sync + 'static,
{
    let Json(payload) = payload?;
    info!(tour_id = ?payload.tour, "bookings: create request received");

    let created = booking_usecase.create(payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn retrieve<B, T>(
    State(booking_usecase): State<Arc<BookingUseCase<B, T>>>,
    booking_id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, AppError>
where
    B: BookingRepository + Send + Sync + 'static,
    T: TourPackageRepository + Send + Sync + 'static,
{
    let Path(booking_id) = booking_id?;

    let booking = booking_usecase.retrieve(booking_id).await?;
    Ok(Json(booking))
}

pub async fn update<B, T>(
    State(booking_usecase): State<Arc<BookingUseCase<B, T>>>,
    booking_id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<BookingPayload>, JsonRejection>,
) -> Result<impl IntoResponse, AppError>
where
    B: BookingRepository + Send + Sync + 'static,
    T: TourPackageRepository + Send + Sync + 'static,
{
    let Path(booking_id) = booking_id?;
    let Json(payload) = payload?;

    let booking = booking_usecase.update(booking_id, payload, false).await?;
    Ok(Json(booking))
}

pub async fn partial_update<B, T>(
    State(booking_usecase): State<Arc<BookingUseCase<B, T>>>,
    booking_id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<BookingPayload>, JsonRejection>,
) -> Result<impl IntoResponse, AppError>
where
    B: BookingRepository + Send + Sync + 'static,
    T: TourPackageRepository + Send + Sync + 'static,
{
    let Path(booking_id) = booking_id?;
    let Json(payload) = payload?;

    let booking = booking_usecase.update(booking_id, payload, true).await?;
    Ok(Json(booking))
}

pub async fn destroy<B, T>(
    State(booking_usecase): State<Arc<BookingUseCase<B, T>>>,
    booking_id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, AppError>
where
    B: BookingRepository + Send + Sync + 'static,
    T: TourPackageRepository + Send + Sync + 'static,
{
    let Path(booking_id) = booking_id?;

    booking_usecase.delete(booking_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn verify_payment<B, T>(
    State(booking_usecase): State<Arc<BookingUseCase<B, T>>>,
    booking_id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<PaymentVerificationPayload>, JsonRejection>,
) -> Result<impl IntoResponse, AppError>
where
    B: BookingRepository + Send + Sync + 'static,
    T: TourPackageRepository + Send + Sync + 'static,
{
    let Path(booking_id) = booking_id?;
    info!(booking_id, "bookings: verify-payment request received");

    // An unknown booking answers 404 even when the body is unreadable.
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => {
            booking_usecase.retrieve(booking_id).await?;
            return Err(rejection.into());
        }
    };

    let confirmation = booking_usecase.verify_payment(booking_id, payload).await?;
    Ok(Json(confirmation))
}
