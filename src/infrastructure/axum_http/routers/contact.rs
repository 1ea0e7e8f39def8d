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
    application::usercases::contact_messages::ContactMessageUseCase,
    domain::{
        repositories::contact_messages::ContactMessageRepository,
        value_objects::contact_messages::{
            BulkMarkReadPayload, ContactMessagePayload, ListContactMessagesQuery,
        },
    },
    infrastructure::{
        axum_http::error_responses::AppError,
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::contact_messages::ContactMessagePostgres,
        },
    },
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let contact_message_repository = ContactMessagePostgres::new(Arc::clone(&db_pool));
    let contact_message_usecase = ContactMessageUseCase::new(Arc::new(contact_message_repository));

    router(Arc::new(contact_message_usecase))
}

pub fn router<C>(contact_message_usecase: Arc<ContactMessageUseCase<C>>) -> Router
where
    C: ContactMessageRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/api/contact/", get(list::<C>).post(create::<C>))
        .route("/api/contact/bulk-mark-read/", post(bulk_mark_read::<C>))
        .route(
            "/api/contact/:id/",
            get(retrieve::<C>)
                .put(update::<C>)
                .patch(partial_update::<C>)
                .delete(destroy::<C>),
        )
        .route("/api/contact/:id/mark-read/", post(mark_read::<C>))
        .with_state(contact_message_usecase)
}

pub async fn list<C>(
    State(contact_message_usecase): State<Arc<ContactMessageUseCase<C>>>,
    query: Result<Query<ListContactMessagesQuery>, QueryRejection>,
) -> Result<impl IntoResponse, AppError>
where
    C: ContactMessageRepository + Send + Sync + 'static,
{
    let Query(query) = query?;
    let filter = query.into_filter()?;

    let contacts = contact_message_usecase.list(filter).await?;
    Ok(Json(contacts))
}

pub async fn create<C>(
    State(contact_message_usecase): State<Arc<ContactMessageUseCase<C>>>,
    payload: Result<Json<ContactMessagePayload>, JsonRejection>,
) -> Result<impl IntoResponse, AppError>
where
    C: ContactMessageRepository + Send + Sync + 'static,
{
    let Json(payload) = payload?;
    info!("contact: message submitted");

    let receipt = contact_message_usecase.create(payload).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

pub async fn retrieve<C>(
    State(contact_message_usecase): State<Arc<ContactMessageUseCase<C>>>,
    contact_id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, AppError>
where
    C: ContactMessageRepository + Send + Sync + 'static,
{
    let Path(contact_id) = contact_id?;

    let contact = contact_message_usecase.retrieve(contact_id).await?;
    Ok(Json(contact))
}

pub async fn update<C>(
    State(contact_message_usecase): State<Arc<ContactMessageUseCase<C>>>,
    contact_id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<ContactMessagePayload>, JsonRejection>,
) -> Result<impl IntoResponse, AppError>
where
    C: ContactMessageRepository + Send + Sync + 'static,
{
    let Path(contact_id) = contact_id?;
    let Json(payload) = payload?;

    let contact = contact_message_usecase
        .update(contact_id, payload, false)
        .await?;
    Ok(Json(contact))
}

pub async fn partial_update<C>(
    State(contact_message_usecase): State<Arc<ContactMessageUseCase<C>>>,
    contact_id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<ContactMessagePayload>, JsonRejection>,
) -> Result<impl IntoResponse, AppError>
where
    C: ContactMessageRepository + Send + Sync + 'static,
{
    let Path(contact_id) = contact_id?;
    let Json(payload) = payload?;

    let contact = contact_message_usecase
        .update(contact_id, payload, true)
        .await?;
    Ok(Json(contact))
}

pub async fn destroy<C>(
    State(contact_message_usecase): State<Arc<ContactMessageUseCase<C>>>,
    contact_id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, AppError>
where
    C: ContactMessageRepository + Send + Sync + 'static,
{
    let Path(contact_id) = contact_id?;

    contact_message_usecase.delete(contact_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn mark_read<C>(
    State(contact_message_usecase): State<Arc<ContactMessageUseCase<C>>>,
    contact_id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, AppError>
where
    C: ContactMessageRepository + Send + Sync + 'static,
{
    let Path(contact_id) = contact_id?;

    let receipt = contact_message_usecase.mark_read(contact_id).await?;
    Ok(Json(receipt))
}

pub async fn bulk_mark_read<C>(
    State(contact_message_usecase): State<Arc<ContactMessageUseCase<C>>>,
    payload: Result<Json<BulkMarkReadPayload>, JsonRejection>,
) -> Result<impl IntoResponse, AppError>
where
    C: ContactMessageRepository + Send + Sync + 'static,
{
    let Json(payload) = payload?;
    info!(id_count = payload.ids.len(), "contact: bulk mark-read request received");

    let result = contact_message_usecase.bulk_mark_read(payload.ids).await?;
    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, header::CONTENT_TYPE},
    };
    use chrono::Utc;
    use mockall::predicate::eq;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::domain::{
        entities::contact_messages::ContactMessageEntity,
        repositories::contact_messages::MockContactMessageRepository,
    };

    fn app(repository: MockContactMessageRepository) -> Router {
        router(Arc::new(ContactMessageUseCase::new(Arc::new(repository))))
    }

    fn stored_contact(id: i64, is_read: bool) -> ContactMessageEntity {
        ContactMessageEntity {
            id,
            name: "Aziz".to_string(),
            email: "a@x.com".to_string(),
            phone: "+998901234567".to_string(),
            message: "Do you have tours to Dubai in May?".to_string(),
            sent_at: Utc::now(),
            is_read,
        }
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn submit_returns_receipt() {
        let mut repository = MockContactMessageRepository::new();
        repository.expect_create().times(1).returning(|_| {
            let contact = stored_contact(5, false);
            Box::pin(async move { Ok(contact) })
        });

        let (status, body) = post_json(
            app(repository),
            "/api/contact/",
            json!({
                "name": "Aziz",
                "email": "a@x.com",
                "phone": "+998901234567",
                "message": "Do you have tours to Dubai in May?"
            }),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(
            body,
            json!({"message": "Message sent successfully", "contact_id": 5})
        );
    }

    #[tokio::test]
    async fn submit_without_at_sign_is_rejected() {
        let mut repository = MockContactMessageRepository::new();
        repository.expect_create().never();

        let (status, body) = post_json(
            app(repository),
            "/api/contact/",
            json!({
                "name": "Aziz",
                "email": "a.x.com",
                "phone": "+998901234567",
                "message": "Hello"
            }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["errors"]["email"].is_array());
    }

    #[tokio::test]
    async fn mistyped_fields_are_reported_per_field() {
        let mut repository = MockContactMessageRepository::new();
        repository.expect_create().never();

        let (status, body) = post_json(
            app(repository),
            "/api/contact/",
            json!({
                "name": "Aziz",
                "email": "a@x.com",
                "phone": 998901234567_i64,
                "message": {"text": "Hello"}
            }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"]["phone"][0], "Phone number must start with +998.");
        assert_eq!(body["errors"]["message"][0], "Not a valid string.");
        assert!(body["errors"]["name"].is_null());
    }

    #[tokio::test]
    async fn mark_read_route_reports_message() {
        let mut repository = MockContactMessageRepository::new();
        repository
            .expect_mark_read()
            .with(eq(5))
            .returning(|id| {
                let contact = stored_contact(id, true);
                Box::pin(async move { Ok(Some(contact)) })
            });

        let (status, body) = post_json(app(repository), "/api/contact/5/mark-read/", Value::Null).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"message": "Message marked as read", "contact_id": 5})
        );
    }

    #[tokio::test]
    async fn bulk_route_is_not_mistaken_for_an_id() {
        let mut repository = MockContactMessageRepository::new();
        repository
            .expect_mark_read_many()
            .with(eq(vec![1, 2]))
            .times(1)
            .returning(|ids| Box::pin(async move { Ok(ids.len()) }));

        let (status, body) = post_json(
            app(repository),
            "/api/contact/bulk-mark-read/",
            json!({"ids": [1, 2]}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"updated": 2, "message": "2 messages marked as read"})
        );
    }
}
