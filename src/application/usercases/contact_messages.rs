use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};

use crate::{
    application::usercases::errors::{UseCaseError, UseCaseResult},
    domain::{
        entities::contact_messages::ContactMessageEntity,
        repositories::contact_messages::ContactMessageRepository,
        value_objects::contact_messages::{
            BulkMarkReadDto, ContactMessageDto, ContactMessagePayload, ContactReceiptDto,
            ListContactMessagesFilter,
        },
    },
};

pub const MESSAGE_SENT: &str = "Message sent successfully";
pub const MESSAGE_MARKED_READ: &str = "Message marked as read";

pub struct ContactMessageUseCase<C>
where
    C: ContactMessageRepository + Send + Sync + 'static,
{
    contact_message_repository: Arc<C>,
}

impl<C> ContactMessageUseCase<C>
where
    C: ContactMessageRepository + Send + Sync + 'static,
{
    pub fn new(contact_message_repository: Arc<C>) -> Self {
        Self {
            contact_message_repository,
        }
    }

    pub async fn create(&self, payload: ContactMessagePayload) -> UseCaseResult<ContactReceiptDto> {
        let changes = payload.validate(true).map_err(|errors| {
            warn!(fields = %errors, "contact_messages: rejected invalid message");
            UseCaseError::Validation(errors)
        })?;

        let Some(insert_contact_message_entity) = changes.into_insert_entity(Utc::now()) else {
            return Err(UseCaseError::Internal(anyhow::anyhow!(
                "validated contact message is missing fields"
            )));
        };

        let contact = self
            .contact_message_repository
            .create(insert_contact_message_entity)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "contact_messages: failed to store message");
                UseCaseError::Internal(err)
            })?;

        info!(contact_id = contact.id, "contact_messages: message received");

        Ok(ContactReceiptDto {
            message: MESSAGE_SENT.to_string(),
            contact_id: contact.id,
        })
    }

    pub async fn list(
        &self,
        filter: ListContactMessagesFilter,
    ) -> UseCaseResult<Vec<ContactMessageDto>> {
        let contacts = self
            .contact_message_repository
            .list(filter)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "contact_messages: failed to list messages");
                UseCaseError::Internal(err)
            })?;

        info!(message_count = contacts.len(), "contact_messages: messages loaded");
        Ok(contacts.into_iter().map(ContactMessageDto::from).collect())
    }

    pub async fn retrieve(&self, contact_id: i64) -> UseCaseResult<ContactMessageDto> {
        self.find_contact(contact_id).await.map(ContactMessageDto::from)
    }

    pub async fn update(
        &self,
        contact_id: i64,
        payload: ContactMessagePayload,
        partial: bool,
    ) -> UseCaseResult<ContactMessageDto> {
        self.find_contact(contact_id).await?;

        let changes = payload.validate(!partial).map_err(|errors| {
            warn!(contact_id, fields = %errors, "contact_messages: rejected invalid update");
            UseCaseError::Validation(errors)
        })?;

        let contact = self
            .contact_message_repository
            .update(contact_id, changes.into_update_entity())
            .await
            .map_err(|err| {
                error!(contact_id, db_error = ?err, "contact_messages: failed to update message");
                UseCaseError::Internal(err)
            })?
            .ok_or(UseCaseError::NotFound("contact message"))?;

        info!(contact_id, partial, "contact_messages: message updated");
        Ok(contact.into())
    }

    pub async fn delete(&self, contact_id: i64) -> UseCaseResult<()> {
        let deleted = self
            .contact_message_repository
            .delete(contact_id)
            .await
            .map_err(|err| {
                error!(contact_id, db_error = ?err, "contact_messages: failed to delete message");
                UseCaseError::Internal(err)
            })?;

        if !deleted {
            return Err(UseCaseError::NotFound("contact message"));
        }

        info!(contact_id, "contact_messages: message deleted");
        Ok(())
    }

    /// Idempotent: an already-read message is reported the same way.
    pub async fn mark_read(&self, contact_id: i64) -> UseCaseResult<ContactReceiptDto> {
        let contact = self
            .contact_message_repository
            .mark_read(contact_id)
            .await
            .map_err(|err| {
                error!(contact_id, db_error = ?err, "contact_messages: failed to mark message read");
                UseCaseError::Internal(err)
            })?
            .ok_or(UseCaseError::NotFound("contact message"))?;

        info!(contact_id, "contact_messages: message marked read");
        Ok(ContactReceiptDto {
            message: MESSAGE_MARKED_READ.to_string(),
            contact_id: contact.id,
        })
    }

    /// Unknown ids are skipped; the count reflects rows that exist.
    pub async fn bulk_mark_read(&self, contact_ids: Vec<i64>) -> UseCaseResult<BulkMarkReadDto> {
        let requested = contact_ids.len();
        let updated = if contact_ids.is_empty() {
            0
        } else {
            self.contact_message_repository
                .mark_read_many(contact_ids)
                .await
                .map_err(|err| {
                    error!(db_error = ?err, "contact_messages: failed to bulk mark messages read");
                    UseCaseError::Internal(err)
                })?
        };

        info!(requested, updated, "contact_messages: messages bulk marked read");
        let noun = if updated == 1 { "message" } else { "messages" };
        Ok(BulkMarkReadDto {
            updated,
            message: format!("{} {} marked as read", updated, noun),
        })
    }

    async fn find_contact(&self, contact_id: i64) -> UseCaseResult<ContactMessageEntity> {
        self.contact_message_repository
            .find_by_id(contact_id)
            .await
            .map_err(|err| {
                error!(contact_id, db_error = ?err, "contact_messages: failed to load message");
                UseCaseError::Internal(err)
            })?
            .ok_or_else(|| {
                info!(contact_id, "contact_messages: message not found");
                UseCaseError::NotFound("contact message")
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;
    use serde_json::json;

    use crate::domain::repositories::contact_messages::MockContactMessageRepository;

    fn sample_contact(id: i64, is_read: bool) -> ContactMessageEntity {
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

    fn valid_payload() -> ContactMessagePayload {
        ContactMessagePayload {
            name: Some(json!("Aziz")),
            email: Some(json!("a@x.com")),
            phone: Some(json!("+998901234567")),
            message: Some(json!("Do you have tours to Dubai in May?")),
        }
    }

    #[tokio::test]
    async fn create_stores_unread_message() {
        let mut repository = MockContactMessageRepository::new();
        repository
            .expect_create()
            .withf(|entity| !entity.is_read && entity.name == "Aziz")
            .times(1)
            .returning(|_| {
                let contact = sample_contact(21, false);
                Box::pin(async move { Ok(contact) })
            });

        let usecase = ContactMessageUseCase::new(Arc::new(repository));
        let receipt = usecase.create(valid_payload()).await.unwrap();

        assert_eq!(receipt.contact_id, 21);
        assert_eq!(receipt.message, MESSAGE_SENT);
    }

    #[tokio::test]
    async fn create_with_bad_phone_stores_nothing() {
        let mut repository = MockContactMessageRepository::new();
        repository.expect_create().never();

        let usecase = ContactMessageUseCase::new(Arc::new(repository));
        let err = usecase
            .create(ContactMessagePayload {
                phone: Some(json!("901234567")),
                ..valid_payload()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, UseCaseError::Validation(ref errors) if errors.contains("phone")));
    }

    #[tokio::test]
    async fn mark_read_is_idempotent() {
        let mut repository = MockContactMessageRepository::new();
        repository
            .expect_mark_read()
            .with(eq(4))
            .times(2)
            .returning(|id| {
                let contact = sample_contact(id, true);
                Box::pin(async move { Ok(Some(contact)) })
            });

        let usecase = ContactMessageUseCase::new(Arc::new(repository));

        let first = usecase.mark_read(4).await.unwrap();
        let second = usecase.mark_read(4).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.message, MESSAGE_MARKED_READ);
        assert_eq!(first.contact_id, 4);
    }

    #[tokio::test]
    async fn mark_read_missing_message_is_not_found() {
        let mut repository = MockContactMessageRepository::new();
        repository
            .expect_mark_read()
            .returning(|_| Box::pin(async { Ok(None) }));

        let usecase = ContactMessageUseCase::new(Arc::new(repository));
        let err = usecase.mark_read(99).await.unwrap_err();

        assert!(matches!(err, UseCaseError::NotFound("contact message")));
    }

    #[tokio::test]
    async fn bulk_mark_read_reports_rows_touched() {
        let mut repository = MockContactMessageRepository::new();
        repository
            .expect_mark_read_many()
            .with(eq(vec![1, 2, 999]))
            .times(1)
            .returning(|_| Box::pin(async { Ok(2) }));

        let usecase = ContactMessageUseCase::new(Arc::new(repository));
        let result = usecase.bulk_mark_read(vec![1, 2, 999]).await.unwrap();

        assert_eq!(result.updated, 2);
        assert_eq!(result.message, "2 messages marked as read");
    }

    #[tokio::test]
    async fn bulk_mark_read_with_no_ids_skips_the_store() {
        let mut repository = MockContactMessageRepository::new();
        repository.expect_mark_read_many().never();

        let usecase = ContactMessageUseCase::new(Arc::new(repository));
        let result = usecase.bulk_mark_read(Vec::new()).await.unwrap();

        assert_eq!(result.updated, 0);
        assert_eq!(result.message, "0 messages marked as read");
    }

    #[tokio::test]
    async fn bulk_mark_read_of_one_message_is_singular() {
        let mut repository = MockContactMessageRepository::new();
        repository
            .expect_mark_read_many()
            .with(eq(vec![4]))
            .times(1)
            .returning(|_| Box::pin(async { Ok(1) }));

        let usecase = ContactMessageUseCase::new(Arc::new(repository));
        let result = usecase.bulk_mark_read(vec![4]).await.unwrap();

        assert_eq!(result.updated, 1);
        assert_eq!(result.message, "1 message marked as read");
    }

    #[tokio::test]
    async fn partial_update_validates_only_supplied_fields() {
        let mut repository = MockContactMessageRepository::new();
        repository.expect_find_by_id().returning(|id| {
            let contact = sample_contact(id, false);
            Box::pin(async move { Ok(Some(contact)) })
        });
        repository
            .expect_update()
            .withf(|id, entity| {
                *id == 8 && entity.message.as_deref() == Some("Updated") && entity.name.is_none()
            })
            .returning(|id, entity| {
                let mut contact = sample_contact(id, false);
                contact.message = entity.message.unwrap_or_default();
                Box::pin(async move { Ok(Some(contact)) })
            });

        let usecase = ContactMessageUseCase::new(Arc::new(repository));
        let payload = ContactMessagePayload {
            message: Some(json!("Updated")),
            ..ContactMessagePayload::default()
        };

        let contact = usecase.update(8, payload, true).await.unwrap();
        assert_eq!(contact.message, "Updated");
    }

    #[tokio::test]
    async fn retrieve_missing_message_is_not_found() {
        let mut repository = MockContactMessageRepository::new();
        repository
            .expect_find_by_id()
            .returning(|_| Box::pin(async { Ok(None) }));

        let usecase = ContactMessageUseCase::new(Arc::new(repository));
        let err = usecase.retrieve(5).await.unwrap_err();

        assert_eq!(err.status_code(), axum::http::StatusCode::NOT_FOUND);
    }
}
