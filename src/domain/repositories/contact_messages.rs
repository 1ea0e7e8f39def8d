use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::{
    entities::contact_messages::{
        ContactMessageEntity, InsertContactMessageEntity, UpdateContactMessageEntity,
    },
    value_objects::contact_messages::ListContactMessagesFilter,
};

#[async_trait]
#[automock]
pub trait ContactMessageRepository {
    async fn create(
        &self,
        insert_contact_message_entity: InsertContactMessageEntity,
    ) -> Result<ContactMessageEntity>;
    async fn list(&self, filter: ListContactMessagesFilter) -> Result<Vec<ContactMessageEntity>>;
    async fn find_by_id(&self, contact_id: i64) -> Result<Option<ContactMessageEntity>>;
    async fn update(
        &self,
        contact_id: i64,
        update_contact_message_entity: UpdateContactMessageEntity,
    ) -> Result<Option<ContactMessageEntity>>;
    async fn delete(&self, contact_id: i64) -> Result<bool>;
    async fn mark_read(&self, contact_id: i64) -> Result<Option<ContactMessageEntity>>;
    /// Marks every listed message read and returns how many rows were touched.
    async fn mark_read_many(&self, contact_ids: Vec<i64>) -> Result<usize>;
}
