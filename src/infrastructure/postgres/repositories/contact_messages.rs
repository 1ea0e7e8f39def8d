use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, delete, insert_into, prelude::*, update};
use std::sync::Arc;

use crate::{
    domain::{
        entities::contact_messages::{
            ContactMessageEntity, InsertContactMessageEntity, UpdateContactMessageEntity,
        },
        repositories::contact_messages::ContactMessageRepository,
        value_objects::contact_messages::{ContactOrderingField, ListContactMessagesFilter},
    },
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::contact_messages},
};

pub struct ContactMessagePostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl ContactMessagePostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl ContactMessageRepository for ContactMessagePostgres {
    async fn create(
        &self,
        insert_contact_message_entity: InsertContactMessageEntity,
    ) -> Result<ContactMessageEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(contact_messages::table)
            .values(&insert_contact_message_entity)
            .returning(ContactMessageEntity::as_returning())
            .get_result::<ContactMessageEntity>(&mut conn)?;

        Ok(result)
    }

    async fn list(&self, filter: ListContactMessagesFilter) -> Result<Vec<ContactMessageEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;
        let mut query = contact_messages::table
            .select(ContactMessageEntity::as_select())
            .into_boxed();

        if filter.ordering.is_empty() {
            query = query.order(contact_messages::sent_at.desc());
        }

        for term in &filter.ordering {
            query = match (term.field, term.is_descending()) {
                (ContactOrderingField::SentAt, false) => {
                    query.then_order_by(contact_messages::sent_at.asc())
                }
                (ContactOrderingField::SentAt, true) => {
                    query.then_order_by(contact_messages::sent_at.desc())
                }
                (ContactOrderingField::IsRead, false) => {
                    query.then_order_by(contact_messages::is_read.asc())
                }
                (ContactOrderingField::IsRead, true) => {
                    query.then_order_by(contact_messages::is_read.desc())
                }
            };
        }

        if let Some(limit) = filter.pagination.limit {
            query = query.limit(limit);
        }

        if let Some(offset) = filter.pagination.offset {
            query = query.offset(offset);
        }

        let results = query.load::<ContactMessageEntity>(&mut conn)?;

        Ok(results)
    }

    async fn find_by_id(&self, contact_id: i64) -> Result<Option<ContactMessageEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = contact_messages::table
            .find(contact_id)
            .select(ContactMessageEntity::as_select())
            .first::<ContactMessageEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn update(
        &self,
        contact_id: i64,
        update_contact_message_entity: UpdateContactMessageEntity,
    ) -> Result<Option<ContactMessageEntity>> {
        // diesel refuses an UPDATE with no columns.
        if update_contact_message_entity.is_empty() {
            return self.find_by_id(contact_id).await;
        }

        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = update(contact_messages::table.find(contact_id))
            .set(&update_contact_message_entity)
            .returning(ContactMessageEntity::as_returning())
            .get_result::<ContactMessageEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn delete(&self, contact_id: i64) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let deleted = delete(contact_messages::table.find(contact_id)).execute(&mut conn)?;

        Ok(deleted > 0)
    }

    async fn mark_read(&self, contact_id: i64) -> Result<Option<ContactMessageEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = update(contact_messages::table.find(contact_id))
            .set(contact_messages::is_read.eq(true))
            .returning(ContactMessageEntity::as_returning())
            .get_result::<ContactMessageEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn mark_read_many(&self, contact_ids: Vec<i64>) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let updated = update(contact_messages::table)
            .filter(contact_messages::id.eq_any(contact_ids))
            .set(contact_messages::is_read.eq(true))
            .execute(&mut conn)?;

        Ok(updated)
    }
}
