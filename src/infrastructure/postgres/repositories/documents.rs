use anyhow::Result;
use async_trait::async_trait;
use diesel::{OptionalExtension, RunQueryDsl, insert_into, pg::Pg, prelude::*};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::documents::{DocumentEntity, InsertDocumentEntity},
        repositories::documents::DocumentRepository,
    },
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::documents},
};

pub struct DocumentPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl DocumentPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

fn owned_by(user_id: &str) -> documents::BoxedQuery<'_, Pg> {
    documents::table
        .filter(documents::user_id.eq(user_id))
        .order(documents::created_at.desc())
        .into_boxed()
}

#[async_trait]
impl DocumentRepository for DocumentPostgres {
    async fn create(&self, insert_document_entity: InsertDocumentEntity) -> Result<DocumentEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(documents::table)
            .values(&insert_document_entity)
            .returning(DocumentEntity::as_returning())
            .get_result::<DocumentEntity>(&mut conn)?;

        Ok(result)
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<DocumentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = owned_by(user_id)
            .select(DocumentEntity::as_select())
            .load::<DocumentEntity>(&mut conn)?;

        Ok(results)
    }

    async fn find_by_id_for_user(
        &self,
        document_id: Uuid,
        user_id: &str,
    ) -> Result<Option<DocumentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = documents::table
            .filter(documents::id.eq(document_id))
            .filter(documents::user_id.eq(user_id))
            .select(DocumentEntity::as_select())
            .first::<DocumentEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::debug_query;

    #[test]
    fn listing_is_scoped_to_the_owner() {
        let sql = debug_query::<Pg, _>(&owned_by("user-b")).to_string();

        assert!(sql.contains("WHERE"), "{sql}");
        assert!(sql.contains(r#""documents"."user_id" = $1"#), "{sql}");
        assert!(sql.contains(r#"ORDER BY "documents"."created_at" DESC"#), "{sql}");
        assert!(sql.contains(r#"-- binds: ["user-b"]"#), "{sql}");
    }
}
