use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::documents::{DocumentEntity, InsertDocumentEntity};

#[automock]
#[async_trait]
pub trait DocumentRepository {
    async fn create(&self, insert_document_entity: InsertDocumentEntity) -> Result<DocumentEntity>;
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<DocumentEntity>>;
    async fn find_by_id_for_user(
        &self,
        document_id: Uuid,
        user_id: &str,
    ) -> Result<Option<DocumentEntity>>;
}
