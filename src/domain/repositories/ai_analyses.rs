use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::ai_analyses::{AiAnalysisEntity, InsertAiAnalysisEntity};

#[automock]
#[async_trait]
pub trait AiAnalysisRepository {
    async fn create(
        &self,
        insert_analysis_entity: InsertAiAnalysisEntity,
    ) -> Result<AiAnalysisEntity>;
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<AiAnalysisEntity>>;
}
