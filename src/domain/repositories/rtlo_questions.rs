use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::rtlo_questions::{InsertRtloQuestionEntity, RtloQuestionEntity};

#[automock]
#[async_trait]
pub trait RtloQuestionRepository {
    async fn create(
        &self,
        insert_question_entity: InsertRtloQuestionEntity,
    ) -> Result<RtloQuestionEntity>;
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<RtloQuestionEntity>>;
}
