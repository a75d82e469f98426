use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, insert_into, pg::Pg, prelude::*};
use std::sync::Arc;

use crate::{
    domain::{
        entities::ai_analyses::{AiAnalysisEntity, InsertAiAnalysisEntity},
        repositories::ai_analyses::AiAnalysisRepository,
    },
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::ai_analyses},
};

pub struct AiAnalysisPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl AiAnalysisPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

fn owned_by(user_id: &str) -> ai_analyses::BoxedQuery<'_, Pg> {
    ai_analyses::table
        .filter(ai_analyses::user_id.eq(user_id))
        .order(ai_analyses::created_at.desc())
        .into_boxed()
}

#[async_trait]
impl AiAnalysisRepository for AiAnalysisPostgres {
    async fn create(
        &self,
        insert_analysis_entity: InsertAiAnalysisEntity,
    ) -> Result<AiAnalysisEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(ai_analyses::table)
            .values(&insert_analysis_entity)
            .returning(AiAnalysisEntity::as_returning())
            .get_result::<AiAnalysisEntity>(&mut conn)?;

        Ok(result)
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<AiAnalysisEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = owned_by(user_id)
            .select(AiAnalysisEntity::as_select())
            .load::<AiAnalysisEntity>(&mut conn)?;

        Ok(results)
    }
}
