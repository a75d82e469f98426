use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, insert_into, pg::Pg, prelude::*};
use std::sync::Arc;

use crate::{
    domain::{
        entities::rtlo_questions::{InsertRtloQuestionEntity, RtloQuestionEntity},
        repositories::rtlo_questions::RtloQuestionRepository,
    },
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::rtlo_questions},
};

pub struct RtloQuestionPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl RtloQuestionPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

fn owned_by(user_id: &str) -> rtlo_questions::BoxedQuery<'_, Pg> {
    rtlo_questions::table
        .filter(rtlo_questions::user_id.eq(user_id))
        .order(rtlo_questions::created_at.desc())
        .into_boxed()
}

#[async_trait]
impl RtloQuestionRepository for RtloQuestionPostgres {
    async fn create(
        &self,
        insert_question_entity: InsertRtloQuestionEntity,
    ) -> Result<RtloQuestionEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(rtlo_questions::table)
            .values(&insert_question_entity)
            .returning(RtloQuestionEntity::as_returning())
            .get_result::<RtloQuestionEntity>(&mut conn)?;

        Ok(result)
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<RtloQuestionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = owned_by(user_id)
            .select(RtloQuestionEntity::as_select())
            .load::<RtloQuestionEntity>(&mut conn)?;

        Ok(results)
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
        assert!(sql.contains(r#""rtlo_questions"."user_id" = $1"#), "{sql}");
        assert!(sql.contains(r#"ORDER BY "rtlo_questions"."created_at" DESC"#), "{sql}");
        assert!(sql.contains(r#"-- binds: ["user-b"]"#), "{sql}");
    }
}
