use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::{OptionalExtension, RunQueryDsl, delete, insert_into, prelude::*};
use std::sync::Arc;

use crate::{
    domain::{
        entities::sessions::{InsertSessionEntity, SessionEntity},
        repositories::sessions::SessionRepository,
    },
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::sessions},
};

pub struct SessionPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl SessionPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl SessionRepository for SessionPostgres {
    async fn create(&self, insert_session_entity: InsertSessionEntity) -> Result<SessionEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(sessions::table)
            .values(&insert_session_entity)
            .returning(SessionEntity::as_returning())
            .get_result::<SessionEntity>(&mut conn)?;

        Ok(result)
    }

    async fn find_active(&self, sid: &str, now: DateTime<Utc>) -> Result<Option<SessionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = sessions::table
            .filter(sessions::sid.eq(sid))
            .filter(sessions::expire.gt(now))
            .select(SessionEntity::as_select())
            .first::<SessionEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn delete(&self, sid: &str) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        delete(sessions::table.filter(sessions::sid.eq(sid))).execute(&mut conn)?;

        Ok(())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let removed = delete(sessions::table.filter(sessions::expire.le(now))).execute(&mut conn)?;

        Ok(removed)
    }
}
