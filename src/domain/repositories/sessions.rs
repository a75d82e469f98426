use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;

use crate::domain::entities::sessions::{InsertSessionEntity, SessionEntity};

#[automock]
#[async_trait]
pub trait SessionRepository {
    async fn create(&self, insert_session_entity: InsertSessionEntity) -> Result<SessionEntity>;
    /// Returns the session only while `expire` is later than `now`.
    async fn find_active(&self, sid: &str, now: DateTime<Utc>) -> Result<Option<SessionEntity>>;
    async fn delete(&self, sid: &str) -> Result<()>;
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<usize>;
}
