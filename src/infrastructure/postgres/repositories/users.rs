use anyhow::{Context, Result};
use async_trait::async_trait;
use diesel::{OptionalExtension, RunQueryDsl, insert_into, prelude::*, update};
use std::sync::Arc;

use crate::{
    domain::{
        entities::users::{
            EditUserBillingEntity, InsertUserEntity, MergeUserProfileEntity, UserEntity,
        },
        repositories::users::UserRepository,
    },
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::users},
};

pub struct UserPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl UserPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl UserRepository for UserPostgres {
    async fn find_by_id(&self, user_id: &str) -> Result<Option<UserEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = users::table
            .find(user_id)
            .select(UserEntity::as_select())
            .first::<UserEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn upsert(
        &self,
        insert_user_entity: InsertUserEntity,
        merge_profile_entity: MergeUserProfileEntity,
    ) -> Result<UserEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        // `None` fields in the changeset are skipped, so absent provider
        // values keep whatever is stored.
        let result = insert_into(users::table)
            .values(&insert_user_entity)
            .on_conflict(users::id)
            .do_update()
            .set(&merge_profile_entity)
            .returning(UserEntity::as_returning())
            .get_result::<UserEntity>(&mut conn)
            .context("failed to upsert user")?;

        Ok(result)
    }

    async fn update_billing(
        &self,
        user_id: &str,
        edit_billing_entity: EditUserBillingEntity,
    ) -> Result<UserEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = update(users::table.filter(users::id.eq(user_id)))
            .set(&edit_billing_entity)
            .returning(UserEntity::as_returning())
            .get_result::<UserEntity>(&mut conn)
            .context("failed to update user billing")?;

        Ok(result)
    }

    async fn update_status_by_subscription_id(
        &self,
        subscription_id: &str,
        status: &str,
    ) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let updated = update(users::table.filter(users::stripe_subscription_id.eq(subscription_id)))
            .set((
                users::subscription_status.eq(status),
                users::updated_at.eq(chrono::Utc::now()),
            ))
            .execute(&mut conn)?;

        Ok(updated)
    }
}
