use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::users::{
    EditUserBillingEntity, InsertUserEntity, MergeUserProfileEntity, UserEntity,
};

#[automock]
#[async_trait]
pub trait UserRepository {
    async fn find_by_id(&self, user_id: &str) -> Result<Option<UserEntity>>;
    /// Inserts the user, or merges the profile into the existing row.
    async fn upsert(
        &self,
        insert_user_entity: InsertUserEntity,
        merge_profile_entity: MergeUserProfileEntity,
    ) -> Result<UserEntity>;
    async fn update_billing(
        &self,
        user_id: &str,
        edit_billing_entity: EditUserBillingEntity,
    ) -> Result<UserEntity>;
    async fn update_status_by_subscription_id(
        &self,
        subscription_id: &str,
        status: &str,
    ) -> Result<usize>;
}
