use std::sync::Arc;

use tracing::{error, info, warn};

use crate::{
    application::errors::{UseCaseError, UseCaseResult},
    domain::{repositories::users::UserRepository, value_objects::users::UserModel},
};

pub struct UserUseCase<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    user_repo: Arc<U>,
}

impl<U> UserUseCase<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn get_current_user(&self, user_id: &str) -> UseCaseResult<UserModel> {
        let user = self.user_repo.find_by_id(user_id).await.map_err(|err| {
            error!(%user_id, db_error = ?err, "users: failed to load user");
            UseCaseError::Internal(err)
        })?;

        match user {
            Some(user) => {
                info!(%user_id, "users: current user loaded");
                Ok(UserModel::from(user))
            }
            None => {
                warn!(%user_id, "users: session refers to a missing user row");
                Err(UseCaseError::NotFound("User"))
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::{entities::users::UserEntity, repositories::users::MockUserRepository};
    use chrono::Utc;

    pub(crate) fn sample_user(user_id: &str, subscription_status: &str) -> UserEntity {
        let now = Utc::now();
        UserEntity {
            id: user_id.to_string(),
            email: Some(format!("{user_id}@example.com")),
            first_name: Some("Jane".to_string()),
            last_name: Some("Landlord".to_string()),
            profile_image_url: None,
            stripe_customer_id: None,
            stripe_subscription_id: None,
            subscription_status: subscription_status.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn returns_the_callers_record() {
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find_by_id()
            .withf(|user_id| user_id.to_string() == "user-1")
            .returning(|_| Ok(Some(sample_user("user-1", "free"))));

        let usecase = UserUseCase::new(Arc::new(user_repo));
        let user = usecase.get_current_user("user-1").await.unwrap();

        assert_eq!(user.id, "user-1");
        assert_eq!(user.subscription_status, "free");
    }

    #[tokio::test]
    async fn missing_row_is_not_found() {
        let mut user_repo = MockUserRepository::new();
        user_repo.expect_find_by_id().returning(|_| Ok(None));

        let usecase = UserUseCase::new(Arc::new(user_repo));
        let result = usecase.get_current_user("ghost").await;

        assert!(matches!(result, Err(UseCaseError::NotFound("User"))));
    }
}
