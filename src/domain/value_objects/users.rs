use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::users::UserEntity;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserModel {
    pub id: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_image_url: Option<String>,
    pub stripe_customer_id: Option<String>,
    pub stripe_subscription_id: Option<String>,
    pub subscription_status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserEntity> for UserModel {
    fn from(entity: UserEntity) -> Self {
        Self {
            id: entity.id,
            email: entity.email,
            first_name: entity.first_name,
            last_name: entity.last_name,
            profile_image_url: entity.profile_image_url,
            stripe_customer_id: entity.stripe_customer_id,
            stripe_subscription_id: entity.stripe_subscription_id,
            subscription_status: entity.subscription_status,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

impl UserModel {
    pub fn display_name(&self) -> Option<String> {
        let full_name = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        let full_name = full_name.trim();
        (!full_name.is_empty()).then(|| full_name.to_string())
    }
}
