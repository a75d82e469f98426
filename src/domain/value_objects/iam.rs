use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    entities::users::{InsertUserEntity, MergeUserProfileEntity},
    value_objects::enums::subscription_statuses::SubscriptionStatus,
};

/// Caller identity attached to a request once the session gate lets it through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: String,
    pub email: Option<String>,
}

/// What the identity provider vouches for when a user signs in.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IdentityProfile {
    pub subject: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_image_url: Option<String>,
}

impl IdentityProfile {
    pub fn to_insert_entity(&self, now: DateTime<Utc>) -> InsertUserEntity {
        InsertUserEntity {
            id: self.subject.clone(),
            email: non_blank(&self.email),
            first_name: non_blank(&self.first_name),
            last_name: non_blank(&self.last_name),
            profile_image_url: non_blank(&self.profile_image_url),
            subscription_status: SubscriptionStatus::Free.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Provider-supplied nulls (and blanks) never erase a stored value.
    pub fn to_merge_entity(&self, now: DateTime<Utc>) -> MergeUserProfileEntity {
        MergeUserProfileEntity {
            email: non_blank(&self.email),
            first_name: non_blank(&self.first_name),
            last_name: non_blank(&self.last_name),
            profile_image_url: non_blank(&self.profile_image_url),
            updated_at: now,
        }
    }

    pub fn to_session_claims(&self) -> SessionClaims {
        SessionClaims {
            sub: self.subject.clone(),
            email: non_blank(&self.email),
        }
    }
}

/// Request body for `POST /auth/session`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SignInModel {
    pub id_token: Option<String>,
}

impl SignInModel {
    pub fn validate(self) -> Result<String, String> {
        self.id_token
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
            .ok_or_else(|| "idToken is required".to_string())
    }
}

/// Serialized into `sessions.sess`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl SessionClaims {
    pub fn into_auth_user(self) -> AuthUser {
        AuthUser {
            user_id: self.sub,
            email: self.email,
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_entity_treats_missing_and_blank_fields_as_no_change() {
        let profile = IdentityProfile {
            subject: "user-1".to_string(),
            email: Some("  ".to_string()),
            first_name: Some("Ada".to_string()),
            last_name: None,
            profile_image_url: None,
        };

        let merge = profile.to_merge_entity(Utc::now());

        assert_eq!(merge.email, None);
        assert_eq!(merge.first_name.as_deref(), Some("Ada"));
        assert_eq!(merge.last_name, None);
    }

    #[test]
    fn new_users_start_on_the_free_status() {
        let profile = IdentityProfile {
            subject: "user-1".to_string(),
            ..Default::default()
        };

        let insert = profile.to_insert_entity(Utc::now());

        assert_eq!(insert.id, "user-1");
        assert_eq!(insert.subscription_status, "free");
    }
}
