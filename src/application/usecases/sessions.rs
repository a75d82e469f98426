use std::sync::Arc;

use anyhow::Context;
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Duration, Utc};
use rand::{RngCore, rngs::OsRng};
use tracing::{debug, error, info, warn};

use crate::{
    application::errors::{UseCaseError, UseCaseResult},
    domain::{
        entities::sessions::InsertSessionEntity,
        repositories::{sessions::SessionRepository, users::UserRepository},
        value_objects::{
            iam::{AuthUser, IdentityProfile, SessionClaims},
            users::UserModel,
        },
    },
};

const SESSION_ID_BYTES: usize = 32;

#[derive(Debug, Clone, PartialEq)]
pub struct SignedInSession {
    pub sid: String,
    pub expire: DateTime<Utc>,
    pub user: UserModel,
}

pub struct SessionUseCase<S, U>
where
    S: SessionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    session_repo: Arc<S>,
    user_repo: Arc<U>,
    session_ttl: Duration,
}

impl<S, U> SessionUseCase<S, U>
where
    S: SessionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    pub fn new(session_repo: Arc<S>, user_repo: Arc<U>, session_ttl: Duration) -> Self {
        Self {
            session_repo,
            user_repo,
            session_ttl,
        }
    }

    /// Upserts the user behind a verified identity and opens a session for it.
    pub async fn sign_in(&self, profile: IdentityProfile) -> UseCaseResult<SignedInSession> {
        if profile.subject.trim().is_empty() {
            warn!("sessions: identity without subject rejected");
            return Err(UseCaseError::Unauthenticated);
        }

        let now = Utc::now();
        let user_id = profile.subject.clone();

        let user = self
            .user_repo
            .upsert(profile.to_insert_entity(now), profile.to_merge_entity(now))
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "sessions: failed to upsert user");
                UseCaseError::Internal(err)
            })?;

        let sess = serde_json::to_value(profile.to_session_claims())
            .context("failed to serialize session claims")?;
        let expire = now + self.session_ttl;

        let session = self
            .session_repo
            .create(InsertSessionEntity {
                sid: generate_session_id(),
                sess,
                expire,
            })
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "sessions: failed to create session");
                UseCaseError::Internal(err)
            })?;

        info!(%user_id, expire = %session.expire, "sessions: signed in");

        Ok(SignedInSession {
            sid: session.sid,
            expire: session.expire,
            user: UserModel::from(user),
        })
    }

    pub async fn resolve(&self, sid: &str) -> UseCaseResult<AuthUser> {
        if sid.is_empty() {
            return Err(UseCaseError::Unauthenticated);
        }

        let session = self
            .session_repo
            .find_active(sid, Utc::now())
            .await
            .map_err(|err| {
                error!(db_error = ?err, "sessions: failed to load session");
                UseCaseError::Internal(err)
            })?
            .ok_or_else(|| {
                debug!("sessions: unknown or expired session");
                UseCaseError::Unauthenticated
            })?;

        let claims = serde_json::from_value::<SessionClaims>(session.sess).map_err(|err| {
            warn!(error = %err, "sessions: unreadable session claims");
            UseCaseError::Unauthenticated
        })?;

        Ok(claims.into_auth_user())
    }

    pub async fn sign_out(&self, sid: &str) -> UseCaseResult<()> {
        self.session_repo.delete(sid).await.map_err(|err| {
            error!(db_error = ?err, "sessions: failed to delete session");
            UseCaseError::Internal(err)
        })?;
        info!("sessions: signed out");
        Ok(())
    }

    pub async fn purge_expired(&self) -> UseCaseResult<usize> {
        let removed = self
            .session_repo
            .delete_expired(Utc::now())
            .await
            .map_err(UseCaseError::Internal)?;
        if removed > 0 {
            info!(removed, "sessions: expired sessions purged");
        }
        Ok(removed)
    }
}

fn generate_session_id() -> String {
    let mut bytes = [0u8; SESSION_ID_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
