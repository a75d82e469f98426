use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::error_responses::AppError;
use crate::{
    application::{errors::UseCaseError, usecases::sessions::SessionUseCase},
    config::config_model::DotEnvyConfig,
    domain::{
        repositories::{sessions::SessionRepository, users::UserRepository},
        value_objects::iam::{AuthUser, IdentityProfile},
    },
};

/// Claims carried by the identity provider's HS256 token.
#[derive(Debug, Serialize, Deserialize)]
pub struct IdentityClaims {
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub profile_image_url: Option<String>,
    pub exp: usize,
}

impl IdentityClaims {
    pub fn into_profile(self) -> IdentityProfile {
        IdentityProfile {
            subject: self.sub,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            profile_image_url: self.profile_image_url,
        }
    }
}

pub fn validate_identity_token(token: &str, secret: &str) -> anyhow::Result<IdentityClaims> {
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_aud = false;

    let token_data = decode::<IdentityClaims>(token, &decoding_key, &validation)
        .map_err(|e| anyhow::anyhow!("JWT validation failed: {}", e))?;

    Ok(token_data.claims)
}

/// Attributes of the session cookie handed out at sign-in.
#[derive(Debug, Clone)]
pub struct SessionCookie {
    pub name: String,
    pub secure: bool,
    pub ttl: chrono::Duration,
}

impl SessionCookie {
    pub fn from_config(config: &DotEnvyConfig) -> Self {
        Self {
            name: config.auth.cookie_name.clone(),
            secure: config.stage.is_production(),
            ttl: chrono::Duration::hours(config.auth.session_ttl_hours),
        }
    }

    pub fn issue(&self, sid: String) -> Cookie<'static> {
        Cookie::build((self.name.clone(), sid))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .max_age(cookie::time::Duration::seconds(self.ttl.num_seconds()))
            .build()
    }

    pub fn clear(&self) -> Cookie<'static> {
        Cookie::build((self.name.clone(), "")).path("/").build()
    }
}

/// Shared by the sign-in routes and the middleware guarding everything else.
pub struct SessionGate<S, U>
where
    S: SessionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    pub sessions: Arc<SessionUseCase<S, U>>,
    pub cookie: SessionCookie,
    jwt_secret: Arc<str>,
}

impl<S, U> Clone for SessionGate<S, U>
where
    S: SessionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            sessions: Arc::clone(&self.sessions),
            cookie: self.cookie.clone(),
            jwt_secret: Arc::clone(&self.jwt_secret),
        }
    }
}

impl<S, U> SessionGate<S, U>
where
    S: SessionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    pub fn new(sessions: Arc<SessionUseCase<S, U>>, cookie: SessionCookie, jwt_secret: &str) -> Self {
        Self {
            sessions,
            cookie,
            jwt_secret: Arc::from(jwt_secret),
        }
    }

    pub fn identity_from_token(&self, token: &str) -> Result<IdentityProfile, AppError> {
        let claims = validate_identity_token(token, &self.jwt_secret).map_err(|err| {
            warn!(error = %err, "auth: identity token rejected");
            AppError::UseCase(UseCaseError::Unauthenticated)
        })?;
        Ok(claims.into_profile())
    }

    pub fn session_id<'a>(&self, jar: &'a CookieJar) -> Option<&'a str> {
        jar.get(&self.cookie.name).map(|cookie| cookie.value())
    }
}

/// Resolves the session cookie and attaches the caller as an [`AuthUser`] extension.
pub async fn require_session<S, U>(
    State(gate): State<SessionGate<S, U>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError>
where
    S: SessionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    let Some(sid) = gate.session_id(&jar) else {
        debug!(path = %request.uri().path(), "auth: request without session cookie");
        return Err(AppError::UseCase(UseCaseError::Unauthenticated));
    };

    let auth_user = gate.sessions.resolve(sid).await?;
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(AppError::UseCase(UseCaseError::Unauthenticated))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::{
        entities::sessions::SessionEntity,
        repositories::{sessions::MockSessionRepository, users::MockUserRepository},
    };
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode, header::COOKIE},
        middleware,
        routing::get,
    };
    use chrono::Utc;
    use http_body_util::BodyExt;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    pub(crate) const TEST_SECRET: &str = "supersecretjwtsecretforunittesting123";

    pub(crate) fn test_gate(
        session_repo: MockSessionRepository,
        user_repo: MockUserRepository,
    ) -> SessionGate<MockSessionRepository, MockUserRepository> {
        let sessions = SessionUseCase::new(
            Arc::new(session_repo),
            Arc::new(user_repo),
            chrono::Duration::hours(1),
        );
        SessionGate::new(
            Arc::new(sessions),
            SessionCookie {
                name: "sid".to_string(),
                secure: false,
                ttl: chrono::Duration::hours(1),
            },
            TEST_SECRET,
        )
    }

    pub(crate) fn sign_token(claims: &IdentityClaims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn claims(exp: usize) -> IdentityClaims {
        IdentityClaims {
            sub: "user-1".to_string(),
            email: Some("test@example.com".to_string()),
            first_name: Some("Jane".to_string()),
            last_name: None,
            profile_image_url: None,
            exp,
        }
    }

    async fn whoami(auth: AuthUser) -> String {
        auth.user_id
    }

    fn guarded(gate: SessionGate<MockSessionRepository, MockUserRepository>) -> Router {
        Router::new().route("/whoami", get(whoami)).route_layer(
            middleware::from_fn_with_state(
                gate,
                require_session::<MockSessionRepository, MockUserRepository>,
            ),
        )
    }

    #[test]
    fn test_validate_identity_token_success() {
        let token = sign_token(&claims(9999999999), TEST_SECRET);

        let validated = validate_identity_token(&token, TEST_SECRET).expect("Valid token should pass");
        assert_eq!(validated.sub, "user-1");
        assert_eq!(validated.email.as_deref(), Some("test@example.com"));
    }

    #[test]
    fn test_validate_identity_token_expired() {
        let token = sign_token(&claims(1), TEST_SECRET);

        assert!(validate_identity_token(&token, TEST_SECRET).is_err());
    }

    #[test]
    fn test_validate_identity_token_invalid_signature() {
        let token = sign_token(&claims(9999999999), "wrongsecret");

        assert!(validate_identity_token(&token, TEST_SECRET).is_err());
    }

    #[test]
    fn issued_cookie_is_http_only_and_lax() {
        let issued = SessionCookie {
            name: "sid".to_string(),
            secure: true,
            ttl: chrono::Duration::hours(2),
        }
        .issue("abc".to_string());

        assert_eq!(issued.http_only(), Some(true));
        assert_eq!(issued.same_site(), Some(SameSite::Lax));
        assert_eq!(issued.secure(), Some(true));
        assert_eq!(issued.max_age(), Some(cookie::time::Duration::hours(2)));
    }

    #[tokio::test]
    async fn missing_cookie_is_rejected_with_json_401() {
        let mut session_repo = MockSessionRepository::new();
        session_repo.expect_find_active().never();

        let response = guarded(test_gate(session_repo, MockUserRepository::new()))
            .oneshot(Request::builder().uri("/whoami").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["reason"], "unauthenticated");
    }

    #[tokio::test]
    async fn expired_session_is_rejected() {
        let mut session_repo = MockSessionRepository::new();
        session_repo
            .expect_find_active()
            .returning(|_, _| Ok(None));

        let response = guarded(test_gate(session_repo, MockUserRepository::new()))
            .oneshot(
                Request::builder()
                    .uri("/whoami")
                    .header(COOKIE, "sid=stale")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn active_session_reaches_the_handler() {
        let mut session_repo = MockSessionRepository::new();
        session_repo
            .expect_find_active()
            .withf(|sid, _| sid == "live")
            .returning(|sid, _| {
                Ok(Some(SessionEntity {
                    sid: sid.to_string(),
                    sess: json!({ "sub": "user-1", "email": "a@b.co" }),
                    expire: Utc::now() + chrono::Duration::hours(1),
                }))
            });

        let response = guarded(test_gate(session_repo, MockUserRepository::new()))
            .oneshot(
                Request::builder()
                    .uri("/whoami")
                    .header(COOKIE, "theme=dark; sid=live")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"user-1");
    }
}
