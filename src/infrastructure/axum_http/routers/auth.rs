use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    routing::post,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{info, warn};

use crate::{
    domain::{
        repositories::{sessions::SessionRepository, users::UserRepository},
        value_objects::{iam::SignInModel, users::UserModel},
    },
    infrastructure::axum_http::{auth::SessionGate, error_responses::AppError},
};

pub fn routes<S, U>(gate: SessionGate<S, U>) -> Router
where
    S: SessionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/auth/session", post(sign_in))
        .route("/auth/logout", post(sign_out))
        .with_state(gate)
}

pub async fn sign_in<S, U>(
    State(gate): State<SessionGate<S, U>>,
    jar: CookieJar,
    payload: Result<Json<SignInModel>, JsonRejection>,
) -> Result<(CookieJar, Json<UserModel>), AppError>
where
    S: SessionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    let Json(sign_in_model) = payload?;
    let token = sign_in_model.validate().map_err(AppError::BadRequest)?;

    let profile = gate.identity_from_token(&token)?;
    let signed_in = gate.sessions.sign_in(profile).await?;

    info!(user_id = %signed_in.user.id, "auth: session cookie issued");
    let jar = jar.add(gate.cookie.issue(signed_in.sid));

    Ok((jar, Json(signed_in.user)))
}

/// Always succeeds; a failed delete is only logged since the cookie is cleared anyway.
pub async fn sign_out<S, U>(
    State(gate): State<SessionGate<S, U>>,
    jar: CookieJar,
) -> (CookieJar, StatusCode)
where
    S: SessionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    if let Some(sid) = gate.session_id(&jar).map(str::to_string) {
        if let Err(err) = gate.sessions.sign_out(&sid).await {
            warn!(error = %err, "auth: failed to delete session on logout");
        }
    }

    (jar.remove(gate.cookie.clear()), StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        application::usecases::users::tests::sample_user,
        domain::{
            entities::sessions::SessionEntity,
            repositories::{sessions::MockSessionRepository, users::MockUserRepository},
        },
        infrastructure::axum_http::{
            auth::{
                IdentityClaims,
                tests::{TEST_SECRET, sign_token, test_gate},
            },
            routers::tests::{body_json, post_json},
        },
    };
    use axum::{
        body::Body,
        http::{
            Request,
            header::{COOKIE, SET_COOKIE},
        },
    };
    use serde_json::json;
    use tower::ServiceExt;

    fn identity_token(secret: &str) -> String {
        sign_token(
            &IdentityClaims {
                sub: "user-1".to_string(),
                email: Some("user-1@example.com".to_string()),
                first_name: Some("Jane".to_string()),
                last_name: Some("Landlord".to_string()),
                profile_image_url: None,
                exp: 9999999999,
            },
            secret,
        )
    }

    #[tokio::test]
    async fn sign_in_sets_session_cookie_and_returns_user() {
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_upsert()
            .times(1)
            .returning(|insert, _| Ok(sample_user(&insert.id, "free")));

        let mut session_repo = MockSessionRepository::new();
        session_repo.expect_create().times(1).returning(|session| {
            Ok(SessionEntity {
                sid: session.sid,
                sess: session.sess,
                expire: session.expire,
            })
        });

        let response = routes(test_gate(session_repo, user_repo))
            .oneshot(post_json(
                "/auth/session",
                json!({ "idToken": identity_token(TEST_SECRET) }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let set_cookie = response
            .headers()
            .get(SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(set_cookie.starts_with("sid="));
        assert!(set_cookie.contains("HttpOnly"));
        assert!(set_cookie.contains("SameSite=Lax"));

        let body = body_json(response).await;
        assert_eq!(body["id"], "user-1");
        assert_eq!(body["subscriptionStatus"], "free");
    }

    #[tokio::test]
    async fn badly_signed_token_is_unauthenticated() {
        let mut user_repo = MockUserRepository::new();
        user_repo.expect_upsert().never();

        let response = routes(test_gate(MockSessionRepository::new(), user_repo))
            .oneshot(post_json(
                "/auth/session",
                json!({ "idToken": identity_token("not-the-secret") }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn missing_token_is_a_bad_request() {
        let response = routes(test_gate(
            MockSessionRepository::new(),
            MockUserRepository::new(),
        ))
        .oneshot(post_json("/auth/session", json!({})))
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["message"], "idToken is required");
    }

    #[tokio::test]
    async fn logout_deletes_session_and_clears_cookie() {
        let mut session_repo = MockSessionRepository::new();
        session_repo
            .expect_delete()
            .withf(|sid| sid == "abc")
            .times(1)
            .returning(|_| Ok(()));

        let response = routes(test_gate(session_repo, MockUserRepository::new()))
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/auth/logout")
                    .header(COOKIE, "sid=abc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let set_cookie = response.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
        assert!(set_cookie.starts_with("sid=;"));
    }
}
