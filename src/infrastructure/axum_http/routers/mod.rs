pub mod ai_analyses;
pub mod auth;
pub mod documents;
pub mod legal_aid;
pub mod properties;
pub mod rtlo_questions;
pub mod subscriptions;
pub mod users;

#[cfg(test)]
pub(crate) mod tests {
    use axum::{
        Extension, Router,
        body::Body,
        http::{Request, Response, header::CONTENT_TYPE},
    };
    use http_body_util::BodyExt;
    use serde_json::Value;

    use crate::domain::value_objects::iam::AuthUser;

    /// Stands in for the session middleware.
    pub(crate) fn as_user(router: Router, user_id: &str) -> Router {
        router.layer(Extension(AuthUser {
            user_id: user_id.to_string(),
            email: Some(format!("{user_id}@example.com")),
        }))
    }

    pub(crate) fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    pub(crate) fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    pub(crate) async fn body_json(response: Response<Body>) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }
}
