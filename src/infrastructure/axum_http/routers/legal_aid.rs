use axum::{Json, Router, routing::get};

use crate::domain::value_objects::legal_aid::{LEGAL_AID_DIRECTORY, LegalAidResource};

pub fn routes() -> Router {
    Router::new().route("/legal-aid", get(list_legal_aid))
}

pub async fn list_legal_aid() -> Json<&'static [LegalAidResource]> {
    Json(LEGAL_AID_DIRECTORY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::axum_http::routers::tests::{body_json, get};
    use axum::http::StatusCode;
    use tower::ServiceExt;

    #[tokio::test]
    async fn directory_is_public_and_stable() {
        let first = body_json(routes().oneshot(get("/legal-aid")).await.unwrap()).await;
        let response = routes().oneshot(get("/legal-aid")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let second = body_json(response).await;
        assert_eq!(first, second);
        assert_eq!(second.as_array().unwrap().len(), 6);
        assert_eq!(second[0]["id"], "erp");
        assert!(second[1].get("phone").is_none());
    }
}
