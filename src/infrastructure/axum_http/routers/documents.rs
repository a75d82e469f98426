use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::get,
};

use crate::{
    application::{
        interfaces::text_generation::TextGenerator, usecases::documents::DocumentUseCase,
    },
    domain::{
        repositories::{documents::DocumentRepository, properties::PropertyRepository},
        value_objects::{
            documents::{DocumentModel, GenerateDocumentModel},
            iam::AuthUser,
        },
    },
    infrastructure::{
        axum_http::error_responses::AppError,
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{documents::DocumentPostgres, properties::PropertyPostgres},
        },
    },
};

pub fn routes<G>(db_pool: Arc<PgPoolSquad>, text_generator: Arc<G>) -> Router
where
    G: TextGenerator + Send + Sync + 'static,
{
    let document_repository = DocumentPostgres::new(Arc::clone(&db_pool));
    let property_repository = PropertyPostgres::new(Arc::clone(&db_pool));
    let document_usecase = DocumentUseCase::new(
        Arc::new(document_repository),
        Arc::new(property_repository),
        text_generator,
    );

    router(Arc::new(document_usecase))
}

pub fn router<D, P, G>(document_usecase: Arc<DocumentUseCase<D, P, G>>) -> Router
where
    D: DocumentRepository + Send + Sync + 'static,
    P: PropertyRepository + Send + Sync + 'static,
    G: TextGenerator + Send + Sync + 'static,
{
    Router::new()
        .route("/documents", get(list_documents).post(generate_document))
        .with_state(document_usecase)
}

pub async fn generate_document<D, P, G>(
    State(document_usecase): State<Arc<DocumentUseCase<D, P, G>>>,
    AuthUser { user_id, .. }: AuthUser,
    payload: Result<Json<GenerateDocumentModel>, JsonRejection>,
) -> Result<Json<DocumentModel>, AppError>
where
    D: DocumentRepository + Send + Sync + 'static,
    P: PropertyRepository + Send + Sync + 'static,
    G: TextGenerator + Send + Sync + 'static,
{
    let Json(generate_document_model) = payload?;
    let document = document_usecase
        .generate(&user_id, generate_document_model)
        .await?;
    Ok(Json(document))
}

pub async fn list_documents<D, P, G>(
    State(document_usecase): State<Arc<DocumentUseCase<D, P, G>>>,
    AuthUser { user_id, .. }: AuthUser,
) -> Result<Json<Vec<DocumentModel>>, AppError>
where
    D: DocumentRepository + Send + Sync + 'static,
    P: PropertyRepository + Send + Sync + 'static,
    G: TextGenerator + Send + Sync + 'static,
{
    let documents = document_usecase.list(&user_id).await?;
    Ok(Json(documents))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        application::{
            interfaces::text_generation::MockTextGenerator,
            usecases::documents::tests::stored_document,
        },
        domain::repositories::{
            documents::MockDocumentRepository, properties::MockPropertyRepository,
        },
        infrastructure::axum_http::routers::tests::{as_user, body_json, post_json},
    };
    use axum::http::StatusCode;
    use serde_json::json;
    use tower::ServiceExt;

    #[tokio::test]
    async fn generates_and_returns_document() {
        let mut text_generator = MockTextGenerator::new();
        text_generator
            .expect_draft_document()
            .returning(|_, _| Ok("SECURITY DEPOSIT NOTICE ...".to_string()));

        let mut document_repo = MockDocumentRepository::new();
        document_repo
            .expect_create()
            .withf(|insert| insert.user_id == "user-1")
            .returning(|insert| Ok(stored_document(insert)));

        let usecase = DocumentUseCase::new(
            Arc::new(document_repo),
            Arc::new(MockPropertyRepository::new()),
            Arc::new(text_generator),
        );
        let response = as_user(router(Arc::new(usecase)), "user-1")
            .oneshot(post_json(
                "/documents",
                json!({
                    "documentType": "security-deposit-notice",
                    "title": "Deposit notice",
                    "data": { "amount": 1500 }
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["documentType"], "security-deposit-notice");
        assert_eq!(body["content"], "SECURITY DEPOSIT NOTICE ...");
    }

    #[tokio::test]
    async fn unknown_document_type_is_rejected() {
        let mut text_generator = MockTextGenerator::new();
        text_generator.expect_draft_document().never();

        let usecase = DocumentUseCase::new(
            Arc::new(MockDocumentRepository::new()),
            Arc::new(MockPropertyRepository::new()),
            Arc::new(text_generator),
        );
        let response = as_user(router(Arc::new(usecase)), "user-1")
            .oneshot(post_json(
                "/documents",
                json!({ "documentType": "eviction-order", "title": "Out", "data": {} }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
