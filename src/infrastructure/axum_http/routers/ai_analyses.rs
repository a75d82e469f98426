use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::{get, post},
};
use tracing::info;

use crate::{
    application::{
        interfaces::text_generation::TextGenerator, usecases::ai_analyses::AiAnalysisUseCase,
    },
    domain::{
        repositories::{
            ai_analyses::AiAnalysisRepository, documents::DocumentRepository,
            users::UserRepository,
        },
        value_objects::{
            ai_analyses::{AiAnalysisModel, AnalyzeLeaseModel},
            iam::AuthUser,
        },
    },
    infrastructure::{
        axum_http::error_responses::AppError,
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{
                ai_analyses::AiAnalysisPostgres, documents::DocumentPostgres, users::UserPostgres,
            },
        },
    },
};

pub fn routes<G>(db_pool: Arc<PgPoolSquad>, text_generator: Arc<G>) -> Router
where
    G: TextGenerator + Send + Sync + 'static,
{
    let analysis_repository = AiAnalysisPostgres::new(Arc::clone(&db_pool));
    let user_repository = UserPostgres::new(Arc::clone(&db_pool));
    let document_repository = DocumentPostgres::new(Arc::clone(&db_pool));
    let analysis_usecase = AiAnalysisUseCase::new(
        Arc::new(analysis_repository),
        Arc::new(user_repository),
        Arc::new(document_repository),
        text_generator,
    );

    router(Arc::new(analysis_usecase))
}

pub fn router<A, U, D, G>(analysis_usecase: Arc<AiAnalysisUseCase<A, U, D, G>>) -> Router
where
    A: AiAnalysisRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    D: DocumentRepository + Send + Sync + 'static,
    G: TextGenerator + Send + Sync + 'static,
{
    Router::new()
        .route("/ai-analysis", post(analyze_lease))
        .route("/ai-analyses", get(list_analyses))
        .with_state(analysis_usecase)
}

pub async fn analyze_lease<A, U, D, G>(
    State(analysis_usecase): State<Arc<AiAnalysisUseCase<A, U, D, G>>>,
    AuthUser { user_id, .. }: AuthUser,
    payload: Result<Json<AnalyzeLeaseModel>, JsonRejection>,
) -> Result<Json<AiAnalysisModel>, AppError>
where
    A: AiAnalysisRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    D: DocumentRepository + Send + Sync + 'static,
    G: TextGenerator + Send + Sync + 'static,
{
    info!(%user_id, "ai_analyses: lease analysis request received");
    let Json(analyze_lease_model) = payload?;

    let analysis = analysis_usecase
        .analyze(&user_id, analyze_lease_model)
        .await?;
    Ok(Json(analysis))
}

pub async fn list_analyses<A, U, D, G>(
    State(analysis_usecase): State<Arc<AiAnalysisUseCase<A, U, D, G>>>,
    AuthUser { user_id, .. }: AuthUser,
) -> Result<Json<Vec<AiAnalysisModel>>, AppError>
where
    A: AiAnalysisRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    D: DocumentRepository + Send + Sync + 'static,
    G: TextGenerator + Send + Sync + 'static,
{
    let analyses = analysis_usecase.list(&user_id).await?;
    Ok(Json(analyses))
}
