use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::get,
};

use crate::{
    application::{
        interfaces::text_generation::TextGenerator, usecases::rtlo_questions::RtloQuestionUseCase,
    },
    domain::{
        repositories::rtlo_questions::RtloQuestionRepository,
        value_objects::{
            iam::AuthUser,
            rtlo_questions::{AskQuestionModel, RtloQuestionModel},
        },
    },
    infrastructure::{
        axum_http::error_responses::AppError,
        postgres::{
            postgres_connection::PgPoolSquad, repositories::rtlo_questions::RtloQuestionPostgres,
        },
    },
};

pub fn routes<G>(db_pool: Arc<PgPoolSquad>, text_generator: Arc<G>) -> Router
where
    G: TextGenerator + Send + Sync + 'static,
{
    let question_repository = RtloQuestionPostgres::new(Arc::clone(&db_pool));
    let question_usecase = RtloQuestionUseCase::new(Arc::new(question_repository), text_generator);

    router(Arc::new(question_usecase))
}

pub fn router<Q, G>(question_usecase: Arc<RtloQuestionUseCase<Q, G>>) -> Router
where
    Q: RtloQuestionRepository + Send + Sync + 'static,
    G: TextGenerator + Send + Sync + 'static,
{
    Router::new()
        .route("/rtlo-questions", get(list_questions).post(ask_question))
        .with_state(question_usecase)
}

pub async fn ask_question<Q, G>(
    State(question_usecase): State<Arc<RtloQuestionUseCase<Q, G>>>,
    AuthUser { user_id, .. }: AuthUser,
    payload: Result<Json<AskQuestionModel>, JsonRejection>,
) -> Result<Json<RtloQuestionModel>, AppError>
where
    Q: RtloQuestionRepository + Send + Sync + 'static,
    G: TextGenerator + Send + Sync + 'static,
{
    let Json(ask_question_model) = payload?;
    let question = question_usecase.ask(&user_id, ask_question_model).await?;
    Ok(Json(question))
}

pub async fn list_questions<Q, G>(
    State(question_usecase): State<Arc<RtloQuestionUseCase<Q, G>>>,
    AuthUser { user_id, .. }: AuthUser,
) -> Result<Json<Vec<RtloQuestionModel>>, AppError>
where
    Q: RtloQuestionRepository + Send + Sync + 'static,
    G: TextGenerator + Send + Sync + 'static,
{
    let questions = question_usecase.list(&user_id).await?;
    Ok(Json(questions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        application::interfaces::text_generation::MockTextGenerator,
        domain::{
            entities::rtlo_questions::RtloQuestionEntity,
            repositories::rtlo_questions::MockRtloQuestionRepository,
            value_objects::rtlo_questions::AnswerDraft,
        },
        infrastructure::axum_http::routers::tests::{as_user, body_json, get, post_json},
    };
    use axum::http::StatusCode;
    use chrono::Utc;
    use serde_json::json;
    use tower::ServiceExt;
    use uuid::Uuid;

    #[tokio::test]
    async fn overconfident_answer_is_stored_as_low() {
        let mut text_generator = MockTextGenerator::new();
        text_generator.expect_answer_question().returning(|_| {
            Ok(AnswerDraft(json!({
                "answer": "Interest is owed annually.",
                "rtloSection": "5-12-080",
                "confidence": "certain"
            })))
        });

        let mut question_repo = MockRtloQuestionRepository::new();
        question_repo.expect_create().returning(|insert| {
            Ok(RtloQuestionEntity {
                id: Uuid::new_v4(),
                user_id: insert.user_id,
                question: insert.question,
                answer: insert.answer,
                rtlo_section: insert.rtlo_section,
                confidence: insert.confidence,
                created_at: Utc::now(),
            })
        });

        let usecase = RtloQuestionUseCase::new(Arc::new(question_repo), Arc::new(text_generator));
        let response = as_user(router(Arc::new(usecase)), "user-1")
            .oneshot(post_json(
                "/rtlo-questions",
                json!({ "question": "Do I owe deposit interest?" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["confidence"], "low");
        assert_eq!(body["rtloSection"], "5-12-080");
    }

    #[tokio::test]
    async fn generation_failure_is_a_bad_gateway() {
        let mut text_generator = MockTextGenerator::new();
        text_generator
            .expect_answer_question()
            .returning(|_| Err(anyhow::anyhow!("upstream timeout")));

        let mut question_repo = MockRtloQuestionRepository::new();
        question_repo.expect_create().never();

        let usecase = RtloQuestionUseCase::new(Arc::new(question_repo), Arc::new(text_generator));
        let response = as_user(router(Arc::new(usecase)), "user-1")
            .oneshot(post_json("/rtlo-questions", json!({ "question": "Late fees?" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(body_json(response).await["reason"], "generation_failed");
    }

    #[tokio::test]
    async fn list_is_scoped_to_the_caller() {
        let mut question_repo = MockRtloQuestionRepository::new();
        question_repo
            .expect_list_by_user()
            .withf(|user_id| user_id == "user-2")
            .times(1)
            .returning(|_| Ok(vec![]));

        let usecase = RtloQuestionUseCase::new(
            Arc::new(question_repo),
            Arc::new(MockTextGenerator::new()),
        );
        let response = as_user(router(Arc::new(usecase)), "user-2")
            .oneshot(get("/rtlo-questions"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!([]));
    }
}
