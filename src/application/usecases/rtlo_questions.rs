use std::sync::Arc;

use tracing::{error, info, warn};

use crate::{
    application::{
        errors::{UseCaseError, UseCaseResult},
        interfaces::text_generation::TextGenerator,
    },
    domain::{
        repositories::rtlo_questions::RtloQuestionRepository,
        value_objects::rtlo_questions::{AskQuestionModel, RtloQuestionModel},
    },
};

pub struct RtloQuestionUseCase<Q, G>
where
    Q: RtloQuestionRepository + Send + Sync + 'static,
    G: TextGenerator + Send + Sync + 'static,
{
    question_repo: Arc<Q>,
    text_generator: Arc<G>,
}

impl<Q, G> RtloQuestionUseCase<Q, G>
where
    Q: RtloQuestionRepository + Send + Sync + 'static,
    G: TextGenerator + Send + Sync + 'static,
{
    pub fn new(question_repo: Arc<Q>, text_generator: Arc<G>) -> Self {
        Self {
            question_repo,
            text_generator,
        }
    }

    /// Answers the question and stores it. Nothing is written when generation fails.
    pub async fn ask(
        &self,
        user_id: &str,
        ask_question_model: AskQuestionModel,
    ) -> UseCaseResult<RtloQuestionModel> {
        let question = ask_question_model.validate().map_err(|reason| {
            warn!(%user_id, %reason, "rtlo_questions: invalid question");
            UseCaseError::Validation(reason)
        })?;

        let draft = self
            .text_generator
            .answer_question(&question)
            .await
            .map_err(|err| {
                error!(%user_id, error = ?err, "rtlo_questions: answer generation failed");
                UseCaseError::Generation(err)
            })?;

        let answer = draft.normalize();

        let stored = self
            .question_repo
            .create(answer.to_entity(user_id, &question))
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "rtlo_questions: failed to store question");
                UseCaseError::Internal(err)
            })?;

        info!(
            %user_id,
            question_id = %stored.id,
            confidence = %stored.confidence,
            "rtlo_questions: question answered"
        );

        Ok(RtloQuestionModel::from(stored))
    }

    pub async fn list(&self, user_id: &str) -> UseCaseResult<Vec<RtloQuestionModel>> {
        let questions = self.question_repo.list_by_user(user_id).await.map_err(|err| {
            error!(%user_id, db_error = ?err, "rtlo_questions: failed to list questions");
            UseCaseError::Internal(err)
        })?;

        Ok(questions.into_iter().map(RtloQuestionModel::from).collect())
    }
}
