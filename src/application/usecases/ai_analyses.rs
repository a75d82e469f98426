use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info, warn};

use crate::{
    application::{
        errors::{UseCaseError, UseCaseResult},
        interfaces::text_generation::TextGenerator,
    },
    domain::{
        repositories::{
            ai_analyses::AiAnalysisRepository, documents::DocumentRepository,
            users::UserRepository,
        },
        value_objects::{
            ai_analyses::{AiAnalysisModel, AnalyzeLeaseModel},
            enums::subscription_statuses::SubscriptionStatus,
        },
    },
};

pub struct AiAnalysisUseCase<A, U, D, G>
where
    A: AiAnalysisRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    D: DocumentRepository + Send + Sync + 'static,
    G: TextGenerator + Send + Sync + 'static,
{
    analysis_repo: Arc<A>,
    user_repo: Arc<U>,
    document_repo: Arc<D>,
    text_generator: Arc<G>,
}

impl<A, U, D, G> AiAnalysisUseCase<A, U, D, G>
where
    A: AiAnalysisRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    D: DocumentRepository + Send + Sync + 'static,
    G: TextGenerator + Send + Sync + 'static,
{
    pub fn new(
        analysis_repo: Arc<A>,
        user_repo: Arc<U>,
        document_repo: Arc<D>,
        text_generator: Arc<G>,
    ) -> Self {
        Self {
            analysis_repo,
            user_repo,
            document_repo,
            text_generator,
        }
    }

    /// Premium lease review. Entitlement is checked before the body is looked at.
    pub async fn analyze(
        &self,
        user_id: &str,
        analyze_lease_model: AnalyzeLeaseModel,
    ) -> UseCaseResult<AiAnalysisModel> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "ai_analyses: failed to load user");
                UseCaseError::Internal(err)
            })?
            .ok_or(UseCaseError::NotFound("User"))?;

        let status = SubscriptionStatus::from_str(&user.subscription_status);
        if !status.is_entitled() {
            warn!(%user_id, %status, "ai_analyses: subscription required");
            return Err(UseCaseError::SubscriptionRequired);
        }

        let request = analyze_lease_model.validate().map_err(|reason| {
            warn!(%user_id, %reason, "ai_analyses: invalid request");
            UseCaseError::Validation(reason)
        })?;

        if let Some(document_id) = request.document_id {
            let owned = self
                .document_repo
                .find_by_id_for_user(document_id, user_id)
                .await
                .map_err(|err| {
                    error!(%user_id, %document_id, db_error = ?err, "ai_analyses: failed to load document");
                    UseCaseError::Internal(err)
                })?;
            if owned.is_none() {
                warn!(%user_id, %document_id, "ai_analyses: document not owned by caller");
                return Err(UseCaseError::NotFound("Document"));
            }
        }

        let draft = self
            .text_generator
            .analyze_lease(&request.lease_text)
            .await
            .map_err(|err| {
                error!(%user_id, error = ?err, "ai_analyses: lease analysis failed");
                UseCaseError::Generation(err)
            })?;

        let analysis = draft.normalize();
        let insert = analysis
            .to_entity(user_id, &request)
            .context("failed to encode lease analysis")?;

        let stored = self.analysis_repo.create(insert).await.map_err(|err| {
            error!(%user_id, db_error = ?err, "ai_analyses: failed to store analysis");
            UseCaseError::Internal(err)
        })?;

        info!(
            %user_id,
            analysis_id = %stored.id,
            compliance_score = stored.compliance_score,
            issue_count = analysis.issues.len(),
            "ai_analyses: lease analyzed"
        );

        Ok(AiAnalysisModel::from(stored))
    }

    pub async fn list(&self, user_id: &str) -> UseCaseResult<Vec<AiAnalysisModel>> {
        let analyses = self.analysis_repo.list_by_user(user_id).await.map_err(|err| {
            error!(%user_id, db_error = ?err, "ai_analyses: failed to list analyses");
            UseCaseError::Internal(err)
        })?;

        let models = analyses
            .into_iter()
            .map(AiAnalysisModel::from)
            .collect::<Vec<_>>();

        let raw_count = models.iter().filter(|m| !m.analysis.is_structured()).count();
        if raw_count > 0 {
            warn!(%user_id, raw_count, "ai_analyses: returning undecodable analyses as stored");
        }

        Ok(models)
    }
}
