use std::sync::Arc;

use tracing::{error, info, warn};

use crate::{
    application::{
        errors::{UseCaseError, UseCaseResult},
        interfaces::text_generation::TextGenerator,
    },
    domain::{
        repositories::{documents::DocumentRepository, properties::PropertyRepository},
        value_objects::documents::{
            DocumentModel, FALLBACK_DOCUMENT_CONTENT, GenerateDocumentModel,
        },
    },
};

pub struct DocumentUseCase<D, P, G>
where
    D: DocumentRepository + Send + Sync + 'static,
    P: PropertyRepository + Send + Sync + 'static,
    G: TextGenerator + Send + Sync + 'static,
{
    document_repo: Arc<D>,
    property_repo: Arc<P>,
    text_generator: Arc<G>,
}

impl<D, P, G> DocumentUseCase<D, P, G>
where
    D: DocumentRepository + Send + Sync + 'static,
    P: PropertyRepository + Send + Sync + 'static,
    G: TextGenerator + Send + Sync + 'static,
{
    pub fn new(document_repo: Arc<D>, property_repo: Arc<P>, text_generator: Arc<G>) -> Self {
        Self {
            document_repo,
            property_repo,
            text_generator,
        }
    }

    pub async fn generate(
        &self,
        user_id: &str,
        generate_document_model: GenerateDocumentModel,
    ) -> UseCaseResult<DocumentModel> {
        let request = generate_document_model.validate().map_err(|reason| {
            warn!(%user_id, %reason, "documents: invalid request");
            UseCaseError::Validation(reason)
        })?;

        if let Some(property_id) = request.property_id {
            let owned = self
                .property_repo
                .find_by_id_for_user(property_id, user_id)
                .await
                .map_err(|err| {
                    error!(%user_id, %property_id, db_error = ?err, "documents: failed to load property");
                    UseCaseError::Internal(err)
                })?;
            if owned.is_none() {
                warn!(%user_id, %property_id, "documents: property not owned by caller");
                return Err(UseCaseError::NotFound("Property"));
            }
        }

        let content = self
            .text_generator
            .draft_document(request.document_type, &request.data)
            .await
            .map_err(|err| {
                error!(
                    %user_id,
                    document_type = %request.document_type,
                    error = ?err,
                    "documents: generation failed"
                );
                UseCaseError::Generation(err)
            })?;

        let content = if content.trim().is_empty() {
            FALLBACK_DOCUMENT_CONTENT.to_string()
        } else {
            content
        };

        let document = self
            .document_repo
            .create(request.to_entity(user_id, content))
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "documents: failed to store document");
                UseCaseError::Internal(err)
            })?;

        info!(
            %user_id,
            document_id = %document.id,
            document_type = %document.document_type,
            "documents: document generated"
        );

        Ok(DocumentModel::from(document))
    }

    pub async fn list(&self, user_id: &str) -> UseCaseResult<Vec<DocumentModel>> {
        let documents = self.document_repo.list_by_user(user_id).await.map_err(|err| {
            error!(%user_id, db_error = ?err, "documents: failed to list documents");
            UseCaseError::Internal(err)
        })?;

        Ok(documents.into_iter().map(DocumentModel::from).collect())
    }
}
