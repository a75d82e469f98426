use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use serde_json::Value;

use crate::domain::value_objects::{
    ai_analyses::LeaseAnalysisDraft, enums::document_types::DocumentType,
    rtlo_questions::AnswerDraft,
};

/// Language-model backed generation. Implementations make a single attempt
/// and return the model output unvalidated; callers normalize it.
#[automock]
#[async_trait]
pub trait TextGenerator {
    async fn answer_question(&self, question: &str) -> Result<AnswerDraft>;
    async fn analyze_lease(&self, lease_text: &str) -> Result<LeaseAnalysisDraft>;
    async fn draft_document(&self, document_type: DocumentType, data: &Value) -> Result<String>;
}
