use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::{
    entities::rtlo_questions::{InsertRtloQuestionEntity, RtloQuestionEntity},
    value_objects::enums::confidence_levels::ConfidenceLevel,
};

pub const FALLBACK_ANSWER: &str = "Unable to provide specific guidance. Please consult the full Chicago RTLO text or legal counsel.";

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct AskQuestionModel {
    pub question: Option<String>,
}

impl AskQuestionModel {
    pub fn validate(self) -> Result<String, String> {
        self.question
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty())
            .ok_or_else(|| "Question is required".to_string())
    }
}

/// Raw JSON object returned by the text generator for a question.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerDraft(pub Value);

/// An answer that always satisfies the stored-record contract.
#[derive(Debug, Clone, PartialEq)]
pub struct RtloAnswer {
    pub answer: String,
    pub rtlo_section: Option<String>,
    pub confidence: ConfidenceLevel,
}

impl AnswerDraft {
    pub fn normalize(&self) -> RtloAnswer {
        let answer = text_field(&self.0, "answer").unwrap_or_else(|| FALLBACK_ANSWER.to_string());
        let rtlo_section = text_field(&self.0, "rtloSection");
        let confidence = self
            .0
            .get("confidence")
            .and_then(Value::as_str)
            .map(ConfidenceLevel::coerce)
            .unwrap_or_default();

        RtloAnswer {
            answer,
            rtlo_section,
            confidence,
        }
    }
}

impl RtloAnswer {
    pub fn to_entity(&self, user_id: &str, question: &str) -> InsertRtloQuestionEntity {
        InsertRtloQuestionEntity {
            user_id: user_id.to_string(),
            question: question.to_string(),
            answer: Some(self.answer.clone()),
            rtlo_section: self.rtlo_section.clone(),
            confidence: self.confidence.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RtloQuestionModel {
    pub id: Uuid,
    pub user_id: String,
    pub question: String,
    pub answer: Option<String>,
    pub rtlo_section: Option<String>,
    pub confidence: ConfidenceLevel,
    pub created_at: DateTime<Utc>,
}

impl From<RtloQuestionEntity> for RtloQuestionModel {
    fn from(entity: RtloQuestionEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            question: entity.question,
            answer: entity.answer,
            rtlo_section: entity.rtlo_section,
            confidence: ConfidenceLevel::coerce(&entity.confidence),
            created_at: entity.created_at,
        }
    }
}

fn text_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != "null")
        .map(str::to_string)
}
