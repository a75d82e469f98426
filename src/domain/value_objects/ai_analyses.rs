use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::{
    entities::ai_analyses::{AiAnalysisEntity, InsertAiAnalysisEntity},
    value_objects::enums::severities::Severity,
};

pub const LEASE_REVIEW_ANALYSIS_TYPE: &str = "lease-review";
pub const MIN_COMPLIANCE_SCORE: i32 = 0;
pub const MAX_COMPLIANCE_SCORE: i32 = 100;

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeLeaseModel {
    pub lease_text: Option<String>,
    pub document_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeaseAnalysisRequest {
    pub lease_text: String,
    pub document_id: Option<Uuid>,
}

impl AnalyzeLeaseModel {
    pub fn validate(self) -> Result<LeaseAnalysisRequest, String> {
        let lease_text = self
            .lease_text
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| "Lease text is required".to_string())?;

        Ok(LeaseAnalysisRequest {
            lease_text,
            document_id: self.document_id,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LeaseIssue {
    pub section: String,
    pub issue: String,
    pub severity: Severity,
    pub recommendation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LeaseAnalysis {
    pub compliance_score: i32,
    pub issues: Vec<LeaseIssue>,
    pub recommendations: Vec<String>,
}

/// Raw JSON object returned by the text generator for a lease review.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaseAnalysisDraft(pub Value);

impl LeaseAnalysisDraft {
    /// Never fails: missing or malformed parts collapse to safe defaults.
    pub fn normalize(&self) -> LeaseAnalysis {
        let compliance_score = self
            .0
            .get("complianceScore")
            .and_then(score_value)
            .map(clamp_compliance_score)
            .unwrap_or(MIN_COMPLIANCE_SCORE);

        let issues = self
            .0
            .get("issues")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(normalize_issue).collect())
            .unwrap_or_default();

        let recommendations = self
            .0
            .get("recommendations")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::trim)
                    .filter(|text| !text.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        LeaseAnalysis {
            compliance_score,
            issues,
            recommendations,
        }
    }
}

pub fn clamp_compliance_score(raw: f64) -> i32 {
    if raw.is_nan() {
        return MIN_COMPLIANCE_SCORE;
    }
    raw.round()
        .clamp(MIN_COMPLIANCE_SCORE as f64, MAX_COMPLIANCE_SCORE as f64) as i32
}

fn score_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(raw) => raw.trim().parse().ok(),
        _ => None,
    }
}

fn normalize_issue(value: &Value) -> Option<LeaseIssue> {
    let text = |key: &str| {
        value
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    let issue = text("issue")?;

    Some(LeaseIssue {
        section: text("section").unwrap_or_else(|| "unspecified".to_string()),
        issue,
        severity: value
            .get("severity")
            .and_then(Value::as_str)
            .map(Severity::coerce)
            .unwrap_or_default(),
        recommendation: text("recommendation").unwrap_or_default(),
    })
}

impl LeaseAnalysis {
    pub fn to_entity(
        &self,
        user_id: &str,
        request: &LeaseAnalysisRequest,
    ) -> serde_json::Result<InsertAiAnalysisEntity> {
        Ok(InsertAiAnalysisEntity {
            user_id: user_id.to_string(),
            document_id: request.document_id,
            analysis_type: LEASE_REVIEW_ANALYSIS_TYPE.to_string(),
            original_text: request.lease_text.clone(),
            analysis: serde_json::to_value(self)?,
            recommendations: serde_json::to_value(&self.recommendations)?,
            compliance_score: self.compliance_score,
        })
    }
}

/// Stored analysis as returned to callers. Rows that no longer decode into
/// [`LeaseAnalysis`] are passed through untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum AnalysisPayload {
    Structured(LeaseAnalysis),
    Raw(Value),
}

impl AnalysisPayload {
    pub fn decode(stored: Value) -> Self {
        // Older rows may hold the analysis as a serialized JSON string.
        let candidate = match &stored {
            Value::String(raw) => serde_json::from_str::<Value>(raw).ok(),
            other => Some(other.clone()),
        };

        match candidate.and_then(|value| serde_json::from_value::<LeaseAnalysis>(value).ok()) {
            Some(analysis) => AnalysisPayload::Structured(analysis),
            None => AnalysisPayload::Raw(stored),
        }
    }

    pub fn is_structured(&self) -> bool {
        matches!(self, AnalysisPayload::Structured(_))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AiAnalysisModel {
    pub id: Uuid,
    pub user_id: String,
    pub document_id: Option<Uuid>,
    pub analysis_type: String,
    pub original_text: String,
    pub analysis: AnalysisPayload,
    pub recommendations: Value,
    pub compliance_score: i32,
    pub created_at: DateTime<Utc>,
}

impl From<AiAnalysisEntity> for AiAnalysisModel {
    fn from(entity: AiAnalysisEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            document_id: entity.document_id,
            analysis_type: entity.analysis_type,
            original_text: entity.original_text,
            analysis: AnalysisPayload::decode(entity.analysis),
            recommendations: entity.recommendations,
            compliance_score: entity.compliance_score,
            created_at: entity.created_at,
        }
    }
}
