use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::ai_analyses;

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = ai_analyses)]
pub struct AiAnalysisEntity {
    pub id: Uuid,
    pub user_id: String,
    pub document_id: Option<Uuid>,
    pub analysis_type: String,
    pub original_text: String,
    pub analysis: serde_json::Value,
    pub recommendations: serde_json::Value,
    pub compliance_score: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = ai_analyses)]
pub struct InsertAiAnalysisEntity {
    pub user_id: String,
    pub document_id: Option<Uuid>,
    pub analysis_type: String,
    pub original_text: String,
    pub analysis: serde_json::Value,
    pub recommendations: serde_json::Value,
    pub compliance_score: i32,
}
