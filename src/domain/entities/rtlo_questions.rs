use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::rtlo_questions;

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = rtlo_questions)]
pub struct RtloQuestionEntity {
    pub id: Uuid,
    pub user_id: String,
    pub question: String,
    pub answer: Option<String>,
    pub rtlo_section: Option<String>,
    pub confidence: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = rtlo_questions)]
pub struct InsertRtloQuestionEntity {
    pub user_id: String,
    pub question: String,
    pub answer: Option<String>,
    pub rtlo_section: Option<String>,
    pub confidence: String,
}
