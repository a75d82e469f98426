use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::documents;

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = documents)]
pub struct DocumentEntity {
    pub id: Uuid,
    pub user_id: String,
    pub property_id: Option<Uuid>,
    pub document_type: String,
    pub title: String,
    pub content: String,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = documents)]
pub struct InsertDocumentEntity {
    pub user_id: String,
    pub property_id: Option<Uuid>,
    pub document_type: String,
    pub title: String,
    pub content: String,
    pub metadata: serde_json::Value,
}
