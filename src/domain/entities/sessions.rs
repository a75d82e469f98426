use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::infrastructure::postgres::schema::sessions;

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = sessions, primary_key(sid))]
pub struct SessionEntity {
    pub sid: String,
    pub sess: serde_json::Value,
    pub expire: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = sessions)]
pub struct InsertSessionEntity {
    pub sid: String,
    pub sess: serde_json::Value,
    pub expire: DateTime<Utc>,
}
