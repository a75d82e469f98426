use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::properties;

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = properties)]
pub struct PropertyEntity {
    pub id: Uuid,
    pub user_id: String,
    pub address: String,
    pub city: String,
    pub zip_code: String,
    pub property_type: String,
    pub units: i32,
    pub is_owner_occupied: bool,
    pub is_rtlo_covered: bool,
    pub verification_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = properties)]
pub struct InsertPropertyEntity {
    pub user_id: String,
    pub address: String,
    pub city: String,
    pub zip_code: String,
    pub property_type: String,
    pub units: i32,
    pub is_owner_occupied: bool,
    pub is_rtlo_covered: bool,
    pub verification_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, AsChangeset)]
#[diesel(table_name = properties)]
pub struct EditPropertyCoverageEntity {
    pub is_rtlo_covered: bool,
    pub verification_date: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
