use anyhow::Result;
use async_trait::async_trait;
use diesel::{OptionalExtension, RunQueryDsl, insert_into, pg::Pg, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::properties::{EditPropertyCoverageEntity, InsertPropertyEntity, PropertyEntity},
        repositories::properties::PropertyRepository,
    },
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::properties},
};

pub struct PropertyPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl PropertyPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

fn owned_by(user_id: &str) -> properties::BoxedQuery<'_, Pg> {
    properties::table
        .filter(properties::user_id.eq(user_id))
        .order(properties::created_at.desc())
        .into_boxed()
}

#[async_trait]
impl PropertyRepository for PropertyPostgres {
    async fn create(&self, insert_property_entity: InsertPropertyEntity) -> Result<PropertyEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(properties::table)
            .values(&insert_property_entity)
            .returning(PropertyEntity::as_returning())
            .get_result::<PropertyEntity>(&mut conn)?;

        Ok(result)
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<PropertyEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = owned_by(user_id)
            .select(PropertyEntity::as_select())
            .load::<PropertyEntity>(&mut conn)?;

        Ok(results)
    }

    async fn find_by_id_for_user(
        &self,
        property_id: Uuid,
        user_id: &str,
    ) -> Result<Option<PropertyEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = properties::table
            .filter(properties::id.eq(property_id))
            .filter(properties::user_id.eq(user_id))
            .select(PropertyEntity::as_select())
            .first::<PropertyEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn update_coverage(
        &self,
        property_id: Uuid,
        user_id: &str,
        edit_property_coverage_entity: EditPropertyCoverageEntity,
    ) -> Result<Option<PropertyEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = update(properties::table)
            .filter(properties::id.eq(property_id))
            .filter(properties::user_id.eq(user_id))
            .set(&edit_property_coverage_entity)
            .returning(PropertyEntity::as_returning())
            .get_result::<PropertyEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }
}
