use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::properties::{
    EditPropertyCoverageEntity, InsertPropertyEntity, PropertyEntity,
};

#[automock]
#[async_trait]
pub trait PropertyRepository {
    async fn create(&self, insert_property_entity: InsertPropertyEntity) -> Result<PropertyEntity>;
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<PropertyEntity>>;
    async fn find_by_id_for_user(
        &self,
        property_id: Uuid,
        user_id: &str,
    ) -> Result<Option<PropertyEntity>>;
    async fn update_coverage(
        &self,
        property_id: Uuid,
        user_id: &str,
        edit_property_coverage_entity: EditPropertyCoverageEntity,
    ) -> Result<Option<PropertyEntity>>;
}
