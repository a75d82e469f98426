use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};

use crate::{
    application::errors::{UseCaseError, UseCaseResult},
    domain::{
        entities::properties::EditPropertyCoverageEntity,
        repositories::properties::PropertyRepository,
        value_objects::properties::{
            CoverageExclusion, DOCUMENTED_EXCLUSIONS, PropertyModel, VerifyPropertyModel,
            is_rtlo_covered,
        },
    },
};
use uuid::Uuid;

pub struct PropertyUseCase<P>
where
    P: PropertyRepository + Send + Sync + 'static,
{
    property_repo: Arc<P>,
}

impl<P> PropertyUseCase<P>
where
    P: PropertyRepository + Send + Sync + 'static,
{
    pub fn new(property_repo: Arc<P>) -> Self {
        Self { property_repo }
    }

    /// Validates the submission, derives coverage and stores the property.
    pub async fn verify(
        &self,
        user_id: &str,
        verify_property_model: VerifyPropertyModel,
    ) -> UseCaseResult<PropertyModel> {
        let details = verify_property_model.validate().map_err(|reason| {
            warn!(%user_id, %reason, "properties: invalid submission");
            UseCaseError::Validation(reason)
        })?;

        let property = self
            .property_repo
            .create(details.to_entity(user_id, Utc::now()))
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "properties: failed to store property");
                UseCaseError::Internal(err)
            })?;

        info!(
            %user_id,
            property_id = %property.id,
            units = property.units,
            is_owner_occupied = property.is_owner_occupied,
            is_rtlo_covered = property.is_rtlo_covered,
            "properties: coverage verified"
        );

        Ok(PropertyModel::from(property))
    }

    pub async fn list(&self, user_id: &str) -> UseCaseResult<Vec<PropertyModel>> {
        let properties = self.property_repo.list_by_user(user_id).await.map_err(|err| {
            error!(%user_id, db_error = ?err, "properties: failed to list properties");
            UseCaseError::Internal(err)
        })?;

        Ok(properties.into_iter().map(PropertyModel::from).collect())
    }

    /// Recomputes coverage from the stored unit count and occupancy and
    /// refreshes the verification date. Not routed.
    pub async fn reverify(&self, user_id: &str, property_id: Uuid) -> UseCaseResult<PropertyModel> {
        let property = self
            .property_repo
            .find_by_id_for_user(property_id, user_id)
            .await
            .map_err(|err| {
                error!(%user_id, %property_id, db_error = ?err, "properties: failed to load property");
                UseCaseError::Internal(err)
            })?
            .ok_or(UseCaseError::NotFound("Property"))?;

        let now = Utc::now();
        let edit = EditPropertyCoverageEntity {
            is_rtlo_covered: is_rtlo_covered(property.is_owner_occupied, property.units),
            verification_date: now,
            updated_at: now,
        };

        let property = self
            .property_repo
            .update_coverage(property_id, user_id, edit)
            .await
            .map_err(|err| {
                error!(%user_id, %property_id, db_error = ?err, "properties: failed to update coverage");
                UseCaseError::Internal(err)
            })?
            .ok_or(UseCaseError::NotFound("Property"))?;

        info!(
            %user_id,
            %property_id,
            is_rtlo_covered = property.is_rtlo_covered,
            "properties: coverage re-verified"
        );

        Ok(PropertyModel::from(property))
    }

    pub fn documented_exclusions(&self) -> &'static [CoverageExclusion] {
        DOCUMENTED_EXCLUSIONS
    }
}
