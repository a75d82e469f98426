use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::properties::{InsertPropertyEntity, PropertyEntity},
    value_objects::enums::property_types::PropertyType,
};

pub const DEFAULT_CITY: &str = "Chicago";
pub const DEFAULT_UNITS: i64 = 1;

/// Owner-occupied buildings at or below this many units fall outside the ordinance.
pub const OWNER_OCCUPIED_EXEMPT_MAX_UNITS: i32 = 6;

/// The only coverage rule evaluated in code. Every other exclusion in
/// [`DOCUMENTED_EXCLUSIONS`] is informational.
pub fn is_rtlo_covered(is_owner_occupied: bool, units: i32) -> bool {
    !(is_owner_occupied && units <= OWNER_OCCUPIED_EXEMPT_MAX_UNITS)
}

/// Request body for `POST /properties`. Any client-sent coverage flag is not
/// part of this shape and is dropped during deserialization.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPropertyModel {
    pub address: Option<String>,
    pub city: Option<String>,
    pub zip_code: Option<String>,
    pub property_type: Option<String>,
    pub units: Option<i64>,
    pub is_owner_occupied: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDetails {
    pub address: String,
    pub city: String,
    pub zip_code: String,
    pub property_type: PropertyType,
    pub units: i32,
    pub is_owner_occupied: bool,
}

impl VerifyPropertyModel {
    pub fn validate(self) -> Result<PropertyDetails, String> {
        let address = required_text(self.address, "address")?;
        let zip_code = required_text(self.zip_code, "zipCode")?;

        let raw_type = required_text(self.property_type, "propertyType")?;
        let property_type = PropertyType::from_str(&raw_type).ok_or_else(|| {
            let allowed = PropertyType::ALL
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            format!("propertyType must be one of: {allowed}")
        })?;

        let units = self.units.unwrap_or(DEFAULT_UNITS);
        let units = i32::try_from(units)
            .ok()
            .filter(|units| *units >= 1)
            .ok_or_else(|| "units must be a positive integer".to_string())?;

        let city = self
            .city
            .map(|city| city.trim().to_string())
            .filter(|city| !city.is_empty())
            .unwrap_or_else(|| DEFAULT_CITY.to_string());

        Ok(PropertyDetails {
            address,
            city,
            zip_code,
            property_type,
            units,
            is_owner_occupied: self.is_owner_occupied.unwrap_or(false),
        })
    }
}

impl PropertyDetails {
    pub fn is_rtlo_covered(&self) -> bool {
        is_rtlo_covered(self.is_owner_occupied, self.units)
    }

    pub fn to_entity(&self, user_id: &str, verified_at: DateTime<Utc>) -> InsertPropertyEntity {
        InsertPropertyEntity {
            user_id: user_id.to_string(),
            address: self.address.clone(),
            city: self.city.clone(),
            zip_code: self.zip_code.clone(),
            property_type: self.property_type.to_string(),
            units: self.units,
            is_owner_occupied: self.is_owner_occupied,
            is_rtlo_covered: self.is_rtlo_covered(),
            verification_date: verified_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PropertyModel {
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

impl From<PropertyEntity> for PropertyModel {
    fn from(entity: PropertyEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            address: entity.address,
            city: entity.city,
            zip_code: entity.zip_code,
            property_type: entity.property_type,
            units: entity.units,
            is_owner_occupied: entity.is_owner_occupied,
            is_rtlo_covered: entity.is_rtlo_covered,
            verification_date: entity.verification_date,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CoverageExclusion {
    pub category: &'static str,
    pub description: &'static str,
    pub enforced: bool,
}

pub const DOCUMENTED_EXCLUSIONS: &[CoverageExclusion] = &[
    CoverageExclusion {
        category: "owner-occupied-small-building",
        description: "Owner-occupied buildings with 6 units or less",
        enforced: true,
    },
    CoverageExclusion {
        category: "transient-lodging",
        description: "Most hotels, motels, and rooming houses",
        enforced: false,
    },
    CoverageExclusion {
        category: "dormitory-or-shelter",
        description: "Dormitories and shelters",
        enforced: false,
    },
    CoverageExclusion {
        category: "employee-quarters",
        description: "Employee quarters",
        enforced: false,
    },
    CoverageExclusion {
        category: "non-residential",
        description: "Non-residential rental properties",
        enforced: false,
    },
    CoverageExclusion {
        category: "owner-occupied-co-op",
        description: "Owner-occupied co-ops",
        enforced: false,
    },
];

fn required_text(value: Option<String>, field: &str) -> Result<String, String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| format!("{field} is required"))
}
