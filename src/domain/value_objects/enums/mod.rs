pub mod confidence_levels;
pub mod document_types;
pub mod property_types;
pub mod severities;
pub mod subscription_statuses;
