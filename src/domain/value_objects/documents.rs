use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::{
    entities::documents::{DocumentEntity, InsertDocumentEntity},
    value_objects::enums::document_types::DocumentType,
};

pub const FALLBACK_DOCUMENT_CONTENT: &str = "Unable to generate document.";

/// `data` is free-form; its shape depends on the document type and is not
/// checked here.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateDocumentModel {
    pub document_type: Option<String>,
    pub title: Option<String>,
    pub property_id: Option<Uuid>,
    pub data: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentRequest {
    pub document_type: DocumentType,
    pub title: String,
    pub property_id: Option<Uuid>,
    pub data: Value,
}

impl GenerateDocumentModel {
    pub fn validate(self) -> Result<DocumentRequest, String> {
        let raw_type = self
            .document_type
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        let title = self
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        let (Some(raw_type), Some(title)) = (raw_type, title) else {
            return Err("Document type and title are required".to_string());
        };

        let document_type = DocumentType::from_str(&raw_type).ok_or_else(|| {
            let allowed = DocumentType::ALL
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            format!("documentType must be one of: {allowed}")
        })?;

        let data = match self.data {
            None | Some(Value::Null) => Value::Object(Default::default()),
            Some(data) => data,
        };

        Ok(DocumentRequest {
            document_type,
            title,
            property_id: self.property_id,
            data,
        })
    }
}

impl DocumentRequest {
    pub fn to_entity(&self, user_id: &str, content: String) -> InsertDocumentEntity {
        InsertDocumentEntity {
            user_id: user_id.to_string(),
            property_id: self.property_id,
            document_type: self.document_type.to_string(),
            title: self.title.clone(),
            content,
            metadata: self.data.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentModel {
    pub id: Uuid,
    pub user_id: String,
    pub property_id: Option<Uuid>,
    pub document_type: String,
    pub title: String,
    pub content: String,
    pub metadata: Value,
    pub created_at: DateTime<Utc>,
}

impl From<DocumentEntity> for DocumentModel {
    fn from(entity: DocumentEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            property_id: entity.property_id,
            document_type: entity.document_type,
            title: entity.title,
            content: entity.content,
            metadata: entity.metadata,
            created_at: entity.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_type_or_title_is_a_validation_error() {
        let no_title = GenerateDocumentModel {
            document_type: Some("access-notice".to_string()),
            ..Default::default()
        };
        assert_eq!(
            no_title.validate().unwrap_err(),
            "Document type and title are required"
        );

        let no_type = GenerateDocumentModel {
            title: Some("Access".to_string()),
            ..Default::default()
        };
        assert!(no_type.validate().is_err());
    }

    #[test]
    fn unknown_document_type_is_rejected() {
        let model = GenerateDocumentModel {
            document_type: Some("eviction-order".to_string()),
            title: Some("Out".to_string()),
            ..Default::default()
        };
        assert!(model.validate().unwrap_err().starts_with("documentType"));
    }

    #[test]
    fn payload_is_kept_verbatim_and_defaults_to_empty_object() {
        let with_data = GenerateDocumentModel {
            document_type: Some("security-deposit-notice".to_string()),
            title: Some("Deposit".to_string()),
            property_id: None,
            data: Some(json!({ "depositAmount": "1500", "tenantName": "Jane" })),
        }
        .validate()
        .unwrap();
        assert_eq!(with_data.data["tenantName"], "Jane");

        let without_data = GenerateDocumentModel {
            document_type: Some("lease-addendum".to_string()),
            title: Some("Addendum".to_string()),
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert_eq!(without_data.data, json!({}));
        assert_eq!(without_data.document_type, DocumentType::LeaseAddendum);
    }
}
