use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentType {
    SecurityDepositNotice,
    AccessNotice,
    LeaseAddendum,
    HabitabilityNotice,
}

impl Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let document_type = match self {
            DocumentType::SecurityDepositNotice => "security-deposit-notice",
            DocumentType::AccessNotice => "access-notice",
            DocumentType::LeaseAddendum => "lease-addendum",
            DocumentType::HabitabilityNotice => "habitability-notice",
        };
        write!(f, "{}", document_type)
    }
}

impl DocumentType {
    pub const ALL: [DocumentType; 4] = [
        DocumentType::SecurityDepositNotice,
        DocumentType::AccessNotice,
        DocumentType::LeaseAddendum,
        DocumentType::HabitabilityNotice,
    ];

    pub fn from_str(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|document_type| document_type.to_string() == value)
    }

    pub fn label(&self) -> &'static str {
        match self {
            DocumentType::SecurityDepositNotice => "Security Deposit Notice",
            DocumentType::AccessNotice => "48-Hour Access Notice",
            DocumentType::LeaseAddendum => "RTLO Compliance Addendum",
            DocumentType::HabitabilityNotice => "Habitability Notice",
        }
    }
}
