use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum PropertyType {
    SingleFamily,
    MultiUnit,
    Condo,
    Townhome,
    Apartment,
}

impl Display for PropertyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let property_type = match self {
            PropertyType::SingleFamily => "single-family",
            PropertyType::MultiUnit => "multi-unit",
            PropertyType::Condo => "condo",
            PropertyType::Townhome => "townhome",
            PropertyType::Apartment => "apartment",
        };
        write!(f, "{}", property_type)
    }
}

impl PropertyType {
    pub const ALL: [PropertyType; 5] = [
        PropertyType::SingleFamily,
        PropertyType::MultiUnit,
        PropertyType::Condo,
        PropertyType::Townhome,
        PropertyType::Apartment,
    ];

    pub fn from_str(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|property_type| property_type.to_string() == value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_display_value_back() {
        for property_type in PropertyType::ALL {
            assert_eq!(
                PropertyType::from_str(&property_type.to_string()),
                Some(property_type)
            );
        }
        assert_eq!(PropertyType::from_str("hotel"), None);
    }
}
