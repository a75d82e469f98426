use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LegalAidResource {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<&'static str>,
    pub services: &'static [&'static str],
    pub eligibility: &'static str,
}

/// Cook County housing legal-aid organizations, in display order.
pub const LEGAL_AID_DIRECTORY: &[LegalAidResource] = &[
    LegalAidResource {
        id: "erp",
        name: "Early Resolution Program (ERP)",
        description: "Free mediation and legal aid for unrepresented tenants and landlords in eviction court.",
        phone: Some("855-956-5763"),
        website: Some("https://cookcountylegalaid.org"),
        services: &["eviction_assistance", "mediation", "rental_assistance"],
        eligibility: "All Cook County residents",
    },
    LegalAidResource {
        id: "cvls",
        name: "Chicago Volunteer Legal Services",
        description: "Comprehensive legal assistance for low-income Chicago residents facing housing issues.",
        phone: None,
        website: Some("https://cvls.org"),
        services: &["housing_law", "eviction_defense", "landlord_tenant"],
        eligibility: "Low-income residents",
    },
    LegalAidResource {
        id: "legal-aid-chicago",
        name: "Legal Aid Chicago",
        description: "Free civil legal services for residents facing eviction, foreclosure, and housing discrimination.",
        phone: None,
        website: None,
        services: &["eviction_defense", "foreclosure_prevention", "discrimination"],
        eligibility: "Income-qualified residents",
    },
    LegalAidResource {
        id: "lcbh",
        name: "Lawyers' Committee for Better Housing",
        description: "Legal representation and advocacy for tenants facing habitability issues and evictions.",
        phone: None,
        website: None,
        services: &["habitability", "eviction_defense", "housing_advocacy"],
        eligibility: "Tenants with housing issues",
    },
    LegalAidResource {
        id: "cdel",
        name: "Center for Disability & Elder Law",
        description: "Specialized legal services for seniors and individuals with disabilities in housing matters.",
        phone: None,
        website: None,
        services: &["disability_rights", "elder_law", "housing"],
        eligibility: "Seniors and disabled individuals",
    },
    LegalAidResource {
        id: "carpls",
        name: "CARPLS Legal Aid",
        description: "Free legal assistance for housing, family, immigration, and consumer law issues.",
        phone: None,
        website: None,
        services: &["housing", "family_law", "immigration", "consumer_protection"],
        eligibility: "Income-qualified residents",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_keeps_its_order_and_ids() {
        let ids = LEGAL_AID_DIRECTORY.iter().map(|r| r.id).collect::<Vec<_>>();
        assert_eq!(
            ids,
            ["erp", "cvls", "legal-aid-chicago", "lcbh", "cdel", "carpls"]
        );
    }

    #[test]
    fn absent_contact_fields_are_omitted() {
        let json = serde_json::to_value(&LEGAL_AID_DIRECTORY[2]).unwrap();
        assert!(json.get("phone").is_none());
        assert!(json.get("website").is_none());

        let erp = serde_json::to_value(&LEGAL_AID_DIRECTORY[0]).unwrap();
        assert_eq!(erp["phone"], "855-956-5763");
    }
}
