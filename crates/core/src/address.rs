//! Normalized geocoded address records
//!
//! Every geocoding provider response is flattened into [`AddressRecord`]
//! before it reaches the dialogue core, so the core never sees a
//! provider-specific shape.

use serde::{Deserialize, Serialize};

/// A geocoded, provider-normalized address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressRecord {
    /// Full formatted address as matched by the provider
    pub formatted_address: String,
    /// Resolved city (may differ from the session's active city)
    pub city: String,
    /// Resolved state
    pub state: String,
    /// ZIP code, when the provider returns one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    /// Latitude
    pub latitude: f64,
    /// Longitude
    pub longitude: f64,
    /// Name of the provider that produced the match
    pub provider: String,
}

impl AddressRecord {
    /// Short "City, State" label used in switch notices
    pub fn jurisdiction(&self) -> String {
        format!("{}, {}", self.city, self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jurisdiction_label() {
        let record = AddressRecord {
            formatted_address: "123 Main Street, Raleigh, NC 27601".to_string(),
            city: "Raleigh".to_string(),
            state: "North Carolina".to_string(),
            zip: Some("27601".to_string()),
            latitude: 35.78,
            longitude: -78.64,
            provider: "nominatim".to_string(),
        };
        assert_eq!(record.jurisdiction(), "Raleigh, North Carolina");
    }

    #[test]
    fn test_zip_omitted_when_absent() {
        let record = AddressRecord {
            formatted_address: "somewhere".to_string(),
            city: "Durham".to_string(),
            state: "North Carolina".to_string(),
            zip: None,
            latitude: 0.0,
            longitude: 0.0,
            provider: "photon".to_string(),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("zip"));
    }
}
