//! City profiles and service descriptors
//!
//! A [`CityProfile`] is the per-session view of one city's reportable
//! services. Profiles are always constructed by deep-copying the catalog
//! template, so mutating one session's profile cannot leak into the shared
//! catalog or another session.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Suffix marking a field as optional in a service's field list
pub const OPTIONAL_SUFFIX: &str = "_optional";

/// Whether a field name is optional by naming convention
pub fn is_optional_field(name: &str) -> bool {
    name.ends_with(OPTIONAL_SUFFIX)
}

/// One reportable issue type for one city
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    /// Human description shown in the menu
    pub description: String,
    /// Declared fields in prompt order; `*_optional` names may be skipped
    pub fields: Vec<String>,
    /// Reference link for the underlying city form
    pub link: String,
    /// Resolution target in business days, when the city publishes one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sla_days: Option<u32>,
}

impl ServiceDescriptor {
    pub fn new(description: impl Into<String>, fields: &[&str], link: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            fields: fields.iter().map(|f| f.to_string()).collect(),
            link: link.into(),
            sla_days: None,
        }
    }

    pub fn with_sla(mut self, days: u32) -> Self {
        self.sla_days = Some(days);
        self
    }
}

/// A frequently-asked-question entry carried on a city profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub topic: String,
    pub answer: String,
}

/// The active city context for one session
///
/// `services` is a `BTreeMap` so menu enumeration is deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityProfile {
    /// City name
    pub city: String,
    /// State name
    pub state: String,
    /// Service key to descriptor, owned by this profile instance
    pub services: BTreeMap<String, ServiceDescriptor>,
    /// Informational entries for the city info surface
    #[serde(default)]
    pub faq: Vec<FaqEntry>,
}

impl CityProfile {
    /// Two-letter uppercase prefix used in ticket ids
    ///
    /// Falls back to `CT` for city names shorter than two characters.
    pub fn ticket_prefix(&self) -> String {
        let prefix: String = self
            .city
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .take(2)
            .collect::<String>()
            .to_uppercase();
        if prefix.len() < 2 {
            "CT".to_string()
        } else {
            prefix
        }
    }

    /// Look up a service descriptor by key
    pub fn service(&self, key: &str) -> Option<&ServiceDescriptor> {
        self.services.get(key)
    }
}
