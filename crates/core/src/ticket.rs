//! Finalized service-request tickets

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::address::AddressRecord;

/// Value of one collected field
///
/// Serializes untagged: a skipped optional field becomes JSON `null`, free
/// text becomes a string, and a verified address becomes the full record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Optional field the citizen explicitly skipped
    Skipped,
    /// Answer stored as typed
    Text(String),
    /// Address answer upgraded by successful verification
    Verified(AddressRecord),
}

impl FieldValue {
    /// Free-text view of the value, regardless of variant
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Skipped => None,
            FieldValue::Text(s) => Some(s),
            FieldValue::Verified(record) => Some(&record.formatted_address),
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, FieldValue::Skipped)
    }
}

/// A finalized, immutable service request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    /// Id in the form `{CITY_PREFIX}-{yymmdd}-{4 digits}`
    pub ticket_id: String,
    /// Service key this ticket was filed under
    pub service: String,
    /// City at finalization time
    pub city: String,
    /// State at finalization time
    pub state: String,
    /// Collected fields plus finalizer annotations
    pub payload: BTreeMap<String, FieldValue>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Ticket {
    /// Creation timestamp as ISO-8601 with seconds precision
    pub fn created_at_iso(&self) -> String {
        self.created_at.format("%Y-%m-%dT%H:%M:%S").to_string()
    }
}
