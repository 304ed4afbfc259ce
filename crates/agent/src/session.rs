//! Caller-owned session state
//!
//! One [`Session`] per citizen interaction, created at first contact and
//! passed into every controller call. There is no hidden global: the caller
//! keeps the session across turns and discards it on reset or disconnect.
//! Distinct sessions share nothing mutable.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use intake_core::{CityProfile, FieldValue, Ticket, Turn, TurnRole};

/// Mutable state of one conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Caller-assigned id
    pub id: String,
    /// Active city context; replaced wholesale on adapt or address switch
    pub city_profile: CityProfile,
    /// Append-only message history
    pub transcript: Vec<Turn>,
    /// Service key while a form is in progress
    pub active_intent: Option<String>,
    /// Outstanding fields, recomputed every turn
    pub pending_fields: Vec<String>,
    /// Collected answers for the active form
    pub filled_fields: HashMap<String, FieldValue>,
    /// Tickets finalized in this session, oldest first
    pub ticket_log: Vec<Ticket>,
}

impl Session {
    /// Create a fresh session on the given city profile
    pub fn new(id: impl Into<String>, city_profile: CityProfile) -> Self {
        Self {
            id: id.into(),
            city_profile,
            transcript: Vec::new(),
            active_intent: None,
            pending_fields: Vec::new(),
            filled_fields: HashMap::new(),
            ticket_log: Vec::new(),
        }
    }

    /// Whether a multi-turn form is in progress
    pub fn is_collecting(&self) -> bool {
        self.active_intent.is_some() && !self.pending_fields.is_empty()
    }

    /// Drop the in-progress form, keeping transcript and ticket log
    pub fn clear_form(&mut self) {
        self.active_intent = None;
        self.pending_fields.clear();
        self.filled_fields.clear();
    }

    /// Append a citizen turn to the transcript
    pub fn record_user(&mut self, content: impl Into<String>) {
        self.transcript.push(Turn::user(content));
    }

    /// Append an agent turn to the transcript
    pub fn record_assistant(&mut self, content: impl Into<String>) {
        self.transcript.push(Turn::assistant(content));
    }

    /// Number of turns with the given role
    pub fn turn_count(&self, role: TurnRole) -> usize {
        self.transcript.iter().filter(|t| t.role == role).count()
    }
}
