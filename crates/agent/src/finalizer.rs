//! Ticket finalization
//!
//! Assembles the completed field map into a [`Ticket`], attaches derived
//! annotations (state-highway advisory, best-effort trash pickup day),
//! hands the ticket to persistence, and builds the confirmation reply.

use chrono::Utc;
use rand::Rng;
use std::collections::BTreeMap;

use intake_core::{FieldValue, Ticket};
use intake_persistence::TicketStore;
use intake_text_processing::normalize;

use crate::session::Session;
use crate::slots::ADDRESS_FIELDS;

/// Intents whose address field is checked for state-route indicators
const HIGHWAY_CHECKED_INTENTS: &[&str] = &["pothole", "streetlight"];

/// Substrings marking a state-maintained route in a padded, normalized address
const HIGHWAY_TOKENS: &[&str] = &[" i-", " us-", " nc-", " interstate ", " highway ", " hwy "];

/// Street keyword to pickup day; demo-grade heuristic, not authoritative
const PICKUP_DAYS: &[(&str, &str)] = &[
    ("main", "Monday"),
    ("oak", "Tuesday"),
    ("elm", "Wednesday"),
    ("maple", "Thursday"),
    ("pine", "Friday"),
];

/// Attempts at a fresh id before accepting a possible collision
const ID_ATTEMPTS: u32 = 5;

/// Finalize the active form into a ticket and a confirmation reply
///
/// The ticket is upserted into the store fire-and-forget: a write failure
/// is logged and never blocks the reply. The caller clears the form state.
pub async fn finalize(session: &mut Session, store: &dyn TicketStore) -> (Ticket, String) {
    let intent = session
        .active_intent
        .clone()
        .unwrap_or_else(|| "general_info".to_string());
    let profile = &session.city_profile;

    let ticket_id = allocate_ticket_id(&profile.ticket_prefix(), store).await;

    let mut payload: BTreeMap<String, FieldValue> = session
        .filled_fields
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    annotate(&intent, &mut payload);

    let ticket = Ticket {
        ticket_id: ticket_id.clone(),
        service: intent.clone(),
        city: profile.city.clone(),
        state: profile.state.clone(),
        payload,
        created_at: Utc::now(),
    };

    if let Err(err) = store.upsert(&ticket).await {
        tracing::warn!(ticket_id = %ticket_id, error = %err, "ticket persistence failed");
    }
    session.ticket_log.push(ticket.clone());
    tracing::info!(ticket_id = %ticket_id, service = %intent, "ticket finalized");

    let reply = confirmation_reply(session, &ticket);
    (ticket, reply)
}

/// Generate an id, retrying against the store on collision
///
/// The `{prefix}-{yymmdd}-{4 digits}` scheme is demo-grade: after the
/// bounded retries uniqueness is probabilistic and the last candidate is
/// accepted with a warning.
async fn allocate_ticket_id(prefix: &str, store: &dyn TicketStore) -> String {
    let mut candidate = make_ticket_id(prefix);
    for _ in 0..ID_ATTEMPTS {
        match store.contains(&candidate).await {
            Ok(false) => return candidate,
            Ok(true) => {
                tracing::debug!(ticket_id = %candidate, "ticket id collision, regenerating");
                candidate = make_ticket_id(prefix);
            }
            Err(err) => {
                tracing::warn!(error = %err, "collision check unavailable, accepting id");
                return candidate;
            }
        }
    }
    tracing::warn!(ticket_id = %candidate, "accepting ticket id after repeated collisions");
    candidate
}

fn make_ticket_id(prefix: &str) -> String {
    let date = Utc::now().format("%y%m%d");
    let suffix: u32 = rand::thread_rng().gen_range(1000..10000);
    format!("{prefix}-{date}-{suffix}")
}

/// Attach derived annotations to the payload
fn annotate(intent: &str, payload: &mut BTreeMap<String, FieldValue>) {
    if HIGHWAY_CHECKED_INTENTS.contains(&intent) {
        if let Some(address) = first_address_text(payload) {
            if looks_like_state_route(&address) {
                payload.insert(
                    "maintenance_note".to_string(),
                    FieldValue::Text(
                        "This location may be on a state-maintained route; \
                         the state DOT may handle repairs. Advisory only."
                            .to_string(),
                    ),
                );
            }
        }
    }

    if intent == "trash_schedule" {
        if let Some(address) = first_address_text(payload) {
            if let Some(day) = estimate_pickup_day(&address) {
                payload.insert(
                    "estimated_pickup_day".to_string(),
                    FieldValue::Text(format!("{day} (best-effort estimate)")),
                );
            }
        }
    }
}

/// Text of the first filled address-bearing field
fn first_address_text(payload: &BTreeMap<String, FieldValue>) -> Option<String> {
    ADDRESS_FIELDS
        .iter()
        .find_map(|f| payload.get(*f))
        .and_then(|v| v.as_text())
        .map(|s| s.to_string())
}

/// Pad with spaces so tokens match at string boundaries too
fn looks_like_state_route(address: &str) -> bool {
    let padded = format!(" {} ", normalize(address));
    HIGHWAY_TOKENS.iter().any(|t| padded.contains(t))
}

fn estimate_pickup_day(address: &str) -> Option<&'static str> {
    let normalized = normalize(address);
    PICKUP_DAYS
        .iter()
        .find(|(keyword, _)| normalized.contains(keyword))
        .map(|(_, day)| *day)
}

/// Confirmation shown to the citizen after submission
fn confirmation_reply(session: &Session, ticket: &Ticket) -> String {
    let service_label = ticket.service.replace('_', " ");
    let payload_json =
        serde_json::to_string(&ticket.payload).unwrap_or_else(|_| "{}".to_string());

    let mut reply = format!(
        "Submitted your {service_label} request.\n\
         - Ticket ID: {}\n\
         - City: {}, {}\n\
         - Intake fields: {payload_json}\n",
        ticket.ticket_id, ticket.city, ticket.state
    );

    if let Some(svc) = session.city_profile.service(&ticket.service) {
        reply.push_str(&format!("- Reference: {}\n", svc.link));
        if let Some(days) = svc.sla_days {
            reply.push_str(&format!(
                "- Estimated resolution target: ~{days} business days\n"
            ));
        }
    }

    reply.push_str("\nAnything else I can do? Type `menu` to see options.");
    reply
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_persistence::InMemoryTicketStore;
    use once_cell::sync::Lazy;
    use regex::Regex;

    static TICKET_ID: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^[A-Z]{2}-\d{6}-\d{4}$").unwrap());

    fn collecting_session(intent: &str) -> Session {
        let mut s = Session::new("s-1", intake_config::adapt("Raleigh", "North Carolina"));
        s.active_intent = Some(intent.to_string());
        s
    }

    #[tokio::test]
    async fn test_ticket_id_format() {
        let store = InMemoryTicketStore::new();
        let mut s = collecting_session("pothole");
        s.filled_fields.insert(
            "street_address".to_string(),
            FieldValue::Text("123 Main St".to_string()),
        );

        let (ticket, reply) = finalize(&mut s, &store).await;
        assert!(TICKET_ID.is_match(&ticket.ticket_id), "{}", ticket.ticket_id);
        assert!(ticket.ticket_id.starts_with("RA-"));
        assert!(reply.contains(&ticket.ticket_id));
        assert!(reply.contains("Raleigh, North Carolina"));
    }

    #[tokio::test]
    async fn test_ticket_persisted_and_logged() {
        let store = InMemoryTicketStore::new();
        let mut s = collecting_session("stray_animal");

        let (ticket, _) = finalize(&mut s, &store).await;
        assert!(store.contains(&ticket.ticket_id).await.unwrap());
        assert_eq!(s.ticket_log.len(), 1);
        assert_eq!(s.ticket_log[0].ticket_id, ticket.ticket_id);
    }

    #[tokio::test]
    async fn test_highway_advisory_attached() {
        let store = InMemoryTicketStore::new();
        let mut s = collecting_session("pothole");
        s.filled_fields.insert(
            "street_address".to_string(),
            FieldValue::Text("Exit ramp off I-40 near mile 293".to_string()),
        );

        let (ticket, _) = finalize(&mut s, &store).await;
        assert!(ticket.payload.contains_key("maintenance_note"));
    }

    #[tokio::test]
    async fn test_highway_advisory_not_attached_for_city_street() {
        let store = InMemoryTicketStore::new();
        let mut s = collecting_session("pothole");
        s.filled_fields.insert(
            "street_address".to_string(),
            FieldValue::Text("123 Maple Court".to_string()),
        );

        let (ticket, _) = finalize(&mut s, &store).await;
        assert!(!ticket.payload.contains_key("maintenance_note"));
    }

    #[tokio::test]
    async fn test_highway_advisory_only_for_checked_intents() {
        let store = InMemoryTicketStore::new();
        let mut s = collecting_session("noise_complaint");
        s.filled_fields.insert(
            "location".to_string(),
            FieldValue::Text("rest stop on US-70".to_string()),
        );

        let (ticket, _) = finalize(&mut s, &store).await;
        assert!(!ticket.payload.contains_key("maintenance_note"));
    }

    #[tokio::test]
    async fn test_pickup_day_estimate() {
        let store = InMemoryTicketStore::new();
        let mut s = collecting_session("trash_schedule");
        s.filled_fields.insert(
            "street_address".to_string(),
            FieldValue::Text("456 Oak Avenue".to_string()),
        );

        let (ticket, _) = finalize(&mut s, &store).await;
        assert_eq!(
            ticket.payload.get("estimated_pickup_day"),
            Some(&FieldValue::Text("Tuesday (best-effort estimate)".to_string()))
        );
    }

    #[tokio::test]
    async fn test_no_pickup_estimate_for_unknown_street() {
        let store = InMemoryTicketStore::new();
        let mut s = collecting_session("trash_schedule");
        s.filled_fields.insert(
            "street_address".to_string(),
            FieldValue::Text("9 Zinfandel Way".to_string()),
        );

        let (ticket, _) = finalize(&mut s, &store).await;
        assert!(!ticket.payload.contains_key("estimated_pickup_day"));
    }

    #[tokio::test]
    async fn test_sla_in_confirmation() {
        let store = InMemoryTicketStore::new();
        let mut s = collecting_session("pothole");
        let (_, reply) = finalize(&mut s, &store).await;
        assert!(reply.contains("~5 business days"));
        assert!(reply.contains("https://example.org/forms/pothole"));
    }

    #[test]
    fn test_state_route_tokens() {
        assert!(looks_like_state_route("I-40 at exit 283"));
        assert!(looks_like_state_route("pole on US-64 shoulder"));
        assert!(looks_like_state_route("NC-54 near the bridge"));
        assert!(looks_like_state_route("along the highway"));
        assert!(!looks_like_state_route("123 Main Street"));
        // "hwy" must be a whole word, not a fragment
        assert!(!looks_like_state_route("Hwyard Lane"));
    }
}
