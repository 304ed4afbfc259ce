//! Dialogue controller
//!
//! The top-level state machine: `Idle` (no active intent) and `Collecting`
//! (active intent with outstanding fields). Transition rules per utterance,
//! in priority order:
//!
//! 1. Reset keywords, honored from any state.
//! 2. While collecting, reserved control keywords only: `menu` preserves
//!    the form, `cancel` abandons it. Everything else answers the head
//!    pending field. A bare intent keyword typed mid-form is an answer, not
//!    a command.
//! 3. While idle, classification dispatches the turn.
//!
//! Every turn returns at least one reply; no input can fail the turn.

use std::sync::Arc;

use intake_config::{
    adapt, intent_rules, known_city, template_state, ADAPT_TRIGGER, CANCEL_KEYWORD, GREETING_SET,
    MENU_KEYWORD, RESET_KEYWORDS,
};
use intake_core::{AddressRecord, FieldValue};
use intake_geocode::AddressVerifier;
use intake_persistence::TicketStore;
use intake_text_processing::{normalize, ClassifierRule, IntentClassifier, IntentTag};

use crate::finalizer;
use crate::session::Session;
use crate::slots::{self, AnswerOutcome};

const FALLBACK_CITY: &str = "Your City";
const FALLBACK_STATE: &str = "Your State";

/// Top-level dialogue state machine
pub struct DialogueController {
    classifier: IntentClassifier,
    verifier: Option<AddressVerifier>,
    store: Arc<dyn TicketStore>,
}

impl DialogueController {
    /// Build a controller over the configured intent table
    ///
    /// `verifier` is `None` when address verification is disabled; slot
    /// filling proceeds without the side channel.
    pub fn new(verifier: Option<AddressVerifier>, store: Arc<dyn TicketStore>) -> Self {
        let rules = intent_rules()
            .iter()
            .map(|rule| {
                ClassifierRule::new(rule.key, rule.keywords)
            })
            .collect();
        Self {
            classifier: IntentClassifier::new(rules, ADAPT_TRIGGER, GREETING_SET),
            verifier,
            store,
        }
    }

    /// Opening message for a fresh session
    pub fn greeting(&self) -> String {
        "Hi! I'm your 311 assistant. Type `menu` to see what I can do.".to_string()
    }

    /// Handle one utterance, returning the ordered reply sequence
    pub async fn process(&self, session: &mut Session, utterance: &str) -> Vec<String> {
        session.record_user(utterance);
        let command = normalize(utterance);

        let replies = if RESET_KEYWORDS.contains(&command.as_str()) {
            session.clear_form();
            vec!["Okay, starting over. Type `menu` to see what I can do.".to_string()]
        } else if session.is_collecting() {
            self.handle_collecting(session, utterance, &command).await
        } else {
            self.handle_idle(session, utterance).await
        };

        for reply in &replies {
            session.record_assistant(reply);
        }
        replies
    }

    /// Collecting state: reserved keywords first, otherwise an answer
    async fn handle_collecting(
        &self,
        session: &mut Session,
        utterance: &str,
        command: &str,
    ) -> Vec<String> {
        if command == MENU_KEYWORD {
            let mut replies = vec![self.menu(session)];
            if let Some(question) = slots::next_prompt(session) {
                replies.push(format!("Back to your request: {question}"));
            }
            return replies;
        }

        if command == CANCEL_KEYWORD {
            let label = session
                .active_intent
                .clone()
                .unwrap_or_default()
                .replace('_', " ");
            session.clear_form();
            tracing::debug!(session = %session.id, "form canceled");
            return vec![format!(
                "Canceled the {label} request. Nothing was submitted. Type `menu` to see options."
            )];
        }

        self.handle_answer(session, utterance).await
    }

    /// Store the answer, run verification for address fields, then either
    /// ask the next question or finalize
    async fn handle_answer(&self, session: &mut Session, utterance: &str) -> Vec<String> {
        let mut replies = Vec::new();

        match slots::accept_answer(session, utterance) {
            AnswerOutcome::Rejected { reprompt } => return vec![reprompt],
            AnswerOutcome::Stored { field } => {
                if slots::is_address_field(&field) {
                    replies.extend(self.verify_address(session, &field).await);
                }
            }
        }

        match slots::next_prompt(session) {
            Some(question) => replies.push(question),
            None => {
                let (_, confirmation) =
                    finalizer::finalize(session, self.store.as_ref()).await;
                session.clear_form();
                replies.push(confirmation);
            }
        }
        replies
    }

    /// Address-verification side channel
    ///
    /// Success upgrades the stored value to the verified record and may
    /// switch the city profile; failure keeps the free text and only adds a
    /// non-blocking warning.
    async fn verify_address(&self, session: &mut Session, field: &str) -> Vec<String> {
        let Some(verifier) = &self.verifier else {
            return Vec::new();
        };
        let Some(raw) = session
            .filled_fields
            .get(field)
            .and_then(|v| v.as_text())
            .map(str::to_string)
        else {
            return Vec::new();
        };

        let city = session.city_profile.city.clone();
        let state = session.city_profile.state.clone();

        match verifier.verify(&raw, &city, &state).await {
            Some(record) => {
                let mut replies = vec![format!(
                    "Matched address: {} (via {}).",
                    record.formatted_address, record.provider
                )];
                if let Some(notice) = switch_city_if_needed(session, &record) {
                    replies.push(notice);
                }
                session
                    .filled_fields
                    .insert(field.to_string(), FieldValue::Verified(record));
                replies
            }
            None => vec![
                "I couldn't verify that address, so I'll keep it exactly as you typed it."
                    .to_string(),
            ],
        }
    }

    /// Idle state: classify and dispatch
    async fn handle_idle(&self, session: &mut Session, utterance: &str) -> Vec<String> {
        match self.classifier.classify(utterance) {
            IntentTag::Menu => vec![self.menu(session)],
            IntentTag::AdaptCity => {
                let (city, state) = parse_adapt_request(utterance);
                session.city_profile = adapt(&city, &state);
                tracing::info!(city = %city, state = %state, "city profile adapted by request");
                vec![format!(
                    "Adapted to {city}, {state}. Type `menu` to see services."
                )]
            }
            IntentTag::Service(key) if session.city_profile.services.contains_key(&key) => {
                self.open_service(session, &key)
            }
            IntentTag::Service(_) | IntentTag::Unknown => vec![self.fallback()],
        }
    }

    /// Start a form for `key`, or answer directly for zero-field services
    fn open_service(&self, session: &mut Session, key: &str) -> Vec<String> {
        session.active_intent = Some(key.to_string());
        session.filled_fields.clear();

        match slots::next_prompt(session) {
            Some(question) => {
                tracing::debug!(session = %session.id, intent = %key, "form opened");
                vec![
                    format!("Okay, let's file a {} request.", key.replace('_', " ")),
                    question,
                ]
            }
            None => {
                let reply = match session.city_profile.service(key) {
                    Some(svc) => format!(
                        "{} — {}\n\nMore info: {}\n\nType `menu` for other options.",
                        title_case(&key.replace('_', " ")),
                        svc.description,
                        svc.link
                    ),
                    None => self.fallback(),
                };
                session.clear_form();
                vec![reply]
            }
        }
    }

    /// Enumerate every service configured for the active city
    fn menu(&self, session: &Session) -> String {
        let bullets = session
            .city_profile
            .services
            .iter()
            .map(|(key, svc)| format!("- {key} — {}", svc.description))
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            "I can help with:\n{bullets}\n\n\
             Try: 'Report a pothole', 'Trash pickup day', 'Noise complaint', \
             'Streetlight out', 'Stray dog', or 'General info'."
        )
    }

    fn fallback(&self) -> String {
        "I'm not sure I understood. Type `menu` to see options, \
         or say 'Report a pothole' or 'Trash pickup day'."
            .to_string()
    }
}

/// Switch the session's profile when a verified address resolves to another
/// catalog city in the expected jurisdiction
///
/// The expected state is the session's, except for the initial placeholder
/// profile where the catalog template is authoritative.
fn switch_city_if_needed(session: &mut Session, record: &AddressRecord) -> Option<String> {
    if record.city.is_empty() {
        return None;
    }
    if normalize(&record.city) == normalize(&session.city_profile.city) {
        return None;
    }
    if !known_city(&record.city) {
        return None;
    }

    let expected_state = if normalize(&session.city_profile.state) == normalize(FALLBACK_STATE) {
        template_state(&record.city)?
    } else {
        session.city_profile.state.clone()
    };
    if normalize(&record.state) != normalize(&expected_state) {
        return None;
    }

    session.city_profile = adapt(&record.city, &record.state);
    tracing::info!(city = %record.city, "city profile switched by verified address");
    Some(format!(
        "Your address resolved to {}, so I've switched this conversation to {} services.",
        record.jurisdiction(),
        record.city
    ))
}

/// Best-effort parse of `"name is X in the state Y"`
///
/// Falls back to placeholder city/state rather than failing the turn.
fn parse_adapt_request(utterance: &str) -> (String, String) {
    let text = normalize(utterance);

    if let Some((_, rest)) = text.split_once("name is") {
        if let Some((city, state)) = rest.split_once("in the state") {
            let city = title_case(trim_punct(city));
            let state = title_case(trim_punct(state));
            if !city.is_empty() && !state.is_empty() {
                return (city, state);
            }
        }
    }

    tracing::debug!("adapt request did not match the expected phrase, using placeholders");
    (FALLBACK_CITY.to_string(), FALLBACK_STATE.to_string())
}

fn trim_punct(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_whitespace() || matches!(c, '.' | ',' | ':' | ';'))
}

fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().chain(chars).collect(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_adapt_request() {
        let (city, state) = parse_adapt_request(
            "Yes please adapt this to my city's open data and services categories. \
             My city's name is Springfield in the state Illinois.",
        );
        assert_eq!(city, "Springfield");
        assert_eq!(state, "Illinois");
    }

    #[test]
    fn test_parse_adapt_request_multiword() {
        let (city, state) =
            parse_adapt_request("my city's name is winston salem in the state north carolina");
        assert_eq!(city, "Winston Salem");
        assert_eq!(state, "North Carolina");
    }

    #[test]
    fn test_parse_adapt_request_fallback() {
        let (city, state) = parse_adapt_request("adapt this to my city please");
        assert_eq!(city, "Your City");
        assert_eq!(state, "Your State");

        // Pattern present but empty segments
        let (city, state) = parse_adapt_request("name is in the state");
        assert_eq!(city, "Your City");
        assert_eq!(state, "Your State");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("north carolina"), "North Carolina");
        assert_eq!(title_case("general info"), "General Info");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_switch_requires_catalog_city_and_state() {
        let mut session = Session::new("s-1", adapt("Raleigh", "North Carolina"));

        let record = |city: &str, state: &str| AddressRecord {
            formatted_address: format!("1 Test Street, {city}"),
            city: city.to_string(),
            state: state.to_string(),
            zip: None,
            latitude: 0.0,
            longitude: 0.0,
            provider: "test".to_string(),
        };

        // Same city: no switch
        assert!(switch_city_if_needed(&mut session, &record("Raleigh", "North Carolina")).is_none());
        // Unknown city: no switch
        assert!(switch_city_if_needed(&mut session, &record("Springfield", "North Carolina")).is_none());
        // Known city, wrong state: no switch
        assert!(switch_city_if_needed(&mut session, &record("Durham", "Virginia")).is_none());
        // Known city, matching state: switch
        let notice = switch_city_if_needed(&mut session, &record("Durham", "North Carolina"));
        assert!(notice.is_some());
        assert_eq!(session.city_profile.city, "Durham");
    }

    #[test]
    fn test_switch_from_placeholder_profile_uses_catalog_state() {
        let mut session = Session::new("s-1", adapt("Your City", "Your State"));
        let record = AddressRecord {
            formatted_address: "2 Town Hall Drive, Morrisville".to_string(),
            city: "Morrisville".to_string(),
            state: "North Carolina".to_string(),
            zip: Some("27560".to_string()),
            latitude: 35.82,
            longitude: -78.83,
            provider: "test".to_string(),
        };
        assert!(switch_city_if_needed(&mut session, &record).is_some());
        assert_eq!(session.city_profile.city, "Morrisville");
        assert_eq!(session.city_profile.state, "North Carolina");
    }
}
