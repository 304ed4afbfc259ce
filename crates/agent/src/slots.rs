//! Slot-filling engine
//!
//! Computes the outstanding fields for the active intent and accepts one
//! answer at a time. `pending_fields` is recomputed from scratch on every
//! call rather than patched incrementally, so the order can never drift
//! when `filled_fields` changes between computations.

use once_cell::sync::Lazy;
use regex::Regex;

use intake_config::{question_for, required_fields, SKIP_KEYWORD};
use intake_core::{is_optional_field, FieldValue};
use intake_text_processing::normalize;

use crate::session::Session;

/// Fields whose answers carry a street address and trigger verification
pub const ADDRESS_FIELDS: &[&str] = &["street_address", "nearest_address", "location"];

/// Whether a field's answer should be run through address verification
pub fn is_address_field(name: &str) -> bool {
    ADDRESS_FIELDS.contains(&name)
}

/// Whether a field holds a ZIP code, by naming convention
pub fn is_zip_field(name: &str) -> bool {
    name == "zip" || name.starts_with("zip_")
}

static ZIP_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{5}$").unwrap());

/// Exactly five digits
pub fn valid_zip(value: &str) -> bool {
    ZIP_PATTERN.is_match(value)
}

/// Recompute `pending_fields` for the session's active intent
///
/// Order is required fields first (in required-list order), then declared
/// service fields not already in the required list, each filtered against
/// `filled_fields`. Deterministic: the same remaining fields always produce
/// the same order.
pub fn recompute_pending(session: &mut Session) {
    let Some(intent) = session.active_intent.clone() else {
        session.pending_fields.clear();
        return;
    };

    let required = required_fields(&intent);
    let declared = session
        .city_profile
        .service(&intent)
        .map(|svc| svc.fields.clone())
        .unwrap_or_default();

    let mut ordered: Vec<String> = required
        .iter()
        .filter(|f| !session.filled_fields.contains_key(**f))
        .map(|f| f.to_string())
        .collect();
    ordered.extend(
        declared
            .into_iter()
            .filter(|f| !required.contains(&f.as_str()))
            .filter(|f| !session.filled_fields.contains_key(f)),
    );

    session.pending_fields = ordered;
}

/// Prompt for the head outstanding field, or `None` when the form is done
pub fn next_prompt(session: &mut Session) -> Option<String> {
    session.active_intent.as_ref()?;
    recompute_pending(session);
    session.pending_fields.first().map(|f| question_for(f))
}

/// Result of offering one utterance as a field answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// Value stored for the named field
    Stored { field: String },
    /// Malformed structured input; re-ask without storing
    Rejected { reprompt: String },
}

/// Store `raw` as the answer to the head pending field
///
/// The skip keyword is honored only for optional-marked fields; for a
/// required field it is stored literally. ZIP-typed fields must be exactly
/// five digits or the answer is rejected with a corrective re-prompt.
pub fn accept_answer(session: &mut Session, raw: &str) -> AnswerOutcome {
    let field = match session.pending_fields.first() {
        Some(field) => field.clone(),
        None => {
            // Nothing pending; recompute will settle the state
            recompute_pending(session);
            return AnswerOutcome::Rejected {
                reprompt: "I wasn't expecting an answer right now. Type `menu` to see options."
                    .to_string(),
            };
        }
    };

    let trimmed = raw.trim();

    if normalize(trimmed) == SKIP_KEYWORD && is_optional_field(&field) {
        session.filled_fields.insert(field.clone(), FieldValue::Skipped);
        tracing::debug!(field = %field, "optional field skipped");
        return AnswerOutcome::Stored { field };
    }

    if is_zip_field(&field) && !valid_zip(trimmed) {
        return AnswerOutcome::Rejected {
            reprompt: format!(
                "That doesn't look like a 5-digit ZIP code. {}",
                question_for(&field)
            ),
        };
    }

    session
        .filled_fields
        .insert(field.clone(), FieldValue::Text(trimmed.to_string()));
    AnswerOutcome::Stored { field }
}
