//! Per-intent required fields and slot question texts
//!
//! Required-field lists are intent-keyed and city-independent; the catalog
//! only varies the service-declared field lists. Prompt order is required
//! fields first, then remaining declared fields.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Literal the citizen types to skip an optional field
pub const SKIP_KEYWORD: &str = "skip";

/// Required fields for an intent, in prompt order
pub fn required_fields(intent: &str) -> &'static [&'static str] {
    match intent {
        "pothole" => &["street_address", "description"],
        "trash_schedule" => &["street_address"],
        "noise_complaint" => &["incident_time", "location", "description"],
        "streetlight" => &["nearest_address"],
        "stray_animal" => &["location", "animal_type"],
        _ => &[],
    }
}

static FIELD_QUESTIONS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut map = HashMap::new();
    map.insert("street_address", "What is the street address?");
    map.insert("nearest_intersection", "What is the nearest intersection?");
    map.insert("description", "Please describe the issue briefly.");
    map.insert(
        "photo_url_optional",
        "If you have a photo URL, share it (or say 'skip').",
    );
    map.insert("zip_optional", "What is the ZIP code? (or say 'skip')");
    map.insert("incident_time", "When did this happen? (date & time)");
    map.insert(
        "location",
        "Where did this occur? (address, landmark or intersection)",
    );
    map.insert(
        "pole_number_optional",
        "If you see a pole number, share it (or say 'skip').",
    );
    map.insert("nearest_address", "What is the nearest address to the light?");
    map.insert("animal_type", "What kind of animal is it?");
    map.insert(
        "recurring_optional",
        "Has this happened before? (or say 'skip')",
    );
    map
});

/// Canned question for a field, or a synthesized generic prompt
pub fn question_for(field: &str) -> String {
    match FIELD_QUESTIONS.get(field) {
        Some(question) => (*question).to_string(),
        None => format!("Provide {field}:"),
    }
}
