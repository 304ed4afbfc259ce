//! City service catalog
//!
//! Static templates keyed by known city names, with a default template used
//! for any unrecognized city. [`adapt`] always deep-copies the resolved
//! service map into a fresh [`CityProfile`], so one session's profile can be
//! mutated without touching the templates or any other session.

use once_cell::sync::Lazy;
use std::collections::BTreeMap;

use intake_core::{CityProfile, FaqEntry, ServiceDescriptor};

/// Catalog handle; all lookups go through associated functions
pub struct Catalog;

fn base_services() -> BTreeMap<String, ServiceDescriptor> {
    let mut services = BTreeMap::new();
    services.insert(
        "pothole".to_string(),
        ServiceDescriptor::new(
            "Report a pothole or road surface issue",
            &[
                "street_address",
                "nearest_intersection",
                "description",
                "photo_url_optional",
            ],
            "https://example.org/forms/pothole",
        )
        .with_sla(5),
    );
    services.insert(
        "trash_schedule".to_string(),
        ServiceDescriptor::new(
            "Find trash & recycling pickup day",
            &["street_address", "zip_optional"],
            "https://example.org/trash-schedule",
        ),
    );
    services.insert(
        "noise_complaint".to_string(),
        ServiceDescriptor::new(
            "Report excessive noise",
            &["incident_time", "location", "description"],
            "https://example.org/forms/noise",
        ),
    );
    services.insert(
        "streetlight".to_string(),
        ServiceDescriptor::new(
            "Report a streetlight outage",
            &["pole_number_optional", "nearest_address", "description"],
            "https://example.org/forms/streetlight",
        )
        .with_sla(7),
    );
    services.insert(
        "stray_animal".to_string(),
        ServiceDescriptor::new(
            "Report a stray or lost animal",
            &["location", "animal_type", "description"],
            "https://example.org/forms/animal",
        ),
    );
    services.insert(
        "general_info".to_string(),
        ServiceDescriptor::new(
            "Hours, phone numbers, permits, parks, and other info",
            &[],
            "https://example.org/city-info",
        ),
    );
    services
}

fn base_faq() -> Vec<FaqEntry> {
    vec![
        FaqEntry {
            topic: "Emergencies".to_string(),
            answer: "Call 911. For non-emergencies, use your local non-emergency line."
                .to_string(),
        },
        FaqEntry {
            topic: "Town Hall hours".to_string(),
            answer: "Mon-Fri, typical business hours (see city website).".to_string(),
        },
        FaqEntry {
            topic: "Bulk pickup".to_string(),
            answer: "Usually by scheduled request; check your sanitation portal.".to_string(),
        },
    ]
}

fn template(city: &str, state: &str, services: BTreeMap<String, ServiceDescriptor>) -> CityProfile {
    CityProfile {
        city: city.to_string(),
        state: state.to_string(),
        services,
        faq: base_faq(),
    }
}

/// Known-city templates, keyed by lowercased city name
static TEMPLATES: Lazy<BTreeMap<String, CityProfile>> = Lazy::new(|| {
    let mut map = BTreeMap::new();

    map.insert(
        "raleigh".to_string(),
        template("Raleigh", "North Carolina", base_services()),
    );

    // Durham declares an extra optional slot on noise complaints
    let mut durham = base_services();
    if let Some(noise) = durham.get_mut("noise_complaint") {
        noise.fields.push("recurring_optional".to_string());
    }
    map.insert(
        "durham".to_string(),
        template("Durham", "North Carolina", durham),
    );

    map.insert(
        "cary".to_string(),
        template("Cary", "North Carolina", base_services()),
    );
    map.insert(
        "morrisville".to_string(),
        template("Morrisville", "North Carolina", base_services()),
    );

    map
});

/// Whether `city` has a dedicated template in the catalog
pub fn known_city(city: &str) -> bool {
    TEMPLATES.contains_key(city.trim().to_lowercase().as_str())
}

/// State a known city belongs to, per its template
pub fn template_state(city: &str) -> Option<String> {
    TEMPLATES
        .get(city.trim().to_lowercase().as_str())
        .map(|t| t.state.clone())
}

/// Construct a fresh profile for `city`/`state`
///
/// Known cities resolve to their own template; anything else gets the
/// default service set. The returned profile owns an independent copy of the
/// service map.
pub fn adapt(city: &str, state: &str) -> CityProfile {
    let key = city.trim().to_lowercase();
    let mut profile = match TEMPLATES.get(key.as_str()) {
        Some(template) => template.clone(),
        None => {
            tracing::debug!(city = %city, "no catalog template, using default service set");
            template(city, state, base_services())
        }
    };
    profile.city = city.trim().to_string();
    profile.state = state.trim().to_string();
    profile
}

impl Catalog {
    /// Service map for `city` (default set for unrecognized cities)
    pub fn lookup(city: &str) -> BTreeMap<String, ServiceDescriptor> {
        adapt(city, "").services
    }
}
