//! Configuration for the 311 intake agent
//!
//! Two kinds of configuration live here:
//! - Runtime settings loaded from `config/default.toml` plus `INTAKE_`
//!   environment overrides (server binding, geocoder endpoints).
//! - Static domain data: the city service catalog, per-intent required
//!   fields, slot question texts, and the ordered intent keyword table.

pub mod catalog;
pub mod fields;
pub mod intents;
pub mod settings;

pub use catalog::{adapt, known_city, template_state, Catalog};
pub use fields::{question_for, required_fields, SKIP_KEYWORD};
pub use intents::{
    intent_rules, IntentRule, ADAPT_TRIGGER, CANCEL_KEYWORD, GREETING_SET, MENU_KEYWORD,
    RESET_KEYWORDS,
};
pub use settings::{load_settings, GeocoderConfig, ServerConfig, Settings};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
