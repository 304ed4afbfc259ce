//! Runtime settings
//!
//! Loaded from an optional TOML file layered with `INTAKE_` environment
//! variables (double underscore as section separator, e.g.
//! `INTAKE_SERVER__PORT=8080`).

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::ConfigError;

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Geocoder configuration
    #[serde(default)]
    pub geocoder: GeocoderConfig,

    /// City the agent starts in before any adaptation
    #[serde(default = "default_city")]
    pub default_city: String,

    /// State the agent starts in before any adaptation
    #[serde(default = "default_state")]
    pub default_state: String,
}

fn default_city() -> String {
    "Your City".to_string()
}

fn default_state() -> String {
    "Your State".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            geocoder: GeocoderConfig::default(),
            default_city: default_city(),
            default_state: default_state(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind host
    #[serde(default = "default_host")]
    pub host: String,
    /// Bind port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Enforce the configured CORS origin list
    #[serde(default)]
    pub cors_enabled: bool,
    /// Allowed CORS origins when enforcement is on
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8311
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_enabled: false,
            cors_origins: Vec::new(),
        }
    }
}

/// Geocoding provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocoderConfig {
    /// Disable to skip address verification entirely
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Primary provider search endpoint
    #[serde(default = "default_primary_endpoint")]
    pub primary_endpoint: String,
    /// Consult the secondary provider when the primary finds nothing
    #[serde(default)]
    pub secondary_enabled: bool,
    /// Secondary provider search endpoint
    #[serde(default = "default_secondary_endpoint")]
    pub secondary_endpoint: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// User-Agent sent to providers (Nominatim requires one)
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_true() -> bool {
    true
}

fn default_primary_endpoint() -> String {
    "https://nominatim.openstreetmap.org/search".to_string()
}

fn default_secondary_endpoint() -> String {
    "https://photon.komoot.io/api".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    "intake-311/0.1".to_string()
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            primary_endpoint: default_primary_endpoint(),
            secondary_enabled: false,
            secondary_endpoint: default_secondary_endpoint(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

/// Load settings from an optional file plus environment overrides
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    if let Some(path) = path {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }
        builder = builder.add_source(File::from(path));
    } else {
        builder = builder.add_source(File::with_name("config/default").required(false));
    }

    let settings: Settings = builder
        .add_source(Environment::with_prefix("INTAKE").separator("__"))
        .build()?
        .try_deserialize()?;

    if settings.geocoder.timeout_secs == 0 {
        return Err(ConfigError::InvalidValue {
            field: "geocoder.timeout_secs".to_string(),
            message: "timeout must be at least 1 second".to_string(),
        });
    }

    tracing::debug!(
        port = settings.server.port,
        geocoder_enabled = settings.geocoder.enabled,
        "settings loaded"
    );
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8311);
        assert!(settings.geocoder.enabled);
        assert!(!settings.geocoder.secondary_enabled);
        assert_eq!(settings.geocoder.timeout_secs, 10);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let result = load_settings(Some(Path::new("/nonexistent/intake.toml")));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_toml_deserialization() {
        let settings: Settings = toml::from_str(
            r#"
            default_city = "Raleigh"
            default_state = "North Carolina"

            [server]
            port = 9000

            [geocoder]
            secondary_enabled = true
            "#,
        )
        .unwrap();
        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.default_city, "Raleigh");
        assert!(settings.geocoder.secondary_enabled);
        // Untouched sections keep their defaults
        assert_eq!(settings.geocoder.timeout_secs, 10);
    }
}
