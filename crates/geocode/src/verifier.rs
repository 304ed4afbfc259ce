//! Address verifier
//!
//! Owns the verification policy around the raw providers: expand street
//! abbreviations, query with the city/state hint first (the hint can
//! over-constrain, so a clean miss retries bare), fall through to the
//! secondary provider when one is configured, and collapse every provider
//! error to not-found.

use intake_config::GeocoderConfig;
use intake_core::AddressRecord;
use intake_text_processing::expand_street_abbreviations;

use crate::nominatim::NominatimProvider;
use crate::photon::PhotonProvider;
use crate::provider::GeocodeProvider;
use crate::GeocodeError;

/// Provider-agnostic address verification
pub struct AddressVerifier {
    primary: Box<dyn GeocodeProvider>,
    secondary: Option<Box<dyn GeocodeProvider>>,
}

impl AddressVerifier {
    /// Build a verifier over explicit providers
    pub fn new(
        primary: Box<dyn GeocodeProvider>,
        secondary: Option<Box<dyn GeocodeProvider>>,
    ) -> Self {
        Self { primary, secondary }
    }

    /// Wire providers from settings; `None` when verification is disabled
    pub fn from_config(config: &GeocoderConfig) -> Result<Option<Self>, GeocodeError> {
        if !config.enabled {
            tracing::info!("address verification disabled by configuration");
            return Ok(None);
        }
        let primary: Box<dyn GeocodeProvider> = Box::new(NominatimProvider::new(config)?);
        let secondary: Option<Box<dyn GeocodeProvider>> = if config.secondary_enabled {
            Some(Box::new(PhotonProvider::new(config)?))
        } else {
            None
        };
        Ok(Some(Self::new(primary, secondary)))
    }

    /// Verify one free-text address
    ///
    /// Returns `None` for a clean miss and for any provider failure; the
    /// caller keeps the citizen's raw text either way.
    pub async fn verify(
        &self,
        raw_address: &str,
        city_hint: &str,
        state_hint: &str,
    ) -> Option<AddressRecord> {
        let expanded = expand_street_abbreviations(raw_address);

        let mut providers: Vec<&dyn GeocodeProvider> = vec![self.primary.as_ref()];
        if let Some(secondary) = &self.secondary {
            providers.push(secondary.as_ref());
        }

        for provider in providers {
            match self.query_provider(provider, &expanded, city_hint, state_hint).await {
                Some(record) => {
                    tracing::info!(
                        provider = provider.name(),
                        city = %record.city,
                        "address verified"
                    );
                    return Some(record);
                }
                None => continue,
            }
        }

        tracing::debug!(address = %expanded, "no provider could resolve address");
        None
    }

    /// One provider, hint attempt then bare attempt
    ///
    /// A transport or parse error ends this provider's turn immediately; no
    /// retry of a failed call within the turn.
    async fn query_provider(
        &self,
        provider: &dyn GeocodeProvider,
        expanded: &str,
        city_hint: &str,
        state_hint: &str,
    ) -> Option<AddressRecord> {
        let hinted = compose_hinted_query(expanded, city_hint, state_hint);

        if hinted != expanded {
            match provider.geocode(&hinted).await {
                Ok(Some(record)) => return Some(record),
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!(provider = provider.name(), error = %err, "geocode call failed");
                    return None;
                }
            }
        }

        match provider.geocode(expanded).await {
            Ok(found) => found,
            Err(err) => {
                tracing::warn!(provider = provider.name(), error = %err, "geocode call failed");
                None
            }
        }
    }
}

/// Append non-placeholder city/state hints to the query
fn compose_hinted_query(address: &str, city_hint: &str, state_hint: &str) -> String {
    let mut query = address.to_string();
    for hint in [city_hint, state_hint] {
        let hint = hint.trim();
        if !hint.is_empty() && !hint.to_lowercase().starts_with("your ") {
            query.push_str(", ");
            query.push_str(hint);
        }
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn record(city: &str, provider: &str) -> AddressRecord {
        AddressRecord {
            formatted_address: format!("123 Main Street, {city}"),
            city: city.to_string(),
            state: "North Carolina".to_string(),
            zip: None,
            latitude: 35.0,
            longitude: -78.0,
            provider: provider.to_string(),
        }
    }

    /// Scripted provider: answers in order, counts calls
    struct Scripted {
        name: &'static str,
        responses: Vec<Result<Option<AddressRecord>, GeocodeError>>,
        calls: AtomicUsize,
    }

    impl Scripted {
        fn new(
            name: &'static str,
            responses: Vec<Result<Option<AddressRecord>, GeocodeError>>,
        ) -> Self {
            Self {
                name,
                responses,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl GeocodeProvider for Scripted {
        fn name(&self) -> &str {
            self.name
        }

        async fn geocode(&self, _query: &str) -> Result<Option<AddressRecord>, GeocodeError> {
            let idx = self.calls.fetch_add(1, Ordering::SeqCst);
            match self.responses.get(idx) {
                Some(Ok(value)) => Ok(value.clone()),
                Some(Err(_)) => Err(GeocodeError::BadResponse("scripted failure".to_string())),
                None => Ok(None),
            }
        }
    }

    #[test]
    fn test_hinted_query_composition() {
        assert_eq!(
            compose_hinted_query("123 main street", "Raleigh", "North Carolina"),
            "123 main street, Raleigh, North Carolina"
        );
        // Placeholder hints are dropped, making the hinted query equal the bare one
        assert_eq!(
            compose_hinted_query("123 main street", "Your City", "Your State"),
            "123 main street"
        );
    }

    #[tokio::test]
    async fn test_hint_miss_retries_bare() {
        let provider = Scripted::new(
            "scripted",
            vec![Ok(None), Ok(Some(record("Raleigh", "scripted")))],
        );
        let verifier = AddressVerifier::new(Box::new(provider), None);

        let found = verifier
            .verify("123 Main St", "Raleigh", "North Carolina")
            .await;
        assert_eq!(found.unwrap().city, "Raleigh");
    }

    #[tokio::test]
    async fn test_provider_error_collapses_to_none() {
        let provider = Scripted::new(
            "scripted",
            vec![Err(GeocodeError::BadResponse("boom".to_string()))],
        );
        let verifier = AddressVerifier::new(Box::new(provider), None);

        assert!(verifier
            .verify("123 Main St", "Raleigh", "North Carolina")
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_secondary_consulted_after_primary_miss() {
        let primary = Scripted::new("primary", vec![Ok(None), Ok(None)]);
        let secondary = Scripted::new(
            "secondary",
            vec![Ok(Some(record("Durham", "secondary")))],
        );
        let verifier = AddressVerifier::new(Box::new(primary), Some(Box::new(secondary)));

        let found = verifier
            .verify("456 Oak Ave", "Durham", "North Carolina")
            .await;
        assert_eq!(found.unwrap().provider, "secondary");
    }

    #[tokio::test]
    async fn test_disabled_config_yields_no_verifier() {
        let config = GeocoderConfig {
            enabled: false,
            ..GeocoderConfig::default()
        };
        assert!(AddressVerifier::from_config(&config).unwrap().is_none());
    }
}
