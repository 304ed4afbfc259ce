//! OSM Nominatim provider (primary)

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use intake_config::GeocoderConfig;
use intake_core::AddressRecord;

use crate::provider::GeocodeProvider;
use crate::GeocodeError;

/// Nominatim search provider
pub struct NominatimProvider {
    client: reqwest::Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    display_name: String,
    lat: String,
    lon: String,
    #[serde(default)]
    address: NominatimAddress,
}

#[derive(Debug, Default, Deserialize)]
struct NominatimAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    hamlet: Option<String>,
    state: Option<String>,
    postcode: Option<String>,
}

impl NominatimAddress {
    /// Nominatim reports the locality under different keys by place size
    fn locality(&self) -> Option<&str> {
        self.city
            .as_deref()
            .or(self.town.as_deref())
            .or(self.village.as_deref())
            .or(self.hamlet.as_deref())
    }
}

impl NominatimProvider {
    pub fn new(config: &GeocoderConfig) -> Result<Self, GeocodeError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self {
            client,
            endpoint: config.primary_endpoint.clone(),
        })
    }
}

#[async_trait]
impl GeocodeProvider for NominatimProvider {
    fn name(&self) -> &str {
        "nominatim"
    }

    async fn geocode(&self, query: &str) -> Result<Option<AddressRecord>, GeocodeError> {
        let places: Vec<NominatimPlace> = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("q", query),
                ("format", "jsonv2"),
                ("addressdetails", "1"),
                ("limit", "1"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let Some(place) = places.into_iter().next() else {
            return Ok(None);
        };

        let latitude: f64 = place
            .lat
            .parse()
            .map_err(|_| GeocodeError::BadResponse(format!("bad latitude: {}", place.lat)))?;
        let longitude: f64 = place
            .lon
            .parse()
            .map_err(|_| GeocodeError::BadResponse(format!("bad longitude: {}", place.lon)))?;

        Ok(Some(AddressRecord {
            city: place.address.locality().unwrap_or_default().to_string(),
            state: place.address.state.clone().unwrap_or_default(),
            zip: place.address.postcode.clone(),
            formatted_address: place.display_name,
            latitude,
            longitude,
            provider: self.name().to_string(),
        }))
    }
}
