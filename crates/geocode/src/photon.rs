//! Komoot Photon provider (secondary, configuration-gated)

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use intake_config::GeocoderConfig;
use intake_core::AddressRecord;

use crate::provider::GeocodeProvider;
use crate::GeocodeError;

/// Photon search provider
pub struct PhotonProvider {
    client: reqwest::Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct PhotonResponse {
    #[serde(default)]
    features: Vec<PhotonFeature>,
}

#[derive(Debug, Deserialize)]
struct PhotonFeature {
    geometry: PhotonGeometry,
    properties: PhotonProperties,
}

#[derive(Debug, Deserialize)]
struct PhotonGeometry {
    /// `[longitude, latitude]` per GeoJSON
    coordinates: Vec<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct PhotonProperties {
    name: Option<String>,
    housenumber: Option<String>,
    street: Option<String>,
    city: Option<String>,
    state: Option<String>,
    postcode: Option<String>,
}

impl PhotonProperties {
    fn formatted(&self) -> String {
        let mut parts: Vec<String> = Vec::new();

        let street_line = match (self.housenumber.as_deref(), self.street.as_deref()) {
            (Some(number), Some(street)) => Some(format!("{number} {street}")),
            (None, Some(street)) => Some(street.to_string()),
            _ => self.name.clone(),
        };
        if let Some(line) = street_line {
            parts.push(line);
        }
        if let Some(city) = &self.city {
            parts.push(city.clone());
        }
        if let Some(state) = &self.state {
            parts.push(state.clone());
        }
        if let Some(postcode) = &self.postcode {
            parts.push(postcode.clone());
        }
        parts.join(", ")
    }
}

impl PhotonProvider {
    pub fn new(config: &GeocoderConfig) -> Result<Self, GeocodeError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self {
            client,
            endpoint: config.secondary_endpoint.clone(),
        })
    }
}

#[async_trait]
impl GeocodeProvider for PhotonProvider {
    fn name(&self) -> &str {
        "photon"
    }

    async fn geocode(&self, query: &str) -> Result<Option<AddressRecord>, GeocodeError> {
        let response: PhotonResponse = self
            .client
            .get(&self.endpoint)
            .query(&[("q", query), ("limit", "1")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let Some(feature) = response.features.into_iter().next() else {
            return Ok(None);
        };

        let &[longitude, latitude] = feature.geometry.coordinates.as_slice() else {
            return Err(GeocodeError::BadResponse(format!(
                "expected [lon, lat] coordinates, got {:?}",
                feature.geometry.coordinates
            )));
        };

        Ok(Some(AddressRecord {
            formatted_address: feature.properties.formatted(),
            city: feature.properties.city.clone().unwrap_or_default(),
            state: feature.properties.state.clone().unwrap_or_default(),
            zip: feature.properties.postcode.clone(),
            latitude,
            longitude,
            provider: self.name().to_string(),
        }))
    }
}
