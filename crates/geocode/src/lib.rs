//! Address verification for the 311 intake agent
//!
//! A provider-agnostic geocoding contract ([`GeocodeProvider`]) with two
//! implementations (Nominatim primary, Photon secondary) and the
//! [`AddressVerifier`] that owns the query policy: street-abbreviation
//! expansion, one with-hint and one without-hint attempt per provider, and
//! collapse of every transport or parse failure to not-found. Provider
//! errors never reach the conversation.

pub mod nominatim;
pub mod photon;
pub mod provider;
pub mod verifier;

pub use nominatim::NominatimProvider;
pub use photon::PhotonProvider;
pub use provider::GeocodeProvider;
pub use verifier::AddressVerifier;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeocodeError {
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Unexpected provider response: {0}")]
    BadResponse(String),
}
