//! Geocoding provider contract

use async_trait::async_trait;

use intake_core::AddressRecord;

use crate::GeocodeError;

/// One geocoding backend
///
/// Implementations normalize their own response shape into
/// [`AddressRecord`]; callers never see provider-specific fields. A clean
/// no-match is `Ok(None)`; transport and parse problems are errors, which
/// the verifier downgrades to not-found.
#[async_trait]
pub trait GeocodeProvider: Send + Sync {
    /// Provider name recorded on returned address records
    fn name(&self) -> &str;

    /// Resolve a free-text query to at most one address
    async fn geocode(&self, query: &str) -> Result<Option<AddressRecord>, GeocodeError>;
}
