//! Geocodio-compatible address geocoder with district fields.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{lenient_string, send_json, trim_base, UpstreamError};

/// Extra field groups requested with every lookup.
pub const GEOCODE_FIELDS: &str = "cd,stateleg,school";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AddressComponents {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub county: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Bio {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub party: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Contact {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct References {
    #[serde(default)]
    pub bioguide_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Legislator {
    /// "representative" or "senator"
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub bio: Option<Bio>,
    #[serde(default)]
    pub contact: Option<Contact>,
    #[serde(default)]
    pub references: Option<References>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CongressionalDistrict {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub district_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub congress_number: Option<String>,
    #[serde(default)]
    pub current_legislators: Vec<Legislator>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StateDistrict {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub district_number: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StateLegislativeDistricts {
    #[serde(default)]
    pub house: Vec<StateDistrict>,
    #[serde(default)]
    pub senate: Vec<StateDistrict>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SchoolDistrict {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SchoolDistricts {
    #[serde(default)]
    pub unified: Option<SchoolDistrict>,
    #[serde(default)]
    pub elementary: Option<SchoolDistrict>,
    #[serde(default)]
    pub secondary: Option<SchoolDistrict>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Fields {
    #[serde(default)]
    pub congressional_districts: Vec<CongressionalDistrict>,
    #[serde(default)]
    pub state_legislative_districts: Option<StateLegislativeDistricts>,
    #[serde(default)]
    pub school_districts: Option<SchoolDistricts>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GeocodeResult {
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub location: Option<Coordinates>,
    #[serde(default)]
    pub address_components: Option<AddressComponents>,
    #[serde(default)]
    pub fields: Option<Fields>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GeocodeResponse {
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
}

#[async_trait]
pub trait GeocoderClient: Send + Sync {
    /// Geocode a free-form address or ZIP code.
    async fn geocode(&self, query: &str) -> Result<GeocodeResponse, UpstreamError>;
}

pub struct HttpGeocoderClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpGeocoderClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, api_key)
    }

    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: trim_base(base_url),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl GeocoderClient for HttpGeocoderClient {
    async fn geocode(&self, query: &str) -> Result<GeocodeResponse, UpstreamError> {
        let request = self
            .client
            .get(format!("{}/geocode", self.base_url))
            .query(&[
                ("q", query),
                ("fields", GEOCODE_FIELDS),
                ("api_key", self.api_key.as_str()),
            ]);
        send_json(request, query).await
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[allow(clippy::unwrap_used, clippy::missing_panics_doc, clippy::must_use_candidate)]
pub mod mock {
    //! Mock implementation for unit testing.

    use super::{GeocodeResponse, GeocoderClient, UpstreamError};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Returns the configured result once; unset yields no results.
    #[derive(Default)]
    pub struct MockGeocoderClient {
        result: Mutex<Option<Result<GeocodeResponse, UpstreamError>>>,
        queries: Mutex<Vec<String>>,
    }

    impl MockGeocoderClient {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_geocode_result(&self, result: Result<GeocodeResponse, UpstreamError>) {
            *self.result.lock().unwrap() = Some(result);
        }

        pub fn queries(&self) -> Vec<String> {
            self.queries.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl GeocoderClient for MockGeocoderClient {
        async fn geocode(&self, query: &str) -> Result<GeocodeResponse, UpstreamError> {
            self.queries.lock().unwrap().push(query.to_string());
            self.result
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Ok(GeocodeResponse::default()))
        }
    }
}
