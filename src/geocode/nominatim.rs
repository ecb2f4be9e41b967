use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use tracing::debug;

use crate::config::GeocoderConfig;
use crate::error::{Result, ScoutError};
use crate::geocode::Geocoder;
use crate::models::Coordinates;

/// OpenStreetMap Nominatim search, restricted to one country
pub struct NominatimGeocoder {
    client: Client,
    endpoint: String,
    country_code: String,
    timeout: Duration,
}

/// Nominatim returns coordinates as decimal strings
#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
}

impl Place {
    fn coordinates(&self) -> Result<Coordinates> {
        let parse = |value: &str| {
            value
                .parse::<f64>()
                .map_err(|e| ScoutError::Geocode(format!("bad coordinate '{}': {}", value, e)))
        };
        Ok(Coordinates {
            lat: parse(&self.lat)?,
            lng: parse(&self.lon)?,
        })
    }
}

impl NominatimGeocoder {
    pub fn new(config: &GeocoderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            country_code: config.country_code.clone(),
            timeout: config.timeout(),
        })
    }

    /// Single best match inside the configured country, bounded by the timeout
    fn search(&self, query: &str) -> RequestBuilder {
        self.client
            .get(&self.endpoint)
            .timeout(self.timeout)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("countrycodes", self.country_code.as_str()),
                ("limit", "1"),
            ])
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn lookup(&self, query: &str) -> Result<Option<Coordinates>> {
        debug!("Geocoding '{}' in '{}'", query, self.country_code);

        let places: Vec<Place> = self
            .search(query)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        places.first().map(Place::coordinates).transpose()
    }

    fn provider_name(&self) -> &'static str {
        "Nominatim"
    }
}
