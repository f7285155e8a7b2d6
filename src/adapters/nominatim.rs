//! Geocoding against a Nominatim `/search` endpoint.

use crate::core::{Coordinates, GeocodeOutcome, Geocoder};
use crate::utils::error::{GeocodeError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://nominatim.openstreetmap.org";

pub fn default_user_agent() -> String {
    format!("csv-geocode/{}", env!("CARGO_PKG_VERSION"))
}

/// Nominatim writes coordinates as strings; other deployments may use numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CoordValue {
    Number(f64),
    Text(String),
}

impl CoordValue {
    fn parse(&self, field: &str) -> Result<f64> {
        match self {
            CoordValue::Number(n) => Ok(*n),
            CoordValue::Text(s) => s.trim().parse::<f64>().map_err(|e| {
                GeocodeError::parse(format!("Invalid {} value {:?}: {}", field, s, e))
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Place {
    lon: CoordValue,
    lat: CoordValue,
}

pub struct NominatimGeocoder {
    client: Client,
    search_url: String,
}

impl NominatimGeocoder {
    pub fn new(endpoint: &str, user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            search_url: format!("{}/search", endpoint.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, query: &str) -> Result<GeocodeOutcome> {
        let response = self
            .client
            .get(&self.search_url)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .await?;

        tracing::debug!("Nominatim response status: {}", response.status());

        if !response.status().is_success() {
            return Err(GeocodeError::ServiceStatusError {
                status: response.status().as_u16(),
                query: query.to_string(),
            });
        }

        let body = response.text().await?;
        let places: Vec<Place> = serde_json::from_str(&body).map_err(|e| {
            GeocodeError::parse(format!("Unexpected geocoding response for {:?}: {}", query, e))
        })?;

        match places.first() {
            Some(place) => Ok(GeocodeOutcome::Found(Coordinates::new(
                place.lon.parse("lon")?,
                place.lat.parse("lat")?,
            ))),
            None => Ok(GeocodeOutcome::NotFound),
        }
    }
}
