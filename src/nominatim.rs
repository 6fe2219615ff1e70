//! Nominatim HTTP adapter for address search.

use serde::Deserialize;

use crate::error::GeocodeError;
use crate::traits::{Geocoder, Place};

#[derive(Debug, Clone)]
pub struct NominatimConfig {
    pub base_url: String,
    /// Nominatim's usage policy requires an identifying user agent.
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: "location_app".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NominatimClient {
    config: NominatimConfig,
    client: reqwest::blocking::Client,
}

impl NominatimClient {
    pub fn new(config: NominatimConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }
}

impl Geocoder for NominatimClient {
    fn search(&self, query: &str, limit: usize) -> Result<Vec<Place>, GeocodeError> {
        let query = query.trim();
        if query.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let url = format!("{}/search", self.config.base_url.trim_end_matches('/'));
        tracing::debug!(%url, query, limit, "searching Nominatim");

        let limit = limit.to_string();
        let hits = self
            .client
            .get(url)
            .query(&[("q", query), ("format", "jsonv2"), ("limit", limit.as_str())])
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<Vec<NominatimPlace>>())?;

        Ok(usable_places(hits))
    }
}

/// Drops candidates with unusable coordinates, keeping the rest in order.
fn usable_places(hits: Vec<NominatimPlace>) -> Vec<Place> {
    hits.into_iter()
        .filter_map(|hit| match hit.into_place() {
            Ok(place) => Some(place),
            Err(err) => {
                tracing::warn!(error = %err, "skipping geocoder candidate");
                None
            }
        })
        .collect()
}

/// Nominatim returns coordinates as decimal strings.
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    display_name: String,
}

impl NominatimPlace {
    fn into_place(self) -> Result<Place, GeocodeError> {
        let lat = parse_coordinate(&self.lat)?;
        let lng = parse_coordinate(&self.lon)?;
        Ok(Place::new(lat, lng, self.display_name))
    }
}

fn parse_coordinate(raw: &str) -> Result<f64, GeocodeError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| GeocodeError::Decode(format!("bad coordinate {:?}", raw)))
}
