//! Forward geocoding: place name to coordinates.
//! Uses the Open-Meteo geocoding API - free, no API key required.

use reqwest::Client;
use serde::Deserialize;

use crate::retry::{with_retry, RetryConfig};
use crate::types::{Coordinates, GeoLocation, PlaceLabel, WeatherError};

pub(crate) const SERVICE: &str = "geocoding";

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    // Absent entirely when nothing matches
    #[serde(default)]
    results: Option<Vec<GeocodingResult>>,
}

#[derive(Debug, Deserialize)]
struct GeocodingResult {
    name: String,
    country: Option<String>,
    latitude: f64,
    longitude: f64,
}

impl From<GeocodingResult> for GeoLocation {
    fn from(r: GeocodingResult) -> Self {
        Self {
            place: PlaceLabel {
                name: r.name,
                country: r.country.filter(|c| !c.is_empty()),
            },
            coordinates: Coordinates {
                latitude: r.latitude,
                longitude: r.longitude,
            },
        }
    }
}

/// Look up the best match for `name`. Returns `Ok(None)` when there is none.
pub(crate) async fn geocode_place(
    client: &Client,
    base_url: &str,
    retry: &RetryConfig,
    name: &str,
) -> Result<Option<GeoLocation>, WeatherError> {
    let url = format!("{}/search", base_url.trim_end_matches('/'));
    tracing::debug!(url = %url, name = %name, "Geocoding place");

    let response = with_retry(retry, || {
        client
            .get(&url)
            .query(&[("name", name), ("count", "1"), ("format", "json")])
            .send()
    })
    .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(WeatherError::Status {
            service: SERVICE,
            status: status.as_u16(),
        });
    }

    let body: GeocodingResponse = response
        .json()
        .await
        .map_err(|e| WeatherError::Parse(e.to_string()))?;

    let location = body
        .results
        .and_then(|results| results.into_iter().next())
        .map(GeoLocation::from);

    match &location {
        Some(loc) => tracing::info!("Geocoded {:?} to {}", name, loc.place),
        None => tracing::info!("No geocoding match for {:?}", name),
    }

    Ok(location)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_results_means_no_match() {
        let body: GeocodingResponse = serde_json::from_str(r#"{"generationtime_ms": 0.5}"#).unwrap();
        assert!(body.results.is_none());
    }

    #[test]
    fn test_empty_country_is_dropped() {
        let result = GeocodingResult {
            name: "Nowhere".into(),
            country: Some(String::new()),
            latitude: 1.0,
            longitude: 2.0,
        };
        let loc = GeoLocation::from(result);
        assert_eq!(loc.place.country, None);
        assert_eq!(loc.coordinates.latitude, 1.0);
    }
}
