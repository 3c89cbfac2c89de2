//! Open-Meteo backed [`WeatherSource`].

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use crate::geocode::geocode_place;
use crate::retry::{with_retry, RetryConfig};
use crate::source::WeatherSource;
use crate::types::{Coordinates, GeoLocation, WeatherError, WeatherReading};

const SERVICE: &str = "forecast";
const USER_AGENT: &str = concat!("wearcast/", env!("CARGO_PKG_VERSION"));

/// Endpoints and network policy for [`WeatherProvider`]
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub geocoding_url: String,
    pub forecast_url: String,
    pub timeout: Duration,
    pub retry: RetryConfig,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current_weather: Option<CurrentWeatherBlock>,
    hourly: Option<HourlyBlock>,
}

#[derive(Debug, Deserialize)]
struct CurrentWeatherBlock {
    time: String,
    temperature: f64,
    windspeed: f64,
    weathercode: i32,
}

#[derive(Debug, Deserialize)]
struct HourlyBlock {
    #[serde(default)]
    time: Vec<String>,
    #[serde(default)]
    relativehumidity_2m: Vec<Option<f64>>,
}

impl HourlyBlock {
    /// Humidity for the hour whose timestamp equals `time`
    fn humidity_at(&self, time: &str) -> Option<f64> {
        let idx = self.time.iter().position(|t| t == time)?;
        self.relativehumidity_2m.get(idx).copied().flatten()
    }
}

impl ForecastResponse {
    fn into_reading(self) -> Result<WeatherReading, WeatherError> {
        let current = self.current_weather.ok_or_else(|| {
            WeatherError::Parse("No current weather data in response".to_string())
        })?;

        let humidity_percent = self
            .hourly
            .as_ref()
            .and_then(|hourly| hourly.humidity_at(&current.time));

        Ok(WeatherReading {
            temperature_celsius: current.temperature,
            wind_speed_kmh: current.windspeed,
            condition_code: current.weathercode,
            humidity_percent,
        })
    }
}

#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Arc<Client>,
    settings: ProviderSettings,
}

impl WeatherProvider {
    pub fn new(settings: ProviderSettings) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client: Arc::new(client),
            settings,
        })
    }

    fn forecast_url(&self, coordinates: Coordinates) -> String {
        format!(
            "{}/forecast?latitude={}&longitude={}&current_weather=true&hourly=relativehumidity_2m\
             &timezone=auto&temperature_unit=celsius&windspeed_unit=kmh",
            self.settings.forecast_url.trim_end_matches('/'),
            coordinates.latitude,
            coordinates.longitude,
        )
    }
}

#[async_trait]
impl WeatherSource for WeatherProvider {
    async fn geocode(&self, place_name: &str) -> Result<Option<GeoLocation>, WeatherError> {
        geocode_place(
            &self.client,
            &self.settings.geocoding_url,
            &self.settings.retry,
            place_name,
        )
        .await
    }

    async fn fetch_current(&self, coordinates: Coordinates) -> Result<WeatherReading, WeatherError> {
        if !coordinates.is_valid() {
            return Err(WeatherError::InvalidCoordinates {
                latitude: coordinates.latitude,
                longitude: coordinates.longitude,
            });
        }

        let url = self.forecast_url(coordinates);
        tracing::debug!(url = %url, "Fetching current weather");

        let response = with_retry(&self.settings.retry, || self.client.get(&url).send()).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::Status {
                service: SERVICE,
                status: status.as_u16(),
            });
        }

        let body: ForecastResponse = response
            .json()
            .await
            .map_err(|e| WeatherError::Parse(e.to_string()))?;

        let reading = body.into_reading()?;
        tracing::info!(
            "Current weather: {}°C, {} km/h, code {}",
            reading.temperature_celsius,
            reading.wind_speed_kmh,
            reading.condition_code
        );
        Ok(reading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hourly(times: &[&str], values: Vec<Option<f64>>) -> HourlyBlock {
        HourlyBlock {
            time: times.iter().map(|t| t.to_string()).collect(),
            relativehumidity_2m: values,
        }
    }

    #[test]
    fn test_humidity_matches_current_hour() {
        let block = hourly(
            &["2026-10-18T10:00", "2026-10-18T11:00"],
            vec![Some(70.0), Some(64.0)],
        );
        assert_eq!(block.humidity_at("2026-10-18T11:00"), Some(64.0));
    }

    #[test]
    fn test_humidity_absent_without_matching_hour() {
        let block = hourly(&["2026-10-18T10:00"], vec![Some(70.0)]);
        assert_eq!(block.humidity_at("2026-10-18T10:15"), None);
    }

    #[test]
    fn test_humidity_absent_when_value_null_or_short() {
        let block = hourly(&["a", "b"], vec![None]);
        assert_eq!(block.humidity_at("a"), None);
        assert_eq!(block.humidity_at("b"), None);
    }

    #[test]
    fn test_missing_current_weather_is_parse_error() {
        let body = ForecastResponse {
            current_weather: None,
            hourly: None,
        };
        assert!(matches!(body.into_reading(), Err(WeatherError::Parse(_))));
    }

    #[test]
    fn test_forecast_url_carries_units() {
        let provider = WeatherProvider::new(ProviderSettings {
            geocoding_url: "http://localhost:1234/v1".into(),
            forecast_url: "http://localhost:1234/v1/".into(),
            timeout: Duration::from_secs(1),
            retry: RetryConfig::none(),
        })
        .unwrap();
        let url = provider.forecast_url(Coordinates {
            latitude: 52.52,
            longitude: 13.41,
        });
        assert!(url.starts_with("http://localhost:1234/v1/forecast?latitude=52.52&longitude=13.41"));
        assert!(url.contains("temperature_unit=celsius"));
        assert!(url.contains("windspeed_unit=kmh"));
        assert!(url.contains("hourly=relativehumidity_2m"));
    }
}
