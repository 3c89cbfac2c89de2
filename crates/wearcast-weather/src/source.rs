use async_trait::async_trait;

use crate::types::{Coordinates, GeoLocation, WeatherError, WeatherReading};

/// Where weather data comes from.
///
/// The two calls run one after the other: `fetch_current` needs the
/// coordinates that `geocode` resolved.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// Resolve a place name. `Ok(None)` means no match.
    async fn geocode(&self, place_name: &str) -> Result<Option<GeoLocation>, WeatherError>;

    /// Current conditions at `coordinates`.
    async fn fetch_current(&self, coordinates: Coordinates) -> Result<WeatherReading, WeatherError>;
}
