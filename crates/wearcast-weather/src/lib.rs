//! Weather data for Wearcast
//!
//! Resolves place names and fetches current conditions from the Open-Meteo
//! APIs, and decodes WMO condition codes into readable categories.

mod geocode;
pub mod provider;
pub mod retry;
pub mod source;
pub mod types;

pub use provider::{ProviderSettings, WeatherProvider};
pub use retry::RetryConfig;
pub use source::WeatherSource;
pub use types::*;
