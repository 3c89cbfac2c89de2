use serde::{Deserialize, Serialize};

/// Weather condition categories decoded from WMO codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    Clear,
    PartlyCloudy,
    Fog,
    Rain,
    Snow,
    Thunderstorm,
    /// Any code outside the ranges above
    Other,
}

impl WeatherCondition {
    /// Convert WMO weather code to WeatherCondition.
    ///
    /// Rules are checked in order, first match wins.
    /// See: https://open-meteo.com/en/docs#weathervariables
    pub fn from_wmo_code(code: i32) -> Self {
        match code {
            0 => Self::Clear,
            1..=3 => Self::PartlyCloudy,
            45..=48 => Self::Fog,
            51..=67 | 80..=82 => Self::Rain,
            71..=77 | 85..=86 => Self::Snow,
            95..=i32::MAX => Self::Thunderstorm,
            _ => Self::Other,
        }
    }

    /// Get a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::PartlyCloudy => "Partly cloudy",
            Self::Fog => "Fog",
            Self::Rain => "Rain",
            Self::Snow => "Snow",
            Self::Thunderstorm => "Thunderstorm",
            Self::Other => "Weather",
        }
    }
}

/// Decode a WMO condition code straight to its description.
pub fn decode(code: i32) -> &'static str {
    WeatherCondition::from_wmo_code(code).description()
}

/// Geographic coordinates in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Display label of a resolved place
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceLabel {
    pub name: String,
    pub country: Option<String>,
}

impl std::fmt::Display for PlaceLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.country.as_deref().filter(|c| !c.is_empty()) {
            Some(country) => write!(f, "{}, {}", self.name, country),
            None => f.write_str(&self.name),
        }
    }
}

/// Result of a forward geocoding lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub place: PlaceLabel,
    pub coordinates: Coordinates,
}

/// Current conditions at one place, produced once per search
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub temperature_celsius: f64,
    pub wind_speed_kmh: f64,
    pub condition_code: i32,
    /// Best effort; absent when the provider has no matching hourly value
    pub humidity_percent: Option<f64>,
}

impl WeatherReading {
    pub fn condition(&self) -> WeatherCondition {
        WeatherCondition::from_wmo_code(self.condition_code)
    }
}

/// Weather data source errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("{service} request failed with HTTP {status}")]
    Status { service: &'static str, status: u16 },
    #[error("Invalid coordinates: {latitude}, {longitude}")]
    InvalidCoordinates { latitude: f64, longitude: f64 },
    #[error("Parse error: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wmo_code_clear() {
        assert_eq!(decode(0), "Clear");
    }

    #[test]
    fn test_wmo_code_partly_cloudy() {
        for code in 1..=3 {
            assert_eq!(decode(code), "Partly cloudy", "code {code}");
        }
    }

    #[test]
    fn test_wmo_code_fog() {
        for code in 45..=48 {
            assert_eq!(decode(code), "Fog", "code {code}");
        }
    }

    #[test]
    fn test_wmo_code_rain() {
        for code in (51..=67).chain(80..=82) {
            assert_eq!(decode(code), "Rain", "code {code}");
        }
    }

    #[test]
    fn test_wmo_code_snow() {
        for code in (71..=77).chain(85..=86) {
            assert_eq!(decode(code), "Snow", "code {code}");
        }
    }

    #[test]
    fn test_wmo_code_thunderstorm() {
        assert_eq!(decode(95), "Thunderstorm");
        assert_eq!(decode(96), "Thunderstorm");
        assert_eq!(decode(99), "Thunderstorm");
        assert_eq!(decode(150), "Thunderstorm");
    }

    #[test]
    fn test_wmo_code_gaps_fall_back() {
        for code in [-1, 4, 10, 44, 49, 50, 68, 70, 78, 79, 83, 84, 87, 90, 94] {
            assert_eq!(decode(code), "Weather", "code {code}");
        }
    }

    #[test]
    fn test_every_code_in_range_decodes() {
        let known = [
            "Clear",
            "Partly cloudy",
            "Fog",
            "Rain",
            "Snow",
            "Thunderstorm",
            "Weather",
        ];
        for code in 0..=99 {
            assert!(known.contains(&decode(code)));
        }
    }

    #[test]
    fn test_place_label_display() {
        let with_country = PlaceLabel {
            name: "Oslo".into(),
            country: Some("Norway".into()),
        };
        let without = PlaceLabel {
            name: "Atlantis".into(),
            country: None,
        };
        assert_eq!(with_country.to_string(), "Oslo, Norway");
        assert_eq!(without.to_string(), "Atlantis");
    }

    #[test]
    fn test_coordinates_validity() {
        assert!(Coordinates { latitude: 52.52, longitude: 13.41 }.is_valid());
        assert!(Coordinates { latitude: -90.0, longitude: 180.0 }.is_valid());
        assert!(!Coordinates { latitude: 91.0, longitude: 0.0 }.is_valid());
        assert!(!Coordinates { latitude: 0.0, longitude: -181.0 }.is_valid());
        assert!(!Coordinates { latitude: f64::NAN, longitude: 0.0 }.is_valid());
    }
}
