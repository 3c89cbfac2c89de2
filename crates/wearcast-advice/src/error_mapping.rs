//! Maps data source errors to wearcast_core::AppError for consistent user-facing messages.

use wearcast_core::{AppError, NetworkError, ReqwestErrorExt, WeatherError};
use wearcast_weather::WeatherError as SourceError;

/// Conversion from the weather client's error into the app taxonomy.
pub trait SourceErrorExt {
    fn into_app_error(self) -> AppError;
}

impl SourceErrorExt for SourceError {
    fn into_app_error(self) -> AppError {
        match self {
            SourceError::Network(e) => AppError::Network(e.into_network_error()),
            SourceError::Status { service, status } if status == 503 => {
                tracing::debug!("{} service reported 503", service);
                AppError::Weather(WeatherError::ServiceUnavailable)
            }
            SourceError::Status { service, status } => AppError::Network(NetworkError::ServerError {
                status,
                message: format!("{service} request failed"),
            }),
            SourceError::InvalidCoordinates { .. } | SourceError::Parse(_) => {
                AppError::Network(NetworkError::InvalidResponse(self.to_string()))
            }
        }
    }
}

/// Error for a place name with no geocoding match.
pub fn not_found(place_name: &str) -> AppError {
    AppError::Weather(WeatherError::LocationNotFound(place_name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_maps_to_server_error() {
        let err = SourceError::Status {
            service: "forecast",
            status: 500,
        }
        .into_app_error();
        assert!(matches!(
            err,
            AppError::Network(NetworkError::ServerError { status: 500, .. })
        ));
    }

    #[test]
    fn test_503_maps_to_unavailable() {
        let err = SourceError::Status {
            service: "geocoding",
            status: 503,
        }
        .into_app_error();
        assert!(matches!(err, AppError::Weather(WeatherError::ServiceUnavailable)));
    }

    #[test]
    fn test_parse_maps_to_invalid_response() {
        let err = SourceError::Parse("missing field".into()).into_app_error();
        assert!(matches!(
            err,
            AppError::Network(NetworkError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_not_found_message() {
        assert_eq!(not_found("Qwxyzzz").user_message(), "City not found");
    }
}
