use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Directory name under the platform config dir.
pub const APP_DIR_NAME: &str = "wearcast";

/// Prefix for environment overrides, e.g. `WEARCAST__WEATHER__TIMEOUT_SECS=5`.
pub const ENV_PREFIX: &str = "WEARCAST";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Application settings.
///
/// Read-only from the app's point of view: layered from defaults, an optional
/// `config.toml` and `WEARCAST__*` environment variables. The user's
/// thresholds live in their own record, see [`crate::ThresholdStore`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding `config.toml` and `thresholds.toml`
    pub config_dir: PathBuf,

    /// Weather data source settings
    pub weather: WeatherConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Base URL of the Open-Meteo geocoding API
    #[serde(default = "default_geocoding_url")]
    pub geocoding_url: String,

    /// Base URL of the Open-Meteo forecast API
    #[serde(default = "default_forecast_url")]
    pub forecast_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Extra attempts after a transient failure
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_geocoding_url() -> String {
    "https://geocoding-api.open-meteo.com/v1".to_string()
}

fn default_forecast_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

const fn default_max_retries() -> u32 {
    2
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            geocoding_url: default_geocoding_url(),
            forecast_url: default_forecast_url(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

/// Platform config directory for Wearcast, falling back to the working dir.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_dir: default_config_dir(),
            weather: WeatherConfig::default(),
        }
    }
}

impl Config {
    /// Load settings rooted at `config_dir`.
    ///
    /// A missing `config.toml` is fine; a malformed one is an error.
    pub fn load_from(config_dir: &Path) -> Result<Self> {
        let config_path = Self::config_path(config_dir);

        let settings = config::Config::builder()
            .add_source(config::File::from(config_path.as_path()).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        let mut config: Config = settings
            .try_deserialize()
            .context("Failed to parse config file")?;

        // The directory we were pointed at wins over anything in the file.
        config.config_dir = config_dir.to_path_buf();

        tracing::debug!("Loaded settings from {}", config_path.display());
        Ok(config)
    }

    /// Load settings and validate them
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated(config_dir: &Path) -> Result<(Self, ValidationResult)> {
        let config = Self::load_from(config_dir)?;
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_url(
            &self.weather.geocoding_url,
            "weather.geocoding_url",
            &mut result,
        );
        Self::validate_url(
            &self.weather.forecast_url,
            "weather.forecast_url",
            &mut result,
        );

        if self.weather.timeout_secs == 0 {
            result.add_error("weather.timeout_secs", "Timeout must be greater than 0");
        } else if self.weather.timeout_secs > 120 {
            result.add_warning(
                "weather.timeout_secs",
                "Timeout is unusually long (>120 seconds)",
            );
        }

        if self.weather.max_retries > 5 {
            result.add_warning(
                "weather.max_retries",
                "More than 5 retries will make failed searches very slow",
            );
        }

        result
    }

    fn validate_url(url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Path to the settings file inside `config_dir`
    pub fn config_path(config_dir: &Path) -> PathBuf {
        config_dir.join("config.toml")
    }

    /// Path to the thresholds record inside this config's directory
    pub fn thresholds_path(&self) -> PathBuf {
        self.config_dir.join(crate::thresholds::THRESHOLDS_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_default_config() {
        let config = Config::default();
        let result = config.validate();
        assert!(result.is_valid(), "Default config should be valid: {:?}", result.errors);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_invalid_url() {
        let mut config = Config::default();
        config.weather.forecast_url = "not-a-url".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.error_summary().contains("weather.forecast_url"));
    }

    #[test]
    fn test_invalid_scheme() {
        let mut config = Config::default();
        config.weather.geocoding_url = "ftp://example.com".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors[0].message.contains("http or https"));
    }

    #[test]
    fn test_zero_timeout_is_error() {
        let mut config = Config::default();
        config.weather.timeout_secs = 0;
        assert!(!config.validate().is_valid());
    }

    #[test]
    fn test_long_timeout_is_warning() {
        let mut config = Config::default();
        config.weather.timeout_secs = 600;
        let result = config.validate();
        assert!(result.is_valid());
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(dir.path()).unwrap();
        assert_eq!(config.config_dir, dir.path());
        assert_eq!(config.weather.timeout_secs, 10);
        assert_eq!(config.weather.forecast_url, "https://api.open-meteo.com/v1");
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            Config::config_path(dir.path()),
            "[weather]\ntimeout_secs = 3\n",
        )
        .unwrap();

        let config = Config::load_from(dir.path()).unwrap();
        assert_eq!(config.weather.timeout_secs, 3);
        assert_eq!(config.weather.max_retries, 2);
        assert_eq!(
            config.weather.geocoding_url,
            "https://geocoding-api.open-meteo.com/v1"
        );
    }

    #[test]
    fn test_load_validated_rejects_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            Config::config_path(dir.path()),
            "[weather]\nforecast_url = \"nope\"\n",
        )
        .unwrap();

        assert!(Config::load_validated(dir.path()).is_err());
    }

    #[test]
    fn test_thresholds_path_under_config_dir() {
        let config = Config {
            config_dir: PathBuf::from("/tmp/wearcast-test"),
            ..Config::default()
        };
        assert_eq!(
            config.thresholds_path(),
            PathBuf::from("/tmp/wearcast-test/thresholds.toml")
        );
    }
}
