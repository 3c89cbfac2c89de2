//! User recommendation thresholds and their persistent store.
//!
//! The store keeps exactly one record, the `[thresholds]` table of
//! `thresholds.toml`. Reads fail open to defaults; writes replace the file
//! atomically (temp file + rename).

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// File name of the threshold record inside the config directory.
pub const THRESHOLDS_FILE: &str = "thresholds.toml";

pub const DEFAULT_JACKET_TEMPERATURE_CEILING_C: f64 = 18.0;
pub const DEFAULT_JACKET_WIND_FLOOR_KMH: f64 = 20.0;
pub const DEFAULT_GLOVES_TEMPERATURE_CEILING_C: f64 = 8.0;
pub const DEFAULT_SCARF_OFFSET_C: f64 = 5.0;

/// Thresholds that gate each recommendation.
///
/// No ordering is enforced between fields; odd combinations still evaluate
/// deterministically. Fields missing from an older record take their default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// Jacket needed at or below this temperature (°C)
    #[serde(default = "default_jacket_temperature_ceiling_c")]
    pub jacket_temperature_ceiling_c: f64,

    /// Jacket needed at or above this wind speed (km/h)
    #[serde(default = "default_jacket_wind_floor_kmh")]
    pub jacket_wind_floor_kmh: f64,

    /// Gloves needed at or below this temperature (°C)
    #[serde(default = "default_gloves_temperature_ceiling_c")]
    pub gloves_temperature_ceiling_c: f64,

    /// Scarf needed this many degrees below the gloves ceiling
    #[serde(default = "default_scarf_offset_c")]
    pub scarf_offset_c: f64,
}

fn default_jacket_temperature_ceiling_c() -> f64 {
    DEFAULT_JACKET_TEMPERATURE_CEILING_C
}

fn default_jacket_wind_floor_kmh() -> f64 {
    DEFAULT_JACKET_WIND_FLOOR_KMH
}

fn default_gloves_temperature_ceiling_c() -> f64 {
    DEFAULT_GLOVES_TEMPERATURE_CEILING_C
}

fn default_scarf_offset_c() -> f64 {
    DEFAULT_SCARF_OFFSET_C
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            jacket_temperature_ceiling_c: DEFAULT_JACKET_TEMPERATURE_CEILING_C,
            jacket_wind_floor_kmh: DEFAULT_JACKET_WIND_FLOOR_KMH,
            gloves_temperature_ceiling_c: DEFAULT_GLOVES_TEMPERATURE_CEILING_C,
            scarf_offset_c: DEFAULT_SCARF_OFFSET_C,
        }
    }
}

impl ThresholdConfig {
    /// Temperature at or below which a scarf is recommended.
    pub fn scarf_temperature_ceiling_c(&self) -> f64 {
        self.gloves_temperature_ceiling_c - self.scarf_offset_c
    }

    /// Every field must be a finite number.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("jacket_temperature_ceiling_c", self.jacket_temperature_ceiling_c),
            ("jacket_wind_floor_kmh", self.jacket_wind_floor_kmh),
            ("gloves_temperature_ceiling_c", self.gloves_temperature_ceiling_c),
            ("scarf_offset_c", self.scarf_offset_c),
        ];

        match fields.iter().find(|(_, value)| !value.is_finite()) {
            Some((name, value)) => Err(ConfigError::Invalid(format!(
                "{name} must be a finite number, got {value}"
            ))),
            None => Ok(()),
        }
    }
}

/// On-disk layout: one record under a fixed key.
#[derive(Debug, Serialize, Deserialize)]
struct ThresholdRecord {
    thresholds: ThresholdConfig,
}

/// File-backed store for the single [`ThresholdConfig`] record.
#[derive(Debug, Clone)]
pub struct ThresholdStore {
    path: PathBuf,
}

impl ThresholdStore {
    /// Store backed by an explicit file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store backed by `thresholds.toml` inside `config_dir`.
    pub fn in_dir(config_dir: &Path) -> Self {
        Self::new(config_dir.join(THRESHOLDS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted thresholds.
    ///
    /// A missing, unreadable or corrupt record yields the defaults; this never
    /// fails.
    pub fn load(&self) -> ThresholdConfig {
        match self.try_load() {
            Ok(Some(config)) => config,
            Ok(None) => {
                tracing::debug!("No thresholds at {}, using defaults", self.path.display());
                ThresholdConfig::default()
            }
            Err(e) => {
                tracing::debug!("Ignoring thresholds at {}: {}", self.path.display(), e);
                ThresholdConfig::default()
            }
        }
    }

    /// Read the persisted thresholds, reporting why a record was unusable.
    ///
    /// `Ok(None)` means nothing has been saved yet.
    pub fn try_load(&self) -> Result<Option<ThresholdConfig>, ConfigError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ConfigError::ReadFailed(e.to_string())),
        };

        let record: ThresholdRecord =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        record.thresholds.validate()?;

        Ok(Some(record.thresholds))
    }

    /// Persist `config`, replacing any previous record.
    ///
    /// Failures are logged and swallowed; use [`Self::try_save`] to observe them.
    pub fn save(&self, config: &ThresholdConfig) {
        if let Err(e) = self.try_save(config) {
            tracing::warn!("Failed to save thresholds to {}: {}", self.path.display(), e);
        }
    }

    /// Persist `config`, returning the underlying failure if any.
    pub fn try_save(&self, config: &ThresholdConfig) -> Result<(), ConfigError> {
        config.validate()?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| ConfigError::WriteFailed(e.to_string()))?;
            }
        }

        let record = ThresholdRecord {
            thresholds: *config,
        };
        let contents = toml::to_string_pretty(&record)
            .map_err(|e| ConfigError::WriteFailed(e.to_string()))?;

        let tmp_path = self.path.with_extension("toml.tmp");
        fs::write(&tmp_path, contents).map_err(|e| ConfigError::WriteFailed(e.to_string()))?;
        fs::rename(&tmp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            ConfigError::WriteFailed(e.to_string())
        })?;

        tracing::info!("Saved thresholds to {}", self.path.display());
        Ok(())
    }
}
