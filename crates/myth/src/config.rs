//! # Simulation Configuration
//!
//! Loaded from TOML. Every field has a default, so a partial file (or no
//! file at all) is valid:
//!
//! ```toml
//! [streaming]
//! chunk_size = 10.0
//! load_radius = 5
//! salt = 0
//!
//! [regions]
//! region_size = 20.0
//! build_rate = 0.1
//!
//! [timing]
//! max_dt = 0.1
//!
//! [save]
//! path = "saves/quicksave.json"
//! ```

use std::path::{Path, PathBuf};

use myth_procedural::{StreamerConfig, DEFAULT_CHUNK_SIZE, MAX_LOAD_RADIUS};
use myth_region::RegionConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for [`SimConfig`].
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Terrain streaming window.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamingSection {
    /// Chunk edge length in world units.
    pub chunk_size: f32,
    /// Chebyshev load radius in chunks.
    pub load_radius: u32,
    /// World salt.
    pub salt: i32,
}

impl Default for StreamingSection {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            load_radius: 5,
            salt: 0,
        }
    }
}

/// Region pressure tunables.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionSection {
    /// Region edge length in world units.
    pub region_size: f32,
    /// Pressure per second while occupied.
    pub build_rate: f32,
    /// Pressure lost per second once decaying.
    pub decay_rate: f32,
    /// Seconds away before decay starts.
    pub decay_delay: f32,
    /// Awakening threshold.
    pub awakening_threshold: f32,
    /// Fractured threshold.
    pub fractured_threshold: f32,
    /// Mythic threshold.
    pub mythic_threshold: f32,
    /// Blend toward the next state's palette at the top of a band.
    pub visual_blend: f32,
}

impl Default for RegionSection {
    fn default() -> Self {
        let c = RegionConfig::default();
        Self {
            region_size: c.region_size,
            build_rate: c.build_rate,
            decay_rate: c.decay_rate,
            decay_delay: c.decay_delay,
            awakening_threshold: c.awakening_threshold,
            fractured_threshold: c.fractured_threshold,
            mythic_threshold: c.mythic_threshold,
            visual_blend: c.visual_blend,
        }
    }
}

/// Frame timing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingSection {
    /// Longest step a single tick may simulate, in seconds.
    pub max_dt: f32,
    /// Rate at which presented visuals ease toward the region target.
    pub visual_smoothing: f32,
    /// Seconds between status log lines.
    pub status_interval: f32,
}

impl Default for TimingSection {
    fn default() -> Self {
        Self {
            max_dt: 0.1,
            visual_smoothing: 2.0,
            status_interval: 3.0,
        }
    }
}

/// Quick-save location.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveSection {
    /// Quick-save file.
    pub path: PathBuf,
}

impl Default for SaveSection {
    fn default() -> Self {
        Self {
            path: PathBuf::from(crate::save::DEFAULT_SAVE_PATH),
        }
    }
}

/// Complete simulation configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// `[streaming]`
    pub streaming: StreamingSection,
    /// `[regions]`
    pub regions: RegionSection,
    /// `[timing]`
    pub timing: TimingSection,
    /// `[save]`
    pub save: SaveSection,
}

impl SimConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] on malformed TOML, [`ConfigError::Invalid`] on
    /// out-of-range values.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates the file at `path`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`SimConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        info!(path = %path.display(), "Loaded simulation config");
        Ok(config)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(name: &str, value: f32) -> Result<(), ConfigError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid(format!("{name} must be positive, got {value}")))
            }
        }
        fn non_negative(name: &str, value: f32) -> Result<(), ConfigError> {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid(format!("{name} must be non-negative, got {value}")))
            }
        }

        positive("streaming.chunk_size", self.streaming.chunk_size)?;
        if self.streaming.load_radius > MAX_LOAD_RADIUS {
            return Err(ConfigError::Invalid(format!(
                "streaming.load_radius must be at most {MAX_LOAD_RADIUS}, got {}",
                self.streaming.load_radius
            )));
        }
        let r = &self.regions;
        positive("regions.region_size", r.region_size)?;
        non_negative("regions.build_rate", r.build_rate)?;
        non_negative("regions.decay_rate", r.decay_rate)?;
        non_negative("regions.decay_delay", r.decay_delay)?;
        if !(0.0 < r.awakening_threshold
            && r.awakening_threshold <= r.fractured_threshold
            && r.fractured_threshold <= r.mythic_threshold
            && r.mythic_threshold <= 1.0)
        {
            return Err(ConfigError::Invalid(format!(
                "region thresholds must satisfy 0 < awakening <= fractured <= mythic <= 1, got {} / {} / {}",
                r.awakening_threshold, r.fractured_threshold, r.mythic_threshold
            )));
        }
        if !(0.0..=1.0).contains(&r.visual_blend) {
            return Err(ConfigError::Invalid(format!(
                "regions.visual_blend must be in [0, 1], got {}",
                r.visual_blend
            )));
        }
        positive("timing.max_dt", self.timing.max_dt)?;
        non_negative("timing.visual_smoothing", self.timing.visual_smoothing)?;
        positive("timing.status_interval", self.timing.status_interval)?;
        Ok(())
    }

    /// Streamer parameters.
    #[must_use]
    pub fn streamer_config(&self) -> StreamerConfig {
        StreamerConfig {
            chunk_size: self.streaming.chunk_size,
            load_radius: self.streaming.load_radius,
            salt: self.streaming.salt,
        }
    }

    /// Region simulator parameters.
    #[must_use]
    pub fn region_config(&self) -> RegionConfig {
        let r = &self.regions;
        RegionConfig {
            region_size: r.region_size,
            build_rate: r.build_rate,
            decay_rate: r.decay_rate,
            decay_delay: r.decay_delay,
            awakening_threshold: r.awakening_threshold,
            fractured_threshold: r.fractured_threshold,
            mythic_threshold: r.mythic_threshold,
            visual_blend: r.visual_blend,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        let config = SimConfig::from_toml_str("").unwrap();
        assert_eq!(config, SimConfig::default());
        assert_eq!(config.streamer_config(), StreamerConfig::default());
        assert_eq!(config.region_config(), RegionConfig::default());
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = SimConfig::from_toml_str(
            r#"
            [streaming]
            load_radius = 2

            [timing]
            status_interval = 1.5
            "#,
        )
        .unwrap();
        assert_eq!(config.streaming.load_radius, 2);
        assert_eq!(config.streaming.chunk_size, 10.0);
        assert_eq!(config.timing.status_interval, 1.5);
        assert_eq!(config.timing.max_dt, 0.1);
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = SimConfig::from_toml_str("[streaming]\nchunk_size = 0.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(ref m) if m.contains("chunk_size")));

        for radius in ["257", "2147483648", "4294967295"] {
            let err = SimConfig::from_toml_str(&format!("[streaming]\nload_radius = {radius}\n"))
                .unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(ref m) if m.contains("load_radius")));
        }
        assert!(SimConfig::from_toml_str("[streaming]\nload_radius = 256\n").is_ok());

        let err = SimConfig::from_toml_str("[regions]\nawakening_threshold = 0.7\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_malformed_toml() {
        let err = SimConfig::from_toml_str("[streaming\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = SimConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
