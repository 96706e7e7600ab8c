//! # Soak Configuration
//!
//! ```toml
//! seed = 7
//! actors = 24
//! ticks = 1920
//! tick_rate = 64
//! render_rate = 144
//! projectile_interval = 16
//! projectile_lifetime = 96
//! viewport = [1920.0, 1080.0]
//!
//! [cache]
//! actor_fade_secs = 1.75
//! ```
//!
//! Every key is optional. The `[cache]` table is a
//! [`CacheConfig`](vantage_snapshot::CacheConfig).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use vantage_snapshot::{CacheConfig, ConfigError};

/// Errors raised by the soak driver.
#[derive(Error, Debug)]
pub enum SoakError {
    /// The config file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that was read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The text is not valid TOML for this schema.
    #[error("malformed soak configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// The nested cache configuration is out of range.
    #[error(transparent)]
    Cache(#[from] ConfigError),

    /// A soak value is out of range.
    #[error("invalid value for `{field}`: {reason}")]
    Invalid {
        /// Offending key.
        field: &'static str,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// A worker thread could not be started.
    #[error("failed to spawn {name} thread: {source}")]
    Spawn {
        /// Thread name.
        name: &'static str,
        /// Underlying error.
        source: std::io::Error,
    },

    /// A worker thread panicked.
    #[error("{0} thread panicked")]
    Panicked(&'static str),

    /// A generated resource image could not be encoded.
    #[error("failed to encode resource image: {0}")]
    Encode(#[from] image::ImageError),
}

/// Result alias for the soak driver.
pub type SoakResult<T> = Result<T, SoakError>;

/// Soak run parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SoakConfig {
    /// World generation seed.
    pub seed: u64,
    /// Actors besides the viewer.
    pub actors: u32,
    /// Ticks to run before stopping.
    pub ticks: u64,
    /// Simulation ticks per second. Zero runs unthrottled.
    pub tick_rate: u32,
    /// Overlay frames per second.
    pub render_rate: u32,
    /// A projectile is thrown every this many ticks.
    pub projectile_interval: u32,
    /// Ticks a projectile stays in the world before it is removed.
    pub projectile_lifetime: u32,
    /// Overlay viewport, pixels.
    pub viewport: [f32; 2],
    /// Snapshot cache tunables.
    pub cache: CacheConfig,
}

impl Default for SoakConfig {
    fn default() -> Self {
        Self {
            seed: 7,
            actors: 24,
            ticks: 64 * 30,
            tick_rate: 64,
            render_rate: 144,
            projectile_interval: 16,
            projectile_lifetime: 96,
            viewport: [1920.0, 1080.0],
            cache: CacheConfig::default(),
        }
    }
}

impl SoakConfig {
    /// Parses and validates a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`SoakError::Parse`] for malformed TOML, otherwise the
    /// errors of [`SoakConfig::validate`].
    pub fn from_toml_str(text: &str) -> SoakResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`SoakError::Io`] if the file cannot be read.
    pub fn load(path: impl AsRef<Path>) -> SoakResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SoakError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Checks every value is in range.
    ///
    /// # Errors
    ///
    /// Returns [`SoakError::Invalid`] naming the first bad key, or
    /// [`SoakError::Cache`] for the nested table.
    pub fn validate(&self) -> SoakResult<()> {
        if self.render_rate == 0 {
            return Err(SoakError::Invalid {
                field: "render_rate",
                reason: "must be at least one frame per second",
            });
        }
        if self.projectile_interval == 0 {
            return Err(SoakError::Invalid {
                field: "projectile_interval",
                reason: "must be at least one tick",
            });
        }
        if !self.viewport.iter().all(|side| side.is_finite() && *side >= 1.0) {
            return Err(SoakError::Invalid {
                field: "viewport",
                reason: "both sides must be at least one pixel",
            });
        }
        self.cache.validate()?;
        Ok(())
    }

    /// Seconds of simulated time per tick.
    #[must_use]
    pub fn tick_interval(&self) -> f32 {
        1.0 / self.tick_rate.max(1) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_gives_defaults() {
        assert_eq!(SoakConfig::from_toml_str("").unwrap(), SoakConfig::default());
    }

    #[test]
    fn test_nested_cache_table() {
        let config = SoakConfig::from_toml_str(
            "actors = 4\n[cache]\nactor_fade_secs = 0.5\n",
        )
        .unwrap();
        assert_eq!(config.actors, 4);
        assert!((config.cache.actor_fade_secs - 0.5).abs() < f32::EPSILON);
        assert_eq!(config.ticks, SoakConfig::default().ticks);
    }

    #[test]
    fn test_rejects_zero_interval() {
        let err = SoakConfig::from_toml_str("projectile_interval = 0").unwrap_err();
        assert!(matches!(err, SoakError::Invalid { field: "projectile_interval", .. }));
    }

    #[test]
    fn test_rejects_bad_cache_value() {
        let err = SoakConfig::from_toml_str("[cache]\nname_refresh_interval = 0").unwrap_err();
        assert!(matches!(err, SoakError::Cache(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_rejects_unknown_key() {
        assert!(matches!(
            SoakConfig::from_toml_str("actor = 3"),
            Err(SoakError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = SoakConfig::load("/nonexistent/vantage-soak.toml").unwrap_err();
        assert!(matches!(err, SoakError::Io { .. }));
    }

    #[test]
    fn test_unthrottled_tick_interval() {
        let config = SoakConfig {
            tick_rate: 0,
            ..SoakConfig::default()
        };
        assert!((config.tick_interval() - 1.0).abs() < f32::EPSILON);
        assert!((SoakConfig::default().tick_interval() - 1.0 / 64.0).abs() < f32::EPSILON);
    }
}
