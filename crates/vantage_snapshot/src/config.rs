//! # Cache Configuration
//!
//! Tunables for the fade windows, refresh cadence and projection.
//!
//! ```toml
//! actor_fade_secs = 1.75
//! projectile_trail_secs = 60.0
//! name_refresh_interval = 20
//! projection_epsilon = 0.001
//! avatar_size = 32
//! ```
//!
//! Every key is optional; missing keys take the built-in defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;
use vantage_shared::{
    ACTOR_FADE_SECS, AVATAR_SIZE, NAME_REFRESH_INTERVAL, PROJECTILE_TRAIL_SECS, PROJECTION_EPSILON,
};

/// Errors raised while loading a [`CacheConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that was read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The text is not valid TOML for this schema.
    #[error("malformed configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value parsed but is out of range.
    #[error("invalid value for `{field}`: {reason}")]
    Invalid {
        /// Offending key.
        field: &'static str,
        /// What is wrong with it.
        reason: &'static str,
    },
}

/// Result alias for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Snapshot cache tunables.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    /// Seconds an unresolvable actor stays in the snapshot.
    pub actor_fade_secs: f32,
    /// Seconds a vanished projectile stays after its last trajectory sample.
    pub projectile_trail_secs: f32,
    /// Display names are re-read every this many ticks.
    pub name_refresh_interval: u64,
    /// Smallest homogeneous divisor `project` accepts.
    pub projection_epsilon: f32,
    /// Edge length of the square avatar bitmap, in pixels.
    pub avatar_size: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            actor_fade_secs: ACTOR_FADE_SECS,
            projectile_trail_secs: PROJECTILE_TRAIL_SECS,
            name_refresh_interval: NAME_REFRESH_INTERVAL,
            projection_epsilon: PROJECTION_EPSILON,
            avatar_size: AVATAR_SIZE,
        }
    }
}

impl CacheConfig {
    /// Parses and validates a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise
    /// the same errors as [`CacheConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Checks every value is in range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad key.
    pub fn validate(&self) -> ConfigResult<()> {
        fn window(field: &'static str, secs: f32) -> ConfigResult<()> {
            if is_window(secs) {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: "must be a finite, non-negative number of seconds",
                })
            }
        }

        window("actor_fade_secs", self.actor_fade_secs)?;
        window("projectile_trail_secs", self.projectile_trail_secs)?;

        if self.name_refresh_interval == 0 {
            return Err(ConfigError::Invalid {
                field: "name_refresh_interval",
                reason: "must be at least one tick",
            });
        }
        if !is_epsilon(self.projection_epsilon) {
            return Err(ConfigError::Invalid {
                field: "projection_epsilon",
                reason: "must be positive",
            });
        }
        if self.avatar_size == 0 {
            return Err(ConfigError::Invalid {
                field: "avatar_size",
                reason: "must be at least one pixel",
            });
        }
        Ok(())
    }

    /// Replaces every out-of-range value with its default.
    ///
    /// For configs built in code rather than loaded, where
    /// [`CacheConfig::validate`] may never have run.
    #[must_use]
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let mut config = self;

        if !is_window(config.actor_fade_secs) {
            warn!(value = config.actor_fade_secs, "actor_fade_secs out of range, using default");
            config.actor_fade_secs = defaults.actor_fade_secs;
        }
        if !is_window(config.projectile_trail_secs) {
            warn!(value = config.projectile_trail_secs, "projectile_trail_secs out of range, using default");
            config.projectile_trail_secs = defaults.projectile_trail_secs;
        }
        if config.name_refresh_interval == 0 {
            warn!("name_refresh_interval is zero, using default");
            config.name_refresh_interval = defaults.name_refresh_interval;
        }
        if !is_epsilon(config.projection_epsilon) {
            warn!(value = config.projection_epsilon, "projection_epsilon out of range, using default");
            config.projection_epsilon = defaults.projection_epsilon;
        }
        if config.avatar_size == 0 {
            warn!("avatar_size is zero, using default");
            config.avatar_size = defaults.avatar_size;
        }
        config
    }

    /// Byte length of one RGBA8 avatar bitmap.
    #[must_use]
    pub const fn avatar_bytes(&self) -> usize {
        (self.avatar_size as usize) * (self.avatar_size as usize) * 4
    }
}

fn is_window(secs: f32) -> bool {
    secs.is_finite() && secs >= 0.0
}

fn is_epsilon(epsilon: f32) -> bool {
    epsilon.is_finite() && epsilon > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = CacheConfig::from_toml_str("").unwrap();
        assert_eq!(config, CacheConfig::default());
        assert!((config.actor_fade_secs - 1.75).abs() < f32::EPSILON);
        assert_eq!(config.avatar_bytes(), 32 * 32 * 4);
    }

    #[test]
    fn test_partial_override() {
        let config = CacheConfig::from_toml_str("actor_fade_secs = 0.5\nname_refresh_interval = 5").unwrap();
        assert!((config.actor_fade_secs - 0.5).abs() < f32::EPSILON);
        assert_eq!(config.name_refresh_interval, 5);
        assert_eq!(config.avatar_size, 32);
    }

    #[test]
    fn test_rejects_out_of_range() {
        let err = CacheConfig::from_toml_str("projection_epsilon = 0.0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "projection_epsilon", .. }));

        let err = CacheConfig::from_toml_str("actor_fade_secs = -1.0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "actor_fade_secs", .. }));

        let err = CacheConfig::from_toml_str("name_refresh_interval = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "name_refresh_interval", .. }));
    }

    #[test]
    fn test_sanitized_replaces_bad_values_only() {
        let config = CacheConfig {
            actor_fade_secs: f32::NAN,
            name_refresh_interval: 0,
            projection_epsilon: -1.0,
            avatar_size: 0,
            projectile_trail_secs: 5.0,
        }
        .sanitized();
        let defaults = CacheConfig::default();

        assert!((config.actor_fade_secs - defaults.actor_fade_secs).abs() < f32::EPSILON);
        assert_eq!(config.name_refresh_interval, defaults.name_refresh_interval);
        assert!((config.projection_epsilon - defaults.projection_epsilon).abs() < f32::EPSILON);
        assert_eq!(config.avatar_size, defaults.avatar_size);
        assert!((config.projectile_trail_secs - 5.0).abs() < f32::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_unknown_keys() {
        let err = CacheConfig::from_toml_str("fade = 3.0").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = CacheConfig::load("/nonexistent/vantage.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
