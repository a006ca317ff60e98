use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tilelight_geom::Rgb;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read lighting config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse lighting config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid lighting config `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Largest accepted chunk side. Power-of-two sides divide the `i32` range
/// evenly, so every chunk's cells stay addressable.
pub const MAX_CHUNK_SIZE: usize = 4096;

/// Tunables for the grid and the light engines.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LightingConfig {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Cells of front-layer blocks a full-strength light reaches through.
    #[serde(default = "default_front_penetration")]
    pub front_light_penetration: f32,
    /// Cells of back-layer-only blocks a full-strength light reaches through.
    #[serde(default = "default_back_penetration")]
    pub back_light_penetration: f32,
    #[serde(default = "default_shadow_factor")]
    pub back_layer_shadow_factor: f32,
    #[serde(default = "default_ambient_strength")]
    pub ambient_light_strength: f32,
    #[serde(default = "default_ambient_color")]
    pub ambient_light_color: Rgb,
}

fn default_chunk_size() -> usize {
    32
}
fn default_front_penetration() -> f32 {
    8.0
}
fn default_back_penetration() -> f32 {
    64.0
}
fn default_shadow_factor() -> f32 {
    0.25
}
fn default_ambient_strength() -> f32 {
    1.0
}
fn default_ambient_color() -> Rgb {
    Rgb::WHITE
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            front_light_penetration: default_front_penetration(),
            back_light_penetration: default_back_penetration(),
            back_layer_shadow_factor: default_shadow_factor(),
            ambient_light_strength: default_ambient_strength(),
            ambient_light_color: default_ambient_color(),
        }
    }
}

impl LightingConfig {
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        let cfg: LightingConfig = toml::from_str(toml_str)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.chunk_size.is_power_of_two() || self.chunk_size > MAX_CHUNK_SIZE {
            return Err(invalid("chunk_size", "must be a power of two no larger than 4096"));
        }
        if !(self.front_light_penetration > 0.0) {
            return Err(invalid("front_light_penetration", "must be positive"));
        }
        if !(self.back_light_penetration > 0.0) {
            return Err(invalid("back_light_penetration", "must be positive"));
        }
        if !(0.0..=1.0).contains(&self.back_layer_shadow_factor) {
            return Err(invalid("back_layer_shadow_factor", "must lie in [0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.ambient_light_strength) {
            return Err(invalid("ambient_light_strength", "must lie in [0, 1]"));
        }
        let c = self.ambient_light_color;
        if [c.r, c.g, c.b].iter().any(|v| !(0.0..=1.0).contains(v)) {
            return Err(invalid("ambient_light_color", "channels must lie in [0, 1]"));
        }
        Ok(())
    }

    /// Amount subtracted per step into a cell occluded by its front layer.
    #[inline]
    pub fn falloff_front(&self) -> f32 {
        1.0 / self.front_light_penetration
    }

    /// Amount subtracted per step into a cell occluded only by its back layer.
    #[inline]
    pub fn falloff_back(&self) -> f32 {
        1.0 / self.back_light_penetration
    }

    /// Pruning margin for near-equal updates; kept just under `falloff_back`.
    #[inline]
    pub fn pass_threshold(&self) -> f32 {
        self.falloff_back() * 0.999_999
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let cfg = LightingConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, LightingConfig::default());
        assert_eq!(cfg.falloff_front(), 0.125);
        assert_eq!(cfg.falloff_back(), 1.0 / 64.0);
        assert!(cfg.pass_threshold() < cfg.falloff_back());
    }

    #[test]
    fn partial_document_overrides_fields() {
        let cfg = LightingConfig::from_toml_str(
            r#"
            chunk_size = 16
            front_light_penetration = 4.0
            ambient_light_color = [1.0, 0.9, 0.6]
        "#,
        )
        .unwrap();
        assert_eq!(cfg.chunk_size, 16);
        assert_eq!(cfg.falloff_front(), 0.25);
        assert_eq!(cfg.back_light_penetration, 64.0);
        assert_eq!(cfg.ambient_light_color, Rgb::new(1.0, 0.9, 0.6));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = LightingConfig::from_toml_str("back_light_penetration = 0.0").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "back_light_penetration",
                ..
            }
        ));
        let err = LightingConfig::from_toml_str("ambient_light_strength = 1.5").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "ambient_light_strength", .. }));
        for bad in ["chunk_size = 0", "chunk_size = 48", "chunk_size = 8192"] {
            let err = LightingConfig::from_toml_str(bad).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { field: "chunk_size", .. }), "{}", bad);
        }
        assert!(LightingConfig::from_toml_str("chunk_size = 1").is_ok());
    }

    #[test]
    fn unknown_keys_and_bad_syntax_are_parse_errors() {
        assert!(matches!(
            LightingConfig::from_toml_str("light_radius = 3"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            LightingConfig::from_toml_str("chunk_size = "),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = LightingConfig::from_path("/nonexistent/tilelight/lighting.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
