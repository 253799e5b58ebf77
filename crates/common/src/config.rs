//! Workspace configuration, loaded from an optional YAML file.
//!
//! Every field has a default, so an empty file (or no file) yields the
//! settings the sketches were authored with.

use crate::types::Color;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Errors from loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("YAML error in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Top-level configuration shared by the desktop host and the CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SketchbookConfig {
    pub window: WindowConfig,
    /// Fixed simulation rate in ticks per second.
    pub tick_rate: f64,
    /// Directory that texture paths are resolved against.
    pub assets_dir: PathBuf,
    /// Seed for every sketch's PRNG.
    pub seed: u64,
    pub pong: PongConfig,
    pub sierpinski: SierpinskiConfig,
    pub solar: SolarConfig,
    pub polyhedra: PolyhedraConfig,
    /// Key name (e.g. `KeyW`, `ArrowUp`) to action name overrides.
    pub bindings: BTreeMap<String, String>,
}

impl Default for SketchbookConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            tick_rate: 60.0,
            assets_dir: PathBuf::from("./images"),
            seed: 42,
            pong: PongConfig::default(),
            sierpinski: SierpinskiConfig::default(),
            solar: SolarConfig::default(),
            polyhedra: PolyhedraConfig::default(),
            bindings: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            vsync: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PongConfig {
    pub width: f32,
    pub height: f32,
    /// Paddle movement in canvas pixels per tick.
    pub paddle_speed: f32,
    /// Ball movement along each axis in canvas pixels per tick.
    pub ball_speed: f32,
    pub ball_radius: f32,
}

impl Default for PongConfig {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 300.0,
            paddle_speed: 2.0,
            ball_speed: 3.0,
            ball_radius: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SierpinskiConfig {
    pub width: f32,
    pub height: f32,
    pub depth: u32,
    pub fill: Color,
    pub cutout: Color,
    pub outline: Color,
}

impl Default for SierpinskiConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            depth: 3,
            fill: Color::from_hex(0xDD0C97),
            cutout: Color::WHITE,
            outline: Color::BLACK,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolarConfig {
    /// Seconds for the shared spin term to complete a full turn.
    pub duration: f32,
    pub asteroids: u32,
    /// Optional YAML planet catalog replacing the built-in one.
    pub catalog: Option<PathBuf>,
}

impl Default for SolarConfig {
    fn default() -> Self {
        Self {
            duration: 5.0,
            asteroids: 50,
            catalog: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolyhedraConfig {
    /// Seconds for one full rotation about each object's axis.
    pub duration: f32,
}

impl Default for PolyhedraConfig {
    fn default() -> Self {
        Self { duration: 10.0 }
    }
}

impl SketchbookConfig {
    /// Load from a YAML file. Missing fields fall back to defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        tracing::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Load from `path` when given, otherwise use defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    /// Reject values the sketches cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tick_rate.is_finite() && self.tick_rate > 0.0) {
            return Err(ConfigError::Invalid {
                field: "tick_rate",
                reason: format!("must be positive, got {}", self.tick_rate),
            });
        }
        let pong = &self.pong;
        if !positive(pong.width) || !positive(pong.height) {
            return Err(ConfigError::Invalid {
                field: "pong",
                reason: format!("canvas size must be positive, got {}x{}", pong.width, pong.height),
            });
        }
        if !non_negative(pong.paddle_speed) || !non_negative(pong.ball_speed) {
            return Err(ConfigError::Invalid {
                field: "pong",
                reason: "speeds must be finite and not negative".into(),
            });
        }
        if !positive(pong.ball_radius) || pong.ball_radius * 2.0 >= pong.width.min(pong.height) {
            return Err(ConfigError::Invalid {
                field: "pong.ball_radius",
                reason: "ball does not fit on the canvas".into(),
            });
        }
        if !positive(self.sierpinski.width) || !positive(self.sierpinski.height) {
            return Err(ConfigError::Invalid {
                field: "sierpinski",
                reason: "canvas size must be positive".into(),
            });
        }
        if self.sierpinski.depth > 8 {
            return Err(ConfigError::Invalid {
                field: "sierpinski.depth",
                reason: format!("at most 8, got {}", self.sierpinski.depth),
            });
        }
        if !positive(self.solar.duration) || !positive(self.polyhedra.duration) {
            return Err(ConfigError::Invalid {
                field: "duration",
                reason: "animation durations must be positive".into(),
            });
        }
        Ok(())
    }

    /// Seconds per tick.
    pub fn tick_interval(&self) -> f64 {
        1.0 / self.tick_rate
    }
}

fn positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

fn non_negative(value: f32) -> bool {
    value.is_finite() && value >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_authored_sketches() {
        let c = SketchbookConfig::default();
        assert_eq!(c.pong.width, 600.0);
        assert_eq!(c.pong.paddle_speed, 2.0);
        assert_eq!(c.sierpinski.depth, 3);
        assert_eq!(c.sierpinski.fill, Color::from_hex(0xDD0C97));
        assert_eq!(c.solar.duration, 5.0);
        assert_eq!(c.polyhedra.duration, 10.0);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let yaml = "seed: 7\nsierpinski:\n  depth: 5\n  fill: \"#00FF00\"\n";
        let c: SketchbookConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(c.seed, 7);
        assert_eq!(c.sierpinski.depth, 5);
        assert_eq!(c.sierpinski.fill, Color::rgb(0.0, 1.0, 0.0));
        assert_eq!(c.sierpinski.cutout, Color::WHITE);
        assert_eq!(c.pong, PongConfig::default());
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "tick_rate: 30\nbindings:\n  KeyJ: LeftPaddleUp").unwrap();
        let c = SketchbookConfig::load(file.path()).unwrap();
        assert_eq!(c.tick_rate, 30.0);
        assert_eq!(c.bindings.get("KeyJ").map(String::as_str), Some("LeftPaddleUp"));
        assert!((c.tick_interval() - 1.0 / 30.0).abs() < 1e-12);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = SketchbookConfig::load("/nonexistent/sketchbook.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn load_bad_yaml_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "tick_rate: [not, a, number]").unwrap();
        let err = SketchbookConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn validate_rejects_deep_fractal() {
        let mut c = SketchbookConfig::default();
        c.sierpinski.depth = 12;
        assert!(matches!(
            c.validate(),
            Err(ConfigError::Invalid {
                field: "sierpinski.depth",
                ..
            })
        ));
    }

    #[test]
    fn validate_rejects_zero_tick_rate() {
        let c = SketchbookConfig {
            tick_rate: 0.0,
            ..SketchbookConfig::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn load_or_default_without_path() {
        let c = SketchbookConfig::load_or_default(None).unwrap();
        assert_eq!(c, SketchbookConfig::default());
    }

    #[test]
    fn validate_rejects_nan_sizes_and_speeds() {
        let mut c = SketchbookConfig::default();
        c.pong.width = f32::NAN;
        assert!(matches!(c.validate(), Err(ConfigError::Invalid { field: "pong", .. })));

        let mut c = SketchbookConfig::default();
        c.pong.ball_speed = f32::NAN;
        assert!(c.validate().is_err());

        let mut c = SketchbookConfig::default();
        c.pong.ball_radius = f32::NAN;
        assert!(c.validate().is_err());

        let mut c = SketchbookConfig::default();
        c.sierpinski.height = f32::INFINITY;
        assert!(c.validate().is_err());

        let mut c = SketchbookConfig::default();
        c.solar.duration = f32::NAN;
        assert!(c.validate().is_err());
    }

    #[test]
    fn nan_from_yaml_is_rejected_on_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "pong:\n  height: .nan").unwrap();
        let err = SketchbookConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "pong", .. }));
    }
}
