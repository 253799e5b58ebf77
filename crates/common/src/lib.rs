//! Shared types used by every sketch: colors, canvas sizes, transforms,
//! a seeded PRNG and the workspace configuration.
//!
//! # Invariants
//! - Nothing in here touches a window, a GPU or the filesystem, except
//!   [`SketchbookConfig::load`].
//! - Randomness is always seeded so every sketch is reproducible.

pub mod config;
pub mod rng;
pub mod types;

pub use config::{
    ConfigError, PolyhedraConfig, PongConfig, SierpinskiConfig, SketchbookConfig, SolarConfig,
    WindowConfig,
};
pub use rng::SplitMix64;
pub use types::{CanvasSize, Color, ColorParseError, Transform};

pub fn crate_info() -> &'static str {
    "sketchbook-common v0.1.0"
}
