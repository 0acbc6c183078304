//! Tunable constants for root growth, spawning and the fading surface.
//!
//! [`Config::default`] reproduces the stock animation. A RON file can
//! override any subset of fields; missing fields keep their defaults.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Upper bound accepted for [`Config::max_branches`].
pub const MAX_BRANCHES: usize = 16;
/// Upper bound accepted for [`Config::wave_size`].
pub const MAX_WAVE_SIZE: usize = 10_000;

/// Half-open interval `[min, max)` sampled uniformly.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Draws a value in `[min, max)`. A degenerate span always yields `min`.
    pub fn sample(&self, rng: &mut impl Rng) -> f32 {
        self.min + rng.random::<f32>() * (self.max - self.min)
    }

    fn check(&self, name: &str) -> Result<(), ConfigError> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min > self.max {
            return Err(ConfigError::Invalid(format!(
                "{name} must be a finite span with min <= max, got {}..{}",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Roots planted per scroll wave.
    pub wave_size: usize,
    /// Timer given to every root of a grow wave.
    pub grow_wave_timer: i32,
    /// Timer given to every root of a retract wave.
    pub retract_wave_timer: i32,
    /// Timer given to the root planted under the pointer each frame.
    pub pointer_timer: i32,

    /// Chance per growth step that a node sprouts a branch.
    pub branch_chance: f32,
    pub max_branches: usize,
    /// Multiplier applied to `growth_rate` while shrinking.
    pub retract_factor: f32,

    pub initial_size: Span,
    pub max_size: Span,
    pub growth_rate: Span,
    /// Applied independently to both velocity components.
    pub speed: Span,

    /// Opacity of the white wash painted over the surface every frame.
    pub fade_alpha: f32,
    pub stroke_color: [u8; 3],

    /// Plant one grow wave before the first frame.
    pub initial_wave: bool,
    /// Upper bound on simultaneously growing trees; `None` is unbounded.
    pub max_trees: Option<usize>,
    /// Once this many nodes are held by growing trees no branch sprouts.
    /// `None` lets trees branch without limit.
    pub max_nodes: Option<usize>,
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            wave_size: 10,
            grow_wave_timer: 300,
            retract_wave_timer: 300,
            pointer_timer: 100,
            branch_chance: 0.2,
            max_branches: 3,
            retract_factor: 2.0,
            initial_size: Span::new(2.0, 5.0),
            max_size: Span::new(50.0, 80.0),
            growth_rate: Span::new(0.2, 0.7),
            speed: Span::new(-1.0, 1.0),
            fade_alpha: 0.2,
            stroke_color: [0x32, 0x37, 0x28],
            initial_wave: true,
            max_trees: None,
            max_nodes: Some(3_000),
            seed: None,
        }
    }
}

impl Config {
    /// Reads a RON config file and validates it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let cfg = Self::from_ron(&text)?;
        info!(path = %path.display(), "loaded config");
        Ok(cfg)
    }

    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        let cfg: Self = ron::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.initial_size.check("initial_size")?;
        self.max_size.check("max_size")?;
        self.growth_rate.check("growth_rate")?;
        self.speed.check("speed")?;

        for (name, value) in [
            ("branch_chance", self.branch_chance),
            ("fade_alpha", self.fade_alpha),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must lie in [0, 1], got {value}"
                )));
            }
        }

        for (name, value, limit) in [
            ("max_branches", self.max_branches, MAX_BRANCHES),
            ("wave_size", self.wave_size, MAX_WAVE_SIZE),
        ] {
            if value > limit {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be at most {limit}, got {value}"
                )));
            }
        }

        if !self.retract_factor.is_finite() || self.retract_factor < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "retract_factor must be finite and non-negative, got {}",
                self.retract_factor
            )));
        }

        Ok(())
    }
}
