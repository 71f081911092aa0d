//! Spawner and orbit configuration
//!
//! Loaded from JSON so projectile behaviour can be tuned without rebuilding.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::orbit::{NormalPriority, Orbit2D, OrbitShape, TimeFunc};

/// Named orbit presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrbitPreset {
    #[default]
    Direct,
    /// Sideways arc
    Lob,
    /// Vertical hop
    Hop,
    Zigzag,
    Blink,
    /// Hop of random height, random side
    Scatter,
    Spiral,
}

impl OrbitPreset {
    pub const ALL: [OrbitPreset; 7] = [
        OrbitPreset::Direct,
        OrbitPreset::Lob,
        OrbitPreset::Hop,
        OrbitPreset::Zigzag,
        OrbitPreset::Blink,
        OrbitPreset::Scatter,
        OrbitPreset::Spiral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrbitPreset::Direct => "Direct",
            OrbitPreset::Lob => "Lob",
            OrbitPreset::Hop => "Hop",
            OrbitPreset::Zigzag => "Zigzag",
            OrbitPreset::Blink => "Blink",
            OrbitPreset::Scatter => "Scatter",
            OrbitPreset::Spiral => "Spiral",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "direct" => Some(OrbitPreset::Direct),
            "lob" | "parabola" => Some(OrbitPreset::Lob),
            "hop" | "jump" => Some(OrbitPreset::Hop),
            "zigzag" | "wave" => Some(OrbitPreset::Zigzag),
            "blink" | "warp" => Some(OrbitPreset::Blink),
            "scatter" => Some(OrbitPreset::Scatter),
            "spiral" | "rotate" => Some(OrbitPreset::Spiral),
            _ => None,
        }
    }

    /// Default tuning for this preset
    pub fn config(&self) -> OrbitConfig {
        let (shape, normal_priority, time_func, duration) = match self {
            OrbitPreset::Direct => (
                OrbitShape::Direct,
                NormalPriority::None,
                TimeFunc::Linear,
                0.5,
            ),
            OrbitPreset::Lob => (
                OrbitShape::Parabola { coef: 120.0 },
                NormalPriority::Up,
                TimeFunc::Linear,
                0.8,
            ),
            OrbitPreset::Hop => (
                OrbitShape::Jump { height: 200.0 },
                NormalPriority::None,
                TimeFunc::Linear,
                0.6,
            ),
            OrbitPreset::Zigzag => (
                OrbitShape::Wave { amplitude: 20.0, hz: 3.0 },
                NormalPriority::None,
                TimeFunc::Linear,
                1.0,
            ),
            OrbitPreset::Blink => (
                OrbitShape::Warp { threshold: 0.5 },
                NormalPriority::None,
                TimeFunc::Linear,
                0.4,
            ),
            OrbitPreset::Scatter => (
                OrbitShape::RandomJump { min: 80.0, max: 240.0 },
                NormalPriority::Random,
                TimeFunc::ease(0.6),
                0.7,
            ),
            OrbitPreset::Spiral => (
                OrbitShape::Rotate { rotations: 1.5 },
                NormalPriority::None,
                TimeFunc::ease(1.4),
                1.2,
            ),
        };
        OrbitConfig {
            shape,
            normal_priority,
            time_func,
            duration,
        }
    }
}

/// Spawner settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerConfig {
    /// Label used in logs
    pub name: String,
    /// Cached instance limit, negative for unbounded
    pub cache_size: i32,
    /// World position new instances are created at, as `[x, y]`
    pub origin: Vec2,
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self {
            name: "spawner".to_string(),
            cache_size: 16,
            origin: Vec2::ZERO,
        }
    }
}

/// One orbit: shape, normal policy, time shaping and duration in seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitConfig {
    pub shape: OrbitShape,
    pub normal_priority: NormalPriority,
    pub time_func: TimeFunc,
    pub duration: f32,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        OrbitPreset::Direct.config()
    }
}

impl OrbitConfig {
    pub fn validate(&self) -> Result<()> {
        self.shape.validate()?;
        self.time_func.validate()?;
        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err(ConfigError::InvalidDuration(self.duration));
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The generator described by this config
    pub fn build(&self) -> Orbit2D {
        Orbit2D::new(self.shape).with_priority(self.normal_priority)
    }
}

/// Top-level configuration document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub spawner: SpawnerConfig,
    pub orbits: Vec<OrbitConfig>,
}

impl Config {
    /// Spawner defaults plus every preset
    pub fn with_presets() -> Self {
        Self {
            spawner: SpawnerConfig::default(),
            orbits: OrbitPreset::ALL.iter().map(|p| p.config()).collect(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        log::info!(
            "Loaded config: spawner '{}' ({} orbits)",
            config.spawner.name,
            config.orbits.len()
        );
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.orbits.iter().try_for_each(OrbitConfig::validate)
    }
}
