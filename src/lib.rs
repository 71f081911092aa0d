//! Orbit Pool - object reuse and parametric motion for 2D game hosts
//!
//! Core modules:
//! - `pool`: Bounded object pooling (activatable storage + spawners)
//! - `orbit`: Time-driven 2D trajectories between two endpoints
//! - `scene`: Minimal host world whose nodes can be pooled and tracked
//! - `clock`: Time sources driving trajectory runs
//! - `random`: Coin/dice helpers over explicit generators
//! - `config`: Data-driven spawner and orbit tuning

pub mod clock;
pub mod config;
pub mod error;
pub mod orbit;
pub mod pool;
pub mod random;
pub mod scene;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{Config, OrbitConfig, OrbitPreset, SpawnerConfig};
pub use error::ConfigError;

use glam::Vec2;

/// Host loop constants
pub mod consts {
    /// Fixed frame step of the demo host (60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;
    /// Maximum frames the demo host simulates
    pub const MAX_FRAMES: u32 = 60 * 30;
}

/// Rotate 90° clockwise: `(x, y) -> (y, -x)`
#[inline]
pub fn clockwise_normal(v: Vec2) -> Vec2 {
    Vec2::new(v.y, -v.x)
}

/// Rotate 90° counter-clockwise: `(x, y) -> (-y, x)`
#[inline]
pub fn counter_clockwise_normal(v: Vec2) -> Vec2 {
    -clockwise_normal(v)
}
