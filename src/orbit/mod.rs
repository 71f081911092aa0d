//! Parametric 2D trajectories
//!
//! A trajectory goes from an [`OrbitEdge`]'s start to its destination over a
//! fixed duration. Its shape decides the tangential and normal displacement
//! at each normalized progress value; a [`TimeFunc`] reshapes how progress
//! follows elapsed time.

pub mod axis;
pub mod edge;
pub mod run;
pub mod shape;
pub mod time_func;

pub use edge::{EdgePoint, OrbitEdge, PositionSource};
pub use run::{Orbit2D, OrbitRun, RunContext};
pub use shape::{NormalPriority, OrbitOption, OrbitShape};
pub use time_func::{Keyframe, TimeFunc};
