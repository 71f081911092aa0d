//! Object pooling
//!
//! - `activatable`: the capability pooled objects provide
//! - `storage`: bounded reuse cache with deferred destruction of overflow
//! - `spawner`: prototype-bound facade used by game code

pub mod activatable;
pub mod spawner;
pub mod storage;

pub use activatable::Activatable;
pub use spawner::{Prototype, Spawner};
pub use storage::{ActivatableStorage, INFINITY_LIMIT};
