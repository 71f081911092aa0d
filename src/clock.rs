//! Time sources for orbit runs
//!
//! Runs read elapsed time from a [`Clock`] on every pull. Hosts with a fixed
//! timestep drive a [`ManualClock`]; anything else can use [`SystemClock`].

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Monotonic time in seconds
pub trait Clock {
    fn now(&self) -> f32;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> f32 {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for Rc<C> {
    fn now(&self) -> f32 {
        (**self).now()
    }
}

/// Wall clock measured from construction
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> f32 {
        self.origin.elapsed().as_secs_f32()
    }
}

/// Clock advanced explicitly by the host loop. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    time: Rc<Cell<f32>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward by `dt` seconds (negative steps are ignored)
    pub fn advance(&self, dt: f32) {
        if dt > 0.0 {
            self.time.set(self.time.get() + dt);
        }
    }

    /// Jump to an absolute time, never backwards
    pub fn set(&self, time: f32) {
        if time > self.time.get() {
            self.time.set(time);
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f32 {
        self.time.get()
    }
}
