//! Orbit edges: the start/destination pair of one trajectory segment
//!
//! Each endpoint is re-resolved on every access, so an edge can follow a
//! moving target while a run is in progress.

use std::fmt;
use std::rc::Rc;

use glam::Vec2;

use crate::{clockwise_normal, counter_clockwise_normal};

/// Anything that can report a current world position
pub trait PositionSource {
    fn position(&self) -> Vec2;
}

impl<F> PositionSource for F
where
    F: Fn() -> Vec2,
{
    fn position(&self) -> Vec2 {
        self()
    }
}

/// One endpoint of an edge
#[derive(Clone)]
pub enum EdgePoint {
    /// A constant position
    Fixed(Vec2),
    /// Evaluated on every access
    Func(Rc<dyn Fn() -> Vec2>),
    /// A tracked target's current position plus a fixed offset
    Tracked {
        target: Rc<dyn PositionSource>,
        offset: Vec2,
    },
}

impl EdgePoint {
    #[inline]
    pub fn resolve(&self) -> Vec2 {
        match self {
            EdgePoint::Fixed(pos) => *pos,
            EdgePoint::Func(f) => f(),
            EdgePoint::Tracked { target, offset } => target.position() + *offset,
        }
    }
}

impl fmt::Debug for EdgePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgePoint::Fixed(pos) => f.debug_tuple("Fixed").field(pos).finish(),
            EdgePoint::Func(_) => f.write_str("Func(..)"),
            EdgePoint::Tracked { offset, .. } => f
                .debug_struct("Tracked")
                .field("offset", offset)
                .finish_non_exhaustive(),
        }
    }
}

impl From<Vec2> for EdgePoint {
    fn from(pos: Vec2) -> Self {
        EdgePoint::Fixed(pos)
    }
}

/// Start and destination of a trajectory
#[derive(Debug, Clone)]
pub struct OrbitEdge {
    start: EdgePoint,
    dest: EdgePoint,
}

impl OrbitEdge {
    pub fn new(start: impl Into<EdgePoint>, dest: impl Into<EdgePoint>) -> Self {
        Self {
            start: start.into(),
            dest: dest.into(),
        }
    }

    /// Fixed start and destination
    pub fn constant(start: Vec2, dest: Vec2) -> Self {
        Self::new(start, dest)
    }

    /// Both endpoints computed on demand
    pub fn from_fns(start: impl Fn() -> Vec2 + 'static, dest: impl Fn() -> Vec2 + 'static) -> Self {
        Self::new(EdgePoint::Func(Rc::new(start)), EdgePoint::Func(Rc::new(dest)))
    }

    /// Fixed start, destination computed on demand
    pub fn with_dest_fn(start: Vec2, dest: impl Fn() -> Vec2 + 'static) -> Self {
        Self::new(start, EdgePoint::Func(Rc::new(dest)))
    }

    /// Fixed start; destination follows `target` offset by `target_delta`
    pub fn tracking(start: Vec2, target: Rc<dyn PositionSource>, target_delta: Vec2) -> Self {
        Self::new(
            start,
            EdgePoint::Tracked {
                target,
                offset: target_delta,
            },
        )
    }

    /// Both endpoints follow `target`.
    ///
    /// The destination is `target + target_delta`; the start keeps the offset
    /// between `start` and the target's position at construction time.
    pub fn target_relative(
        start: Vec2,
        target: Rc<dyn PositionSource>,
        target_delta: Vec2,
    ) -> Self {
        let start_delta = start - target.position();
        Self::new(
            EdgePoint::Tracked {
                target: target.clone(),
                offset: target_delta + start_delta,
            },
            EdgePoint::Tracked {
                target,
                offset: target_delta,
            },
        )
    }

    #[inline]
    pub fn start(&self) -> Vec2 {
        self.start.resolve()
    }

    #[inline]
    pub fn dest(&self) -> Vec2 {
        self.dest.resolve()
    }

    /// Start -> destination
    #[inline]
    pub fn direction(&self) -> Vec2 {
        self.dest() - self.start()
    }

    pub fn normalized_direction(&self) -> Vec2 {
        self.direction().normalize_or_zero()
    }

    /// Normal of the direction (clockwise)
    #[inline]
    pub fn normal(&self) -> Vec2 {
        self.clockwise_normal()
    }

    pub fn normalized_normal(&self) -> Vec2 {
        self.normal().normalize_or_zero()
    }

    pub fn clockwise_normal(&self) -> Vec2 {
        clockwise_normal(self.direction())
    }

    pub fn counter_clockwise_normal(&self) -> Vec2 {
        counter_clockwise_normal(self.direction())
    }
}
