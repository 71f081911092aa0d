//! Trajectory generation
//!
//! An [`Orbit2D`] is a shape plus a normal-direction policy. Starting a run
//! fixes the per-run randomness in a [`RunContext`]; the resulting
//! [`OrbitRun`] is a pull iterator driven by the host's tick:
//!
//! 1. the first pull yields `edge.start()` and starts the clock
//! 2. every pull while `elapsed < duration` yields `origin + tangent + normal`
//!    at `p = time_func(elapsed / duration)`
//! 3. the pull after that yields `edge.dest()` exactly, then the run is over
//!
//! The number of samples depends on the tick rate. Dropping a run early is fine.

use std::iter::FusedIterator;

use glam::Vec2;
use rand::Rng;

use super::edge::OrbitEdge;
use super::shape::{NormalPriority, OrbitOption, OrbitShape};
use super::time_func::TimeFunc;
use crate::clock::Clock;
use crate::random;

/// Values decided once at the start of a run and shared by all its samples
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RunContext {
    pub option: OrbitOption,
    /// Negate every normal contribution (random priority)
    pub flip_normal: bool,
}

/// Trajectory generator: shape + normal priority
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Orbit2D {
    pub shape: OrbitShape,
    pub normal_priority: NormalPriority,
}

impl Orbit2D {
    /// Straight line, no normal adjustment
    pub const DIRECT: Orbit2D = Orbit2D {
        shape: OrbitShape::Direct,
        normal_priority: NormalPriority::None,
    };

    pub fn new(shape: OrbitShape) -> Self {
        Self {
            shape,
            normal_priority: NormalPriority::default(),
        }
    }

    pub fn direct() -> Self {
        Self::DIRECT
    }

    pub fn parabola(coef: f32) -> Self {
        Self::new(OrbitShape::Parabola { coef })
    }

    pub fn jump(height: f32) -> Self {
        Self::new(OrbitShape::Jump { height })
    }

    pub fn wave(amplitude: f32, hz: f32) -> Self {
        Self::new(OrbitShape::Wave { amplitude, hz })
    }

    pub fn warp(threshold: f32) -> Self {
        Self::new(OrbitShape::Warp { threshold })
    }

    pub fn random_jump(min: f32, max: f32) -> Self {
        Self::new(OrbitShape::RandomJump { min, max })
    }

    pub fn rotate(rotations: f32) -> Self {
        Self::new(OrbitShape::Rotate { rotations })
    }

    pub fn with_priority(mut self, priority: NormalPriority) -> Self {
        self.normal_priority = priority;
        self
    }

    /// Decide the per-run values: normal flip first, then the shape option
    pub fn begin<R: Rng + ?Sized>(&self, rng: &mut R) -> RunContext {
        let flip_normal =
            self.normal_priority == NormalPriority::Random && random::coin_toss(rng, 50.0);
        let option = self.shape.create_option(rng);
        RunContext {
            option,
            flip_normal,
        }
    }

    /// Position at normalized progress `p`
    pub fn sample(&self, edge: &OrbitEdge, context: &RunContext, last: Vec2, p: f32) -> Vec2 {
        let tangent = self.shape.tangent(edge, last, p, context.option);
        let mut normal = self
            .normal_priority
            .adjust(self.shape.normal(edge, last, p, context.option));
        if context.flip_normal {
            normal = -normal;
        }
        self.shape.origin(edge, last, p) + tangent + normal
    }

    /// Start a run using the thread-local generator for per-run randomness
    pub fn calc<C: Clock>(
        &self,
        edge: OrbitEdge,
        time_func: TimeFunc,
        duration: f32,
        clock: C,
    ) -> OrbitRun<C> {
        self.calc_with_rng(edge, time_func, duration, clock, &mut rand::rng())
    }

    /// Start a run with linear time
    pub fn calc_linear<C: Clock>(&self, edge: OrbitEdge, duration: f32, clock: C) -> OrbitRun<C> {
        self.calc(edge, TimeFunc::Linear, duration, clock)
    }

    /// Start a run drawing per-run randomness from `rng`
    pub fn calc_with_rng<C: Clock, R: Rng + ?Sized>(
        &self,
        edge: OrbitEdge,
        time_func: TimeFunc,
        duration: f32,
        clock: C,
        rng: &mut R,
    ) -> OrbitRun<C> {
        let context = self.begin(rng);
        log::debug!(
            "Orbit run: {} over {}s (option {:?}, flip {})",
            self.shape.as_str(),
            duration,
            context.option,
            context.flip_normal
        );
        OrbitRun {
            orbit: *self,
            edge,
            time_func,
            duration,
            clock,
            context,
            start_time: 0.0,
            last: Vec2::ZERO,
            phase: RunPhase::Pending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunPhase {
    /// Nothing pulled yet
    Pending,
    Running,
    Done,
}

/// One pass along an orbit. Finite and not restartable.
#[derive(Debug, Clone)]
pub struct OrbitRun<C> {
    orbit: Orbit2D,
    edge: OrbitEdge,
    time_func: TimeFunc,
    duration: f32,
    clock: C,
    context: RunContext,
    start_time: f32,
    last: Vec2,
    phase: RunPhase,
}

impl<C: Clock> OrbitRun<C> {
    pub fn edge(&self) -> &OrbitEdge {
        &self.edge
    }

    pub fn context(&self) -> &RunContext {
        &self.context
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Whether a run with this much elapsed time has reached its destination
    pub fn is_done(&self, elapsed: f32) -> bool {
        !self.has_duration() || elapsed >= self.duration
    }

    /// Normalized progress after `elapsed` seconds
    pub fn progress(&self, elapsed: f32) -> f32 {
        if self.is_done(elapsed) {
            1.0
        } else {
            self.time_func.apply(elapsed / self.duration)
        }
    }

    /// Position after `elapsed` seconds, independent of the pull state
    pub fn sample(&self, elapsed: f32) -> Vec2 {
        if self.is_done(elapsed) {
            return self.edge.dest();
        }
        let p = self.progress(elapsed);
        self.orbit.sample(&self.edge, &self.context, self.edge.start(), p)
    }

    /// Seconds since the first pull, if the run has started
    pub fn elapsed(&self) -> Option<f32> {
        match self.phase {
            RunPhase::Pending => None,
            _ => Some(self.clock.now() - self.start_time),
        }
    }

    fn has_duration(&self) -> bool {
        self.duration.is_finite() && self.duration > 0.0
    }
}

impl<C: Clock> Iterator for OrbitRun<C> {
    type Item = Vec2;

    fn next(&mut self) -> Option<Vec2> {
        match self.phase {
            RunPhase::Pending => {
                self.start_time = self.clock.now();
                self.last = self.edge.start();
                self.phase = RunPhase::Running;
                Some(self.last)
            }
            RunPhase::Running => {
                let elapsed = self.clock.now() - self.start_time;
                if self.is_done(elapsed) {
                    self.phase = RunPhase::Done;
                    log::trace!("Orbit run finished after {}s", elapsed);
                    return Some(self.edge.dest());
                }
                let p = self.time_func.apply(elapsed / self.duration);
                self.last = self.orbit.sample(&self.edge, &self.context, self.last, p);
                Some(self.last)
            }
            RunPhase::Done => None,
        }
    }
}

impl<C: Clock> FusedIterator for OrbitRun<C> {}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use super::*;
    use crate::clock::ManualClock;

    const ALL_SHAPES: [OrbitShape; 7] = [
        OrbitShape::Direct,
        OrbitShape::Parabola { coef: 3.0 },
        OrbitShape::Jump { height: 5.0 },
        OrbitShape::Wave { amplitude: 1.0, hz: 2.0 },
        OrbitShape::Warp { threshold: 0.5 },
        OrbitShape::RandomJump { min: 1.0, max: 4.0 },
        OrbitShape::Rotate { rotations: 1.5 },
    ];

    /// Pull a run to completion, stepping the clock by `dt` between pulls
    fn drive(
        orbit: Orbit2D,
        edge: OrbitEdge,
        time_func: TimeFunc,
        duration: f32,
        dt: f32,
    ) -> Vec<Vec2> {
        let clock = ManualClock::new();
        let mut rng = Pcg32::seed_from_u64(42);
        let mut run = orbit.calc_with_rng(edge, time_func, duration, clock.clone(), &mut rng);
        let mut samples = Vec::new();
        while let Some(pos) = run.next() {
            samples.push(pos);
            clock.advance(dt);
        }
        samples
    }

    fn edge() -> OrbitEdge {
        OrbitEdge::constant(Vec2::new(1.0, 2.0), Vec2::new(5.0, 7.0))
    }

    #[test]
    fn test_every_shape_starts_and_ends_on_edge() {
        for shape in ALL_SHAPES {
            let samples = drive(Orbit2D::new(shape), edge(), TimeFunc::Linear, 1.0, 0.1);
            assert_eq!(samples.first(), Some(&Vec2::new(1.0, 2.0)), "{shape:?}");
            assert_eq!(samples.last(), Some(&Vec2::new(5.0, 7.0)), "{shape:?}");
            assert!(samples.len() >= 10, "{shape:?}: {}", samples.len());
        }
    }

    #[test]
    fn test_direct_stays_on_segment() {
        let samples = drive(Orbit2D::direct(), edge(), TimeFunc::Linear, 1.0, 0.07);
        let dir = Vec2::new(4.0, 5.0);
        for s in samples {
            let rel = s - Vec2::new(1.0, 2.0);
            assert!(rel.perp_dot(dir).abs() < 1e-4, "{s:?} off the line");
            let t = rel.dot(dir) / dir.length_squared();
            assert!((-1e-5..=1.0 + 1e-5).contains(&t));
        }
    }

    #[test]
    fn test_zero_and_negative_duration() {
        for duration in [0.0, -1.0, f32::NAN] {
            let samples = drive(Orbit2D::parabola(2.0), edge(), TimeFunc::Linear, duration, 0.1);
            assert_eq!(samples, vec![Vec2::new(1.0, 2.0), Vec2::new(5.0, 7.0)]);
        }
    }

    #[test]
    fn test_run_is_fused() {
        let clock = ManualClock::new();
        let mut run = Orbit2D::direct().calc_linear(edge(), 0.0, clock);
        assert!(run.next().is_some());
        assert!(run.next().is_some());
        assert!(run.next().is_none());
        assert!(run.next().is_none());
    }

    #[test]
    fn test_parabola_peak_offset() {
        let clock = ManualClock::new();
        let run = Orbit2D::parabola(4.0).calc_linear(edge(), 2.0, clock);
        let mid = run.sample(1.0);
        let on_line = Vec2::new(1.0, 2.0) + Vec2::new(4.0, 5.0) * 0.5;
        assert!(((mid - on_line).length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_jump_scenario() {
        let clock = ManualClock::new();
        let run = Orbit2D::jump(5.0).calc_linear(edge(), 2.0, clock);
        let mid = run.sample(1.0);
        let expected = Vec2::new(1.0, 2.0) + Vec2::new(4.0, 5.0) * 0.5 + Vec2::new(0.0, 1.25);
        assert!(mid.abs_diff_eq(expected, 1e-5), "{mid:?}");
    }

    #[test]
    fn test_warp_snaps_at_threshold() {
        let clock = ManualClock::new();
        let run = Orbit2D::warp(0.5).calc_linear(edge(), 2.0, clock);
        assert_eq!(run.sample(0.5), Vec2::new(1.0, 2.0));
        assert_eq!(run.sample(0.99), Vec2::new(1.0, 2.0));
        assert_eq!(run.sample(1.0), Vec2::new(5.0, 7.0));
        assert_eq!(run.sample(1.5), Vec2::new(5.0, 7.0));
    }

    #[test]
    fn test_time_func_reshapes_progress() {
        let clock = ManualClock::new();
        let run = Orbit2D::direct().calc(edge(), TimeFunc::ease(0.0), 1.0, clock);
        let p = run.progress(0.25);
        assert!((p - 0.15625).abs() < 1e-6);
        let pos = run.sample(0.25);
        assert!(pos.abs_diff_eq(Vec2::new(1.0, 2.0) + Vec2::new(4.0, 5.0) * p, 1e-5));
    }

    #[test]
    fn test_random_priority_flips_once_per_run() {
        let orbit = Orbit2D::parabola(2.0).with_priority(NormalPriority::Random);
        let base = edge();
        let mut flipped = 0;
        for seed in 0..64 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let run = orbit.calc_with_rng(
                base.clone(),
                TimeFunc::Linear,
                1.0,
                ManualClock::new(),
                &mut rng,
            );
            // duration is 1s, so elapsed == p
            let normal_sign = |p: f32| {
                let off = run.sample(p) - (base.start() + base.direction() * p);
                off.dot(base.normal()).signum()
            };
            let first = normal_sign(0.2);
            for t in [0.4, 0.6, 0.8] {
                assert_eq!(normal_sign(t), first);
            }
            if run.context().flip_normal {
                flipped += 1;
                assert!(first < 0.0);
            }
        }
        assert!(flipped > 0 && flipped < 64);
    }

    #[test]
    fn test_priority_up_forces_upward_arc() {
        // travelling right, the clockwise normal points down
        let flat = OrbitEdge::constant(Vec2::ZERO, Vec2::new(10.0, 0.0));
        let run = Orbit2D::parabola(4.0)
            .with_priority(NormalPriority::Up)
            .calc_linear(flat, 1.0, ManualClock::new());
        assert!(run.sample(0.5).y > 0.0);
    }

    #[test]
    fn test_random_jump_height_fixed_per_run() {
        let mut rng = Pcg32::seed_from_u64(9);
        let run = Orbit2D::random_jump(2.0, 6.0).calc_with_rng(
            edge(),
            TimeFunc::Linear,
            1.0,
            ManualClock::new(),
            &mut rng,
        );
        let OrbitOption::JumpHeight(h) = run.context().option else {
            panic!("no jump height drawn");
        };
        let line = |p: f32| Vec2::new(1.0, 2.0) + Vec2::new(4.0, 5.0) * p;
        for p in [0.25f32, 0.5, 0.75] {
            let lift = run.sample(p).y - line(p).y;
            assert!((lift - h * p * (1.0 - p)).abs() < 1e-4);
        }
    }

    #[test]
    fn test_moving_destination_is_reached() {
        let target = Rc::new(Cell::new(Vec2::new(10.0, 0.0)));
        let t = target.clone();
        let moving = OrbitEdge::with_dest_fn(Vec2::ZERO, move || t.get());

        let clock = ManualClock::new();
        let mut run = Orbit2D::jump(3.0).calc_linear(moving, 1.0, clock.clone());
        let mut last = Vec2::ZERO;
        let mut dest_at_pull = Vec2::ZERO;
        while let Some(pos) = run.next() {
            last = pos;
            dest_at_pull = run.edge().dest();
            clock.advance(0.1);
            target.set(target.get() + Vec2::new(0.5, 0.25));
        }
        assert_eq!(last, dest_at_pull);
        assert!(dest_at_pull.x > 10.0);
    }

    #[test]
    fn test_sample_ignores_pulls() {
        let clock = ManualClock::new();
        let mut run = Orbit2D::wave(1.0, 2.0).calc_linear(edge(), 1.0, clock.clone());
        let before = run.sample(0.3);
        for _ in 0..5 {
            run.next();
            clock.advance(0.1);
        }
        assert_eq!(run.sample(0.3), before);
    }

    #[test]
    fn test_infinite_random_jump_bound_does_not_panic() {
        let mut run = Orbit2D::random_jump(f32::NEG_INFINITY, 1.0).calc_linear(
            edge(),
            1.0,
            ManualClock::new(),
        );
        assert_eq!(run.context().option, OrbitOption::JumpHeight(1.0));
        assert_eq!(run.next(), Some(Vec2::new(1.0, 2.0)));
    }

    #[test]
    fn test_elapsed_starts_on_first_pull() {
        let clock = ManualClock::new();
        clock.advance(5.0);
        let mut run = Orbit2D::direct().calc_linear(edge(), 1.0, clock.clone());
        assert_eq!(run.elapsed(), None);
        run.next();
        clock.advance(0.25);
        assert_eq!(run.elapsed(), Some(0.25));
    }

    proptest! {
        #[test]
        fn prop_runs_hit_both_endpoints(
            shape_idx in 0usize..ALL_SHAPES.len(),
            duration in 0.05f32..3.0,
            dt in 0.01f32..0.5,
        ) {
            let orbit = Orbit2D::new(ALL_SHAPES[shape_idx]);
            let samples = drive(orbit, edge(), TimeFunc::Linear, duration, dt);
            prop_assert!(samples.len() >= 2);
            prop_assert_eq!(samples[0], Vec2::new(1.0, 2.0));
            prop_assert_eq!(*samples.last().unwrap(), Vec2::new(5.0, 7.0));
        }
    }
}
