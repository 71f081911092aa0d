//! Scalar shaping functions over normalized progress `p` (nominally 0..=1)
//!
//! Tangential component f(p): f(0) != 0 shifts the start, f(1) != 1 misses the goal.
//! Normal components should vanish at both ends.

#[inline]
pub fn linear(p: f32) -> f32 {
    p
}

#[inline]
pub fn zero(_p: f32) -> f32 {
    0.0
}

#[inline]
pub fn one(_p: f32) -> f32 {
    1.0
}

/// Upward parabola: 0 at both ends, 0.25 at p = 0.5
#[inline]
pub fn parabola_up(p: f32) -> f32 {
    p * (1.0 - p)
}

#[inline]
pub fn parabola_down(p: f32) -> f32 {
    1.0 - parabola_up(p)
}
