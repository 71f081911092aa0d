//! Random helpers: percentage coin tosses, weighted dice, ranged floats
//!
//! All helpers take the generator explicitly. Pass a seeded `Pcg32` for
//! reproducible results or `rand::rng()` (thread-local) otherwise.

use glam::Vec2;
use rand::Rng;

/// Uniform float in `min..=max`. Bounds may come in either order.
///
/// Never panics. An infinite bound yields the other, finite one; a span too
/// wide for `f32` is sampled by interpolating between the bounds.
pub fn range<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    if lo.is_nan() || hi.is_nan() || lo >= hi {
        return lo;
    }
    if !lo.is_finite() {
        return if hi.is_finite() { hi } else { lo };
    }
    if !hi.is_finite() {
        return lo;
    }

    if (hi - lo).is_finite() {
        rng.random_range(lo..=hi)
    } else {
        let u: f32 = rng.random();
        (lo * (1.0 - u) + hi * u).clamp(lo, hi)
    }
}

/// `true` with `percent`% probability
pub fn coin_toss<R: Rng + ?Sized>(rng: &mut R, percent: f32) -> bool {
    if percent >= 100.0 {
        return true;
    }
    if percent <= 0.0 {
        return false;
    }
    rng.random::<f32>() * 100.0 < percent
}

/// Roll a die whose face `i` has weight `weights[i]`; returns the face index.
///
/// All-zero weights land on the last face. `None` when there are no faces.
pub fn dice_toss<R: Rng + ?Sized>(rng: &mut R, weights: &[u32]) -> Option<usize> {
    let last = weights.len().checked_sub(1)?;
    let total: u64 = weights.iter().map(|&w| u64::from(w)).sum();
    if total == 0 {
        return Some(last);
    }

    let value = rng.random_range(0..total);
    let mut acc = 0u64;
    for (i, &w) in weights.iter().enumerate() {
        acc += u64::from(w);
        if acc > value {
            return Some(i);
        }
    }
    Some(last)
}

/// Roll `count` times; `result[i]` is how often face `i` came up
pub fn dice_toss_many<R: Rng + ?Sized>(rng: &mut R, count: u32, weights: &[u32]) -> Vec<u32> {
    let mut hits = vec![0u32; weights.len()];
    if weights.is_empty() {
        return hits;
    }
    for _ in 0..count {
        if let Some(face) = dice_toss(rng, weights) {
            hits[face] += 1;
        }
    }
    hits
}

/// Vector with each component drawn from the matching bounds
pub fn random_vector<R: Rng + ?Sized>(rng: &mut R, min: Vec2, max: Vec2) -> Vec2 {
    Vec2::new(range(rng, min.x, max.x), range(rng, min.y, max.y))
}
