//! Humanized pointer paths for smooth moves.
//!
//! A smooth move samples a duration uniformly from `[low, high]` seconds,
//! divides it into steps of `step_delay_ms`, and walks an eased path with a
//! small sideways arc.  The arc and the duration are re-sampled on every
//! call.  The last point of every path is exactly the target.

use std::f64::consts::PI;

use rand::Rng;

use crate::domain::mouse::SmoothMoveSpec;

/// Upper bound on intermediate points for a single move.
pub const MAX_STEPS: usize = 10_000;

/// Largest sideways deviation of the arc, in pixels.
const MAX_ARC_PX: f64 = 40.0;

/// Arc amplitude as a fraction of the travel distance.
const ARC_RATIO: f64 = 0.1;

/// A planned smooth move, ready for a backend to walk.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedMove {
    /// Sampled duration, seconds.
    pub duration_secs: f64,
    /// Pause between points, milliseconds.
    pub step_delay_ms: u32,
    /// Absolute positions to visit, ending at the target.
    pub points: Vec<(i32, i32)>,
}

/// Samples a duration between `low` and `high` seconds.
///
/// Reversed bounds sample from `[high, low]`.  Non-finite or negative
/// results become `0.0`.
pub fn sample_duration(low: f64, high: f64, rng: &mut impl Rng) -> f64 {
    let d = low + (high - low) * rng.gen::<f64>();
    if d.is_finite() && d > 0.0 {
        d
    } else {
        0.0
    }
}

/// Number of steps for a move of `duration_secs` paced at `step_delay_ms`.
///
/// Always at least 1 and at most [`MAX_STEPS`].
pub fn step_count(duration_secs: f64, step_delay_ms: u32) -> usize {
    let per_step = f64::from(step_delay_ms.max(1));
    let steps = (duration_secs * 1000.0 / per_step).round();
    if steps.is_finite() && steps >= 1.0 {
        (steps as usize).min(MAX_STEPS)
    } else {
        1
    }
}

/// Plans a smooth move from `start` to `target`.
pub fn plan_smooth_move(
    start: (i32, i32),
    target: (i32, i32),
    spec: &SmoothMoveSpec,
    rng: &mut impl Rng,
) -> PlannedMove {
    let duration_secs = sample_duration(spec.low, spec.high, rng);
    let steps = step_count(duration_secs, spec.step_delay_ms);
    let arc = rng.gen_range(-1.0..=1.0);
    PlannedMove {
        duration_secs,
        step_delay_ms: spec.step_delay_ms,
        points: eased_path(start, target, steps, arc),
    }
}

/// Smoothstep-eased path with a sine-shaped sideways offset.
///
/// `arc` in `[-1, 1]` scales the offset and picks its side.
pub fn eased_path(start: (i32, i32), target: (i32, i32), steps: usize, arc: f64) -> Vec<(i32, i32)> {
    let (sx, sy) = (f64::from(start.0), f64::from(start.1));
    let (tx, ty) = (f64::from(target.0), f64::from(target.1));
    let (dx, dy) = (tx - sx, ty - sy);
    let distance = dx.hypot(dy);
    if distance <= f64::EPSILON || steps <= 1 {
        return vec![target];
    }

    let (px, py) = (-dy / distance, dx / distance);
    let amplitude = arc.clamp(-1.0, 1.0) * (distance * ARC_RATIO).min(MAX_ARC_PX);

    let mut path = Vec::with_capacity(steps);
    for index in 1..steps {
        let t = index as f64 / steps as f64;
        let eased = t * t * (3.0 - 2.0 * t);
        let offset = (t * PI).sin() * amplitude;
        let x = sx + dx * eased + px * offset;
        let y = sy + dy * eased + py * offset;
        path.push((x.round() as i32, y.round() as i32));
    }
    path.push(target);
    path
}

// ── Tests ─────────────────────────────────────────────────────────────────────
