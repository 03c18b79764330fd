//! Free placement for arbitrary totals by rejection sampling.
//!
//! Candidates are drawn uniformly from the margin box
//! `[2r, w - 2r) x [2r, h - 2r)`. A candidate is rejected at the first
//! placed point that is closer than `1.5r` on *either* axis, so every
//! accepted pair is at least `1.5r` apart on both axes.

use crate::random::RandomSource;
use dotex_core::{ColorValue, Point, PointSet, Result, StimulusError, UnreachableReason};
use dotex_timing::Deadline;
use rand::Rng;
use std::time::Duration;
use tracing::debug;

const SEPARATION: f32 = 1.5;

/// Bounds on the sampling loop.
///
/// When one point burns through `max_attempts_per_point` candidates the
/// partial layout is discarded and placement starts over; after
/// `max_restarts` such restarts, or once `deadline` passes, layout fails
/// with [`StimulusError::LayoutUnreachable`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts_per_point: usize,
    pub max_restarts: usize,
    pub deadline: Option<Deadline>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts_per_point: 2_000,
            max_restarts: 32,
            deadline: None,
        }
    }
}

impl RetryPolicy {
    pub fn with_deadline(mut self, deadline: Deadline) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_budget(self, budget: Duration) -> Self {
        self.with_deadline(Deadline::after(budget))
    }
}

/// True when `(x, y)` is at least `1.5 * radius` away from every placed
/// point on both axes.
pub fn accepts(x: f32, y: f32, placed: &[Point], radius: f32) -> bool {
    let min = SEPARATION * radius;
    placed
        .iter()
        .all(|p| !((p.x - x).abs() < min || (p.y - y).abs() < min))
}

pub fn place<R: Rng + ?Sized>(
    width: f32,
    height: f32,
    radius: f32,
    colors: &[ColorValue],
    policy: &RetryPolicy,
    rng: &mut R,
) -> Result<PointSet> {
    let total = colors.len();
    let (x0, x1) = (2.0 * radius, width - 2.0 * radius);
    let (y0, y1) = (2.0 * radius, height - 2.0 * radius);
    if x1 <= x0 || y1 <= y0 {
        return Err(StimulusError::LayoutUnreachable {
            placed: 0,
            total,
            reason: UnreachableReason::EmptyMargin,
        });
    }

    let mut points: Vec<Point> = Vec::with_capacity(total);
    let mut restarts = 0;

    'layout: loop {
        points.clear();
        for &color in colors {
            let mut attempts = 0;
            loop {
                if policy.deadline.is_some_and(|d| d.expired()) {
                    return Err(StimulusError::LayoutUnreachable {
                        placed: points.len(),
                        total,
                        reason: UnreachableReason::DeadlineExceeded,
                    });
                }
                if attempts == policy.max_attempts_per_point {
                    if restarts == policy.max_restarts {
                        return Err(StimulusError::LayoutUnreachable {
                            placed: points.len(),
                            total,
                            reason: UnreachableReason::RetryCeiling {
                                attempts_per_point: policy.max_attempts_per_point,
                                restarts,
                            },
                        });
                    }
                    restarts += 1;
                    debug!(
                        placed = points.len(),
                        total, restarts, "rejection layout stalled, restarting"
                    );
                    continue 'layout;
                }
                attempts += 1;

                let x = rng.uniform_real(x0 as f64, x1 as f64) as f32;
                let y = rng.uniform_real(y0 as f64, y1 as f64) as f32;
                if accepts(x, y, &points, radius) {
                    points.push(Point { x, y, color });
                    break;
                }
            }
        }
        debug!(total, restarts, "rejection layout placed");
        return Ok(PointSet::new(points));
    }
}
