use crate::colors::ColorAssignment;
use crate::grid;
use crate::rejection::{self, RetryPolicy};
use dotex_core::{PointSet, Result, SpecViolation, StimulusSpec};
use rand::Rng;
use tracing::debug;

/// The five ways of turning a [`StimulusSpec`] into dot positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LayoutStrategy {
    Grid5,
    Grid10,
    Grid25,
    /// Fallback grid: takes the first `total` of its 100 slots.
    Grid100,
    /// Never picked by [`LayoutStrategy::select`]; use it directly.
    RejectionSampling(RetryPolicy),
}

impl LayoutStrategy {
    /// Exact match on the standard totals, `Grid100` for everything else.
    pub fn select(total: usize) -> Self {
        match total {
            5 => Self::Grid5,
            10 => Self::Grid10,
            25 => Self::Grid25,
            _ => Self::Grid100,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Grid5 => "grid5",
            Self::Grid10 => "grid10",
            Self::Grid25 => "grid25",
            Self::Grid100 => "grid100",
            Self::RejectionSampling(_) => "rejection-sampling",
        }
    }

    /// Fixed slot count for the grids.
    pub fn capacity(&self) -> Option<usize> {
        match self {
            Self::Grid5 => Some(5),
            Self::Grid10 => Some(10),
            Self::Grid25 => Some(25),
            Self::Grid100 => Some(100),
            Self::RejectionSampling(_) => None,
        }
    }

    /// Grid5/10/25 need their exact count; Grid100 takes up to 100.
    pub fn check_total(&self, total: usize) -> Result<()> {
        match (self, self.capacity()) {
            (Self::Grid100, Some(capacity)) if total > capacity => {
                Err(SpecViolation::CapacityExceeded {
                    strategy: self.name(),
                    capacity,
                    got: total,
                }
                .into())
            }
            (Self::Grid100, _) | (Self::RejectionSampling(_), _) => Ok(()),
            (_, Some(expected)) if total != expected => Err(SpecViolation::CardinalityMismatch {
                strategy: self.name(),
                expected,
                got: total,
            }
            .into()),
            _ => Ok(()),
        }
    }

    pub fn slots(&self) -> Vec<grid::Slot> {
        match self {
            Self::Grid5 => grid::five(),
            Self::Grid10 => grid::ten(),
            Self::Grid25 => grid::twenty_five(),
            Self::Grid100 => grid::hundred(),
            Self::RejectionSampling(_) => Vec::new(),
        }
    }

    /// Checks the total, shuffles the colors, then places one point per
    /// slot in slot order.
    pub fn layout<R: Rng + ?Sized>(&self, spec: &StimulusSpec, rng: &mut R) -> Result<PointSet> {
        let total = spec.total_count();
        self.check_total(total)?;
        let colors = ColorAssignment::for_spec(spec, rng)?;
        debug!(strategy = self.name(), total, target = spec.target_count(), "laying out");

        match self {
            Self::RejectionSampling(policy) => rejection::place(
                spec.canvas_width(),
                spec.canvas_height(),
                spec.radius(),
                colors.as_slice(),
                policy,
                rng,
            ),
            fixed => {
                let slots = fixed.slots();
                Ok(grid::place(&slots[..total], colors.as_slice(), rng))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dotex_core::{ColorValue, StimulusError, UnreachableReason};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::time::{Duration, Instant};

    const T: ColorValue = ColorValue::BLACK;
    const O: ColorValue = ColorValue::WHITE;

    fn spec(total: usize, target: usize) -> StimulusSpec {
        StimulusSpec::new(total, target, T, O).unwrap()
    }

    #[test]
    fn selects_by_exact_total() {
        assert_eq!(LayoutStrategy::select(5), LayoutStrategy::Grid5);
        assert_eq!(LayoutStrategy::select(10), LayoutStrategy::Grid10);
        assert_eq!(LayoutStrategy::select(25), LayoutStrategy::Grid25);
        assert_eq!(LayoutStrategy::select(100), LayoutStrategy::Grid100);
        assert_eq!(LayoutStrategy::select(37), LayoutStrategy::Grid100);
        assert_eq!(LayoutStrategy::select(6), LayoutStrategy::Grid100);
    }

    #[test]
    fn selected_layouts_keep_count_and_colors() {
        let mut rng = StdRng::seed_from_u64(21);
        for total in [1usize, 5, 7, 10, 25, 37, 99, 100] {
            for target in 0..=total {
                let s = spec(total, target);
                let points = LayoutStrategy::select(total).layout(&s, &mut rng).unwrap();
                assert_eq!(points.len(), total);
                assert_eq!(points.count_color(T), target);
                assert_eq!(points.count_color(O), total - target);
            }
        }
    }

    #[test]
    fn grid5_stays_near_its_centers() {
        let centers = [
            (100.0, 100.0),
            (300.0, 100.0),
            (500.0, 100.0),
            (150.0, 300.0),
            (350.0, 300.0),
        ];
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let points = LayoutStrategy::Grid5.layout(&spec(5, 2), &mut rng).unwrap();
            assert_eq!(points.len(), 5);
            for (p, (cx, cy)) in points.iter().zip(centers) {
                assert!((p.x - cx).abs() <= 90.0, "{p:?}");
                assert!((p.y - cy).abs() <= 60.0, "{p:?}");
            }
        }
    }

    #[test]
    fn every_grid_point_stays_inside_its_slot() {
        let mut rng = StdRng::seed_from_u64(8);
        for (strategy, total) in [
            (LayoutStrategy::Grid10, 10),
            (LayoutStrategy::Grid25, 25),
            (LayoutStrategy::Grid100, 100),
            (LayoutStrategy::Grid100, 37),
        ] {
            let slots = strategy.slots();
            for _ in 0..100 {
                let points = strategy.layout(&spec(total, total / 3), &mut rng).unwrap();
                assert_eq!(points.len(), total);
                for (p, slot) in points.iter().zip(&slots) {
                    let (cx, cy) = slot.center;
                    let (jx, jy) = slot.jitter;
                    assert!((p.x - cx).abs() <= jx, "{}: {p:?} {slot:?}", strategy.name());
                    assert!((p.y - cy).abs() <= jy, "{}: {p:?} {slot:?}", strategy.name());
                }
            }
        }
    }

    #[test]
    fn grid100_always_returns_100_points() {
        let mut rng = StdRng::seed_from_u64(12);
        for target in [0, 1, 50, 99, 100] {
            let points = LayoutStrategy::Grid100
                .layout(&spec(100, target), &mut rng)
                .unwrap();
            assert_eq!(points.len(), 100);
        }
    }

    #[test]
    fn grid100_rejects_more_than_it_holds() {
        let mut rng = StdRng::seed_from_u64(12);
        let err = LayoutStrategy::select(101)
            .layout(&spec(101, 3), &mut rng)
            .unwrap_err();
        assert_eq!(
            err,
            StimulusError::InvalidSpec(SpecViolation::CapacityExceeded {
                strategy: "grid100",
                capacity: 100,
                got: 101
            })
        );
    }

    #[test]
    fn fixed_grids_reject_other_totals() {
        let mut rng = StdRng::seed_from_u64(12);
        let err = LayoutStrategy::Grid10.layout(&spec(5, 1), &mut rng).unwrap_err();
        assert_eq!(
            err,
            StimulusError::InvalidSpec(SpecViolation::CardinalityMismatch {
                strategy: "grid10",
                expected: 10,
                got: 5
            })
        );
    }

    #[test]
    fn rejection_sampling_three_large_dots() {
        let s = spec(3, 1).with_radius(50.0).unwrap();
        let strategy = LayoutStrategy::RejectionSampling(RetryPolicy::default());
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let points = strategy.layout(&s, &mut rng).unwrap();
            assert_eq!(points.len(), 3);
            assert_eq!(points.count_color(T), 1);
            let p = points.as_slice();
            for i in 0..3 {
                for j in (i + 1)..3 {
                    assert!((p[i].x - p[j].x).abs() >= 75.0);
                    assert!((p[i].y - p[j].y).abs() >= 75.0);
                }
                assert!((100.0..=500.0).contains(&p[i].x));
                assert!((100.0..=300.0).contains(&p[i].y));
            }
        }
    }

    #[test]
    fn rejection_sampling_gives_up_when_its_budget_runs_out() {
        // Ten dots at r=50 can never satisfy the separation rule, so only
        // the deadline ends the search.
        let s = spec(10, 4).with_radius(50.0).unwrap();
        let policy = RetryPolicy {
            max_attempts_per_point: usize::MAX,
            max_restarts: usize::MAX,
            deadline: None,
        }
        .with_budget(Duration::from_millis(50));
        let started = Instant::now();
        let err = LayoutStrategy::RejectionSampling(policy)
            .layout(&s, &mut StdRng::seed_from_u64(3))
            .unwrap_err();
        assert!(started.elapsed() >= Duration::from_millis(50));
        assert!(started.elapsed() < Duration::from_secs(5));
        match err {
            StimulusError::LayoutUnreachable { placed, total, reason } => {
                assert!(placed < 10);
                assert_eq!(total, 10);
                assert_eq!(reason, UnreachableReason::DeadlineExceeded);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn rejection_sampling_is_never_selected() {
        for total in 0..300 {
            assert!(!matches!(
                LayoutStrategy::select(total),
                LayoutStrategy::RejectionSampling(_)
            ));
        }
    }
}
