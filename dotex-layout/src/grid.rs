//! Hand-placed slot patterns for the four standard totals.
//!
//! Geometry is tuned for a 600x400 canvas and does not depend on the dot
//! radius or the actual canvas size.

use crate::random::RandomSource;
use dotex_core::{ColorValue, Point, PointSet};
use rand::Rng;

/// A slot center plus the half-width of its per-axis jitter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    pub center: (f32, f32),
    pub jitter: (f32, f32),
}

impl Slot {
    const fn new(cx: f32, cy: f32, jx: f32, jy: f32) -> Self {
        Self {
            center: (cx, cy),
            jitter: (jx, jy),
        }
    }

    fn place<R: Rng + ?Sized>(&self, color: ColorValue, rng: &mut R) -> Point {
        let (cx, cy) = self.center;
        let (jx, jy) = self.jitter;
        let x = cx + rng.uniform_real(-jx as f64, jx as f64) as f32;
        let y = cy + rng.uniform_real(-jy as f64, jy as f64) as f32;
        Point { x, y, color }
    }
}

/// `start, start + step, ...` while below `end`.
fn steps(start: f32, step: f32, end: f32) -> impl Iterator<Item = f32> {
    std::iter::successors(Some(start), move |v| Some(v + step)).take_while(move |v| *v < end)
}

pub fn five() -> Vec<Slot> {
    vec![
        Slot::new(100.0, 100.0, 70.0, 60.0),
        Slot::new(300.0, 100.0, 70.0, 60.0),
        Slot::new(500.0, 100.0, 70.0, 60.0),
        Slot::new(150.0, 300.0, 90.0, 60.0),
        Slot::new(350.0, 300.0, 90.0, 60.0),
    ]
}

/// Three rows; the middle one is denser and less jittered.
pub fn ten() -> Vec<Slot> {
    let mut slots = Vec::with_capacity(10);
    for (row, y) in steps(67.0, 133.0, 400.0).enumerate() {
        if row % 2 == 0 {
            slots.extend(steps(100.0, 200.0, 600.0).map(|x| Slot::new(x, y, 80.0, 40.0)));
        } else {
            slots.extend(steps(75.0, 150.0, 600.0).map(|x| Slot::new(x, y, 60.0, 40.0)));
        }
    }
    slots
}

pub fn twenty_five() -> Vec<Slot> {
    steps(40.0, 80.0, 400.0)
        .flat_map(|y| steps(60.0, 120.0, 600.0).map(move |x| Slot::new(x, y, 30.0, 25.0)))
        .collect()
}

/// Four bands of two interleaved rows: 13 slots at 46px pitch, then 12 at
/// 49px, rows 49px apart.
pub fn hundred() -> Vec<Slot> {
    let mut slots = Vec::with_capacity(100);
    let mut y = 24.5;
    for _ in 0..4 {
        slots.extend(steps(23.0, 46.0, 600.0).map(|x| Slot::new(x, y, 13.0, 13.0)));
        y += 49.0;
        slots.extend(steps(24.5, 49.0, 600.0).map(|x| Slot::new(x, y, 13.0, 13.0)));
        y += 49.0;
    }
    slots
}

/// Jitters each slot in order, pairing slot `i` with `colors[i]`.
pub fn place<R: Rng + ?Sized>(slots: &[Slot], colors: &[ColorValue], rng: &mut R) -> PointSet {
    debug_assert_eq!(slots.len(), colors.len());
    PointSet::new(
        slots
            .iter()
            .zip(colors)
            .map(|(slot, color)| slot.place(*color, rng))
            .collect(),
    )
}
