//! Builds the shuffled list of stimuli shown in one session.

use crate::config::ColorChoice;
use dotex_core::{Result, StimulusSpec};
use dotex_layout::RandomSource;
use rand::Rng;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedStimulus {
    pub n_total: usize,
    pub n_target: usize,
    pub color_target: ColorChoice,
    pub color_other: ColorChoice,
}

impl PlannedStimulus {
    pub fn spec(&self, canvas_width: f32, canvas_height: f32) -> Result<StimulusSpec> {
        StimulusSpec::new(
            self.n_total,
            self.n_target,
            self.color_target.color,
            self.color_other.color,
        )?
        .with_canvas(canvas_width, canvas_height)
    }
}

/// Bin edges for the target counts of each standard total; one target
/// count is drawn from every `[edge_i, edge_i+1)`.
fn bin_edges(total: usize) -> Option<&'static [i64]> {
    match total {
        10 => Some(&[0, 3, 5, 7, 9, 11]),
        25 => Some(&[0, 6, 11, 16, 21, 26]),
        100 => Some(&[0, 11, 21, 31, 41, 51, 61, 71, 81, 91, 101]),
        _ => None,
    }
}

/// Target counts to present for `total` dots. Every count for 5; one
/// random count per bin for 10, 25 and 100; nothing for other totals.
pub fn intervals<R: Rng + ?Sized>(total: usize, rng: &mut R) -> Vec<usize> {
    if total == 5 {
        return (0..=5).collect();
    }
    match bin_edges(total) {
        Some(edges) => edges
            .windows(2)
            .map(|w| rng.uniform_int(w[0], w[1]) as usize)
            .collect(),
        None => Vec::new(),
    }
}

/// Picks which of the two colors is the target at random.
pub fn make_stimulus<R: Rng + ?Sized>(
    total: usize,
    target: usize,
    colors: &[ColorChoice; 2],
    rng: &mut R,
) -> PlannedStimulus {
    let [color_target, color_other] = {
        let mut pair = colors.clone();
        rng.shuffle(&mut pair);
        pair
    };
    PlannedStimulus {
        n_total: total,
        n_target: target,
        color_target,
        color_other,
    }
}

pub fn build_plan<R: Rng + ?Sized>(
    totals: &[usize],
    colors: &[ColorChoice; 2],
    rng: &mut R,
) -> Vec<PlannedStimulus> {
    let mut plan = Vec::new();
    for &total in totals {
        for target in intervals(total, rng) {
            plan.push(make_stimulus(total, target, colors, rng));
        }
    }
    rng.shuffle(&mut plan);
    plan
}
