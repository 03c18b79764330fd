use crate::random::RandomSource;
use dotex_core::{ColorValue, Result, SpecViolation, StimulusSpec};
use rand::Rng;

/// Per-slot colors, already shuffled. Slot `i` takes `colors[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorAssignment(Vec<ColorValue>);

impl ColorAssignment {
    /// `target` copies of `target_color` then `total - target` copies of
    /// `other_color`, in uniformly random order.
    pub fn build<R: Rng + ?Sized>(
        total: usize,
        target: usize,
        target_color: ColorValue,
        other_color: ColorValue,
        rng: &mut R,
    ) -> Result<Self> {
        if target > total {
            return Err(SpecViolation::TargetExceedsTotal { target, total }.into());
        }
        let mut colors = Vec::with_capacity(total);
        colors.resize(target, target_color);
        colors.resize(total, other_color);
        rng.shuffle(&mut colors);
        Ok(Self(colors))
    }

    pub fn for_spec<R: Rng + ?Sized>(spec: &StimulusSpec, rng: &mut R) -> Result<Self> {
        Self::build(
            spec.total_count(),
            spec.target_count(),
            spec.target_color(),
            spec.other_color(),
            rng,
        )
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[ColorValue] {
        &self.0
    }
}
