use rand::Rng;
use rand::seq::SliceRandom;

/// Sampling primitives shared by the layouts and the stimulus plan.
///
/// Implemented for every [`Rng`], so callers pass `rand::rng()` in the app
/// and a seeded `StdRng` in tests.
pub trait RandomSource {
    /// Uniform over `[a, b)`.
    fn uniform_real(&mut self, a: f64, b: f64) -> f64;

    /// Uniform integer over `[min, max)`, floor-based, never `max`.
    /// Returns `min` for an empty range.
    fn uniform_int(&mut self, min: i64, max: i64) -> i64;

    /// Unbiased in-place Fisher-Yates shuffle.
    fn shuffle<T>(&mut self, items: &mut [T]);

    fn shuffled<T>(&mut self, mut items: Vec<T>) -> Vec<T> {
        self.shuffle(&mut items);
        items
    }
}

impl<R: Rng + ?Sized> RandomSource for R {
    fn uniform_real(&mut self, a: f64, b: f64) -> f64 {
        a + self.random::<f64>() * (b - a)
    }

    fn uniform_int(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        // floor(u * span) + min rather than floor(min + u * span): adding
        // min first can round up to max for u close to 1. The span is
        // taken in i128 since it can exceed i64::MAX.
        let span = max as i128 - min as i128;
        let offset = ((self.random::<f64>() * span as f64).floor() as i128).min(span - 1);
        (min as i128 + offset) as i64
    }

    fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(self);
    }
}
