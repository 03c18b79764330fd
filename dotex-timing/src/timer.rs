use std::time::{Duration, Instant};

/// Trait for high-precision timers
pub trait Timer: Clone + Send + Sync {
    type Timestamp: Copy + Clone + Send + Sync;
    fn now(&self) -> Self::Timestamp;
    fn elapsed(&self, ts: Self::Timestamp) -> Duration;
    fn record_frame(&mut self, d: Duration);
    fn stats(&self) -> DurationStats;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DurationStats {
    pub samples: usize,
    pub average_ns: f64,
    pub jitter_ns: f64,
    pub min_ns: f64,
    pub max_ns: f64,
}

#[derive(Debug, Clone)]
pub struct HighPrecisionTimer {
    pub start: Instant,
    pub frame_times: Vec<Duration>,
    pub max_samples: usize,
}

impl Timer for HighPrecisionTimer {
    type Timestamp = u64;
    fn now(&self) -> u64 {
        self.start.elapsed().as_nanos() as u64
    }
    fn elapsed(&self, ts: u64) -> Duration {
        Duration::from_nanos(self.now().saturating_sub(ts))
    }
    fn record_frame(&mut self, d: Duration) {
        if self.frame_times.len() >= self.max_samples {
            self.frame_times.remove(0);
        }
        self.frame_times.push(d);
    }
    fn stats(&self) -> DurationStats {
        let times: Vec<f64> = self
            .frame_times
            .iter()
            .map(|d| d.as_nanos() as f64)
            .collect();
        if times.is_empty() {
            return DurationStats::default();
        }
        let sum: f64 = times.iter().sum();
        let avg = sum / times.len() as f64;
        let var = times.iter().map(|x| (x - avg).powi(2)).sum::<f64>() / times.len() as f64;
        let min = times.iter().copied().fold(f64::INFINITY, f64::min);
        let max = times.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        DurationStats {
            samples: times.len(),
            average_ns: avg,
            jitter_ns: var.sqrt(),
            min_ns: min,
            max_ns: max,
        }
    }
}

impl HighPrecisionTimer {
    pub fn new() -> Self {
        Self::with_capacity(1000)
    }

    pub fn with_capacity(max_samples: usize) -> Self {
        Self {
            start: Instant::now(),
            frame_times: Vec::with_capacity(max_samples),
            max_samples,
        }
    }
}

impl Default for HighPrecisionTimer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_summarize_recorded_frames() {
        let mut t = HighPrecisionTimer::with_capacity(8);
        for ms in [2u64, 4, 6] {
            t.record_frame(Duration::from_millis(ms));
        }
        let s = t.stats();
        assert_eq!(s.samples, 3);
        assert!((s.average_ns - 4e6).abs() < 1.0);
        assert_eq!(s.min_ns, 2e6);
        assert_eq!(s.max_ns, 6e6);
        assert!(s.jitter_ns > 0.0);
    }

    #[test]
    fn keeps_only_the_newest_samples() {
        let mut t = HighPrecisionTimer::with_capacity(2);
        for ms in [1u64, 2, 3] {
            t.record_frame(Duration::from_millis(ms));
        }
        assert_eq!(
            t.frame_times,
            vec![Duration::from_millis(2), Duration::from_millis(3)]
        );
    }

    #[test]
    fn empty_timer_reports_zeroes() {
        assert_eq!(HighPrecisionTimer::new().stats(), DurationStats::default());
    }

    #[test]
    fn elapsed_is_monotonic() {
        let t = HighPrecisionTimer::new();
        let ts = t.now();
        assert!(t.now() >= ts);
        assert!(t.elapsed(u64::MAX) == Duration::ZERO);
    }
}
