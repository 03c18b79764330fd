use crate::plan::PlannedStimulus;
use dotex_core::StimulusSpec;

/// A stimulus currently on screen, waiting for its response.
#[derive(Debug, Clone)]
pub struct Trial<T> {
    /// 1-based position among the trials.
    pub id: usize,
    /// Slide counter value when the stimulus appeared.
    pub slide: usize,
    pub stimulus: PlannedStimulus,
    pub spec: StimulusSpec,
    pub shown_at: T,
}
