pub mod color;
pub mod error;
pub mod phase;
pub mod stimulus;
pub mod trial;

pub use color::{ColorValue, ParseColorError};
pub use error::{Result, SpecViolation, StimulusError, UnreachableReason};
pub use phase::{Phase, StandardPhase};
pub use stimulus::{
    radius_for_total, Point, PointSet, StimulusSpec, DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH,
};
pub use trial::TrialResult;
