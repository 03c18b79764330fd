use crate::color::ColorValue;
use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StimulusError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StimulusError {
    /// Raised before any layout work; nothing is drawn.
    #[error("invalid stimulus spec: {0}")]
    InvalidSpec(#[from] SpecViolation),

    #[error("layout unreachable after placing {placed} of {total} points: {reason}")]
    LayoutUnreachable {
        placed: usize,
        total: usize,
        reason: UnreachableReason,
    },

    #[error("render unavailable: {0}")]
    RenderUnavailable(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpecViolation {
    #[error("total count must be at least 1")]
    ZeroTotal,
    #[error("target count {target} exceeds total count {total}")]
    TargetExceedsTotal { target: usize, total: usize },
    #[error("target and other color are both {0}")]
    IdenticalColors(ColorValue),
    #[error("canvas size {width}x{height} is not drawable")]
    InvalidCanvas { width: f32, height: f32 },
    #[error("radius {0} is not drawable")]
    InvalidRadius(f32),
    #[error("{strategy} lays out exactly {expected} points, got {got}")]
    CardinalityMismatch {
        strategy: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("{strategy} holds at most {capacity} points, got {got}")]
    CapacityExceeded {
        strategy: &'static str,
        capacity: usize,
        got: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnreachableReason {
    /// Margin box `[2r, size - 2r)` is empty on at least one axis.
    EmptyMargin,
    RetryCeiling {
        attempts_per_point: usize,
        restarts: usize,
    },
    DeadlineExceeded,
}

impl fmt::Display for UnreachableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyMargin => write!(f, "radius leaves no room inside the canvas margins"),
            Self::RetryCeiling {
                attempts_per_point,
                restarts,
            } => write!(
                f,
                "gave up after {restarts} restarts of {attempts_per_point} attempts per point"
            ),
            Self::DeadlineExceeded => write!(f, "deadline exceeded"),
        }
    }
}

impl StimulusError {
    pub fn is_invalid_spec(&self) -> bool {
        matches!(self, Self::InvalidSpec(_))
    }

    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::LayoutUnreachable { .. })
    }
}
