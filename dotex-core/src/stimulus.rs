use crate::color::ColorValue;
use crate::error::{Result, SpecViolation};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CANVAS_WIDTH: f32 = 600.0;
pub const DEFAULT_CANVAS_HEIGHT: f32 = 400.0;

/// Dot radius used for a given total: large dots for sparse displays,
/// a fixed small size for dense ones.
pub fn radius_for_total(total: usize) -> f32 {
    if total < 25 {
        150.0 / total as f32
    } else if total == 25 {
        10.0
    } else {
        6.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
    pub color: ColorValue,
}

/// Ordered dots of one stimulus. Index order is slot order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointSet(Vec<Point>);

impl PointSet {
    pub fn new(points: Vec<Point>) -> Self {
        Self(points)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Point] {
        &self.0
    }

    pub fn count_color(&self, color: ColorValue) -> usize {
        self.0.iter().filter(|p| p.color == color).count()
    }
}

impl<'a> IntoIterator for &'a PointSet {
    type Item = &'a Point;
    type IntoIter = std::slice::Iter<'a, Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Everything needed to lay out and draw one stimulus.
///
/// Every constructor validates, so a `StimulusSpec` in hand is always
/// drawable: `total >= 1`, `target <= total`, two distinct colors, a
/// positive finite canvas and radius.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StimulusSpec {
    total_count: usize,
    target_count: usize,
    target_color: ColorValue,
    other_color: ColorValue,
    canvas_width: f32,
    canvas_height: f32,
    radius: f32,
}

impl StimulusSpec {
    /// Default 600x400 canvas with the radius picked by [`radius_for_total`].
    pub fn new(
        total_count: usize,
        target_count: usize,
        target_color: ColorValue,
        other_color: ColorValue,
    ) -> Result<Self> {
        let spec = Self {
            total_count,
            target_count,
            target_color,
            other_color,
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
            radius: radius_for_total(total_count),
        };
        spec.validate()?;
        Ok(spec)
    }

    pub fn with_canvas(mut self, width: f32, height: f32) -> Result<Self> {
        self.canvas_width = width;
        self.canvas_height = height;
        self.validate()?;
        Ok(self)
    }

    pub fn with_radius(mut self, radius: f32) -> Result<Self> {
        self.radius = radius;
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<()> {
        if self.total_count == 0 {
            return Err(SpecViolation::ZeroTotal.into());
        }
        if self.target_count > self.total_count {
            return Err(SpecViolation::TargetExceedsTotal {
                target: self.target_count,
                total: self.total_count,
            }
            .into());
        }
        if self.target_color == self.other_color {
            return Err(SpecViolation::IdenticalColors(self.target_color).into());
        }
        let drawable = |v: f32| v.is_finite() && v > 0.0;
        if !drawable(self.canvas_width) || !drawable(self.canvas_height) {
            return Err(SpecViolation::InvalidCanvas {
                width: self.canvas_width,
                height: self.canvas_height,
            }
            .into());
        }
        if !drawable(self.radius) {
            return Err(SpecViolation::InvalidRadius(self.radius).into());
        }
        Ok(())
    }

    pub fn total_count(&self) -> usize {
        self.total_count
    }

    pub fn target_count(&self) -> usize {
        self.target_count
    }

    pub fn other_count(&self) -> usize {
        self.total_count - self.target_count
    }

    pub fn target_color(&self) -> ColorValue {
        self.target_color
    }

    pub fn other_color(&self) -> ColorValue {
        self.other_color
    }

    pub fn canvas_width(&self) -> f32 {
        self.canvas_width
    }

    pub fn canvas_height(&self) -> f32 {
        self.canvas_height
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }
}
