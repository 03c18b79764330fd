use dotex_core::{ColorValue, PointSet, Result, StimulusError};
use dotex_timing::{DurationStats, HighPrecisionTimer, Timer};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use tiny_skia::{
    Color, FillRule, Paint, Path as SkPath, PathBuilder, Pixmap, Rect, Stroke, Transform,
};
use tracing::debug;

#[derive(Debug)]
pub struct DrawStats {
    pub points: usize,
    pub elapsed: Duration,
}

pub trait Renderer {
    fn has_canvas(&self, canvas_id: &str) -> bool;
    /// Fills the canvas with the background color.
    fn clear(&mut self, canvas_id: &str) -> Result<()>;
    /// Border plus one filled circle per point. Does not clear first.
    fn draw(&mut self, canvas_id: &str, points: &PointSet, radius: f32) -> Result<DrawStats>;
}

/// Owns a set of named tiny-skia canvases and draws dot stimuli onto them.
pub struct SkiaRenderer {
    canvases: HashMap<String, Pixmap>,
    background: ColorValue,
    border: ColorValue,

    // Performance tracking
    timer: HighPrecisionTimer,
}

fn skia_color(color: ColorValue) -> Color {
    let [r, g, b, a] = color.to_rgba();
    Color::from_rgba8(r, g, b, a)
}

fn unavailable(canvas_id: &str) -> StimulusError {
    StimulusError::RenderUnavailable(format!("no canvas attached as `{canvas_id}`"))
}

impl SkiaRenderer {
    pub fn new() -> Self {
        Self {
            canvases: HashMap::new(),
            background: ColorValue::LIGHT_GREY,
            border: ColorValue::BLACK,
            timer: HighPrecisionTimer::new(),
        }
    }

    pub fn with_background(mut self, background: ColorValue) -> Self {
        self.background = background;
        self
    }

    /// Allocates (or replaces) the canvas `canvas_id`, cleared to the
    /// background.
    pub fn attach(&mut self, canvas_id: impl Into<String>, width: u32, height: u32) -> Result<()> {
        let canvas_id = canvas_id.into();
        let mut pixmap = Pixmap::new(width, height).ok_or_else(|| {
            StimulusError::RenderUnavailable(format!(
                "cannot allocate a {width}x{height} canvas for `{canvas_id}`"
            ))
        })?;
        pixmap.fill(skia_color(self.background));
        debug!(canvas = %canvas_id, width, height, "canvas attached");
        self.canvases.insert(canvas_id, pixmap);
        Ok(())
    }

    pub fn canvas(&self, canvas_id: &str) -> Option<&Pixmap> {
        self.canvases.get(canvas_id)
    }

    pub fn save_png(&self, canvas_id: &str, path: impl AsRef<Path>) -> Result<()> {
        let pixmap = self.canvas(canvas_id).ok_or_else(|| unavailable(canvas_id))?;
        pixmap
            .save_png(path)
            .map_err(|e| StimulusError::RenderUnavailable(e.to_string()))
    }

    pub fn draw_timings(&self) -> DurationStats {
        self.timer.stats()
    }
}

impl Default for SkiaRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for SkiaRenderer {
    fn has_canvas(&self, canvas_id: &str) -> bool {
        self.canvases.contains_key(canvas_id)
    }

    fn clear(&mut self, canvas_id: &str) -> Result<()> {
        let pixmap = self
            .canvases
            .get_mut(canvas_id)
            .ok_or_else(|| unavailable(canvas_id))?;
        pixmap.fill(skia_color(self.background));
        Ok(())
    }

    fn draw(&mut self, canvas_id: &str, points: &PointSet, radius: f32) -> Result<DrawStats> {
        let started = self.timer.now();
        let pixmap = self
            .canvases
            .get_mut(canvas_id)
            .ok_or_else(|| unavailable(canvas_id))?;

        // Build every path before touching the bitmap so a failure leaves
        // the canvas as it was.
        let (w, h) = (pixmap.width() as f32, pixmap.height() as f32);
        let border = Rect::from_xywh(0.5, 0.5, w - 1.0, h - 1.0)
            .map(PathBuilder::from_rect)
            .ok_or_else(|| {
                StimulusError::RenderUnavailable(format!("degenerate canvas {w}x{h}"))
            })?;
        let dots: Vec<(SkPath, Color)> = points
            .iter()
            .map(|p| {
                PathBuilder::from_circle(p.x, p.y, radius)
                    .map(|path| (path, skia_color(p.color)))
                    .ok_or_else(|| {
                        StimulusError::RenderUnavailable(format!(
                            "cannot build a circle of radius {radius} at ({}, {})",
                            p.x, p.y
                        ))
                    })
            })
            .collect::<Result<_>>()?;

        let mut paint = Paint::default();

        // 1px border on the outermost pixel ring.
        paint.set_color(skia_color(self.border));
        let stroke = Stroke {
            width: 1.0,
            ..Stroke::default()
        };
        pixmap.stroke_path(&border, &paint, &stroke, Transform::identity(), None);

        for (path, color) in &dots {
            paint.set_color(*color);
            pixmap.fill_path(path, &paint, FillRule::Winding, Transform::identity(), None);
        }

        let elapsed = self.timer.elapsed(started);
        self.timer.record_frame(elapsed);
        debug!(
            canvas = canvas_id,
            points = dots.len(),
            radius,
            elapsed_us = elapsed.as_micros() as u64,
            "stimulus drawn"
        );

        Ok(DrawStats {
            points: dots.len(),
            elapsed,
        })
    }
}
