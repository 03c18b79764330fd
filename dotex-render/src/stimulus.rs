use crate::render::{DrawStats, Renderer};
use dotex_core::{Result, StimulusError, StimulusSpec};
use dotex_layout::LayoutStrategy;
use rand::Rng;

/// Lays out `spec` with the strategy picked for its total and draws it on
/// `canvas_id`.
pub fn render_stimulus<D, R>(
    renderer: &mut D,
    canvas_id: &str,
    spec: &StimulusSpec,
    rng: &mut R,
) -> Result<DrawStats>
where
    D: Renderer + ?Sized,
    R: Rng + ?Sized,
{
    render_with(
        renderer,
        canvas_id,
        spec,
        LayoutStrategy::select(spec.total_count()),
        rng,
    )
}

/// Same as [`render_stimulus`] with an explicit strategy, e.g.
/// [`LayoutStrategy::RejectionSampling`].
pub fn render_with<D, R>(
    renderer: &mut D,
    canvas_id: &str,
    spec: &StimulusSpec,
    strategy: LayoutStrategy,
    rng: &mut R,
) -> Result<DrawStats>
where
    D: Renderer + ?Sized,
    R: Rng + ?Sized,
{
    if !renderer.has_canvas(canvas_id) {
        return Err(StimulusError::RenderUnavailable(format!(
            "no canvas attached as `{canvas_id}`"
        )));
    }
    let points = strategy.layout(spec, rng)?;
    renderer.draw(canvas_id, &points, spec.radius())
}
