pub mod render;
pub mod stimulus;

pub use render::{DrawStats, Renderer, SkiaRenderer};
pub use stimulus::{render_stimulus, render_with};
