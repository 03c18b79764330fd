pub mod colors;
pub mod grid;
pub mod random;
pub mod rejection;
pub mod strategy;

pub use colors::ColorAssignment;
pub use grid::Slot;
pub use random::RandomSource;
pub use rejection::RetryPolicy;
pub use strategy::LayoutStrategy;
