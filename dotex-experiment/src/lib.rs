pub mod config;
pub mod error;
pub mod plan;
pub mod session;
pub mod state;
pub mod trial;
pub use config::{ColorChoice, ExperimentConfig, LayoutMode, RetryConfig};
pub use error::ExperimentError;
pub use plan::{build_plan, intervals, make_stimulus, PlannedStimulus};
pub use session::{SessionRecord, SystemInfo};
pub use state::{ExperimentEvent, ExperimentStateMachine};
pub use trial::Trial;
