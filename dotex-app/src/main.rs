mod app;
pub use app::App;

use dotex_experiment::ExperimentConfig;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "dotex.toml";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG.to_string());
    let config = ExperimentConfig::load_or_default(&path)?;
    let app = App::new(config)?;
    app.run()?;

    Ok(())
}
