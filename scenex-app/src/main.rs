mod app;
mod cli;

use anyhow::Result;
use app::App;
use clap::Parser;
use cli::Args;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let trials = args.load_trials()?;

    let app = App::new(
        args.session_config(),
        args.render_config(),
        trials,
        !args.windowed,
    )?;
    app.run()
}
