//! dwx-oauth CLI binary entry point.

use clap::Parser;
use dwx_oauth::cli::{Cli, Commands};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Refresh(args) => dwx_oauth::cli::auth::handle_refresh(args).await,
        Commands::Login(args) => dwx_oauth::cli::auth::handle_login(args).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| "dwx_oauth=info".into())
}
