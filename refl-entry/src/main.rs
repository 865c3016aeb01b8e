//! refl-entry - standalone user-entry demo service
//!
//! Serves the in-memory user-entry pages. Unrelated to the Reflections
//! store; nothing here touches the database.

use anyhow::Result;
use clap::Parser;
use tracing::info;

use refl_common::config::DEFAULT_ENTRY_PORT;
use refl_entry::{build_router, AppState};

/// User-entry demo service
#[derive(Debug, Parser)]
#[command(name = "refl-entry", version)]
struct Args {
    /// HTTP port
    #[arg(long, env = "REFL_ENTRY_PORT", default_value_t = DEFAULT_ENTRY_PORT)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting user-entry demo (refl-entry) v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let app = build_router(AppState::new());

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", args.port)).await?;
    info!("refl-entry listening on http://127.0.0.1:{}", args.port);

    axum::serve(listener, app).await?;

    Ok(())
}
