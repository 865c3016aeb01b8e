//! refl-web - Reflections journaling service
//!
//! JSON API under /api plus server-rendered pages, backed by SQLite and
//! an external topic classifier.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use refl_common::config::{WebConfig, DEFAULT_CLASSIFIER_MODEL, DEFAULT_WEB_PORT};
use refl_common::db::init_database;
use refl_web::classifier::OpenAiClassifier;
use refl_web::{build_router, AppState};

/// Reflections journaling service
///
/// Required values may come from flags or the environment; startup fails
/// with a diagnostic when either is missing.
#[derive(Debug, Parser)]
#[command(name = "refl-web", version)]
struct Args {
    /// SQLite database path
    #[arg(long, env = "REFL_DATABASE")]
    database: PathBuf,

    /// Classifier API key
    #[arg(long = "api-key", env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Classifier model name
    #[arg(long, env = "REFL_MODEL", default_value = DEFAULT_CLASSIFIER_MODEL)]
    model: String,

    /// HTTP port
    #[arg(long, env = "REFL_WEB_PORT", default_value_t = DEFAULT_WEB_PORT)]
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

    info!("Starting Reflections web service (refl-web) v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let config = WebConfig {
        database_path: args.database,
        classifier_api_key: args.api_key,
        classifier_model: args.model,
        port: args.port,
    };

    info!("Database path: {}", config.database_path.display());

    let pool = match init_database(&config.database_path).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("Failed to initialize database: {e}");
            return Err(e.into());
        }
    };

    let classifier = OpenAiClassifier::new(
        config.classifier_api_key.clone(),
        config.classifier_model.clone(),
    )
    .map_err(|e| anyhow::anyhow!("Failed to build classifier client: {e}"))?;
    info!("Topic classifier ready (model: {})", config.classifier_model);

    let state = AppState::new(pool, Arc::new(classifier));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", config.port)).await?;
    info!("refl-web listening on http://127.0.0.1:{}", config.port);

    axum::serve(listener, app).await?;

    Ok(())
}
