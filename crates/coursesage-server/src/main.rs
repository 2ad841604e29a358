//! CourseSage: course catalog with AI-assisted learning features.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use coursesage_chat::LLMConfig;
use coursesage_core::CourseSageConfig;
use coursesage_server::{build_router, AppState};
use coursesage_store::SqliteStore;

fn resolve_data_dir() -> PathBuf {
    std::env::var("COURSESAGE_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let data_dir = resolve_data_dir();
    info!("Data directory: {}", data_dir.display());

    let config = CourseSageConfig::from_env(&data_dir)?;
    let port = config.port;

    let store = SqliteStore::open(&config.data_paths.db)
        .map_err(|e| anyhow::anyhow!("Failed to open store: {}", e))?;
    store
        .seed_default_categories()
        .map_err(|e| anyhow::anyhow!("Failed to seed categories: {}", e))?;

    // Provider availability is decided here, once.
    let llm_config = LLMConfig::load(&config.data_paths.llm_config_file);
    let state = Arc::new(
        AppState::new(config, store, llm_config)
            .map_err(|e| anyhow::anyhow!("Failed to build AI service: {}", e))?,
    );

    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("CourseSage server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
