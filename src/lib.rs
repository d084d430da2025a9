pub mod error;
pub mod form;
pub mod protect;
pub mod server;
pub mod settings;

use std::sync::Arc;

use server::AppState;
use settings::Settings;

/// Initialise logging, load settings and serve until shutdown.
pub async fn run() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("pdf_fortress_lib=info")),
        )
        .init();

    tracing::info!("Starting PDF Fortress v{}", env!("CARGO_PKG_VERSION"));

    let settings_path = Settings::default_path();
    tracing::info!("Settings path: {}", settings_path.display());
    let settings = Settings::load(&settings_path);
    tracing::info!(
        "Scratch directory: {} (upload limit {} bytes)",
        settings.scratch_dir().display(),
        settings.max_upload_bytes
    );

    let state = Arc::new(AppState::new(settings));
    server::start_server(state).await
}
