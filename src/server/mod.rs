//! HTTP server: the upload page and the protect endpoint.
//!
//! Routes:
//! - `GET /` renders the upload form
//! - `GET /api/health` reports liveness and version
//! - `POST /api/protect` returns a password-protected copy of an uploaded PDF

pub mod page;
pub mod upload;

use std::sync::Arc;

use axum::extract::multipart::{Multipart, MultipartRejection};
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;

use crate::error::{FortressError, Result};
use crate::form::{PDF_MIME, PROTECT_ENDPOINT};
use crate::protect::{self, LopdfEncryptor, PdfEncryptor, ProtectionOptions};
use crate::settings::Settings;
use upload::UploadRequest;

/// State shared across requests. Read-only after startup.
pub struct AppState {
    pub settings: Settings,
    pub encryptor: Arc<dyn PdfEncryptor>,
    index_html: String,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self::with_encryptor(settings, Arc::new(LopdfEncryptor))
    }

    pub fn with_encryptor(settings: Settings, encryptor: Arc<dyn PdfEncryptor>) -> Self {
        let index_html = page::render_index(&settings);
        Self {
            settings,
            encryptor,
            index_html,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    let body_limit = state.settings.max_upload_bytes;
    Router::new()
        .route("/", get(index))
        .route("/api/health", get(health))
        .route(PROTECT_ENDPOINT, post(protect_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(state.index_html.clone())
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn protect_handler(
    State(state): State<Arc<AppState>>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Response> {
    let upload = UploadRequest::from_multipart(multipart).await?;
    tracing::info!(
        "Protecting {} ({} bytes, {})",
        upload.filename,
        upload.bytes.len(),
        upload.content_type
    );

    let dir = state.settings.scratch_dir();
    let encryptor = state.encryptor.clone();
    let options = ProtectionOptions::with_password(&upload.password, &state.settings.protection);
    let input = upload.bytes;

    let output = tokio::task::spawn_blocking(move || {
        protect::protect_pdf(&dir, encryptor.as_ref(), &input, &options)
    })
    .await
    .map_err(|e| FortressError::Protect(format!("Encryption task failed: {}", e)))??;

    tracing::info!("Protected {} ({} bytes)", upload.filename, output.len());

    let disposition = upload::content_disposition(&upload.filename);
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, PDF_MIME.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        output,
    )
        .into_response())
}

/// Bind and serve until Ctrl-C.
pub async fn start_server(state: Arc<AppState>) -> anyhow::Result<()> {
    let addr = state.settings.bind_addr();
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let actual_addr = listener.local_addr()?;
    tracing::info!("PDF Fortress listening on http://{}", actual_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
