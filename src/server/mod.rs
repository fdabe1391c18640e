//! HTTP boundary.
//!
//! | Route            | Purpose                                      |
//! |------------------|----------------------------------------------|
//! | `POST /generate` | JSON object of fields → PDF attachment       |
//! | `GET /health`    | Liveness probe, `{"status":"ok"}`            |
//!
//! Failures are returned as `{"error": "<message>"}` with status 500, or 400
//! when the body is not a JSON object. The handler itself holds no logic
//! beyond decoding and encoding; the pipeline lives in
//! [`ReportService`](crate::service::ReportService).

pub mod handlers;

use anyhow::{Context, Result};
use axum::Router;
use axum::http::{HeaderValue, Method, header};
use axum::routing::{get, post};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServiceConfig;
use crate::service::ReportService;

/// Shared, immutable state handed to every request.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ReportService>,
    pub content_disposition: HeaderValue,
}

impl AppState {
    /// Creates the state, rendering the `Content-Disposition` header once.
    pub fn new(service: Arc<ReportService>, download_name: &str) -> Result<Self> {
        let content_disposition = HeaderValue::from_str(&format!("attachment; filename=\"{download_name}\""))
            .with_context(|| format!("Invalid download name: {download_name}"))?;
        Ok(Self {
            service,
            content_disposition,
        })
    }
}

/// Builds the application router.
pub fn router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/generate", post(handlers::generate))
        .route("/health", get(handlers::health))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors))
        .with_state(state)
}

/// CORS policy for the configured origins; an empty list allows any origin.
pub fn build_cors(allowed_origins: &[String]) -> Result<CorsLayer> {
    if allowed_origins.is_empty() {
        return Ok(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any));
    }

    let origins = allowed_origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin).with_context(|| format!("Invalid allowed origin: {origin}"))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]))
}

/// Runs the service until Ctrl-C or SIGTERM.
pub async fn serve(config: ServiceConfig) -> Result<()> {
    let service = ReportService::from_config(&config);

    service
        .work_area()
        .prepare()
        .with_context(|| format!("Cannot use work directory {}", config.work_dir.display()))?;

    match service.compiler().ensure_available() {
        Ok(path) => tracing::info!(target: "server", "Using compiler {}", path.display()),
        // Not fatal: every request reports it until the compiler is installed
        Err(e) => tracing::warn!(target: "server", "{}", e),
    }
    let template = service.template_store().path();
    if !template.is_file() {
        tracing::warn!(target: "server", "Template {} does not exist yet", template.display());
    }

    let state = AppState::new(Arc::new(service), &config.download_name)?;
    let app = router(state, build_cors(&config.allowed_origins)?);

    let (host, port) = config.listen_address();
    let listener = TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind {host}:{port}"))?;
    tracing::info!(target: "server", "Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await.context("Server error")?;

    tracing::info!(target: "server", "Shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(target: "server", "Cannot listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(target: "server", "Cannot listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!(target: "server", "Shutdown signal received, finishing in-flight requests");
}
