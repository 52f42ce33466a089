//! Gemini Gateway
//!
//! A small HTTP server that forwards text and uploaded media to a hosted
//! Gemini model and returns the generated text as JSON.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use gemini_gateway::api::{self, GatewayState};
use gemini_gateway::config::Config;
use gemini_gateway::gemini::GeminiClient;
use gemini_gateway::services::uploads::UploadStore;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

/// Header echoing the per-request ID back to the client
const REQUEST_ID_HEADER: &str = "x-request-id";

/// Tags each request with an ID, runs it inside a span and logs the outcome
async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let span = info_span!(
        "request",
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
    );
    let start = Instant::now();

    let mut response = next.run(request).instrument(span.clone()).await;

    span.in_scope(|| {
        info!(
            status = response.status().as_u16(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Request finished"
        )
    });
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional
    let dotenv_result = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Ok(path) = dotenv_result {
        info!(path = %path.display(), "Loaded .env");
    }

    let config = Config::from_env();

    if config.gemini.api_key.is_empty() {
        warn!("GEMINI_API_KEY is not set; generation requests will fail");
    }

    let model = GeminiClient::new(&config.gemini)
        .map_err(|e| anyhow::anyhow!("Failed to initialize Gemini client: {}", e))?;
    info!(
        model = %model.model(),
        upload_dir = %config.uploads.dir.display(),
        max_upload_bytes = config.uploads.max_bytes,
        "Gemini client ready"
    );

    let uploads = UploadStore::new(&config.uploads.dir);
    uploads
        .ensure_dir()
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    let state = GatewayState::new(Arc::new(model), uploads);

    // Build our application with routes
    let app = api::router(state, config.uploads.max_bytes)
        .fallback_service(ServeDir::new(&config.server.static_dir))
        // Middleware (order matters - request_id should be first)
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(CorsLayer::permissive());

    // Bind to address from config
    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid server address: {}", e))?;

    info!("Gemini API server is running at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM, whichever comes first
async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => "ctrl-c",
            Err(e) => {
                warn!(error = %e, "Ctrl+C handler unavailable");
                std::future::pending().await
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                "sigterm"
            }
            Err(e) => {
                warn!(error = %e, "SIGTERM handler unavailable");
                std::future::pending().await
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<&str>();

    let received = tokio::select! {
        name = ctrl_c => name,
        name = terminate => name,
    };
    info!(signal = received, "Shutting down, draining in-flight requests");
}
