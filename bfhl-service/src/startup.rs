//! Application startup and lifecycle management.

use crate::config::BfhlConfig;
use crate::handlers;
use crate::services::providers::gemini::GeminiTextProvider;
use crate::services::providers::TextProvider;
use crate::services::Dispatcher;
use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    metrics::metrics_middleware,
    security_headers::security_headers_middleware,
    tracing::{make_request_span, request_id_middleware},
};
use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{self, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub official_email: Arc<str>,
    pub dispatcher: Arc<Dispatcher>,
}

impl AppState {
    pub fn new(official_email: &str, provider: Option<Arc<dyn TextProvider>>) -> Self {
        Self {
            official_email: Arc::from(official_email),
            dispatcher: Arc::new(Dispatcher::new(provider)),
        }
    }
}

/// Build the full router: routes, envelope-shaped panic catch-all, request id,
/// tracing, metrics, security headers and permissive CORS.
pub fn build_router(state: AppState) -> Router {
    let panic_email = state.official_email.clone();

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .route("/metrics", get(handlers::metrics::metrics))
        .route("/bfhl", post(handlers::bfhl::process))
        .layer(CatchPanicLayer::custom(move |panic: Box<dyn Any + Send + 'static>| {
            handlers::bfhl::panic_response(&panic_email, panic)
        }))
        .layer(from_fn(metrics_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(from_fn(request_id_middleware))
        .layer(
            CorsLayer::new()
                .allow_origin(cors::Any)
                .allow_methods(cors::Any)
                .allow_headers(cors::Any),
        )
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application, wiring Gemini when an API key is configured.
    pub async fn build(config: BfhlConfig) -> Result<Self, AppError> {
        let provider = match config.gemini_config() {
            Some(gemini_config) => {
                let provider = GeminiTextProvider::new(gemini_config).map_err(|e| {
                    tracing::error!("Failed to initialize Gemini provider: {}", e);
                    AppError::ConfigError(anyhow::anyhow!(e))
                })?;
                tracing::info!(
                    model = %config.models.text_model,
                    "Initialized Gemini text provider"
                );
                Some(Arc::new(provider) as Arc<dyn TextProvider>)
            }
            None => {
                tracing::warn!("GEMINI_API_KEY not configured - AI requests will fail");
                None
            }
        };

        Self::build_with_provider(config, provider).await
    }

    /// Build with an explicit text provider (tests pass a mock here).
    pub async fn build_with_provider(
        config: BfhlConfig,
        provider: Option<Arc<dyn TextProvider>>,
    ) -> Result<Self, AppError> {
        let state = AppState::new(&config.official_email, provider);
        let router = build_router(state);

        // Port 0 = random port for testing
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("BFHL service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    /// Get the HTTP port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serve until Ctrl+C or SIGTERM, then drain in-flight requests.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
