#![allow(dead_code)]

use axum::{body::Body, http::Request, Router};
use bfhl_service::config::{BfhlConfig, GoogleConfig, ModelConfig};
use bfhl_service::services::providers::TextProvider;
use bfhl_service::{build_router, AppState, Application};
use service_core::config::Config;
use std::sync::Arc;
use tower::ServiceExt;

pub const TEST_EMAIL: &str = "tester@example.com";

pub fn test_config() -> BfhlConfig {
    BfhlConfig {
        common: Config {
            port: 0, // Random port
            log_level: "debug".to_string(),
            otlp_endpoint: None,
        },
        official_email: TEST_EMAIL.to_string(),
        models: ModelConfig {
            text_model: "gemini-2.5-flash-lite".to_string(),
        },
        google: GoogleConfig {
            api_key: None,
            api_base: "http://127.0.0.1:9".to_string(),
            request_timeout_secs: 5,
        },
    }
}

pub fn router(provider: Option<Arc<dyn TextProvider>>) -> Router {
    build_router(AppState::new(TEST_EMAIL, provider))
}

/// POST a raw JSON string to `/bfhl` and return status plus parsed body.
pub async fn post_bfhl(app: Router, body: &str) -> (u16, serde_json::Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/bfhl")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status().as_u16();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
}

impl TestApp {
    pub async fn spawn(provider: Option<Arc<dyn TextProvider>>) -> Self {
        let app = Application::build_with_provider(test_config(), provider)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp { address, port }
    }
}
