use crate::dtos::ApiResponse;
use crate::error::BfhlError;
use crate::startup::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use std::any::Any;

/// Every failure, whatever its kind, goes out with this status.
pub const FAILURE_STATUS: StatusCode = StatusCode::BAD_REQUEST;

const FALLBACK_MESSAGE: &str = "Internal Server Error";

/// `POST /bfhl`: run the operation selected by the body and wrap the result.
pub async fn process(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let result = match parse_body(&headers, &body) {
        Ok(payload) => state.dispatcher.dispatch(payload).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(data) => (
            StatusCode::OK,
            Json(ApiResponse::success(&state.official_email, data)),
        )
            .into_response(),
        Err(e) => {
            tracing::warn!(kind = e.kind(), error = %e, "bfhl request failed");
            failure_response(&state.official_email, e.to_string())
        }
    }
}

/// Non-JSON content types are read as an empty object, like a JSON body
/// parser that simply skips them. Malformed JSON is an input error.
fn parse_body(headers: &HeaderMap, body: &[u8]) -> Result<Value, BfhlError> {
    if !is_json(headers) || body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Default::default()));
    }

    serde_json::from_slice(body)
        .map_err(|e| BfhlError::invalid_input(format!("Invalid JSON body: {}", e)))
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|mime| {
            let mime = mime.trim().to_ascii_lowercase();
            mime == "application/json" || mime.ends_with("+json")
        })
        .unwrap_or(false)
}

pub fn failure_response(official_email: &str, message: impl Into<String>) -> Response {
    (
        FAILURE_STATUS,
        Json(ApiResponse::failure(official_email, message)),
    )
        .into_response()
}

/// Catch-all for panics escaping a handler: same envelope, same status, the
/// panic message if it carried one.
pub fn panic_response(official_email: &str, panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else {
        FALLBACK_MESSAGE.to_string()
    };

    tracing::error!(panic = %message, "handler panicked");
    failure_response(official_email, message)
}
