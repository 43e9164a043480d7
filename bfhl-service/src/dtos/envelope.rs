use super::BfhlData;
use serde::Serialize;

/// Fixed-shape wrapper for every response, success or failure.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse {
    pub is_success: bool,
    pub official_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<BfhlData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ApiResponse {
    pub fn success(official_email: &str, data: BfhlData) -> Self {
        Self {
            is_success: true,
            official_email: official_email.to_string(),
            data: Some(data),
            message: None,
        }
    }

    pub fn failure(official_email: &str, message: impl Into<String>) -> Self {
        Self {
            is_success: false,
            official_email: official_email.to_string(),
            data: None,
            message: Some(message.into()),
        }
    }

    /// Health probe body: just the flag and the email.
    pub fn healthy(official_email: &str) -> Self {
        Self {
            is_success: true,
            official_email: official_email.to_string(),
            data: None,
            message: None,
        }
    }
}
