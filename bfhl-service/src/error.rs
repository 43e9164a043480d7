use thiserror::Error;

/// Failures of a single `/bfhl` request.
///
/// Every variant is rendered as the same failure envelope with the same HTTP
/// status; the `Display` text becomes the envelope's `message`.
#[derive(Debug, Error)]
pub enum BfhlError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Invalid request: missing required key")]
    MissingKey,

    #[error("Server configuration error: {0}")]
    Configuration(String),

    #[error("Failed to generate AI response")]
    AiGeneration,
}

impl BfhlError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        BfhlError::InvalidInput(message.into())
    }

    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            BfhlError::InvalidInput(_) => "invalid_input",
            BfhlError::MissingKey => "missing_key",
            BfhlError::Configuration(_) => "configuration",
            BfhlError::AiGeneration => "ai_generation",
        }
    }
}
