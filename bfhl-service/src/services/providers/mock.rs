//! Mock provider implementation for testing.

use super::{FinishReason, GenerationParams, ProviderError, ProviderResponse, TextProvider};
use async_trait::async_trait;
use std::sync::Mutex;

/// Mock text provider that either answers with a canned string or fails.
pub struct MockTextProvider {
    answer: Result<String, String>,
    last_prompt: Mutex<Option<String>>,
}

impl MockTextProvider {
    /// Always answer with `answer`.
    pub fn answering(answer: impl Into<String>) -> Self {
        Self {
            answer: Ok(answer.into()),
            last_prompt: Mutex::new(None),
        }
    }

    /// Always fail with an API error carrying `reason`.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            answer: Err(reason.into()),
            last_prompt: Mutex::new(None),
        }
    }

    /// The most recent prompt this provider received.
    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().ok().and_then(|prompt| prompt.clone())
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    async fn generate(
        &self,
        prompt: &str,
        _params: &GenerationParams,
    ) -> Result<ProviderResponse, ProviderError> {
        if let Ok(mut last) = self.last_prompt.lock() {
            *last = Some(prompt.to_string());
        }

        match &self.answer {
            Ok(text) => Ok(ProviderResponse {
                text: text.clone(),
                input_tokens: prompt.len() as i32 / 4,
                output_tokens: 1,
                finish_reason: FinishReason::Complete,
            }),
            Err(reason) => Err(ProviderError::ApiError(reason.clone())),
        }
    }

    fn model(&self) -> &str {
        "mock"
    }
}
