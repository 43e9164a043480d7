//! Routes a `/bfhl` body to exactly one operation and runs it.

use crate::dtos::{BfhlData, BfhlRequest, FibonacciSeries};
use crate::error::BfhlError;
use crate::services::coercion::{coerce_all, coerce_integer, to_prompt_text};
use crate::services::math::{self, MAX_FIBONACCI_TERMS};
use crate::services::metrics::record_operation;
use crate::services::providers::{GenerationParams, TextProvider};
use serde_json::Value;
use std::sync::Arc;

/// Output budget for the AI answer. One word needs a handful of tokens.
const SINGLE_WORD_MAX_TOKENS: i32 = 32;

/// Executes `/bfhl` requests. Holds only immutable collaborators, so one
/// instance is shared by every request.
#[derive(Clone)]
pub struct Dispatcher {
    provider: Option<Arc<dyn TextProvider>>,
    params: GenerationParams,
}

impl Dispatcher {
    /// `provider` is `None` when no API key is configured; AI requests then
    /// fail with a configuration error while everything else keeps working.
    pub fn new(provider: Option<Arc<dyn TextProvider>>) -> Self {
        Self {
            provider,
            params: GenerationParams {
                max_tokens: Some(SINGLE_WORD_MAX_TOKENS),
            },
        }
    }

    pub async fn dispatch(&self, payload: Value) -> Result<BfhlData, BfhlError> {
        let request = BfhlRequest::from_payload(payload)?;
        let operation = request.operation();

        let result = match request {
            BfhlRequest::Fibonacci(value) => fibonacci_series(&value),
            BfhlRequest::Prime(value) => primes_in(&value),
            BfhlRequest::Lcm(value) => lcm_of(&value),
            BfhlRequest::Hcf(value) => hcf_of(&value),
            BfhlRequest::Ai(value) => self.ask(&value).await,
        };

        record_operation(
            operation,
            match &result {
                Ok(_) => "success",
                Err(e) => e.kind(),
            },
        );
        result
    }

    async fn ask(&self, question: &Value) -> Result<BfhlData, BfhlError> {
        let provider = self
            .provider
            .as_ref()
            .ok_or_else(|| BfhlError::Configuration("Gemini API Key not set".to_string()))?;

        let prompt = single_word_prompt(&to_prompt_text(question));

        match provider.generate(&prompt, &self.params).await {
            Ok(response) => {
                tracing::debug!(
                    model = %provider.model(),
                    input_tokens = response.input_tokens,
                    output_tokens = response.output_tokens,
                    finish_reason = ?response.finish_reason,
                    "AI response received"
                );
                Ok(BfhlData::Text(response.text.trim().to_string()))
            }
            Err(e) => {
                tracing::error!(model = %provider.model(), error = %e, "AI generation failed");
                Err(BfhlError::AiGeneration)
            }
        }
    }
}

pub fn single_word_prompt(question: &str) -> String {
    format!(
        "You are a helpful assistant. Answer the following question in a single word: \"{}\"",
        question
    )
}

fn fibonacci_series(value: &Value) -> Result<BfhlData, BfhlError> {
    let n = coerce_integer(value)
        .ok_or_else(|| BfhlError::invalid_input("Invalid input for fibonacci"))?;

    // Bounds the response size only.
    if n > MAX_FIBONACCI_TERMS as i64 {
        return Err(BfhlError::invalid_input(format!(
            "Invalid input for fibonacci: at most {} terms are supported",
            MAX_FIBONACCI_TERMS
        )));
    }

    Ok(BfhlData::Series(FibonacciSeries(math::fibonacci(n))))
}

fn primes_in(value: &Value) -> Result<BfhlData, BfhlError> {
    let numbers = coerce_all(require_array(value, "prime")?);
    Ok(BfhlData::Integers(
        numbers.into_iter().filter(|&n| math::is_prime(n)).collect(),
    ))
}

fn lcm_of(value: &Value) -> Result<BfhlData, BfhlError> {
    let numbers = coerce_all(require_array(value, "lcm")?);
    math::reduce_lcm(&numbers)
        .map(BfhlData::Integer)
        .ok_or_else(|| BfhlError::invalid_input("Invalid input for lcm: result is too large"))
}

fn hcf_of(value: &Value) -> Result<BfhlData, BfhlError> {
    let numbers = coerce_all(require_array(value, "hcf")?);
    Ok(BfhlData::Integer(math::reduce_hcf(&numbers)))
}

fn require_array<'a>(value: &'a Value, key: &str) -> Result<&'a [Value], BfhlError> {
    value
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| BfhlError::invalid_input(format!("Invalid input for {}: must be array", key)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::mock::MockTextProvider;
    use serde_json::json;

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(None)
    }

    #[tokio::test]
    async fn fibonacci_accepts_numeric_strings() {
        let data = dispatcher().dispatch(json!({ "fibonacci": "6" })).await.unwrap();
        assert_eq!(
            data,
            BfhlData::Series(FibonacciSeries(vec![0.0, 1.0, 1.0, 2.0, 3.0, 5.0]))
        );

        let data = dispatcher().dispatch(json!({ "fibonacci": 0 })).await.unwrap();
        assert_eq!(data, BfhlData::Series(FibonacciSeries(vec![])));

        let data = dispatcher().dispatch(json!({ "fibonacci": -4 })).await.unwrap();
        assert_eq!(data, BfhlData::Series(FibonacciSeries(vec![])));
    }

    #[tokio::test]
    async fn fibonacci_past_u64_range_succeeds() {
        let data = dispatcher().dispatch(json!({ "fibonacci": 100 })).await.unwrap();
        let BfhlData::Series(FibonacciSeries(series)) = data else {
            panic!("expected a fibonacci series");
        };
        assert_eq!(series.len(), 100);
        assert_eq!(series[10], 55.0);
        assert!(series[99] > 2e20);
    }

    #[tokio::test]
    async fn fibonacci_rejects_non_numbers_and_huge_counts() {
        let err = dispatcher()
            .dispatch(json!({ "fibonacci": "abc" }))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid input for fibonacci");

        let err = dispatcher()
            .dispatch(json!({ "fibonacci": MAX_FIBONACCI_TERMS + 1 }))
            .await
            .unwrap_err();
        assert!(matches!(err, BfhlError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn prime_filters_after_coercion() {
        let data = dispatcher()
            .dispatch(json!({ "prime": [2, 3, 4, "5", "x"] }))
            .await
            .unwrap();
        assert_eq!(data, BfhlData::Integers(vec![2, 3, 5]));

        let data = dispatcher().dispatch(json!({ "prime": [] })).await.unwrap();
        assert_eq!(data, BfhlData::Integers(vec![]));
    }

    #[tokio::test]
    async fn array_operations_reject_scalars() {
        for (key, message) in [
            ("prime", "Invalid input for prime: must be array"),
            ("lcm", "Invalid input for lcm: must be array"),
            ("hcf", "Invalid input for hcf: must be array"),
        ] {
            let mut body = serde_json::Map::new();
            body.insert(key.to_string(), json!("not-an-array"));

            let err = dispatcher().dispatch(Value::Object(body)).await.unwrap_err();
            assert_eq!(err.to_string(), message);
        }
    }

    #[tokio::test]
    async fn lcm_and_hcf_reduce_coerced_values() {
        let data = dispatcher()
            .dispatch(json!({ "lcm": [4, "6", "junk"] }))
            .await
            .unwrap();
        assert_eq!(data, BfhlData::Integer(12));

        let data = dispatcher().dispatch(json!({ "hcf": [12, 18] })).await.unwrap();
        assert_eq!(data, BfhlData::Integer(6));

        let data = dispatcher()
            .dispatch(json!({ "hcf": ["a", null] }))
            .await
            .unwrap();
        assert_eq!(data, BfhlData::Integer(0));

        let data = dispatcher().dispatch(json!({ "lcm": [] })).await.unwrap();
        assert_eq!(data, BfhlData::Integer(0));
    }

    #[tokio::test]
    async fn lcm_overflow_is_invalid_input() {
        let err = dispatcher()
            .dispatch(json!({ "lcm": [i64::MAX, i64::MAX - 1] }))
            .await
            .unwrap_err();
        assert!(matches!(err, BfhlError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn missing_key() {
        let err = dispatcher().dispatch(json!({ "other": 1 })).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid request: missing required key");
    }

    #[tokio::test]
    async fn ai_without_provider_is_configuration_error() {
        let err = dispatcher()
            .dispatch(json!({ "AI": "What is the capital of France?" }))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Server configuration error: Gemini API Key not set"
        );
    }

    #[tokio::test]
    async fn ai_trims_answer_and_embeds_question() {
        let provider = Arc::new(MockTextProvider::answering("  Paris\n"));
        let dispatcher = Dispatcher::new(Some(provider.clone()));

        let data = dispatcher
            .dispatch(json!({ "AI": "What is the capital of France?" }))
            .await
            .unwrap();

        assert_eq!(data, BfhlData::Text("Paris".to_string()));
        assert_eq!(
            provider.last_prompt().as_deref(),
            Some(
                "You are a helpful assistant. Answer the following question in a single word: \
                 \"What is the capital of France?\""
            )
        );
    }

    #[tokio::test]
    async fn ai_provider_failure_is_generic() {
        let provider = Arc::new(MockTextProvider::failing("upstream 503"));
        let dispatcher = Dispatcher::new(Some(provider));

        let err = dispatcher.dispatch(json!({ "AI": "Hi?" })).await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to generate AI response");
    }
}
