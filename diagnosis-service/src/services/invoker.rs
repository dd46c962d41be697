use crate::services::metrics;
use crate::services::prompt::GenerationInput;
use crate::services::providers::{GenerativeModel, ProviderError};
use std::time::{Duration, Instant};

/// Result of one generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    Success(String),
    /// The provider's safety filter rejected the input.
    Blocked(String),
    Failure(String),
}

impl From<ProviderError> for GenerationOutcome {
    fn from(error: ProviderError) -> Self {
        match error {
            ProviderError::ContentFiltered(reason) => GenerationOutcome::Blocked(reason),
            other => GenerationOutcome::Failure(other.to_string()),
        }
    }
}

/// Runs exactly one generation call, bounded by `timeout`.
#[tracing::instrument(
    skip_all,
    fields(model = %model.name(), has_image = input.has_image(), prompt_len = input.text_len())
)]
pub async fn invoke(
    model: &dyn GenerativeModel,
    input: &GenerationInput,
    timeout: Duration,
) -> GenerationOutcome {
    let start = Instant::now();

    let result = match tokio::time::timeout(timeout, model.generate(input)).await {
        Ok(result) => result,
        Err(_) => Err(ProviderError::Timeout(timeout)),
    };

    let elapsed = start.elapsed();
    metrics::observe_provider_latency(model.name(), elapsed.as_secs_f64());

    match result {
        Ok(text) => {
            tracing::info!(
                elapsed_ms = elapsed.as_millis() as u64,
                reply_len = text.len(),
                "Generation completed"
            );
            GenerationOutcome::Success(text)
        }
        Err(error) => {
            metrics::record_provider_error(model.name(), error.kind());
            match &error {
                ProviderError::ContentFiltered(reason) => {
                    tracing::warn!(%reason, "Gemini API blocked prompt");
                }
                other => {
                    tracing::error!(error = %other, kind = other.kind(), "Error calling Gemini API");
                }
            }
            error.into()
        }
    }
}
