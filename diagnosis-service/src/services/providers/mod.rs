//! Generative model abstractions and implementations.
//!
//! This module provides a trait-based abstraction over the hosted model,
//! allowing the Gemini backend to be swapped for a scripted mock in tests.

pub mod gemini;
pub mod mock;

use crate::services::prompt::GenerationInput;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Rate limited")]
    RateLimited,

    /// The provider's safety filter rejected the input.
    #[error("Content filtered: {0}")]
    ContentFiltered(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Timed out after {0:?}")]
    Timeout(Duration),
}

impl ProviderError {
    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::NotConfigured(_) => "not_configured",
            ProviderError::ApiError(_) => "api_error",
            ProviderError::InvalidRequest(_) => "invalid_request",
            ProviderError::RateLimited => "rate_limited",
            ProviderError::ContentFiltered(_) => "content_filtered",
            ProviderError::NetworkError(_) => "network_error",
            ProviderError::Timeout(_) => "timeout",
        }
    }
}

/// What a model accepts as input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Vision,
    TextOnly,
}

impl Capability {
    pub fn supports_images(self) -> bool {
        matches!(self, Capability::Vision)
    }
}

/// A loaded, invokable text/image-to-text model.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Model identifier, for logging.
    fn name(&self) -> &str;

    fn capability(&self) -> Capability;

    /// Generate a reply for the given segments.
    async fn generate(&self, input: &GenerationInput) -> Result<String, ProviderError>;
}
