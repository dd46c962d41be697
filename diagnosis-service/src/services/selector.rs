//! Model handles and per-request model selection.

use crate::config::DiagnosisConfig;
use crate::services::providers::gemini::{GeminiConfig, GeminiModel};
use crate::services::providers::{Capability, GenerativeModel};
use service_core::error::AppError;
use std::sync::Arc;

pub type ModelHandle = Arc<dyn GenerativeModel>;

/// Outcome of choosing a model for one request.
#[derive(Clone)]
pub enum Selection {
    Model(ModelHandle),
    Unavailable,
}

/// Vision first when an image is supplied, otherwise (or as a fallback) the
/// text-only handle. A vision handle also accepts text, so a text request is
/// served by it when no text-only handle exists.
pub fn select(
    has_image: bool,
    vision: Option<&ModelHandle>,
    text: Option<&ModelHandle>,
) -> Selection {
    match (has_image, vision, text) {
        (true, Some(vision), _) => Selection::Model(vision.clone()),
        (_, _, Some(text)) => Selection::Model(text.clone()),
        (false, Some(vision), None) => Selection::Model(vision.clone()),
        _ => Selection::Unavailable,
    }
}

/// The process-lifetime model handles. Immutable once built.
#[derive(Clone, Default)]
pub struct ModelRegistry {
    vision: Option<ModelHandle>,
    text: Option<ModelHandle>,
}

impl ModelRegistry {
    pub fn new(vision: Option<ModelHandle>, text: Option<ModelHandle>) -> Self {
        Self { vision, text }
    }

    /// Builds both handles independently. Fails only when neither could be
    /// built, since no request could then be served.
    pub fn from_config(config: &DiagnosisConfig) -> Result<Self, AppError> {
        let vision = load(config, config.models.vision_model.as_deref(), Capability::Vision);
        let text = load(config, config.models.text_model.as_deref(), Capability::TextOnly);

        if vision.is_none() {
            tracing::warn!("No multimodal model loaded, image input will be rejected");
        }

        if vision.is_none() && text.is_none() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "No generative model could be initialized. Check the API key and model names."
            )));
        }

        Ok(Self::new(vision, text))
    }

    pub fn vision(&self) -> Option<&ModelHandle> {
        self.vision.as_ref()
    }

    pub fn text(&self) -> Option<&ModelHandle> {
        self.text.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.vision.is_none() && self.text.is_none()
    }

    pub fn select(&self, has_image: bool) -> Selection {
        select(has_image, self.vision(), self.text())
    }
}

fn load(
    config: &DiagnosisConfig,
    model: Option<&str>,
    capability: Capability,
) -> Option<ModelHandle> {
    let model = model?;
    let gemini_config = GeminiConfig {
        api_key: config.google.api_key.clone(),
        model: model.to_string(),
        base_url: config.google.base_url.clone(),
        timeout: config.models.request_timeout(),
    };

    match GeminiModel::new(gemini_config, capability) {
        Ok(handle) => {
            tracing::info!(model, ?capability, "Initialized Gemini model");
            Some(Arc::new(handle))
        }
        Err(e) => {
            tracing::warn!(model, ?capability, error = %e, "Failed to initialize Gemini model");
            None
        }
    }
}
