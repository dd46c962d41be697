//! Request orchestration: validate, select, build, invoke, assemble.

use crate::models::DiagnosisRequest;
use crate::services::assembler::{assemble, Diagnosis, Rejection, Resolution};
use crate::services::images::decode_image;
use crate::services::invoker::invoke;
use crate::services::prompt::build_prompt;
use crate::services::selector::{ModelRegistry, Selection};
use std::time::Duration;

pub async fn diagnose(
    models: &ModelRegistry,
    request: DiagnosisRequest,
    timeout: Duration,
) -> Diagnosis {
    assemble(resolve(models, request, timeout).await)
}

async fn resolve(
    models: &ModelRegistry,
    request: DiagnosisRequest,
    timeout: Duration,
) -> Resolution {
    if request.is_empty() {
        return Resolution::Rejected(Rejection::EmptyRequest);
    }

    let has_image = request.has_image();
    let model = match models.select(has_image) {
        Selection::Model(model) => model,
        Selection::Unavailable => {
            tracing::error!("No generative model available for request");
            return Resolution::Rejected(Rejection::NoModelAvailable);
        }
    };

    let image = match request.image_bytes.as_deref().filter(|_| has_image) {
        Some(bytes) => {
            if !model.capability().supports_images() {
                tracing::warn!(
                    model = %model.name(),
                    "Image supplied but no multimodal model is loaded"
                );
                return Resolution::Rejected(Rejection::ImageUnsupported);
            }

            match decode_image(bytes) {
                Ok(image) => Some(image),
                Err(e) => {
                    tracing::warn!(error = %e, size = bytes.len(), "Rejected unreadable image upload");
                    return Resolution::Rejected(Rejection::UnreadableImage);
                }
            }
        }
        None => None,
    };

    if image.is_some() {
        tracing::info!(model = %model.name(), "Processing request with image");
    } else {
        tracing::info!(model = %model.name(), "Processing request with text only");
    }

    let input = build_prompt(&request.problem_text, image);
    Resolution::Generated(invoke(model.as_ref(), &input, timeout).await)
}
