//! Mapping of every terminal state to the outward result and HTTP status.

use crate::models::{DiagnosisResult, Severity};
use crate::services::classifier::classify;
use crate::services::invoker::GenerationOutcome;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

pub const NO_MODEL_MESSAGE: &str =
    "No suitable AI model could be loaded on the server. Please contact support.";
pub const EMPTY_REQUEST_MESSAGE: &str = "Please describe your health problem or upload an image.";
pub const IMAGE_UNSUPPORTED_MESSAGE: &str = "Image upload is not supported because the multimodal AI model failed to load. Please try again with text only.";
pub const UNREADABLE_IMAGE_MESSAGE: &str =
    "The uploaded file could not be read as an image. Please upload a JPEG, PNG, GIF, BMP or WebP picture.";
pub const MALFORMED_REQUEST_MESSAGE: &str =
    "The request could not be read. Please submit the form again.";
pub const BLOCKED_MESSAGE: &str = "Your input was blocked by the safety filters. Please rephrase or provide different information. We cannot provide advice for potentially sensitive content.";
pub const GENERATION_FAILED_MESSAGE: &str = "An error occurred while connecting to the AI. Please try again later. Ensure your API key is correct and you have an active internet connection.";

/// Reasons a request ends before any model is invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    NoModelAvailable,
    EmptyRequest,
    ImageUnsupported,
    UnreadableImage,
    /// The multipart body itself was unusable; carries the framework's status.
    MalformedRequest(StatusCode),
}

/// How a request ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Rejected(Rejection),
    Generated(GenerationOutcome),
}

/// The result plus the status it is sent with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnosis {
    pub status: StatusCode,
    pub result: DiagnosisResult,
}

impl IntoResponse for Diagnosis {
    fn into_response(self) -> Response {
        (self.status, Json(self.result)).into_response()
    }
}

pub fn assemble(resolution: Resolution) -> Diagnosis {
    let (status, severity, advice) = match resolution {
        Resolution::Rejected(rejection) => {
            let (status, advice) = match rejection {
                Rejection::NoModelAvailable => (StatusCode::INTERNAL_SERVER_ERROR, NO_MODEL_MESSAGE),
                Rejection::EmptyRequest => (StatusCode::BAD_REQUEST, EMPTY_REQUEST_MESSAGE),
                Rejection::ImageUnsupported => {
                    (StatusCode::INTERNAL_SERVER_ERROR, IMAGE_UNSUPPORTED_MESSAGE)
                }
                Rejection::UnreadableImage => (StatusCode::BAD_REQUEST, UNREADABLE_IMAGE_MESSAGE),
                Rejection::MalformedRequest(status) => (status, MALFORMED_REQUEST_MESSAGE),
            };
            (status, Severity::Error, advice.to_string())
        }
        Resolution::Generated(GenerationOutcome::Blocked(_)) => {
            (StatusCode::OK, Severity::Blocked, BLOCKED_MESSAGE.to_string())
        }
        Resolution::Generated(GenerationOutcome::Failure(_)) => (
            StatusCode::OK,
            Severity::Error,
            GENERATION_FAILED_MESSAGE.to_string(),
        ),
        Resolution::Generated(GenerationOutcome::Success(raw_text)) => {
            let classification = classify(&raw_text);
            (StatusCode::OK, classification.severity, classification.advice)
        }
    };

    Diagnosis {
        status,
        result: DiagnosisResult::new(severity, advice),
    }
}
