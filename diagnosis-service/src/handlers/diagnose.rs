use crate::models::DiagnosisRequest;
use crate::services::assembler::{assemble, Diagnosis, Rejection, Resolution};
use crate::services::{diagnose, metrics};
use crate::startup::AppState;
use axum::extract::multipart::{Multipart, MultipartError, MultipartRejection};
use axum::extract::State;

const PROBLEM_FIELD: &str = "problem";
const IMAGE_FIELD: &str = "image";

/// `POST /diagnose` with multipart fields `problem` (text) and `image` (file).
///
/// Always answers with the `{severity, advice, disclaimer}` shape.
#[tracing::instrument(skip_all)]
pub async fn diagnose_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Diagnosis {
    let diagnosis = match multipart {
        Ok(multipart) => match read_request(multipart).await {
            Ok(request) => {
                tracing::debug!(
                    problem_len = request.problem_text.len(),
                    has_image = request.has_image(),
                    "Received diagnosis request"
                );
                diagnose(&state.models, request, state.request_timeout).await
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read multipart body");
                assemble(Resolution::Rejected(Rejection::MalformedRequest(e.status())))
            }
        },
        Err(rejection) => {
            tracing::warn!(error = %rejection, "Rejected non-multipart request");
            assemble(Resolution::Rejected(Rejection::MalformedRequest(
                rejection.status(),
            )))
        }
    };

    metrics::record_diagnosis(
        diagnosis.result.severity.metric_label(),
        diagnosis.status.as_u16(),
    );
    tracing::info!(
        severity = %diagnosis.result.severity,
        status = diagnosis.status.as_u16(),
        "Diagnosis completed"
    );

    diagnosis
}

async fn read_request(mut multipart: Multipart) -> Result<DiagnosisRequest, MultipartError> {
    let mut problem_text = String::new();
    let mut image_bytes = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some(PROBLEM_FIELD) => problem_text = field.text().await?,
            Some(IMAGE_FIELD) => image_bytes = Some(field.bytes().await?.to_vec()),
            other => tracing::debug!(field = ?other, "Ignoring unknown multipart field"),
        }
    }

    Ok(DiagnosisRequest::new(problem_text, image_bytes))
}
