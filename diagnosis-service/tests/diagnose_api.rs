//! Router-level tests for `POST /diagnose`.
//!
//! Requests are driven through `build_router` with scripted mock models.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use diagnosis_service::models::DISCLAIMER;
use diagnosis_service::services::assembler::{
    BLOCKED_MESSAGE, EMPTY_REQUEST_MESSAGE, GENERATION_FAILED_MESSAGE, IMAGE_UNSUPPORTED_MESSAGE,
    NO_MODEL_MESSAGE,
};
use diagnosis_service::services::prompt::Segment;
use diagnosis_service::services::providers::mock::{MockModel, MockReply};
use diagnosis_service::services::{ModelHandle, ModelRegistry};
use diagnosis_service::{build_router, AppState};
use http_body_util::BodyExt;
use image::{DynamicImage, ImageFormat, RgbImage};
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;
use tower::util::ServiceExt;

const BOUNDARY: &str = "diagnosis-test-boundary";

enum Part<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a str, &'a [u8]),
}

fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File(name, filename, bytes) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n",
                        name, filename
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn diagnose_request(parts: &[Part<'_>]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/diagnose")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

fn png_bytes() -> Vec<u8> {
    let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, image::Rgb([180, 90, 90])));
    let mut out = Cursor::new(Vec::new());
    image.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

fn app(vision: Option<ModelHandle>, text: Option<ModelHandle>) -> Router {
    build_router(AppState::new(ModelRegistry::new(vision, text)))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, body)
}

fn assert_shape(body: &serde_json::Value) {
    let object = body.as_object().expect("body must be a JSON object");
    assert_eq!(object.len(), 3, "unexpected keys: {:?}", object.keys());
    assert!(body["severity"].is_string());
    assert!(body["advice"].is_string());
    assert_eq!(body["disclaimer"], DISCLAIMER);
}

fn text_model(reply: MockReply) -> Arc<MockModel> {
    Arc::new(MockModel::text_only(reply))
}

fn vision_model(reply: MockReply) -> Arc<MockModel> {
    Arc::new(MockModel::vision(reply))
}

#[tokio::test]
async fn structured_reply_is_parsed() {
    let text = text_model(MockReply::Text(
        "Severity: Moderate\nAdvice:\n* Book a GP appointment.\n* Note when it started.".into(),
    ));
    let (status, body) = send(
        app(None, Some(text.clone())),
        diagnose_request(&[Part::Text("problem", "cough for three weeks")]),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_shape(&body);
    assert_eq!(body["severity"], "Moderate");
    assert_eq!(
        body["advice"],
        "* Book a GP appointment.\n* Note when it started."
    );

    let input = text.last_input().expect("model was not called");
    match &input.segments[..] {
        [Segment::Text(prompt)] => assert!(prompt.contains("\"cough for three weeks\"")),
        other => panic!("unexpected segments: {:?}", other.len()),
    }
}

#[tokio::test]
async fn unstructured_reply_uses_keywords() {
    let raw = "This sounds like an emergency, call for help.";
    let (status, body) = send(
        app(None, Some(text_model(MockReply::Text(raw.into())))),
        diagnose_request(&[Part::Text("problem", "chest pain")]),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["severity"], "Severe");
    assert_eq!(body["advice"], raw);
}

#[tokio::test]
async fn empty_form_is_bad_request() {
    let (status, body) = send(
        app(None, Some(text_model(MockReply::Text("unused".into())))),
        diagnose_request(&[Part::Text("problem", "")]),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_shape(&body);
    assert_eq!(body["severity"], "Error");
    assert_eq!(body["advice"], EMPTY_REQUEST_MESSAGE);
}

#[tokio::test]
async fn empty_file_part_counts_as_no_image() {
    let (status, body) = send(
        app(None, Some(text_model(MockReply::Text("unused".into())))),
        diagnose_request(&[Part::Text("problem", ""), Part::File("image", "", b"")]),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["advice"], EMPTY_REQUEST_MESSAGE);
}

#[tokio::test]
async fn no_models_is_server_error() {
    let (status, body) = send(
        app(None, None),
        diagnose_request(&[Part::Text("problem", "sprained ankle")]),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_shape(&body);
    assert_eq!(body["severity"], "Error");
    assert_eq!(body["advice"], NO_MODEL_MESSAGE);
}

#[tokio::test]
async fn image_without_vision_model_is_server_error() {
    let png = png_bytes();
    let (status, body) = send(
        app(None, Some(text_model(MockReply::Text("unused".into())))),
        diagnose_request(&[
            Part::Text("problem", "itchy rash"),
            Part::File("image", "rash.png", &png),
        ]),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_shape(&body);
    assert_eq!(body["severity"], "Error");
    assert_eq!(body["advice"], IMAGE_UNSUPPORTED_MESSAGE);
}

#[tokio::test]
async fn image_is_sent_to_vision_model() {
    let vision = vision_model(MockReply::Text(
        "Severity: Basic\nAdvice:\nKeep the area clean.".into(),
    ));
    let text = text_model(MockReply::Text("unused".into()));
    let png = png_bytes();

    let (status, body) = send(
        app(Some(vision.clone()), Some(text.clone())),
        diagnose_request(&[Part::File("image", "cut.png", &png)]),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["severity"], "Basic");
    assert_eq!(body["advice"], "Keep the area clean.");

    let input = vision.last_input().expect("vision model was not called");
    assert_eq!(input.segments.len(), 2);
    assert!(matches!(input.segments[0], Segment::Text(_)));
    match &input.segments[1] {
        Segment::Image(image) => assert_eq!((image.width, image.height), (8, 8)),
        Segment::Text(_) => panic!("second segment must be the image"),
    }
    assert!(text.last_input().is_none());
}

#[tokio::test]
async fn unreadable_image_is_bad_request() {
    let (status, body) = send(
        app(Some(vision_model(MockReply::Text("unused".into()))), None),
        diagnose_request(&[
            Part::Text("problem", "see photo"),
            Part::File("image", "notes.txt", b"plain text, not pixels"),
        ]),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_shape(&body);
    assert_eq!(body["severity"], "Error");
}

#[tokio::test]
async fn blocked_prompt_is_reported() {
    let (status, body) = send(
        app(None, Some(text_model(MockReply::Blocked))),
        diagnose_request(&[Part::Text("problem", "something sensitive")]),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_shape(&body);
    assert_eq!(body["severity"], "Blocked");
    assert_eq!(body["advice"], BLOCKED_MESSAGE);
}

#[tokio::test]
async fn provider_failure_is_reported() {
    let (status, body) = send(
        app(None, Some(text_model(MockReply::Fail("quota exceeded".into())))),
        diagnose_request(&[Part::Text("problem", "back pain")]),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_shape(&body);
    assert_eq!(body["severity"], "Error");
    assert_eq!(body["advice"], GENERATION_FAILED_MESSAGE);
}

#[tokio::test]
async fn slow_provider_times_out() {
    let text = text_model(MockReply::Delay(Duration::from_secs(5), "late".into()));
    let state = AppState::new(ModelRegistry::new(None, Some(text)))
        .with_request_timeout(Duration::from_millis(50));

    let (status, body) = send(
        build_router(state),
        diagnose_request(&[Part::Text("problem", "dizzy")]),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["severity"], "Error");
    assert_eq!(body["advice"], GENERATION_FAILED_MESSAGE);
}

#[tokio::test]
async fn non_multipart_body_keeps_shape() {
    let request = Request::builder()
        .method("POST")
        .uri("/diagnose")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"problem":"fever"}"#))
        .unwrap();

    let (status, body) = send(
        app(None, Some(text_model(MockReply::Text("unused".into())))),
        request,
    )
    .await;

    assert!(status.is_client_error());
    assert_shape(&body);
    assert_eq!(body["severity"], "Error");
}

#[tokio::test]
async fn oversized_upload_keeps_shape() {
    let state = AppState::new(ModelRegistry::new(
        Some(vision_model(MockReply::Text("unused".into()))),
        None,
    ))
    .with_max_upload_bytes(1024);
    let big = vec![0u8; 4096];

    let (status, body) = send(
        build_router(state),
        diagnose_request(&[Part::File("image", "big.png", &big)]),
    )
    .await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_shape(&body);
}

#[tokio::test]
async fn every_branch_carries_disclaimer() {
    let png = png_bytes();
    let cases: Vec<(Router, Request<Body>)> = vec![
        (app(None, None), diagnose_request(&[Part::Text("problem", "x")])),
        (
            app(None, Some(text_model(MockReply::Text("".into())))),
            diagnose_request(&[]),
        ),
        (
            app(None, Some(text_model(MockReply::Text("".into())))),
            diagnose_request(&[Part::File("image", "a.png", &png)]),
        ),
        (
            app(None, Some(text_model(MockReply::Blocked))),
            diagnose_request(&[Part::Text("problem", "x")]),
        ),
        (
            app(None, Some(text_model(MockReply::Fail("down".into())))),
            diagnose_request(&[Part::Text("problem", "x")]),
        ),
        (
            app(None, Some(text_model(MockReply::Text("".into())))),
            diagnose_request(&[Part::Text("problem", "x")]),
        ),
    ];

    for (app, request) in cases {
        let (_, body) = send(app, request).await;
        assert_shape(&body);
    }
}

#[tokio::test]
async fn response_carries_request_id_and_security_headers() {
    let request = Request::builder()
        .method("POST")
        .uri("/diagnose")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .header("x-request-id", "trace-me")
        .body(Body::from(multipart_body(&[Part::Text("problem", "cold")])))
        .unwrap();

    let response = app(None, Some(text_model(MockReply::Text("rest".into()))))
        .oneshot(request)
        .await
        .unwrap();

    assert_eq!(response.headers()["x-request-id"], "trace-me");
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
}
