use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::json;
use std::time::{Duration, Instant};
use texreport::test_utils::FakeBehavior;

use crate::common::TestService;

fn error_message(response: &crate::common::TestResponse) -> String {
    response.json()["error"].as_str().expect("error field is a string").to_string()
}

#[tokio::test]
async fn test_missing_template() {
    let service = TestService::new(FakeBehavior::Succeed);
    std::fs::remove_file(service.template_path()).unwrap();

    let response = service.generate(&json!({"company": "Acme"})).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(error_message(&response).starts_with("Could not read template file"));
    assert_eq!(service.fake.invocations(), 0);
    assert_eq!(service.work_dir_entries(), 0);
}

#[tokio::test]
async fn test_first_pass_failure_stops_compilation() {
    let service = TestService::new(FakeBehavior::FailOnPass(1));

    let response = service.generate(&json!({"company": "Acme"})).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = error_message(&response);
    assert!(message.starts_with("PDF generation failed"));
    assert!(message.contains("! Undefined control sequence."));
    assert_eq!(service.fake.invocations(), 1);
}

#[tokio::test]
async fn test_second_pass_failure() {
    let service = TestService::new(FakeBehavior::FailOnPass(2));

    let response = service.generate(&json!({})).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(error_message(&response).contains("Undefined control sequence"));
    assert_eq!(service.fake.invocations(), 2);
}

#[tokio::test]
async fn test_diagnostic_from_stdout_when_stderr_empty() {
    let service = TestService::new(FakeBehavior::FailStdoutOnly);

    let response = service.generate(&json!({})).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(error_message(&response).contains("missing.sty"));
}

#[tokio::test]
async fn test_artifact_not_produced_is_distinct() {
    let service = TestService::new(FakeBehavior::NoArtifact);

    let response = service.generate(&json!({"company": "Acme"})).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = error_message(&response);
    assert!(message.contains("artifact not produced"));
    assert!(!message.contains("PDF generation failed"));
    assert_eq!(service.fake.invocations(), 2);
}

#[tokio::test]
async fn test_compiler_unavailable() {
    let service = TestService::with_config(FakeBehavior::Succeed, |config| {
        config.compiler = "texreport-no-such-compiler".to_string();
    });

    let response = service.generate(&json!({"company": "Acme"})).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        error_message(&response),
        "PDF compiler 'texreport-no-such-compiler' is not installed or not found in PATH"
    );
    assert_eq!(service.work_dir_entries(), 0);
}

#[tokio::test]
async fn test_compiler_timeout() {
    let service = TestService::with_config(FakeBehavior::Hang, |config| {
        config.compile_timeout = Duration::from_secs(1);
    });

    let start = Instant::now();
    let response = service.generate(&json!({})).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(error_message(&response).contains("timed out after 1 seconds"));
    assert!(start.elapsed() < Duration::from_secs(15));
    assert_eq!(service.fake.invocations(), 1);
}

#[tokio::test]
async fn test_non_object_body_is_bad_request() {
    let service = TestService::new(FakeBehavior::Succeed);

    for body in [json!(["company", "Acme"]), json!("Acme"), json!(42), json!(null)] {
        let response = service.generate(&body).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{body}");
        assert!(error_message(&response).starts_with("Invalid request body"));
    }
    assert_eq!(service.fake.invocations(), 0);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let service = TestService::new(FakeBehavior::Succeed);
    let request = Request::post("/generate")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"company\": "))
        .unwrap();

    let response = service.send(request).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.json()["error"].is_string());
}

#[tokio::test]
async fn test_missing_content_type_is_bad_request() {
    let service = TestService::new(FakeBehavior::Succeed);
    let request = Request::post("/generate").body(Body::from("{}")).unwrap();

    let response = service.send(request).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_failure_does_not_affect_next_request() {
    let service = TestService::new(FakeBehavior::Succeed);
    std::fs::rename(service.template_path(), service.temp.path().join("aside.tex")).unwrap();
    assert_eq!(service.generate(&json!({})).await.status, StatusCode::INTERNAL_SERVER_ERROR);

    std::fs::rename(service.temp.path().join("aside.tex"), service.template_path()).unwrap();
    assert_eq!(service.generate(&json!({})).await.status, StatusCode::OK);
}
