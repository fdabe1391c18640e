use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::json;
use texreport::test_utils::FakeBehavior;
use tower::ServiceExt;

use crate::common::TestService;

#[tokio::test]
async fn test_nothing_left_after_success() {
    let service = TestService::new(FakeBehavior::Succeed);

    for i in 0..5 {
        let response = service.generate(&json!({"company": format!("Acme {i}")})).await;
        assert_eq!(response.status, StatusCode::OK);
    }

    assert_eq!(service.work_dir_entries(), 0);
}

#[tokio::test]
async fn test_nothing_left_after_each_failure_kind() {
    for behavior in [
        FakeBehavior::FailOnPass(1),
        FakeBehavior::FailOnPass(2),
        FakeBehavior::FailStdoutOnly,
        FakeBehavior::NoArtifact,
    ] {
        let service = TestService::new(behavior);
        let response = service.generate(&json!({"company": "Acme"})).await;

        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR, "{behavior:?}");
        assert_eq!(service.work_dir_entries(), 0, "{behavior:?} left files behind");
    }
}

#[tokio::test]
async fn test_nothing_left_after_timeout() {
    let service = TestService::with_config(FakeBehavior::Hang, |config| {
        config.compile_timeout = std::time::Duration::from_secs(1);
    });

    let response = service.generate(&json!({})).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(service.work_dir_entries(), 0);
}

#[tokio::test]
async fn test_artifact_kept_until_body_is_consumed() {
    let service = TestService::new(FakeBehavior::Succeed);
    let request = Request::post("/generate")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({"company": "Acme"}).to_string()))
        .unwrap();

    let response = service.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Only the artifact remains while the body is pending
    let job_dirs: Vec<_> = std::fs::read_dir(service.work_dir()).unwrap().map(|e| e.unwrap().path()).collect();
    assert_eq!(job_dirs.len(), 1);
    let files: Vec<_> = std::fs::read_dir(&job_dirs[0]).unwrap().map(|e| e.unwrap().path()).collect();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].extension().and_then(|e| e.to_str()), Some("pdf"));

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(body.starts_with(b"%PDF"));
    assert_eq!(service.work_dir_entries(), 0);
}

#[tokio::test]
async fn test_client_disconnect_before_reading_body() {
    let service = TestService::new(FakeBehavior::Succeed);
    let request = Request::post("/generate")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))
        .unwrap();

    let response = service.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(service.work_dir_entries(), 1);

    drop(response);

    assert_eq!(service.work_dir_entries(), 0);
}
