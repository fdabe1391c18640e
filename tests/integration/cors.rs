use axum::body::Body;
use axum::http::{Request, header};
use texreport::test_utils::FakeBehavior;

use crate::common::TestService;

fn preflight(origin: &str) -> Request<Body> {
    Request::options("/generate")
        .header(header::ORIGIN, origin)
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_any_origin_by_default() {
    let service = TestService::new(FakeBehavior::Succeed);

    let response = service.send(preflight("https://anywhere.test")).await;

    assert!(response.status.is_success());
    assert_eq!(response.header(header::ACCESS_CONTROL_ALLOW_ORIGIN), Some("*"));
}

#[tokio::test]
async fn test_allowed_origin_is_echoed() {
    let service = TestService::with_config(FakeBehavior::Succeed, |config| {
        config.allowed_origins = vec!["https://app.example.com".to_string()];
    });

    let response = service.send(preflight("https://app.example.com")).await;

    assert_eq!(response.header(header::ACCESS_CONTROL_ALLOW_ORIGIN), Some("https://app.example.com"));
}

#[tokio::test]
async fn test_other_origin_is_not_allowed() {
    let service = TestService::with_config(FakeBehavior::Succeed, |config| {
        config.allowed_origins = vec!["https://app.example.com".to_string()];
    });

    let response = service.send(preflight("https://evil.example.com")).await;

    assert!(response.header(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}

#[tokio::test]
async fn test_simple_request_carries_cors_header() {
    let service = TestService::new(FakeBehavior::Succeed);
    let request = Request::get("/health").header(header::ORIGIN, "https://a.test").body(Body::empty()).unwrap();

    let response = service.send(request).await;

    assert_eq!(response.header(header::ACCESS_CONTROL_ALLOW_ORIGIN), Some("*"));
}
