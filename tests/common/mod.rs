//! Common test utilities for texreport test suites
//!
//! [`TestService`] wires a real router to a [`FakeCompiler`] inside a
//! temporary directory, so requests exercise the full pipeline without a TeX
//! installation.

// Not every suite uses every helper
#![allow(dead_code)]

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use texreport::config::ServiceConfig;
use texreport::server::{AppState, build_cors, router};
use texreport::service::ReportService;
use texreport::test_utils::{FakeBehavior, FakeCompiler, init_test_logging, test_config, write_sample_template};
use tower::ServiceExt;

/// A fully wired service in a temporary directory.
pub struct TestService {
    pub temp: TempDir,
    pub fake: FakeCompiler,
    pub config: ServiceConfig,
    pub app: Router,
}

/// What came back from one request.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Body parsed as JSON.
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response body is JSON")
    }

    /// Body as text (lossy).
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn header(&self, name: header::HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

impl TestService {
    /// Service with the shipped template and a fake compiler.
    pub fn new(behavior: FakeBehavior) -> Self {
        Self::with_config(behavior, |_| {})
    }

    /// Like [`new`](Self::new), letting the caller adjust the configuration
    /// before the router is built.
    pub fn with_config(behavior: FakeBehavior, adjust: impl FnOnce(&mut ServiceConfig)) -> Self {
        init_test_logging(None);

        let temp = TempDir::new().unwrap();
        write_sample_template(temp.path()).unwrap();
        let fake = FakeCompiler::install(&temp.path().join("bin"), behavior).unwrap();

        let mut config = test_config(temp.path(), fake.program_str());
        adjust(&mut config);

        let service = ReportService::from_config(&config);
        service.work_area().prepare().unwrap();
        let state = AppState::new(Arc::new(service), &config.download_name).unwrap();
        let app = router(state, build_cors(&config.allowed_origins).unwrap());

        Self {
            temp,
            fake,
            config,
            app,
        }
    }

    pub fn template_path(&self) -> &Path {
        &self.config.template_path
    }

    pub fn work_dir(&self) -> PathBuf {
        self.config.work_dir.clone()
    }

    /// Number of entries left in the work directory.
    pub fn work_dir_entries(&self) -> usize {
        std::fs::read_dir(&self.config.work_dir).map(|dir| dir.count()).unwrap_or(0)
    }

    /// `POST /generate` with `body` as JSON.
    pub async fn generate(&self, body: &Value) -> TestResponse {
        let request = Request::post("/generate")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Sends any request through the router and collects the whole body.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec();
        TestResponse {
            status,
            headers,
            body,
        }
    }
}
