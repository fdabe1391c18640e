use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::json;
use texreport::templating::{Substitutor, TemplateDocument};
use texreport::test_utils::{FakeBehavior, SAMPLE_TEMPLATE};

use crate::common::TestService;

fn expected_pdf(fields: &serde_json::Value) -> String {
    let document = Substitutor::default()
        .materialize(&TemplateDocument::new(SAMPLE_TEMPLATE), fields.as_object().unwrap());
    format!("%PDF-1.4\n{}", document.as_str())
}

#[tokio::test]
async fn test_generate_returns_pdf_attachment() {
    let service = TestService::new(FakeBehavior::Succeed);

    let response = service.generate(&json!({"company": "Acme"})).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.header(header::CONTENT_TYPE), Some("application/pdf"));
    assert_eq!(
        response.header(header::CONTENT_DISPOSITION),
        Some("attachment; filename=\"AI_Cost_Savings_Report.pdf\"")
    );
    assert_eq!(response.header(header::CONTENT_LENGTH), Some(response.body.len().to_string().as_str()));
    assert!(response.text().starts_with("%PDF"));
    assert_eq!(service.fake.invocations(), 2);
}

#[tokio::test]
async fn test_declaration_and_invocations_show_value() {
    let service = TestService::new(FakeBehavior::Succeed);

    let response = service.generate(&json!({"company": "Acme"})).await;
    let pdf = response.text();

    assert!(pdf.contains(r"\newcommand{\prospectname}{Acme}"));
    assert!(pdf.contains("This report estimates what Acme{} could save"));
    assert!(pdf.contains("receptionists at Acme{}"));
    assert!(!pdf.contains("Company Name"));
}

#[tokio::test]
async fn test_value_is_escaped() {
    let service = TestService::new(FakeBehavior::Succeed);

    let response = service.generate(&json!({"company": "A & B_Co"})).await;
    let pdf = response.text();

    assert!(pdf.contains(r"\newcommand{\prospectname}{A \& B\_Co}"));
    assert!(pdf.contains(r"what A \& B\_Co{} could save"));
}

#[tokio::test]
async fn test_full_field_set() {
    let service = TestService::new(FakeBehavior::Succeed);
    let fields = json!({
        "firstName": "Ada",
        "lastName": "Lovelace",
        "company": "Analytical Engines",
        "email": "ada_l@engines.test",
        "phone": "+44 20 0000 0000",
        "website": "engines.test",
        "receptionists": 3,
        "salary": 52000.5,
        "calls": 240
    });

    let response = service.generate(&fields).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.text(), expected_pdf(&fields));
    let pdf = response.text();
    assert!(pdf.contains(r"\newcommand{\email}{ada\_l@engines.test}"));
    assert!(pdf.contains(r"\$52000.5"));
    assert!(pdf.contains("Receptionists on staff & 3"));
}

#[tokio::test]
async fn test_unknown_fields_leave_template_unchanged() {
    let service = TestService::new(FakeBehavior::Succeed);

    let response = service.generate(&json!({"prospectname": "x", "Company": "y", "notes": "z"})).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.text(), format!("%PDF-1.4\n{SAMPLE_TEMPLATE}"));
}

#[tokio::test]
async fn test_empty_object_is_accepted() {
    let service = TestService::new(FakeBehavior::Succeed);
    let response = service.generate(&json!({})).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.text(), format!("%PDF-1.4\n{SAMPLE_TEMPLATE}"));
}

#[tokio::test]
async fn test_template_edits_are_picked_up_without_restart() {
    let service = TestService::new(FakeBehavior::Succeed);
    std::fs::write(service.template_path(), "\\newcommand{\\calls}{0}\nCalls: \\calls\n").unwrap();

    let response = service.generate(&json!({"calls": 75})).await;

    assert_eq!(response.text(), "%PDF-1.4\n\\newcommand{\\calls}{75}\nCalls: 75\n");
}

#[tokio::test]
async fn test_passthrough_fields() {
    let service = TestService::with_config(FakeBehavior::Succeed, |config| {
        config.passthrough_fields = true;
    });

    let response = service.generate(&json!({"prospectname": "Globex", "company": "Ignored"})).await;
    let pdf = response.text();

    assert!(pdf.contains(r"\newcommand{\prospectname}{Globex}"));
    assert!(!pdf.contains("Ignored"));
}

#[tokio::test]
async fn test_custom_download_name() {
    let service = TestService::with_config(FakeBehavior::Succeed, |config| {
        config.download_name = "Quote.pdf".to_string();
    });

    let response = service.generate(&json!({})).await;

    assert_eq!(response.header(header::CONTENT_DISPOSITION), Some("attachment; filename=\"Quote.pdf\""));
}

#[tokio::test]
async fn test_health() {
    let service = TestService::new(FakeBehavior::Succeed);
    let request = Request::get("/health").body(Body::empty()).unwrap();

    let response = service.send(request).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), json!({"status": "ok"}));
}
