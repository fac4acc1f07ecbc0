use super::common::*;
use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use axum::Json;
use serde_json::json;
use tower::ServiceExt;

use crate::churn::router::{churn_router, predict_handler};

fn form_body() -> &'static str {
    "credit_score=650&geography=France&gender=Female&age=40&tenure=3&balance=50000.0\
     &num_of_products=2&has_cr_card=1&is_active_member=1&estimated_salary=60000.0"
}

#[tokio::test]
async fn form_page_lists_fitted_vocabularies() {
    let response = churn_router(predictor())
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let page = read_html_body(response).await;
    assert!(page.contains("<h1>Customer Churn Prediction</h1>"));
    for option in ["France", "Germany", "Spain", "Female", "Male"] {
        assert!(
            page.contains(&format!("<option value=\"{option}\"")),
            "missing {option}"
        );
    }
    assert!(page.contains("type=\"range\" id=\"age\""));
    assert!(page.contains("max=\"850\""));
    assert!(!page.contains("id=\"result\""));
}

#[tokio::test]
async fn form_submission_renders_probability_and_verdict() {
    let response = churn_router(predictor())
        .oneshot(
            Request::post("/predict")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(form_body()))
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let page = read_html_body(response).await;
    assert!(page.contains("Churn Probability: 0.12"));
    assert!(page.contains("The customer is not likely to churn."));
    assert!(page.contains("value=\"50000.0\""));
}

#[tokio::test]
async fn form_submission_with_unknown_geography_is_rejected_in_page() {
    let body = form_body().replace("geography=France", "geography=%3Cb%3EMars");
    let response = churn_router(predictor())
        .oneshot(
            Request::post("/predict")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let page = read_html_body(response).await;
    assert!(page.contains("data-field=\"geography\""));
    assert!(page.contains("&lt;b&gt;Mars"));
    assert!(!page.contains("<b>Mars"));
}

#[tokio::test]
async fn form_submission_with_malformed_number_is_rejected_in_page() {
    let body = form_body().replace("age=40", "age=");
    let response = churn_router(predictor())
        .oneshot(
            Request::post("/predict")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let page = read_html_body(response).await;
    assert!(page.contains("data-field=\"age\""));
}

#[tokio::test]
async fn json_prediction_returns_assessment_view() {
    let response = churn_router(predictor())
        .oneshot(
            Request::post("/api/v1/churn/predict")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&submission()).unwrap()))
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["probability_display"], "0.12");
    assert_eq!(payload["likely_to_churn"], false);
    assert_eq!(payload["verdict"], "The customer is not likely to churn.");
}

#[tokio::test]
async fn json_prediction_accepts_export_column_names() {
    let payload = json!({
        "CreditScore": 600,
        "Geography": "Germany",
        "Gender": "Male",
        "Age": 55,
        "Tenure": 1,
        "Balance": 120000.0,
        "NumOfProducts": 1,
        "HasCrCard": 1,
        "IsActiveMember": 0,
        "EstimatedSalary": 80000.0
    });
    let response = churn_router(predictor())
        .oneshot(
            Request::post("/api/v1/churn/predict")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["likely_to_churn"], true);
}

#[tokio::test]
async fn json_prediction_rejects_unknown_category_with_field() {
    let mut submission = submission();
    submission.gender = "Other".to_string();

    let payload = serde_json::to_value(&submission).expect("submission serializes");
    let response = predict_handler(State(predictor()), Ok(Json(payload))).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert_eq!(payload["field"], "gender");
    assert!(payload["error"]
        .as_str()
        .expect("error message")
        .contains("Female, Male"));
}

async fn post_json(body: String) -> axum::response::Response {
    churn_router(predictor())
        .oneshot(
            Request::post("/api/v1/churn/predict")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .expect("route executes")
}

#[tokio::test]
async fn json_prediction_reports_wrong_typed_field() {
    let mut payload = serde_json::to_value(submission()).expect("submission serializes");
    payload["credit_score"] = json!("abc");

    let response = post_json(payload.to_string()).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert_eq!(payload["field"], "credit_score");
    assert!(payload["error"]
        .as_str()
        .expect("error message")
        .contains("abc"));
}

#[tokio::test]
async fn json_prediction_reports_missing_field() {
    let mut payload = serde_json::to_value(submission()).expect("submission serializes");
    payload
        .as_object_mut()
        .expect("object payload")
        .remove("estimated_salary");

    let response = post_json(payload.to_string()).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert_eq!(payload["field"], "estimated_salary");
    assert_eq!(payload["error"], "estimated_salary is required");
}

#[tokio::test]
async fn json_prediction_answers_broken_json_with_json_error() {
    let response = post_json("{\"credit_score\": 650,".to_string()).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert!(payload["error"].is_string());
    assert!(payload["field"].is_null());
}

#[tokio::test]
async fn json_prediction_rejects_non_object_payload() {
    let response = post_json("[650, \"France\"]".to_string()).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert!(payload["field"].is_null());
}

#[tokio::test]
async fn schema_describes_ten_controls_and_feature_columns() {
    let response = churn_router(predictor())
        .oneshot(
            Request::get("/api/v1/churn/schema")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let fields = payload["fields"].as_array().expect("fields array");
    assert_eq!(fields.len(), 10);
    assert_eq!(fields[1]["name"], "geography");
    assert_eq!(fields[1]["options"], json!(["France", "Germany", "Spain"]));
    assert_eq!(fields[3]["control"], "slider");
    assert_eq!(fields[3]["min"], 18.0);
    assert_eq!(payload["feature_columns"].as_array().map(Vec::len), Some(12));
    assert_eq!(payload["threshold"], 0.5);
}
