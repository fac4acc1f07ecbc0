use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde_json::{json, Value};
use tracing::warn;

use super::domain::CustomerSubmission;
use super::form::CustomerForm;
use super::html::{render_page, PageOutcome};
use super::predictor::{ChurnError, ChurnPredictor};
use super::schema::form_schema;

/// Router builder exposing the churn form and its JSON counterpart.
pub fn churn_router(predictor: Arc<ChurnPredictor>) -> Router {
    Router::new()
        .route("/", get(form_handler))
        .route("/predict", post(form_submit_handler))
        .route("/api/v1/churn/predict", post(predict_handler))
        .route("/api/v1/churn/schema", get(schema_handler))
        .with_state(predictor)
}

pub(crate) async fn form_handler(State(predictor): State<Arc<ChurnPredictor>>) -> Html<String> {
    let schema = form_schema(predictor.artifacts());
    let form = CustomerForm::from_defaults(&schema);
    Html(render_page(&schema, &form, None))
}

pub(crate) async fn form_submit_handler(
    State(predictor): State<Arc<ChurnPredictor>>,
    Form(form): Form<CustomerForm>,
) -> Response {
    let schema = form_schema(predictor.artifacts());
    let outcome = CustomerSubmission::try_from(&form)
        .map_err(ChurnError::from)
        .and_then(|submission| predictor.assess(&submission));

    let (status, outcome) = match outcome {
        Ok(assessment) => (StatusCode::OK, PageOutcome::Assessed(assessment)),
        Err(ChurnError::Input(error)) => {
            warn!(field = error.field(), %error, "form submission rejected");
            (StatusCode::UNPROCESSABLE_ENTITY, PageOutcome::Rejected(error))
        }
        Err(ChurnError::Prediction(_)) => (StatusCode::INTERNAL_SERVER_ERROR, PageOutcome::Failed),
    };

    (status, Html(render_page(&schema, &form, Some(&outcome)))).into_response()
}

pub(crate) async fn predict_handler(
    State(predictor): State<Arc<ChurnPredictor>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let submission = match payload {
        Ok(Json(Value::Object(object))) => CustomerSubmission::try_from(&object),
        Ok(Json(_)) => {
            return unreadable_payload(
                StatusCode::UNPROCESSABLE_ENTITY,
                "expected a JSON object with the customer fields".to_string(),
            );
        }
        Err(rejection) => {
            warn!(%rejection, "api payload unreadable");
            return unreadable_payload(rejection.status(), rejection.body_text());
        }
    };

    match submission
        .map_err(ChurnError::from)
        .and_then(|submission| predictor.assess(&submission))
    {
        Ok(assessment) => (StatusCode::OK, Json(assessment.view())).into_response(),
        Err(ChurnError::Input(error)) => {
            warn!(field = error.field(), %error, "api submission rejected");
            let payload = json!({
                "error": error.to_string(),
                "field": error.field(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

fn unreadable_payload(status: StatusCode, message: String) -> Response {
    let payload = json!({
        "error": message,
        "field": Value::Null,
    });
    (status, Json(payload)).into_response()
}

pub(crate) async fn schema_handler(State(predictor): State<Arc<ChurnPredictor>>) -> Response {
    (StatusCode::OK, Json(form_schema(predictor.artifacts()))).into_response()
}
