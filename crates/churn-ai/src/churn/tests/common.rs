use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::churn::artifacts::{Activation, DenseLayer};
use crate::churn::{
    ChurnArtifacts, ChurnPredictor, Classifier, CustomerSubmission, LabelMapper, OneHotEncoder,
    StandardScaler,
};

pub(super) const IS_ACTIVE_COLUMN: usize = 7;
pub(super) const GERMANY_COLUMN: usize = 10;

pub(super) fn gender_mapper() -> LabelMapper {
    LabelMapper::new("Gender", vec!["Female".to_string(), "Male".to_string()])
}

pub(super) fn geography_encoder() -> OneHotEncoder {
    OneHotEncoder::new(
        "Geography",
        vec![
            "France".to_string(),
            "Germany".to_string(),
            "Spain".to_string(),
        ],
    )
}

pub(super) fn identity_scaler(columns: usize) -> StandardScaler {
    StandardScaler::new(vec![0.0; columns], vec![1.0; columns])
}

/// Logistic model whose logit is `2 * Germany - 2 * IsActiveMember`.
pub(super) fn logistic_classifier(columns: usize) -> Classifier {
    let mut kernel = vec![vec![0.0]; columns];
    kernel[IS_ACTIVE_COLUMN] = vec![-2.0];
    kernel[GERMANY_COLUMN] = vec![2.0];
    Classifier {
        name: "fixture-logistic".to_string(),
        layers: vec![DenseLayer {
            kernel,
            bias: vec![0.0],
            activation: Activation::Sigmoid,
        }],
    }
}

pub(super) fn artifacts() -> ChurnArtifacts {
    ChurnArtifacts::from_parts(
        gender_mapper(),
        geography_encoder(),
        identity_scaler(12),
        logistic_classifier(12),
    )
    .expect("fixture artifacts are consistent")
}

pub(super) fn predictor() -> Arc<ChurnPredictor> {
    Arc::new(ChurnPredictor::new(Arc::new(artifacts())))
}

pub(super) fn submission() -> CustomerSubmission {
    CustomerSubmission {
        credit_score: 650,
        geography: "France".to_string(),
        gender: "Female".to_string(),
        age: 40,
        tenure: 3,
        balance: 50000.0,
        num_of_products: 2,
        has_cr_card: 1,
        is_active_member: 1,
        estimated_salary: 60000.0,
    }
}

pub(super) fn sigmoid(logit: f64) -> f64 {
    1.0 / (1.0 + (-logit).exp())
}

pub(super) async fn read_body(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body")
        .to_vec()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    serde_json::from_slice(&read_body(response).await).expect("json payload")
}

pub(super) async fn read_html_body(response: Response) -> String {
    String::from_utf8(read_body(response).await).expect("utf-8 page")
}
