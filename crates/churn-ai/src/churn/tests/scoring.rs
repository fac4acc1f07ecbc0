use std::sync::Arc;

use super::common::*;
use crate::churn::domain::InputError;
use crate::churn::{ChurnError, ChurnPredictor, ChurnVerdict};

#[test]
fn active_french_customer_is_not_likely_to_churn() {
    let assessment = predictor().assess(&submission()).expect("scores");
    assert!((assessment.probability - sigmoid(-2.0)).abs() < 1e-12);
    assert_eq!(assessment.verdict, ChurnVerdict::NotLikelyToChurn);
}

#[test]
fn inactive_german_customer_is_likely_to_churn() {
    let mut submission = submission();
    submission.geography = "Germany".to_string();
    submission.is_active_member = 0;
    let assessment = predictor().assess(&submission).expect("scores");
    assert!((assessment.probability - sigmoid(2.0)).abs() < 1e-12);
    assert_eq!(assessment.verdict, ChurnVerdict::LikelyToChurn);
}

#[test]
fn probability_of_exactly_one_half_is_not_likely() {
    let mut submission = submission();
    submission.is_active_member = 0;
    let assessment = predictor().assess(&submission).expect("scores");
    assert_eq!(assessment.probability, 0.5);
    assert_eq!(assessment.verdict, ChurnVerdict::NotLikelyToChurn);
}

#[test]
fn trace_exposes_equal_length_vectors() {
    let trace = predictor().trace(&submission()).expect("scores");
    assert_eq!(trace.features.len(), 12);
    assert_eq!(trace.normalized.len(), trace.features.len());
    assert_eq!(trace.normalized.values(), trace.features.values());
    assert!((0.0..=1.0).contains(&trace.assessment.probability));
}

#[test]
fn identical_input_is_bit_identical() {
    let predictor = predictor();
    let first = predictor.trace(&submission()).expect("scores");
    let second = predictor.trace(&submission()).expect("scores");
    assert_eq!(
        first.assessment.probability.to_bits(),
        second.assessment.probability.to_bits()
    );
    assert_eq!(first, second);
}

#[test]
fn predictors_share_one_artifact_context() {
    let artifacts = Arc::new(artifacts());
    let left = ChurnPredictor::new(artifacts.clone());
    let right = ChurnPredictor::new(artifacts.clone());
    assert_eq!(Arc::strong_count(&artifacts), 3);
    assert_eq!(
        left.assess(&submission()).expect("scores"),
        right.assess(&submission()).expect("scores")
    );
}

#[test]
fn rejected_input_surfaces_as_input_error() {
    let mut submission = submission();
    submission.geography = "Italy".to_string();
    let err = predictor().assess(&submission).expect_err("unknown geography");
    match err {
        ChurnError::Input(InputError::UnknownCategory { value, known, .. }) => {
            assert_eq!(value, "Italy");
            assert_eq!(known, vec!["France", "Germany", "Spain"]);
        }
        other => panic!("unexpected error {other:?}"),
    }
}
