use serde::{Deserialize, Serialize};

use crate::churn::features::{FeatureVector, NormalizedVector};
use crate::churn::predictor::PredictionError;

/// Per-column affine normalisation fitted in advance: `(x - mean) / scale`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
    /// Column order the scaler was fitted on, when the exporter recorded it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Self {
        Self {
            mean,
            scale,
            feature_names: None,
        }
    }

    pub fn dimension(&self) -> usize {
        self.mean.len()
    }

    pub fn transform(&self, features: &FeatureVector) -> Result<NormalizedVector, PredictionError> {
        if features.len() != self.dimension() {
            return Err(PredictionError::ShapeMismatch {
                stage: "scaler",
                expected: self.dimension(),
                actual: features.len(),
            });
        }

        let values = features
            .values()
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(value, (mean, scale))| (value - mean) / scale)
            .collect();

        Ok(NormalizedVector::from_values(values))
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.mean.is_empty() {
            return Err("scaler has no columns".to_string());
        }
        if self.mean.len() != self.scale.len() {
            return Err(format!(
                "scaler mean has {} columns but scale has {}",
                self.mean.len(),
                self.scale.len()
            ));
        }
        if let Some(names) = &self.feature_names {
            if names.len() != self.mean.len() {
                return Err(format!(
                    "scaler lists {} feature names for {} columns",
                    names.len(),
                    self.mean.len()
                ));
            }
        }
        if let Some(idx) = self.mean.iter().position(|mean| !mean.is_finite()) {
            return Err(format!("scaler mean for column {idx} is not finite"));
        }
        if let Some(idx) = self
            .scale
            .iter()
            .position(|scale| !scale.is_finite() || *scale == 0.0)
        {
            return Err(format!("scaler scale for column {idx} must be finite and non-zero"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_subtracts_mean_and_divides_by_scale() {
        let scaler = StandardScaler::new(vec![10.0, 0.5], vec![2.0, 0.25]);
        let normalized = scaler
            .transform(&FeatureVector::from_values(vec![14.0, 0.0]))
            .expect("dimensions match");
        assert_eq!(normalized.values(), &[2.0, -2.0]);
    }

    #[test]
    fn transform_rejects_wrong_dimension() {
        let scaler = StandardScaler::new(vec![0.0; 3], vec![1.0; 3]);
        let err = scaler
            .transform(&FeatureVector::from_values(vec![1.0, 2.0]))
            .expect_err("two columns cannot feed a three column scaler");
        assert_eq!(
            err,
            PredictionError::ShapeMismatch {
                stage: "scaler",
                expected: 3,
                actual: 2,
            }
        );
    }

    #[test]
    fn validate_rejects_zero_scale() {
        let scaler = StandardScaler::new(vec![0.0, 0.0], vec![1.0, 0.0]);
        let reason = scaler.validate().expect_err("zero scale is invalid");
        assert!(reason.contains("column 1"));
    }

    #[test]
    fn validate_rejects_ragged_columns() {
        let mut scaler = StandardScaler::new(vec![0.0, 0.0], vec![1.0]);
        assert!(scaler.validate().is_err());
        scaler.scale.push(1.0);
        scaler.feature_names = Some(vec!["only".into()]);
        assert!(scaler.validate().is_err());
    }
}
