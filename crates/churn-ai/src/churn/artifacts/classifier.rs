use serde::{Deserialize, Serialize};

use crate::churn::features::NormalizedVector;
use crate::churn::predictor::PredictionError;

/// Activation applied after a dense layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    Relu,
    Sigmoid,
    Tanh,
    Linear,
}

impl Activation {
    fn apply(self, value: f64) -> f64 {
        match self {
            Activation::Relu => value.max(0.0),
            Activation::Sigmoid => 1.0 / (1.0 + (-value).exp()),
            Activation::Tanh => value.tanh(),
            Activation::Linear => value,
        }
    }
}

/// Fully connected layer; `kernel` is laid out `[input][output]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseLayer {
    pub kernel: Vec<Vec<f64>>,
    pub bias: Vec<f64>,
    pub activation: Activation,
}

impl DenseLayer {
    pub fn input_dim(&self) -> usize {
        self.kernel.len()
    }

    pub fn output_dim(&self) -> usize {
        self.bias.len()
    }

    fn forward(&self, input: &[f64]) -> Vec<f64> {
        self.bias
            .iter()
            .enumerate()
            .map(|(unit, bias)| {
                let mut acc = *bias;
                for (value, weights) in input.iter().zip(&self.kernel) {
                    acc += value * weights[unit];
                }
                self.activation.apply(acc)
            })
            .collect()
    }
}

/// Pretrained binary classifier exported as a stack of dense layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classifier {
    #[serde(default = "default_name")]
    pub name: String,
    pub layers: Vec<DenseLayer>,
}

fn default_name() -> String {
    "classifier".to_string()
}

impl Classifier {
    pub fn input_dim(&self) -> usize {
        self.layers.first().map(DenseLayer::input_dim).unwrap_or(0)
    }

    /// Layer widths from input to output, e.g. `[12, 8, 4, 1]`.
    pub fn shape(&self) -> Vec<usize> {
        let mut shape = vec![self.input_dim()];
        shape.extend(self.layers.iter().map(DenseLayer::output_dim));
        shape
    }

    /// Probability of the positive class.
    pub fn predict_proba(&self, input: &NormalizedVector) -> Result<f64, PredictionError> {
        if input.len() != self.input_dim() {
            return Err(PredictionError::ShapeMismatch {
                stage: "classifier",
                expected: self.input_dim(),
                actual: input.len(),
            });
        }

        let output = self
            .layers
            .iter()
            .fold(input.values().to_vec(), |activations, layer| {
                layer.forward(&activations)
            });

        match output.as_slice() {
            [probability] if probability.is_finite() => Ok(*probability),
            _ => Err(PredictionError::NonFiniteOutput),
        }
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        let Some(last) = self.layers.last() else {
            return Err("classifier has no layers".to_string());
        };

        let mut expected_input = self.input_dim();
        if expected_input == 0 {
            return Err("classifier input layer has no weights".to_string());
        }

        for (idx, layer) in self.layers.iter().enumerate() {
            if layer.input_dim() != expected_input {
                return Err(format!(
                    "layer {idx} expects {} inputs but the previous layer emits {expected_input}",
                    layer.input_dim()
                ));
            }
            if layer.output_dim() == 0 {
                return Err(format!("layer {idx} has no units"));
            }
            if let Some(row) = layer
                .kernel
                .iter()
                .position(|weights| weights.len() != layer.output_dim())
            {
                return Err(format!(
                    "layer {idx} kernel row {row} does not match its {} units",
                    layer.output_dim()
                ));
            }
            let finite = layer.bias.iter().all(|value| value.is_finite())
                && layer.kernel.iter().flatten().all(|value| value.is_finite());
            if !finite {
                return Err(format!("layer {idx} contains non-finite weights"));
            }
            expected_input = layer.output_dim();
        }

        if last.output_dim() != 1 || last.activation != Activation::Sigmoid {
            return Err("final layer must be a single sigmoid unit".to_string());
        }

        Ok(())
    }
}
