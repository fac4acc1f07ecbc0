use serde::Serialize;

/// Probabilities strictly above this value are reported as likely churn.
pub const CHURN_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChurnVerdict {
    LikelyToChurn,
    NotLikelyToChurn,
}

impl ChurnVerdict {
    pub fn from_probability(probability: f64) -> Self {
        if probability > CHURN_THRESHOLD {
            Self::LikelyToChurn
        } else {
            Self::NotLikelyToChurn
        }
    }

    pub fn is_likely(self) -> bool {
        matches!(self, Self::LikelyToChurn)
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::LikelyToChurn => "The customer is likely to churn.",
            Self::NotLikelyToChurn => "The customer is not likely to churn.",
        }
    }
}

/// Probability and verdict for one customer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChurnAssessment {
    pub probability: f64,
    pub verdict: ChurnVerdict,
}

impl ChurnAssessment {
    pub fn from_probability(probability: f64) -> Self {
        Self {
            probability,
            verdict: ChurnVerdict::from_probability(probability),
        }
    }

    pub fn probability_line(&self) -> String {
        format!("Churn Probability: {:.2}", self.probability)
    }

    pub fn view(&self) -> AssessmentView {
        AssessmentView {
            probability: self.probability,
            probability_display: format!("{:.2}", self.probability),
            likely_to_churn: self.verdict.is_likely(),
            verdict: self.verdict.message(),
        }
    }
}

/// Response payload for API clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentView {
    pub probability: f64,
    pub probability_display: String,
    pub likely_to_churn: bool,
    pub verdict: &'static str,
}
