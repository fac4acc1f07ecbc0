use serde::{Deserialize, Serialize};

/// Customer attributes exactly as collected from the form, API or batch file.
///
/// Integer fields are kept signed so that out-of-range values reach validation
/// instead of failing deserialization with an opaque message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerSubmission {
    #[serde(alias = "CreditScore")]
    pub credit_score: i64,
    #[serde(alias = "Geography")]
    pub geography: String,
    #[serde(alias = "Gender")]
    pub gender: String,
    #[serde(alias = "Age")]
    pub age: i64,
    #[serde(alias = "Tenure")]
    pub tenure: i64,
    #[serde(alias = "Balance")]
    pub balance: f64,
    #[serde(alias = "NumOfProducts")]
    pub num_of_products: i64,
    #[serde(alias = "HasCrCard")]
    pub has_cr_card: i64,
    #[serde(alias = "IsActiveMember")]
    pub is_active_member: i64,
    #[serde(alias = "EstimatedSalary")]
    pub estimated_salary: f64,
}

/// Index of a value inside a fitted category vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CategoryCode(pub(crate) usize);

impl CategoryCode {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A submission whose categories were resolved against the loaded vocabularies
/// and whose numeric fields passed the range checks.
///
/// Only [`FeatureAssembler::profile_from_submission`](super::FeatureAssembler::profile_from_submission)
/// builds one, so every profile can be encoded without further lookups.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerProfile {
    pub credit_score: u16,
    pub geography: CategoryCode,
    pub gender: CategoryCode,
    pub age: u8,
    pub tenure: u8,
    pub balance: f64,
    pub num_of_products: u8,
    pub has_cr_card: bool,
    pub is_active_member: bool,
    pub estimated_salary: f64,
}

/// Inclusive bounds accepted for an integer field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IntegerBounds {
    pub min: i64,
    pub max: i64,
}

impl IntegerBounds {
    pub const fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

pub const CREDIT_SCORE_BOUNDS: IntegerBounds = IntegerBounds::new(0, 850);
pub const AGE_BOUNDS: IntegerBounds = IntegerBounds::new(18, 92);
pub const TENURE_BOUNDS: IntegerBounds = IntegerBounds::new(0, 10);
pub const PRODUCT_BOUNDS: IntegerBounds = IntegerBounds::new(1, 4);
pub const FLAG_BOUNDS: IntegerBounds = IntegerBounds::new(0, 1);

/// Rejection raised while turning a submission into a profile.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    #[error("{field} '{value}' is not a known category (expected one of: {})", .known.join(", "))]
    UnknownCategory {
        field: &'static str,
        value: String,
        known: Vec<String>,
    },
    #[error("{field} must be between {} and {}, got {value}", .bounds.min, .bounds.max)]
    OutOfRange {
        field: &'static str,
        value: i64,
        bounds: IntegerBounds,
    },
    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
    #[error("{field} '{value}' is not a valid number")]
    Malformed { field: &'static str, value: String },
    #[error("{field} is required")]
    Missing { field: &'static str },
}

impl InputError {
    /// Name of the submission field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            InputError::UnknownCategory { field, .. }
            | InputError::OutOfRange { field, .. }
            | InputError::Negative { field, .. }
            | InputError::NotFinite { field }
            | InputError::Malformed { field, .. }
            | InputError::Missing { field } => field,
        }
    }
}
