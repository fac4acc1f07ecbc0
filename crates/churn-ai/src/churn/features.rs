use serde::Serialize;

use super::artifacts::{LabelMapper, OneHotEncoder};
use super::domain::{
    CustomerProfile, CustomerSubmission, InputError, IntegerBounds, AGE_BOUNDS,
    CREDIT_SCORE_BOUNDS, FLAG_BOUNDS, PRODUCT_BOUNDS, TENURE_BOUNDS,
};

/// Leading columns of every feature vector; geography indicators follow.
pub const BASE_COLUMNS: [&str; 9] = [
    "CreditScore",
    "Gender",
    "Age",
    "Tenure",
    "Balance",
    "NumOfProducts",
    "HasCrCard",
    "IsActiveMember",
    "EstimatedSalary",
];

/// Full column order produced by [`FeatureAssembler::assemble`].
pub fn feature_columns(geography: &OneHotEncoder) -> Vec<String> {
    BASE_COLUMNS
        .iter()
        .map(|column| column.to_string())
        .chain(geography.column_names())
        .collect()
}

/// Raw numeric features in the fitted column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    pub fn from_values(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Feature vector after the scaler has been applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NormalizedVector(Vec<f64>);

impl NormalizedVector {
    pub fn from_values(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Validates submissions and encodes them against the fitted vocabularies.
#[derive(Debug, Clone, Copy)]
pub struct FeatureAssembler<'a> {
    gender: &'a LabelMapper,
    geography: &'a OneHotEncoder,
}

impl<'a> FeatureAssembler<'a> {
    pub fn new(gender: &'a LabelMapper, geography: &'a OneHotEncoder) -> Self {
        Self { gender, geography }
    }

    /// Resolve categories and range-check numeric fields.
    pub fn profile_from_submission(
        &self,
        submission: &CustomerSubmission,
    ) -> Result<CustomerProfile, InputError> {
        let gender = self.gender.resolve("gender", &submission.gender)?;
        let geography = self.geography.resolve("geography", &submission.geography)?;

        Ok(CustomerProfile {
            credit_score: bounded("credit_score", submission.credit_score, CREDIT_SCORE_BOUNDS)?
                as u16,
            geography,
            gender,
            age: bounded("age", submission.age, AGE_BOUNDS)? as u8,
            tenure: bounded("tenure", submission.tenure, TENURE_BOUNDS)? as u8,
            balance: non_negative("balance", submission.balance)?,
            num_of_products: bounded(
                "num_of_products",
                submission.num_of_products,
                PRODUCT_BOUNDS,
            )? as u8,
            has_cr_card: bounded("has_cr_card", submission.has_cr_card, FLAG_BOUNDS)? == 1,
            is_active_member: bounded(
                "is_active_member",
                submission.is_active_member,
                FLAG_BOUNDS,
            )? == 1,
            estimated_salary: non_negative("estimated_salary", submission.estimated_salary)?,
        })
    }

    pub fn assemble(&self, profile: &CustomerProfile) -> FeatureVector {
        let mut values = Vec::with_capacity(BASE_COLUMNS.len() + self.geography.width());
        values.extend([
            f64::from(profile.credit_score),
            self.gender.encode(profile.gender),
            f64::from(profile.age),
            f64::from(profile.tenure),
            profile.balance,
            f64::from(profile.num_of_products),
            flag(profile.has_cr_card),
            flag(profile.is_active_member),
            profile.estimated_salary,
        ]);
        values.extend(self.geography.encode(profile.geography));
        FeatureVector(values)
    }
}

fn bounded(field: &'static str, value: i64, bounds: IntegerBounds) -> Result<i64, InputError> {
    if bounds.contains(value) {
        Ok(value)
    } else {
        Err(InputError::OutOfRange {
            field,
            value,
            bounds,
        })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<f64, InputError> {
    if !value.is_finite() {
        return Err(InputError::NotFinite { field });
    }
    if value < 0.0 {
        return Err(InputError::Negative { field, value });
    }
    Ok(value)
}

fn flag(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}
