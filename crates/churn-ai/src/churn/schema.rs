use serde::Serialize;

use super::artifacts::ChurnArtifacts;
use super::domain::{
    IntegerBounds, AGE_BOUNDS, CREDIT_SCORE_BOUNDS, FLAG_BOUNDS, PRODUCT_BOUNDS, TENURE_BOUNDS,
};
use super::presenter::CHURN_THRESHOLD;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldControl {
    Number,
    Select,
    Slider,
}

/// One labelled input control of the churn form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub label: &'static str,
    pub control: FieldControl,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Whole numbers only; money fields accept any decimal.
    pub integer: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    pub default: String,
}

impl FieldDescriptor {
    fn number(name: &'static str, label: &'static str, bounds: IntegerBounds) -> Self {
        Self {
            name,
            label,
            control: FieldControl::Number,
            min: Some(bounds.min as f64),
            max: Some(bounds.max as f64),
            integer: true,
            options: Vec::new(),
            default: bounds.min.to_string(),
        }
    }

    fn money(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            control: FieldControl::Number,
            min: Some(0.0),
            max: None,
            integer: false,
            options: Vec::new(),
            default: "0.0".to_string(),
        }
    }

    fn slider(name: &'static str, label: &'static str, bounds: IntegerBounds) -> Self {
        Self {
            control: FieldControl::Slider,
            ..Self::number(name, label, bounds)
        }
    }

    fn select(name: &'static str, label: &'static str, options: Vec<String>) -> Self {
        let default = options.first().cloned().unwrap_or_default();
        Self {
            name,
            label,
            control: FieldControl::Select,
            min: None,
            max: None,
            integer: false,
            options,
            default,
        }
    }

    fn flag(name: &'static str, label: &'static str) -> Self {
        let options = (FLAG_BOUNDS.min..=FLAG_BOUNDS.max)
            .map(|value| value.to_string())
            .collect();
        Self {
            integer: true,
            ..Self::select(name, label, options)
        }
    }
}

/// Everything a client needs to render the churn form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormSchema {
    pub fields: Vec<FieldDescriptor>,
    pub feature_columns: Vec<String>,
    pub threshold: f64,
}

/// Form layout with dropdowns populated from the fitted vocabularies.
pub fn form_schema(artifacts: &ChurnArtifacts) -> FormSchema {
    let fields = vec![
        FieldDescriptor::number("credit_score", "Credit Score", CREDIT_SCORE_BOUNDS),
        FieldDescriptor::select(
            "geography",
            "Geography",
            artifacts.geography().categories().to_vec(),
        ),
        FieldDescriptor::select("gender", "Gender", artifacts.gender().classes().to_vec()),
        FieldDescriptor::slider("age", "Age", AGE_BOUNDS),
        FieldDescriptor::slider("tenure", "Tenure", TENURE_BOUNDS),
        FieldDescriptor::money("balance", "Balance"),
        FieldDescriptor::slider("num_of_products", "Number of Products", PRODUCT_BOUNDS),
        FieldDescriptor::flag("has_cr_card", "Has Credit Card"),
        FieldDescriptor::flag("is_active_member", "Is Active Member"),
        FieldDescriptor::money("estimated_salary", "Estimated Salary"),
    ];

    FormSchema {
        fields,
        feature_columns: artifacts.feature_columns(),
        threshold: CHURN_THRESHOLD,
    }
}
