use serde::{Deserialize, Serialize};

use crate::churn::domain::{CategoryCode, InputError};

/// Fitted bijection from category labels to integer codes.
///
/// The code of a class is its position in `classes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelMapper {
    pub feature: String,
    pub classes: Vec<String>,
}

impl LabelMapper {
    pub fn new(feature: impl Into<String>, classes: Vec<String>) -> Self {
        Self {
            feature: feature.into(),
            classes,
        }
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn resolve(&self, field: &'static str, value: &str) -> Result<CategoryCode, InputError> {
        lookup(&self.classes, field, value)
    }

    /// Integer code fed to the feature vector.
    pub fn encode(&self, code: CategoryCode) -> f64 {
        code.index() as f64
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        validate_vocabulary(&self.feature, &self.classes)
    }
}

/// Fitted one-hot expansion over a closed category vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OneHotEncoder {
    pub feature: String,
    pub categories: Vec<String>,
}

impl OneHotEncoder {
    pub fn new(feature: impl Into<String>, categories: Vec<String>) -> Self {
        Self {
            feature: feature.into(),
            categories,
        }
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn resolve(&self, field: &'static str, value: &str) -> Result<CategoryCode, InputError> {
        lookup(&self.categories, field, value)
    }

    /// Indicator columns, named `<feature>_<category>` in vocabulary order.
    pub fn column_names(&self) -> impl Iterator<Item = String> + '_ {
        self.categories
            .iter()
            .map(move |category| format!("{}_{}", self.feature, category))
    }

    pub fn width(&self) -> usize {
        self.categories.len()
    }

    pub fn encode(&self, code: CategoryCode) -> impl Iterator<Item = f64> {
        (0..self.categories.len()).map(move |idx| if idx == code.index() { 1.0 } else { 0.0 })
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        validate_vocabulary(&self.feature, &self.categories)
    }
}

fn lookup(
    vocabulary: &[String],
    field: &'static str,
    value: &str,
) -> Result<CategoryCode, InputError> {
    let needle = value.trim();
    vocabulary
        .iter()
        .position(|known| known == needle)
        .map(CategoryCode)
        .ok_or_else(|| InputError::UnknownCategory {
            field,
            value: value.to_string(),
            known: vocabulary.to_vec(),
        })
}

fn validate_vocabulary(feature: &str, vocabulary: &[String]) -> Result<(), String> {
    if vocabulary.is_empty() {
        return Err(format!("{feature} vocabulary is empty"));
    }

    for (idx, value) in vocabulary.iter().enumerate() {
        if value.trim().is_empty() {
            return Err(format!("{feature} vocabulary contains a blank entry"));
        }
        if vocabulary[..idx].contains(value) {
            return Err(format!("{feature} vocabulary lists '{value}' twice"));
        }
    }

    Ok(())
}
