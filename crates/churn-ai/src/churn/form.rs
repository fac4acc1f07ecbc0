use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;

use super::domain::{CustomerSubmission, InputError};
use super::schema::FormSchema;

/// Untyped form post; every control arrives as text.
///
/// Kept as strings so a malformed number is reported against its field and
/// the page can be re-rendered with what the user typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomerForm {
    pub credit_score: String,
    pub geography: String,
    pub gender: String,
    pub age: String,
    pub tenure: String,
    pub balance: String,
    pub num_of_products: String,
    pub has_cr_card: String,
    pub is_active_member: String,
    pub estimated_salary: String,
}

impl CustomerForm {
    /// Initial form state taken from the schema defaults.
    pub fn from_defaults(schema: &FormSchema) -> Self {
        let mut form = Self::default();
        for field in &schema.fields {
            if let Some(slot) = form.slot_mut(field.name) {
                *slot = field.default.clone();
            }
        }
        form
    }

    pub fn value(&self, name: &str) -> &str {
        match name {
            "credit_score" => &self.credit_score,
            "geography" => &self.geography,
            "gender" => &self.gender,
            "age" => &self.age,
            "tenure" => &self.tenure,
            "balance" => &self.balance,
            "num_of_products" => &self.num_of_products,
            "has_cr_card" => &self.has_cr_card,
            "is_active_member" => &self.is_active_member,
            "estimated_salary" => &self.estimated_salary,
            _ => "",
        }
    }

    fn slot_mut(&mut self, name: &str) -> Option<&mut String> {
        let slot = match name {
            "credit_score" => &mut self.credit_score,
            "geography" => &mut self.geography,
            "gender" => &mut self.gender,
            "age" => &mut self.age,
            "tenure" => &mut self.tenure,
            "balance" => &mut self.balance,
            "num_of_products" => &mut self.num_of_products,
            "has_cr_card" => &mut self.has_cr_card,
            "is_active_member" => &mut self.is_active_member,
            "estimated_salary" => &mut self.estimated_salary,
            _ => return None,
        };
        Some(slot)
    }
}

impl TryFrom<&CustomerForm> for CustomerSubmission {
    type Error = InputError;

    fn try_from(form: &CustomerForm) -> Result<Self, Self::Error> {
        Ok(Self {
            credit_score: parse("credit_score", &form.credit_score)?,
            geography: form.geography.trim().to_string(),
            gender: form.gender.trim().to_string(),
            age: parse("age", &form.age)?,
            tenure: parse("tenure", &form.tenure)?,
            balance: parse("balance", &form.balance)?,
            num_of_products: parse("num_of_products", &form.num_of_products)?,
            has_cr_card: parse("has_cr_card", &form.has_cr_card)?,
            is_active_member: parse("is_active_member", &form.is_active_member)?,
            estimated_salary: parse("estimated_salary", &form.estimated_salary)?,
        })
    }
}

/// JSON payload keyed by snake_case names or by the customer export headers.
///
/// Each field is read on its own so a missing or wrong-typed value is
/// reported against that field.
impl TryFrom<&Map<String, Value>> for CustomerSubmission {
    type Error = InputError;

    fn try_from(object: &Map<String, Value>) -> Result<Self, Self::Error> {
        Ok(Self {
            credit_score: json_integer(object, "credit_score", "CreditScore")?,
            geography: json_text(object, "geography", "Geography")?,
            gender: json_text(object, "gender", "Gender")?,
            age: json_integer(object, "age", "Age")?,
            tenure: json_integer(object, "tenure", "Tenure")?,
            balance: json_number(object, "balance", "Balance")?,
            num_of_products: json_integer(object, "num_of_products", "NumOfProducts")?,
            has_cr_card: json_integer(object, "has_cr_card", "HasCrCard")?,
            is_active_member: json_integer(object, "is_active_member", "IsActiveMember")?,
            estimated_salary: json_number(object, "estimated_salary", "EstimatedSalary")?,
        })
    }
}

fn json_field<'a>(
    object: &'a Map<String, Value>,
    field: &'static str,
    alias: &str,
) -> Result<&'a Value, InputError> {
    match object.get(field).or_else(|| object.get(alias)) {
        None | Some(Value::Null) => Err(InputError::Missing { field }),
        Some(value) => Ok(value),
    }
}

fn json_integer(
    object: &Map<String, Value>,
    field: &'static str,
    alias: &str,
) -> Result<i64, InputError> {
    let value = json_field(object, field, alias)?;
    value.as_i64().ok_or_else(|| malformed_json(field, value))
}

fn json_number(
    object: &Map<String, Value>,
    field: &'static str,
    alias: &str,
) -> Result<f64, InputError> {
    let value = json_field(object, field, alias)?;
    value.as_f64().ok_or_else(|| malformed_json(field, value))
}

// Non-string categories fall through to the vocabulary lookup and are
// rejected there.
fn json_text(
    object: &Map<String, Value>,
    field: &'static str,
    alias: &str,
) -> Result<String, InputError> {
    Ok(match json_field(object, field, alias)? {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    })
}

fn malformed_json(field: &'static str, value: &Value) -> InputError {
    let value = match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    };
    InputError::Malformed { field, value }
}

fn parse<T: FromStr>(field: &'static str, raw: &str) -> Result<T, InputError> {
    raw.trim().parse().map_err(|_| InputError::Malformed {
        field,
        value: raw.to_string(),
    })
}
