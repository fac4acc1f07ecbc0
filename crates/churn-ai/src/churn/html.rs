use std::fmt::Write;

use super::domain::InputError;
use super::form::CustomerForm;
use super::presenter::ChurnAssessment;
use super::schema::{FieldControl, FieldDescriptor, FormSchema};

/// Result region shown under the form.
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    Assessed(ChurnAssessment),
    Rejected(InputError),
    Failed,
}

pub fn render_page(
    schema: &FormSchema,
    form: &CustomerForm,
    outcome: Option<&PageOutcome>,
) -> String {
    let mut page = String::with_capacity(4096);
    page.push_str(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Customer Churn Prediction</title>\n</head>\n<body>\n\
         <h1>Customer Churn Prediction</h1>\n\
         <form method=\"post\" action=\"/predict\">\n",
    );

    for field in &schema.fields {
        render_field(&mut page, field, form.value(field.name));
    }

    page.push_str("<button type=\"submit\">Predict</button>\n</form>\n");

    match outcome {
        Some(PageOutcome::Assessed(assessment)) => {
            let _ = write!(
                page,
                "<section id=\"result\">\n<p>{}</p>\n<p>{}</p>\n</section>\n",
                escape(&assessment.probability_line()),
                escape(assessment.verdict.message())
            );
        }
        Some(PageOutcome::Rejected(err)) => {
            let _ = write!(
                page,
                "<section id=\"error\" data-field=\"{}\">\n<p>{}</p>\n</section>\n",
                err.field(),
                escape(&err.to_string())
            );
        }
        Some(PageOutcome::Failed) => {
            page.push_str(
                "<section id=\"error\">\n<p>The prediction could not be computed.</p>\n</section>\n",
            );
        }
        None => {}
    }

    page.push_str("</body>\n</html>\n");
    page
}

fn render_field(page: &mut String, field: &FieldDescriptor, value: &str) {
    let _ = write!(
        page,
        "<p>\n<label for=\"{name}\">{label}</label>\n",
        name = field.name,
        label = escape(field.label)
    );

    match field.control {
        FieldControl::Select => {
            let _ = writeln!(page, "<select id=\"{0}\" name=\"{0}\">", field.name);
            for option in &field.options {
                let selected = if option == value { " selected" } else { "" };
                let _ = writeln!(
                    page,
                    "<option value=\"{0}\"{1}>{0}</option>",
                    escape(option),
                    selected
                );
            }
            page.push_str("</select>\n");
        }
        FieldControl::Number | FieldControl::Slider => {
            let kind = if field.control == FieldControl::Slider {
                "range"
            } else {
                "number"
            };
            let step = if field.integer { "1" } else { "any" };
            let _ = write!(
                page,
                "<input type=\"{kind}\" id=\"{0}\" name=\"{0}\" step=\"{step}\" value=\"{1}\"",
                field.name,
                escape(value)
            );
            if let Some(min) = field.min {
                let _ = write!(page, " min=\"{min}\"");
            }
            if let Some(max) = field.max {
                let _ = write!(page, " max=\"{max}\"");
            }
            page.push_str(">\n");
        }
    }

    page.push_str("</p>\n");
}

fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
