//! Scores a customer export in bulk.
//!
//! Input rows use the customer export headers (`CreditScore`, `Geography`, …);
//! unrelated columns such as `RowNumber` or `Surname` are ignored. Rows that
//! fail validation are skipped and reported, while invariant violations abort
//! the run.

use serde::Serialize;
use std::io::{Read, Write};
use tracing::warn;

use super::domain::CustomerSubmission;
use super::predictor::{ChurnError, ChurnPredictor, PredictionError};

const CUSTOMER_ID_HEADER: &str = "CustomerId";

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("invalid batch CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to write batch output: {0}")]
    Io(#[from] std::io::Error),
    #[error("scoring aborted at line {line}: {source}")]
    Prediction {
        line: u64,
        source: PredictionError,
    },
}

/// Output row written for every scored customer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredRow {
    pub line: u64,
    pub customer_id: Option<String>,
    pub probability: f64,
    pub likely_to_churn: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedRow {
    pub line: u64,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub scored: usize,
    pub likely_to_churn: usize,
    pub rejected: Vec<RejectedRow>,
}

pub fn score_csv<R: Read, W: Write>(
    predictor: &ChurnPredictor,
    input: R,
    output: W,
) -> Result<BatchSummary, BatchError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(input);
    let mut writer = csv::Writer::from_writer(output);
    let headers = reader.headers()?.clone();
    let id_column = headers.iter().position(|header| header == CUSTOMER_ID_HEADER);
    let mut summary = BatchSummary::default();

    for record in reader.records() {
        let record = record?;
        let line = record.position().map(|pos| pos.line()).unwrap_or_default();

        if record.len() != headers.len() {
            let reason = format!(
                "expected {} fields, found {}",
                headers.len(),
                record.len()
            );
            reject(&mut summary, line, reason);
            continue;
        }

        let submission: CustomerSubmission = match record.deserialize(Some(&headers)) {
            Ok(submission) => submission,
            Err(err) => {
                reject(&mut summary, line, err.to_string());
                continue;
            }
        };

        let assessment = match predictor.assess(&submission) {
            Ok(assessment) => assessment,
            Err(ChurnError::Input(err)) => {
                reject(&mut summary, line, err.to_string());
                continue;
            }
            Err(ChurnError::Prediction(source)) => {
                return Err(BatchError::Prediction { line, source });
            }
        };

        let likely = assessment.verdict.is_likely();
        writer.serialize(ScoredRow {
            line,
            customer_id: id_column
                .and_then(|idx| record.get(idx))
                .map(str::to_string),
            probability: assessment.probability,
            likely_to_churn: likely,
        })?;

        summary.scored += 1;
        if likely {
            summary.likely_to_churn += 1;
        }
    }

    writer.flush()?;
    Ok(summary)
}

fn reject(summary: &mut BatchSummary, line: u64, reason: String) {
    warn!(line, %reason, "batch row rejected");
    summary.rejected.push(RejectedRow { line, reason });
}
