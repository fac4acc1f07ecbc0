use crate::cli::ArtifactArgs;
use crate::infra::{load_config, load_predictor};
use churn_ai::churn::{score_csv, ChurnPredictor, CustomerSubmission, ScoringTrace};
use churn_ai::error::AppError;
use churn_ai::telemetry;
use clap::Args;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct PredictArgs {
    /// Credit score (0-850)
    #[arg(long, allow_hyphen_values = true)]
    pub(crate) credit_score: i64,
    /// Geography, one of the fitted categories
    #[arg(long)]
    pub(crate) geography: String,
    /// Gender, one of the fitted classes
    #[arg(long)]
    pub(crate) gender: String,
    /// Age in years (18-92)
    #[arg(long, allow_hyphen_values = true)]
    pub(crate) age: i64,
    /// Years as a customer (0-10)
    #[arg(long, allow_hyphen_values = true)]
    pub(crate) tenure: i64,
    /// Account balance
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub(crate) balance: f64,
    /// Number of products held (1-4)
    #[arg(long, allow_hyphen_values = true)]
    pub(crate) num_of_products: i64,
    /// Holds a credit card (0 or 1)
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    pub(crate) has_cr_card: i64,
    /// Active member (0 or 1)
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    pub(crate) is_active_member: i64,
    /// Estimated yearly salary
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub(crate) estimated_salary: f64,
    /// Print the assembled and normalized feature vectors
    #[arg(long)]
    pub(crate) explain: bool,
    /// Emit the assessment as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
    #[command(flatten)]
    pub(crate) artifacts: ArtifactArgs,
}

impl PredictArgs {
    pub(crate) fn submission(&self) -> CustomerSubmission {
        CustomerSubmission {
            credit_score: self.credit_score,
            geography: self.geography.clone(),
            gender: self.gender.clone(),
            age: self.age,
            tenure: self.tenure,
            balance: self.balance,
            num_of_products: self.num_of_products,
            has_cr_card: self.has_cr_card,
            is_active_member: self.is_active_member,
            estimated_salary: self.estimated_salary,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// Customer export to score (CSV with CreditScore, Geography, ... headers)
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Where to write scored rows (defaults to stdout)
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    #[command(flatten)]
    pub(crate) artifacts: ArtifactArgs,
}

fn prepare(artifacts: &ArtifactArgs) -> Result<Arc<ChurnPredictor>, AppError> {
    let config = load_config(artifacts)?;
    telemetry::init(&config.telemetry)?;
    load_predictor(&config.artifacts)
}

pub(crate) fn run_predict(args: PredictArgs) -> Result<(), AppError> {
    let predictor = prepare(&args.artifacts)?;
    let trace = predictor.trace(&args.submission())?;

    if args.json {
        match serde_json::to_string_pretty(&trace.assessment.view()) {
            Ok(json) => println!("{json}"),
            Err(err) => println!("Assessment payload unavailable: {err}"),
        }
    } else {
        render_assessment(&predictor, &trace, args.explain);
    }

    Ok(())
}

pub(crate) fn render_assessment(predictor: &ChurnPredictor, trace: &ScoringTrace, explain: bool) {
    println!("{}", trace.assessment.probability_line());
    println!("{}", trace.assessment.verdict.message());

    if explain {
        println!("\nFeature vector");
        let columns = predictor.artifacts().feature_columns();
        for ((column, raw), scaled) in columns
            .iter()
            .zip(trace.features.values())
            .zip(trace.normalized.values())
        {
            println!("- {column}: {raw} -> {scaled:.4}");
        }
    }
}

pub(crate) fn run_batch(args: BatchArgs) -> Result<(), AppError> {
    let predictor = prepare(&args.artifacts)?;
    let input = BufReader::new(File::open(&args.input)?);

    let summary = match &args.output {
        Some(path) => score_csv(&predictor, input, BufWriter::new(File::create(path)?))?,
        None => score_csv(&predictor, input, io::stdout().lock())?,
    };

    let mut stderr = io::stderr().lock();
    writeln!(
        stderr,
        "Scored {} customers ({} likely to churn), rejected {}",
        summary.scored,
        summary.likely_to_churn,
        summary.rejected.len()
    )?;
    for rejected in &summary.rejected {
        writeln!(stderr, "- line {}: {}", rejected.line, rejected.reason)?;
    }

    Ok(())
}

pub(crate) fn run_inspect(args: ArtifactArgs) -> Result<(), AppError> {
    let predictor = prepare(&args)?;
    let summary = predictor.artifacts().summary();

    println!("Model: {}", summary.model_name);
    println!(
        "Network shape: {}",
        summary
            .network_shape
            .iter()
            .map(usize::to_string)
            .collect::<Vec<_>>()
            .join(" -> ")
    );
    println!("Loaded at: {}", summary.loaded_at.to_rfc3339());
    println!("Genders: {}", summary.genders.join(", "));
    println!("Geographies: {}", summary.geographies.join(", "));
    println!("\nFeature columns");
    for (idx, column) in summary.feature_columns.iter().enumerate() {
        println!("{idx:>3}. {column}");
    }

    Ok(())
}
