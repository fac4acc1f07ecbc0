use crate::commands::{run_batch, run_inspect, run_predict, BatchArgs, PredictArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use churn_ai::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Customer Churn Predictor",
    about = "Serve and run the customer churn predictor from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score a single customer and print the verdict
    Predict(PredictArgs),
    /// Score every row of a customer CSV export
    Batch(BatchArgs),
    /// Print the vocabularies, feature columns and network shape of the loaded artifacts
    Inspect(ArtifactArgs),
}

#[derive(Args, Debug, Default, Clone)]
pub(crate) struct ArtifactArgs {
    /// Directory holding the encoder, scaler and model exports
    #[arg(long = "artifacts", value_name = "DIR")]
    pub(crate) artifact_dir: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    #[command(flatten)]
    pub(crate) artifacts: ArtifactArgs,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Predict(args) => run_predict(args),
        Command::Batch(args) => run_batch(args),
        Command::Inspect(args) => run_inspect(args),
    }
}
