use crate::report::{run_payers, run_rate};
use crate::server;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use payer_rating::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "payer-rating",
    about = "Rate check payers from transaction ledgers, external scores and returned-check registers",
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
    /// Import ledger exports and rate one payer against a proposed check
    Rate(RateArgs),
    /// Import ledger exports and list or search the payers found
    Payers(PayersArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

/// CSV exports making up one ledger import.
#[derive(Args, Debug)]
pub(crate) struct LedgerArgs {
    /// Transaction ledger CSV export
    #[arg(long)]
    pub(crate) transactions: PathBuf,
    /// External credit score CSV export
    #[arg(long)]
    pub(crate) scores: Option<PathBuf>,
    /// Returned-check register CSV export
    #[arg(long)]
    pub(crate) returned_checks: Option<PathBuf>,
    /// Reference date for discount days and history length (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub(crate) struct RateArgs {
    #[command(flatten)]
    pub(crate) ledger: LedgerArgs,
    /// Payer identification number
    #[arg(long)]
    pub(crate) payer_id: String,
    /// Proposed check amount
    #[arg(long)]
    pub(crate) amount: f64,
    /// Print the full rating result as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct PayersArgs {
    #[command(flatten)]
    pub(crate) ledger: LedgerArgs,
    /// Only list payers whose name or id contains this term
    #[arg(long)]
    pub(crate) search: Option<String>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Rate(args) => run_rate(args),
        Command::Payers(args) => run_payers(args),
    }
}
