mod cli;
mod infra;
mod report;
mod routes;
mod server;

use payer_rating::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
