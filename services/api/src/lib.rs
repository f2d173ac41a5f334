mod cli;
mod infra;
mod routes;
mod server;

use invest_sim::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
