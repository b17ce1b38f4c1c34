mod cli;
mod estimate;
mod infra;
mod routes;
mod server;

use tuition_cost::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
