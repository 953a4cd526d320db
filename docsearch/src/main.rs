//! Docsearch - document search walkthrough
//!
//! Loads settings from the environment, connects to the search service and
//! walks a sample product through its whole lifecycle.

use std::env;
use std::process::ExitCode;

use dotenv::dotenv;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use docsearch::{walkthrough, AppError, Dependencies, Settings};

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    init_tracing();

    match run().await {
        Ok(()) => {
            info!("Walkthrough completed");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Walkthrough failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), AppError> {
    let settings = Settings::from_env()?;
    let dependencies = Dependencies::new(&settings).await?;
    walkthrough::run(&dependencies.service, &settings).await
}

/// Plain text logs by default, JSON when `LOG_FORMAT=json`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json"));

    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}
