mod config;
mod session;

use std::process::ExitCode;

use config::AppConfig;
use session::{AppError, Script, Session};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    match run().await {
        Ok(summary) => {
            println!("{summary}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "nextpen session failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<String, AppError> {
    let config = AppConfig::from_env()?;
    let script = match &config.script {
        Some(path) => {
            tracing::info!(path = %path.display(), "replaying session script");
            Script::load(path)?
        }
        None => Script::demo(&config),
    };

    let mut session = Session::start(&config)?;
    session.run(&script).await?;
    session.finish().await.to_json()
}
