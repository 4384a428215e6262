use anyhow::{Context, Result};
use test_env::{logging::LogFormat, IbisTestEnv, LoggingConfig, ProcessEnv};
use tracing::info;

fn main() -> Result<()> {
    // Load .env file if present (ignore errors if not found)
    let _ = dotenvy::dotenv();

    init_tracing(&LoggingConfig::from_env(&ProcessEnv));

    // Optional YAML override file; the process environment still wins over it
    let config = match std::env::args().nth(1) {
        Some(path) => {
            info!(path = %path, "Loading test environment with override file");
            IbisTestEnv::load_from_file(&path)
                .with_context(|| format!("Failed to load test environment from {path}"))?
        }
        None => IbisTestEnv::load().context("Failed to load test environment")?,
    };

    info!(hdfs_url = %config.hdfs_url(), "Test environment resolved");
    println!("{}", config.describe());
    Ok(())
}

fn init_tracing(logging_config: &LoggingConfig) {
    let filter = logging_config.filter();

    // Logs go to stderr so stdout carries only the description
    match logging_config.format {
        LogFormat::Json => {
            tracing_subscriber::fmt()
                .json()
                .with_writer(std::io::stderr)
                .with_env_filter(filter)
                .init();
        }
        LogFormat::Compact => {
            tracing_subscriber::fmt()
                .compact()
                .with_writer(std::io::stderr)
                .with_env_filter(filter)
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::fmt()
                .pretty()
                .with_writer(std::io::stderr)
                .with_env_filter(filter)
                .init();
        }
    }
}
