mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::error::CliError;

const LOG_ENV: &str = "STOCKRANK_LOG";
const DEFAULT_LOG_FILTER: &str = "warn";

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    if let Err(error) = run(&cli) {
        eprintln!("error: {error}");
        std::process::exit(error.exit_code());
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let envelope = commands::run(cli)?;
    output::render(&envelope, cli.format, cli.pretty)?;

    if cli.strict && (!envelope.meta.warnings.is_empty() || !envelope.errors.is_empty()) {
        return Err(CliError::StrictModeViolation {
            warning_count: envelope.meta.warnings.len(),
            error_count: envelope.errors.len(),
        });
    }

    Ok(())
}

// Logs go to stderr; stdout carries only the envelope.
fn init_tracing(level: Option<&str>) {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// `--log-level` wins over `STOCKRANK_LOG`; anything unparsable falls back to `warn`.
fn log_filter(level: Option<&str>) -> EnvFilter {
    match level {
        Some(level) => EnvFilter::try_new(level).ok(),
        None => EnvFilter::try_from_env(LOG_ENV).ok(),
    }
    .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_level_is_used_as_given() {
        assert_eq!(log_filter(Some("info")).to_string(), "info");
    }

    #[test]
    fn unparsable_level_falls_back_to_warn() {
        assert_eq!(
            log_filter(Some("stockrank_core=loudest")).to_string(),
            DEFAULT_LOG_FILTER
        );
    }
}
