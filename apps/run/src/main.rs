#![warn(rust_2018_idioms, unused_lifetimes)]
#![allow(clippy::print_stderr, clippy::print_stdout)]

use clap::Parser;
use folio_domain::config::RunnerConfig;
use folio_kernel::config::load_config;
use folio_logger::{Logger, LoggerError, parse_level};
use folio_run::cli::{self, Cli, USAGE_ERROR};
use folio_run::dispatch::{Dispatcher, Registry};
use folio_run::models::Context;
use folio_run::services::process::SystemRunner;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config::<RunnerConfig>(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("❌ {err}");
            return ExitCode::from(USAGE_ERROR);
        },
    };

    let _logger = match init_logger(&cli, &config) {
        Ok(logger) => Some(logger),
        Err(err) => {
            eprintln!("⚠️ Diagnostics disabled: {err}");
            None
        },
    };

    let registry = Registry::builtin();
    let runner = SystemRunner;
    let dispatcher = Dispatcher::new(&registry, Context::new(&config, &runner));

    match cli::execute(&dispatcher, cli.request()) {
        Ok(outcome) => outcome.into(),
        Err(err) => {
            tracing::debug!(error = ?err, "Command aborted");
            eprintln!("❌ {err:#}");
            ExitCode::from(cli::exit_code_for(&err))
        },
    }
}

fn init_logger(cli: &Cli, config: &RunnerConfig) -> Result<Logger, LoggerError> {
    let level = parse_level(cli.log_level.as_deref().unwrap_or(&config.logging.level))?;

    let mut builder = Logger::builder().name("run").level(level).json(config.logging.json);
    if let Some(directory) = &config.logging.directory {
        builder = builder.directory(config.project_path(directory));
    }
    builder.init()
}
