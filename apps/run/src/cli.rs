//! # CLI Argument Definitions
//!
//! Only the process-level options are parsed by `clap`. Everything after the command name
//! is handed to the dispatcher untouched, so `--flag="a|b"` tokens reach the flag
//! normalizer exactly as typed.

use crate::dispatch::{DispatchError, Dispatcher};
use crate::models::Outcome;
use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use folio_flags::FlagError;
use std::path::PathBuf;

/// Exit status for malformed input: bad flags, unknown or missing command.
pub const USAGE_ERROR: u8 = 2;
/// Exit status for handler errors that are not usage problems.
pub const RUNTIME_ERROR: u8 = 1;

/// The main CLI structure parsing command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "run")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Developer task runner for the portfolio repository")]
#[command(disable_help_flag = true, disable_help_subcommand = true)]
#[command(allow_external_subcommands = true)]
pub struct Cli {
    /// Configuration file (default: folio.toml in the working directory, when present)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Diagnostics level: off, error, warn, info, debug or trace
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// List the commands, or print the documentation of one
    #[arg(short = 'h', long, action = ArgAction::SetTrue)]
    pub help: bool,

    /// The command and its raw flags.
    #[command(subcommand)]
    pub command: Option<CommandLine>,
}

/// A command name followed by its raw, unparsed flags.
#[derive(Debug, Subcommand)]
pub enum CommandLine {
    #[command(external_subcommand)]
    External(Vec<String>),
}

/// What the process was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// `run --help [command]` or `run <command> --help`.
    Help(Option<String>),
    /// `run <command> [flags]...`.
    Run { command: String, args: Vec<String> },
    /// Nothing at all.
    Missing,
}

impl Cli {
    /// Interprets the parsed arguments; `--help` anywhere among the raw flags wins.
    #[must_use]
    pub fn request(&self) -> Request {
        let (command, args) = match &self.command {
            Some(CommandLine::External(line)) => match line.split_first() {
                Some((command, args)) => (Some(command.clone()), args.to_vec()),
                None => (None, Vec::new()),
            },
            None => (None, Vec::new()),
        };

        if self.help {
            return Request::Help(command);
        }

        let help_in_args = args.iter().any(|arg| arg == "--help" || arg == "-h");
        match command {
            Some(command) if help_in_args => Request::Help(Some(command)),
            Some(command) => Request::Run { command, args },
            None => Request::Missing,
        }
    }
}

/// Serves one request: prints help or dispatches the command.
///
/// # Errors
/// [`DispatchError`] for usage problems; handler errors as returned by the dispatcher.
pub fn execute(dispatcher: &Dispatcher<'_>, request: Request) -> Result<Outcome> {
    match request {
        Request::Help(command) => {
            let text = dispatcher.show_help(command.as_deref())?;
            print!("{text}");
            if !text.ends_with('\n') {
                println!();
            }
            Ok(Outcome::Success)
        },
        Request::Run { command, args } => dispatcher.dispatch(&command, &args),
        Request::Missing => {
            Err(DispatchError::MissingCommand { available: dispatcher.registry().names() }.into())
        },
    }
}

/// Maps an error to the process exit status.
#[must_use]
pub fn exit_code_for(err: &anyhow::Error) -> u8 {
    let usage = err.downcast_ref::<DispatchError>().is_some() || err.downcast_ref::<FlagError>().is_some();
    if usage { USAGE_ERROR } else { RUNTIME_ERROR }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::Registry;
    use crate::models::Context;
    use crate::services::process::RecordingRunner;
    use folio_domain::config::RunnerConfig;

    fn parse(args: &[&str]) -> Request {
        Cli::parse_from(std::iter::once("run").chain(args.iter().copied())).request()
    }

    #[test]
    fn raw_flags_are_passed_through() {
        assert_eq!(
            parse(&["lint", "--mode=all", "--languages=\"py|ts\"", "--fix"]),
            Request::Run {
                command: "lint".to_owned(),
                args: vec!["--mode=all".to_owned(), "--languages=\"py|ts\"".to_owned(), "--fix".to_owned()],
            }
        );
    }

    #[test]
    fn help_is_recognized_before_and_after_the_command() {
        assert_eq!(parse(&["--help"]), Request::Help(None));
        assert_eq!(parse(&["--help", "db"]), Request::Help(Some("db".to_owned())));
        assert_eq!(parse(&["db", "--action=seed", "--help"]), Request::Help(Some("db".to_owned())));
        assert_eq!(parse(&[]), Request::Missing);
    }

    #[test]
    fn global_options_precede_the_command() {
        let cli = Cli::parse_from(["run", "--config", "dev.toml", "--log-level", "debug", "structure"]);
        assert_eq!(cli.config, Some(PathBuf::from("dev.toml")));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert_eq!(cli.request(), Request::Run { command: "structure".to_owned(), args: Vec::new() });
    }

    #[test]
    fn help_for_a_command_starts_nothing() -> Result<()> {
        let config = RunnerConfig::default();
        let runner = RecordingRunner::new();
        let registry = Registry::builtin();
        let dispatcher = Dispatcher::new(&registry, Context::new(&config, &runner));

        assert_eq!(execute(&dispatcher, parse(&["--help", "db"]))?, Outcome::Success);
        assert_eq!(execute(&dispatcher, parse(&["docker", "--action=up", "--help"]))?, Outcome::Success);
        assert!(runner.calls().is_empty());
        Ok(())
    }

    #[test]
    fn usage_errors_map_to_status_two() {
        let config = RunnerConfig::default();
        let runner = RecordingRunner::new();
        let registry = Registry::builtin();
        let dispatcher = Dispatcher::new(&registry, Context::new(&config, &runner));

        let unknown = execute(&dispatcher, parse(&["deploy"])).unwrap_err();
        assert_eq!(exit_code_for(&unknown), USAGE_ERROR);

        let invalid = execute(&dispatcher, parse(&["lint", "--mode=all", "--files=a.py"])).unwrap_err();
        assert_eq!(exit_code_for(&invalid), USAGE_ERROR);

        let missing = execute(&dispatcher, Request::Missing).unwrap_err();
        assert_eq!(exit_code_for(&missing), USAGE_ERROR);

        assert_eq!(exit_code_for(&anyhow::anyhow!("docker exploded")), RUNTIME_ERROR);
    }
}
