//! Command resolution and the validate-then-execute lifecycle.

pub mod error;
pub mod help;
pub mod registry;

pub use error::DispatchError;
pub use registry::{HandlerDescriptor, MainFn, Registry, ValidateFn};

use crate::models::{Context, Outcome};
use anyhow::{Context as _, Result};
use folio_flags::normalize;
use tracing::{debug, info};

/// Resolves commands against a [`Registry`] and runs them with a shared [`Context`].
#[derive(Debug)]
pub struct Dispatcher<'a> {
    registry: &'a Registry,
    context: Context<'a>,
}

impl<'a> Dispatcher<'a> {
    #[must_use]
    pub const fn new(registry: &'a Registry, context: Context<'a>) -> Self {
        Self { registry, context }
    }

    #[must_use]
    pub const fn registry(&self) -> &'a Registry {
        self.registry
    }

    /// Runs `command` with `raw_args`.
    ///
    /// 1. the command must be discovered,
    /// 2. raw tokens are normalized,
    /// 3. the handler validates (and may complete) the flags,
    /// 4. the handler's main function runs with the validated flags.
    ///
    /// A handler reporting issues is an `Ok(Outcome::Failure(_))`, not an error.
    ///
    /// # Errors
    /// [`DispatchError`] for an unknown command or invalid flags; errors raised by the
    /// handler itself are returned with the command name as context.
    pub fn dispatch<S: AsRef<str>>(&self, command: &str, raw_args: &[S]) -> Result<Outcome> {
        let handler = self.registry.find(command).ok_or_else(|| DispatchError::UnknownCommand {
            command: command.to_owned(),
            available: self.registry.names(),
        })?;

        let flag_error = |source| DispatchError::Flags { command: command.to_owned(), source };
        let flags = normalize(raw_args).map_err(flag_error)?;
        let flags = (handler.validate)(flags).map_err(flag_error)?;
        debug!(command, ?flags, "Flags validated");

        let outcome = (handler.main)(&flags, &self.context)
            .with_context(|| format!("Command '{command}' failed"))?;

        info!(command, code = outcome.code(), "Command finished");
        Ok(outcome)
    }

    /// See [`help::show_help`].
    ///
    /// # Errors
    /// [`DispatchError::UnknownCommand`] if `command` is not discovered.
    pub fn show_help(&self, command: Option<&str>) -> Result<String, DispatchError> {
        help::show_help(self.registry, command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::process::RecordingRunner;
    use folio_domain::config::RunnerConfig;
    use folio_flags::{FlagKind, FlagMap, FlagSpec, exactly_one_of};

    fn validate_sample(flags: FlagMap) -> folio_flags::Result<FlagMap> {
        let flags = FlagSpec::new()
            .flag("mode", FlagKind::Text)
            .flag("files", FlagKind::List)
            .flag("verbose", FlagKind::Bool)
            .validate(flags)?;
        exactly_one_of(&flags, &["mode", "files"])?;
        Ok(flags)
    }

    fn main_sample(flags: &FlagMap, _ctx: &Context<'_>) -> Result<Outcome> {
        match flags.text("mode") {
            Some("broken") => anyhow::bail!("sample exploded"),
            Some("dirty") => Ok(Outcome::ISSUES_FOUND),
            _ => Ok(Outcome::Success),
        }
    }

    fn registry() -> Registry {
        Registry::new()
            .register(HandlerDescriptor::new("sample", "# Sample\n\nTest handler.", validate_sample, main_sample))
            .register(HandlerDescriptor::new("blank", " \n\t\n", validate_sample, main_sample))
    }

    #[test]
    fn lifecycle_reports_outcomes_and_errors() {
        let config = RunnerConfig::default();
        let runner = RecordingRunner::new();
        let registry = registry();
        let dispatcher = Dispatcher::new(&registry, Context::new(&config, &runner));

        assert_eq!(dispatcher.dispatch("sample", &["--mode=all"]).unwrap(), Outcome::Success);
        assert_eq!(dispatcher.dispatch("sample", &["--mode=dirty"]).unwrap(), Outcome::Failure(1));

        let err = dispatcher.dispatch("sample", &["--mode=broken"]).unwrap_err();
        assert!(err.downcast_ref::<DispatchError>().is_none());
        assert_eq!(format!("{err:#}"), "Command 'sample' failed: sample exploded");
    }

    #[test]
    fn validation_failures_are_dispatch_errors() {
        let config = RunnerConfig::default();
        let runner = RecordingRunner::new();
        let registry = registry();
        let dispatcher = Dispatcher::new(&registry, Context::new(&config, &runner));

        for args in [&["-x"][..], &["--unknown"][..], &["--mode=all", "--files=a.py"][..]] {
            let err = dispatcher.dispatch("sample", args).unwrap_err();
            assert!(
                matches!(err.downcast_ref::<DispatchError>(), Some(DispatchError::Flags { .. })),
                "args {args:?} gave {err}"
            );
        }
    }

    #[test]
    fn blank_documentation_hides_a_handler() {
        let config = RunnerConfig::default();
        let runner = RecordingRunner::new();
        let registry = registry();
        let dispatcher = Dispatcher::new(&registry, Context::new(&config, &runner));

        assert_eq!(registry.names(), vec!["sample"]);
        let err = dispatcher.dispatch("blank", &["--mode=all"]).unwrap_err();
        match err.downcast_ref::<DispatchError>() {
            Some(DispatchError::UnknownCommand { command, available }) => {
                assert_eq!(command, "blank");
                assert_eq!(available, &vec!["sample".to_owned()]);
            },
            other => panic!("expected unknown command, got {other:?}"),
        }
    }

    #[test]
    fn first_registration_of_a_name_wins() -> Result<()> {
        let registry = Registry::new()
            .register(HandlerDescriptor::new("zeta", "# Zeta\n", validate_sample, main_sample))
            .register(HandlerDescriptor::new("sample", "# First\n", validate_sample, main_sample))
            .register(HandlerDescriptor::new("sample", "# Second\n", validate_sample, main_sample))
            .register(HandlerDescriptor::new("two words", "# Spaced\n", validate_sample, main_sample))
            .register(HandlerDescriptor::new("alpha", "# Alpha\n", validate_sample, main_sample));

        assert_eq!(registry.names(), vec!["alpha", "sample", "zeta"]);
        assert_eq!(help::show_help(&registry, Some("sample"))?, "# First\n");
        assert!(registry.find("two words").is_none());
        assert!(matches!(
            help::show_help(&registry, Some("two words")),
            Err(DispatchError::UnknownCommand { .. })
        ));
        Ok(())
    }
}
