use crate::services::process::ProcessRunner;
use folio_domain::config::RunnerConfig;

/// Per-invocation state handed to every handler's main function.
///
/// Built once in `main`; handlers read configuration from here instead of the
/// process environment.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    pub config: &'a RunnerConfig,
    pub runner: &'a dyn ProcessRunner,
}

impl<'a> Context<'a> {
    #[must_use]
    pub const fn new(config: &'a RunnerConfig, runner: &'a dyn ProcessRunner) -> Self {
        Self { config, runner }
    }
}
