use std::process::ExitCode;

/// What a handler reports back to the dispatcher.
///
/// A failing outcome is not an error: linters that find issues return
/// `Failure(1)` and the process exits with that code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure(u8),
}

impl Outcome {
    /// Exit status reported for "issues found".
    pub const ISSUES_FOUND: Self = Self::Failure(1);

    /// Process exit status; a failure never reports 0.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::Failure(0) => 1,
            Self::Failure(code) => code,
        }
    }

    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }

    /// Maps a child process exit code; signals and out-of-range codes become `Failure(1)`.
    #[must_use]
    pub fn from_exit_code(code: Option<i32>) -> Self {
        match code {
            Some(0) => Self::Success,
            Some(code) => Self::Failure(u8::try_from(code).ok().filter(|c| *c != 0).unwrap_or(1)),
            None => Self::Failure(1),
        }
    }
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        Self::from(outcome.code())
    }
}
