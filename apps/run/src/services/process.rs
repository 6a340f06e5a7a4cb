use anyhow::{Context as _, Result};
use std::cell::RefCell;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// A child process to start: program, arguments, working directory and optional stdin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub stdin: Option<String>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into(), args: Vec::new(), cwd: None, stdin: None }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Appends `arg` only when `condition` holds.
    #[must_use]
    pub fn arg_if(self, condition: bool, arg: impl Into<String>) -> Self {
        if condition { self.arg(arg) } else { self }
    }

    #[must_use]
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    #[must_use]
    pub fn stdin(mut self, input: impl Into<String>) -> Self {
        self.stdin = Some(input.into());
        self
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            if arg.contains(char::is_whitespace) {
                write!(f, " \"{arg}\"")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// Result of a finished child process. Output fields are empty for inherited stdio.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// `None` when the process was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    #[must_use]
    pub fn success() -> Self {
        Self { code: Some(0), ..Self::default() }
    }

    #[must_use]
    pub fn failure(code: i32) -> Self {
        Self { code: Some(code), ..Self::default() }
    }

    #[must_use]
    pub fn with_stdout(mut self, stdout: impl Into<String>) -> Self {
        self.stdout = stdout.into();
        self
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.code, Some(0))
    }
}

/// Seam between handlers and the operating system.
///
/// Handlers never touch [`Command`] directly, so their argument building and exit code
/// handling can be exercised without starting real tools.
pub trait ProcessRunner: fmt::Debug {
    /// Runs with inherited stdio and blocks until the child exits.
    ///
    /// # Errors
    /// Returns an error if the program cannot be started.
    fn status(&self, invocation: &Invocation) -> Result<ProcessOutput>;

    /// Runs with captured stdout/stderr and blocks until the child exits.
    ///
    /// # Errors
    /// Returns an error if the program cannot be started or its output cannot be read.
    fn output(&self, invocation: &Invocation) -> Result<ProcessOutput>;
}

/// Starts real child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    fn command(invocation: &Invocation) -> Command {
        let mut command = Command::new(&invocation.program);
        command.args(&invocation.args);
        if let Some(cwd) = &invocation.cwd {
            command.current_dir(cwd);
        }
        command
    }

    fn spawn_error(invocation: &Invocation) -> String {
        format!(
            "Failed to execute '{}'. Is it installed and in your PATH?",
            invocation.program
        )
    }
}

impl ProcessRunner for SystemRunner {
    fn status(&self, invocation: &Invocation) -> Result<ProcessOutput> {
        tracing::debug!(command = %invocation, "Spawning");

        let mut command = Self::command(invocation);
        command.stdout(Stdio::inherit()).stderr(Stdio::inherit());

        let status = match &invocation.stdin {
            None => command.status().with_context(|| Self::spawn_error(invocation))?,
            Some(input) => {
                let mut child = command
                    .stdin(Stdio::piped())
                    .spawn()
                    .with_context(|| Self::spawn_error(invocation))?;
                if let Some(mut pipe) = child.stdin.take() {
                    pipe.write_all(input.as_bytes()).context("Failed to write child stdin")?;
                }
                child.wait().context("Failed to wait for child process")?
            },
        };

        Ok(ProcessOutput { code: status.code(), ..ProcessOutput::default() })
    }

    fn output(&self, invocation: &Invocation) -> Result<ProcessOutput> {
        tracing::debug!(command = %invocation, "Capturing");

        let mut command = Self::command(invocation);
        command.stdout(Stdio::piped()).stderr(Stdio::piped());
        command.stdin(if invocation.stdin.is_some() { Stdio::piped() } else { Stdio::null() });

        let mut child = command.spawn().with_context(|| Self::spawn_error(invocation))?;
        if let (Some(input), Some(mut pipe)) = (&invocation.stdin, child.stdin.take()) {
            pipe.write_all(input.as_bytes()).context("Failed to write child stdin")?;
        }
        let output = child.wait_with_output().context("Failed to collect child output")?;

        Ok(ProcessOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Test double that records every invocation and answers from a script.
///
/// Responses are matched by prefix of the rendered command line (`git diff --name-only`);
/// unmatched invocations succeed with empty output.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    responses: Vec<(String, ProcessOutput)>,
    calls: RefCell<Vec<Invocation>>,
}

impl RecordingRunner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn respond(mut self, prefix: impl Into<String>, output: ProcessOutput) -> Self {
        self.responses.push((prefix.into(), output));
        self
    }

    /// Every invocation seen so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }

    /// Rendered command lines of every invocation seen so far.
    #[must_use]
    pub fn command_lines(&self) -> Vec<String> {
        self.calls.borrow().iter().map(ToString::to_string).collect()
    }

    fn answer(&self, invocation: &Invocation) -> ProcessOutput {
        self.calls.borrow_mut().push(invocation.clone());
        let line = invocation.to_string();
        self.responses
            .iter()
            .find(|(prefix, _)| line.starts_with(prefix.as_str()))
            .map_or_else(ProcessOutput::success, |(_, output)| output.clone())
    }
}

impl ProcessRunner for RecordingRunner {
    fn status(&self, invocation: &Invocation) -> Result<ProcessOutput> {
        let mut output = self.answer(invocation);
        output.stdout.clear();
        output.stderr.clear();
        Ok(output)
    }

    fn output(&self, invocation: &Invocation) -> Result<ProcessOutput> {
        Ok(self.answer(invocation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invocation_renders_quoted_arguments() {
        let inv = Invocation::new("psql")
            .arg("postgres://localhost/folio")
            .args(["-c", "SELECT 1"])
            .arg_if(false, "--quiet");
        assert_eq!(inv.to_string(), "psql postgres://localhost/folio -c \"SELECT 1\"");
    }

    #[test]
    fn recording_runner_matches_by_prefix() -> Result<()> {
        let runner = RecordingRunner::new()
            .respond("git diff", ProcessOutput::success().with_stdout("a.py\n"))
            .respond("ruff", ProcessOutput::failure(1));

        let diff = runner.output(&Invocation::new("git").args(["diff", "--name-only"]))?;
        assert_eq!(diff.stdout, "a.py\n");

        let lint = runner.status(&Invocation::new("ruff").arg("check"))?;
        assert_eq!(lint.code, Some(1));

        let other = runner.status(&Invocation::new("npx").arg("eslint"))?;
        assert!(other.is_success());

        assert_eq!(runner.command_lines(), vec!["git diff --name-only", "ruff check", "npx eslint"]);
        Ok(())
    }

    #[test]
    fn missing_program_is_reported() {
        let err = SystemRunner
            .status(&Invocation::new("folio-definitely-not-installed"))
            .unwrap_err();
        assert!(err.to_string().contains("Is it installed"), "got: {err}");
    }
}
