use crate::models::Context;
use crate::services::process::{Invocation, ProcessOutput};
use anyhow::{Result, bail};
use std::path::PathBuf;

/// Thin wrapper over `docker compose -f <file>` for the local stack.
#[derive(Debug)]
pub struct DockerCompose<'a> {
    ctx: Context<'a>,
    file_path: PathBuf,
}

impl<'a> DockerCompose<'a> {
    /// Creates a helper for the compose file configured under `[docker]`.
    #[must_use]
    pub fn new(ctx: Context<'a>) -> Self {
        let file_path = ctx.config.project_path(&ctx.config.docker.compose_file);
        Self { ctx, file_path }
    }

    /// Override the compose file path (useful for testing/custom setups).
    #[must_use]
    pub fn with_file_path(ctx: Context<'a>, path: impl Into<PathBuf>) -> Self {
        Self { ctx, file_path: path.into() }
    }

    /// Runs a docker compose command with inherited stdio.
    ///
    /// # Errors
    /// Returns an error if the compose file is missing or docker cannot be started.
    pub fn run(&self, args: &[&str]) -> Result<ProcessOutput> {
        if !self.file_path.exists() {
            bail!("Docker compose file not found at: {}", self.file_path.display());
        }

        let mut invocation = Invocation::new(&self.ctx.config.tools.docker)
            .arg("compose")
            .arg("-f")
            .arg(self.file_path.to_string_lossy())
            .current_dir(&self.ctx.config.project.root);

        if let Some(project) = &self.ctx.config.docker.project_name {
            invocation = invocation.args(["-p", project.as_str()]);
        }

        self.ctx.runner.status(&invocation.args(args.iter().copied()))
    }

    /// Starts the stack in the background, optionally limited to some services.
    ///
    /// # Errors
    /// See [`DockerCompose::run`].
    pub fn up(&self, services: &[&str]) -> Result<ProcessOutput> {
        println!("🚀 Bringing up local stack...");
        let mut args = vec!["up", "-d", "--remove-orphans"];
        args.extend_from_slice(services);
        self.run(&args)
    }

    /// Stops the stack; `volumes` also wipes the database volume.
    ///
    /// # Errors
    /// See [`DockerCompose::run`].
    pub fn down(&self, volumes: bool) -> Result<ProcessOutput> {
        println!("🛑 Shutting down local stack...");
        let mut args = vec!["down"];
        if volumes {
            args.push("-v");
        }
        self.run(&args)
    }

    /// Prints (or follows) logs of some or all services.
    ///
    /// # Errors
    /// See [`DockerCompose::run`].
    pub fn logs(&self, services: &[&str], follow: bool) -> Result<ProcessOutput> {
        let mut args = vec!["logs"];
        if follow {
            args.push("-f");
        }
        args.extend_from_slice(services);
        self.run(&args)
    }

    /// Lists containers of the stack.
    ///
    /// # Errors
    /// See [`DockerCompose::run`].
    pub fn ps(&self) -> Result<ProcessOutput> {
        self.run(&["ps"])
    }

    /// Rebuilds images of some or all services.
    ///
    /// # Errors
    /// See [`DockerCompose::run`].
    pub fn build(&self, services: &[&str]) -> Result<ProcessOutput> {
        println!("🔨 Building images...");
        let mut args = vec!["build"];
        args.extend_from_slice(services);
        self.run(&args)
    }

    /// Restarts some or all services.
    ///
    /// # Errors
    /// See [`DockerCompose::run`].
    pub fn restart(&self, services: &[&str]) -> Result<ProcessOutput> {
        println!("🔄 Restarting services...");
        let mut args = vec!["restart"];
        args.extend_from_slice(services);
        self.run(&args)
    }
}
