use crate::models::Context;
use crate::services::process::Invocation;
use anyhow::{Result, bail};
use folio_flags::FlagMap;
use std::collections::BTreeSet;

pub const MODE_FLAG: &str = "mode";
pub const FILES_FLAG: &str = "files";
pub const MODES: &[&str] = &["all", "staged", "changed"];

/// How the lint and format commands pick their input files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Every tracked file.
    All,
    /// Files in the git index.
    Staged,
    /// Modified against `HEAD`, plus untracked files.
    Changed,
    /// An explicit list from `--files`.
    Files(Vec<String>),
}

impl Selection {
    /// Reads the selector from validated flags (`--mode` XOR `--files`).
    ///
    /// # Errors
    /// Returns an error if neither selector is present or the mode is unknown.
    pub fn from_flags(flags: &FlagMap) -> Result<Self> {
        if let Some(files) = flags.list(FILES_FLAG) {
            return Ok(Self::Files(files.to_vec()));
        }
        match flags.text(MODE_FLAG) {
            Some("all") => Ok(Self::All),
            Some("staged") => Ok(Self::Staged),
            Some("changed") => Ok(Self::Changed),
            Some(other) => bail!("Unknown selection mode '{other}'"),
            None => bail!("No file selection given; pass --mode or --files"),
        }
    }

    /// Resolves the selection into repository-relative paths, sorted and deduplicated.
    ///
    /// Explicit files that do not exist are dropped with a warning.
    ///
    /// # Errors
    /// Returns an error if a git query fails.
    pub fn resolve(&self, ctx: &Context<'_>) -> Result<Vec<String>> {
        let files: BTreeSet<String> = match self {
            Self::All => git_lines(ctx, &["ls-files"])?,
            Self::Staged => git_lines(ctx, &["diff", "--name-only", "--cached", "--diff-filter=ACMR"])?,
            Self::Changed => {
                let mut changed = git_lines(ctx, &["diff", "--name-only", "HEAD", "--diff-filter=ACMR"])?;
                changed.extend(git_lines(ctx, &["ls-files", "--others", "--exclude-standard"])?);
                changed
            },
            Self::Files(files) => files
                .iter()
                .filter(|file| {
                    let exists = ctx.config.project_path(file.as_str()).exists();
                    if !exists {
                        tracing::warn!(file = %file, "Skipping missing file");
                    }
                    exists
                })
                .cloned()
                .collect(),
        };

        Ok(files.into_iter().collect())
    }
}

fn git_lines(ctx: &Context<'_>, args: &[&str]) -> Result<BTreeSet<String>> {
    let invocation = Invocation::new(&ctx.config.tools.git)
        .args(args.iter().copied())
        .current_dir(&ctx.config.project.root);
    let output = ctx.runner.output(&invocation)?;

    if !output.is_success() {
        bail!("'{invocation}' failed: {}", output.stderr.trim());
    }

    Ok(output
        .stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect())
}
