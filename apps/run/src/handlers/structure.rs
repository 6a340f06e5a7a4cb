use crate::dispatch::HandlerDescriptor;
use crate::models::{Context, Outcome};
use anyhow::{Context as _, Result, bail};
use folio_flags::{FlagError, FlagKind, FlagMap, FlagSpec};
use std::cmp::Ordering;
use std::fmt;
use std::fs;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

pub const NAME: &str = "structure";
pub const DOCS: &str = include_str!("../../docs/structure.md");

/// Deepest `--depth` accepted.
pub const MAX_DEPTH: usize = 64;

const EXCLUDE: &[&str] = &["node_modules", ".git", "dist", ".astro", "target", "__pycache__", ".venv"];

#[must_use]
pub fn descriptor() -> HandlerDescriptor {
    HandlerDescriptor::new(NAME, DOCS, validate_flags, run)
}

fn spec() -> FlagSpec {
    FlagSpec::new()
        .flag("path", FlagKind::Text)
        .flag("depth", FlagKind::Text)
        .flag("exclude", FlagKind::List)
        .flag("output", FlagKind::Text)
        .flag("dirs_only", FlagKind::Bool)
        .with_default("path", ".")
        .with_default("depth", "3")
        .with_default("exclude", EXCLUDE)
}

/// Checks structure flags; `--depth` must be an integer from 1 to [`MAX_DEPTH`].
///
/// # Errors
/// Any [`FlagError`] describing the first problem found.
pub fn validate_flags(flags: FlagMap) -> folio_flags::Result<FlagMap> {
    let flags = spec().validate(flags)?;
    parse_depth(&flags)?;
    Ok(flags)
}

fn parse_depth(flags: &FlagMap) -> folio_flags::Result<usize> {
    let raw = flags.text("depth").unwrap_or("3");
    raw.parse::<usize>().ok().filter(|depth| (1..=MAX_DEPTH).contains(depth)).ok_or_else(|| {
        FlagError::InvalidValue {
            flag: "depth".to_owned(),
            value: raw.to_owned(),
            reason: format!("expected an integer from 1 to {MAX_DEPTH}").into(),
        }
    })
}

/// Prints the tree below `--path`, or writes it to `--output`.
///
/// # Errors
/// Returns an error if the start path is not a directory or the output cannot be written.
pub fn run(flags: &FlagMap, ctx: &Context<'_>) -> Result<Outcome> {
    let label = flags.text("path").unwrap_or(".");
    let root = ctx.config.project_path(label);
    if !root.is_dir() {
        bail!("Not a directory: {}", root.display());
    }

    let options = TreeOptions {
        depth: parse_depth(flags)?,
        exclude: flags.list("exclude").unwrap_or_default().to_vec(),
        dirs_only: flags.is_set("dirs_only"),
    };
    let tree = render_tree(&root, label, &options);

    match flags.text("output") {
        Some(output) => {
            let target = ctx.config.project_path(output);
            fs::write(&target, tree.to_string())
                .with_context(|| format!("Failed to write {}", target.display()))?;
            println!("✅ Structure written to {}", target.display());
        },
        None => print!("{tree}"),
    }

    Ok(Outcome::Success)
}

/// What [`render_tree`] includes.
#[derive(Debug, Clone)]
pub struct TreeOptions {
    /// Deepest level listed below the root.
    pub depth: usize,
    /// Entry names skipped together with everything below them.
    pub exclude: Vec<String>,
    pub dirs_only: bool,
}

/// A rendered directory tree with its counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
    pub lines: Vec<String>,
    pub directories: usize,
    pub files: usize,
    dirs_only: bool,
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        if self.dirs_only {
            writeln!(f, "\n{}", count(self.directories, "directory", "directories"))
        } else {
            writeln!(
                f,
                "\n{}, {}",
                count(self.directories, "directory", "directories"),
                count(self.files, "file", "files")
            )
        }
    }
}

fn count(n: usize, one: &str, many: &str) -> String {
    format!("{n} {}", if n == 1 { one } else { many })
}

struct Node {
    depth: usize,
    name: String,
    is_dir: bool,
    is_last: bool,
}

/// Walks `root` and renders it with box-drawing connectors.
///
/// Directories come before files; each group is sorted by name. Unreadable entries are
/// skipped with a warning.
#[must_use]
pub fn render_tree(root: &Path, label: &str, options: &TreeOptions) -> Tree {
    let walker = WalkDir::new(root)
        .min_depth(1)
        .max_depth(options.depth)
        .sort_by(directories_first)
        .into_iter()
        .filter_entry(|entry| {
            let name = entry.file_name().to_string_lossy();
            !options.exclude.iter().any(|excluded| *excluded == name)
                && !(options.dirs_only && !entry.file_type().is_dir())
        });

    let mut nodes = Vec::new();
    for entry in walker {
        match entry {
            Ok(entry) => nodes.push(Node {
                depth: entry.depth(),
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir: entry.file_type().is_dir(),
                is_last: false,
            }),
            Err(err) => tracing::warn!(error = %err, "Skipping unreadable entry"),
        }
    }

    // Walking backwards, a node is last when no later sibling has been seen at its depth.
    let deepest = nodes.iter().map(|node| node.depth).max().unwrap_or(0);
    let mut sibling_seen = vec![false; deepest + 2];
    for node in nodes.iter_mut().rev() {
        node.is_last = !sibling_seen[node.depth];
        sibling_seen[node.depth] = true;
        sibling_seen[node.depth + 1..].fill(false);
    }

    let mut lines = vec![label.to_owned()];
    let mut ancestors_last: Vec<bool> = Vec::new();
    for node in &nodes {
        ancestors_last.truncate(node.depth - 1);

        let mut line: String = ancestors_last.iter().map(|last| if *last { "    " } else { "│   " }).collect();
        line.push_str(if node.is_last { "└── " } else { "├── " });
        line.push_str(&node.name);
        if node.is_dir {
            line.push('/');
        }
        lines.push(line);

        ancestors_last.push(node.is_last);
    }

    let directories = nodes.iter().filter(|node| node.is_dir).count();
    Tree { lines, directories, files: nodes.len() - directories, dirs_only: options.dirs_only }
}

fn directories_first(a: &DirEntry, b: &DirEntry) -> Ordering {
    b.file_type().is_dir().cmp(&a.file_type().is_dir()).then_with(|| a.file_name().cmp(b.file_name()))
}
