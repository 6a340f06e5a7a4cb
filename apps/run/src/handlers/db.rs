use crate::dispatch::HandlerDescriptor;
use crate::models::{Context, Outcome};
use crate::services::process::Invocation;
use anyhow::{Result, bail};
use folio_flags::{FlagError, FlagKind, FlagMap, FlagSpec, one_of_choices};
use std::path::{Path, PathBuf};

pub const NAME: &str = "db";
pub const DOCS: &str = include_str!("../../docs/db.md");

const ACTIONS: &[&str] = &["apply", "diff", "inspect", "seed", "status", "shell"];

const STATUS_QUERY: &str = "SELECT relname, n_live_tup FROM pg_stat_user_tables \
                            WHERE schemaname = 'public' ORDER BY relname";

#[must_use]
pub fn descriptor() -> HandlerDescriptor {
    HandlerDescriptor::new(NAME, DOCS, validate_flags, run)
}

fn spec() -> FlagSpec {
    FlagSpec::new()
        .flag("action", FlagKind::Text)
        .flag("file", FlagKind::Text)
        .flag("url", FlagKind::Text)
        .flag("dry_run", FlagKind::Bool)
        .required("action")
}

/// Checks db flags; `--file` and `--dry-run` are limited to the actions that use them.
///
/// # Errors
/// Any [`FlagError`] describing the first problem found.
pub fn validate_flags(flags: FlagMap) -> folio_flags::Result<FlagMap> {
    let flags = spec().validate(flags)?;
    one_of_choices(&flags, "action", ACTIONS)?;

    let action = flags.text("action").unwrap_or_default();
    if let Some(file) = flags.text("file")
        && !matches!(action, "apply" | "diff" | "seed")
    {
        return Err(FlagError::InvalidValue {
            flag: "file".to_owned(),
            value: file.to_owned(),
            reason: "only valid with --action=apply, diff or seed".into(),
        });
    }
    if flags.is_set("dry_run") && !matches!(action, "apply" | "seed") {
        return Err(FlagError::InvalidValue {
            flag: "dry_run".to_owned(),
            value: "true".to_owned(),
            reason: "only valid with --action=apply or seed".into(),
        });
    }
    Ok(flags)
}

/// Runs the requested schema or data action through Atlas or psql.
///
/// # Errors
/// Returns an error if a referenced file is missing or a tool cannot be started.
pub fn run(flags: &FlagMap, ctx: &Context<'_>) -> Result<Outcome> {
    let db = &ctx.config.database;
    let tools = &ctx.config.tools;
    let url = flags.text("url").unwrap_or(&db.url);
    let dry_run = flags.is_set("dry_run");

    let invocation = match flags.text("action").unwrap_or_default() {
        "apply" => {
            let schema = existing_file(ctx, flags, &db.schema_file, "Schema")?;
            println!("🗄️ Applying {} ...", schema.display());
            Invocation::new(&tools.atlas)
                .args(["schema", "apply", "--url", url])
                .arg("--to")
                .arg(format!("file://{}", schema.display()))
                .args(["--dev-url", db.dev_url.as_str()])
                .arg_if(dry_run, "--dry-run")
                .arg("--auto-approve")
        },
        "diff" => {
            let schema = existing_file(ctx, flags, &db.schema_file, "Schema")?;
            Invocation::new(&tools.atlas)
                .args(["schema", "diff", "--from", url])
                .arg("--to")
                .arg(format!("file://{}", schema.display()))
                .args(["--dev-url", db.dev_url.as_str()])
        },
        "inspect" => Invocation::new(&tools.atlas).args(["schema", "inspect", "--url", url]),
        "seed" => {
            let seed = existing_file(ctx, flags, &db.seed_file, "Seed")?;
            let invocation = Invocation::new(&tools.psql)
                .args([url, "-v", "ON_ERROR_STOP=1", "-f"])
                .arg(seed.to_string_lossy());
            if dry_run {
                println!("📝 Would run: {invocation}");
                return Ok(Outcome::Success);
            }
            println!("🌱 Seeding from {} ...", seed.display());
            invocation
        },
        "status" => return status(ctx, url),
        "shell" => Invocation::new(&tools.psql).arg(url),
        other => bail!("Unsupported db action '{other}'"),
    };

    let invocation = invocation.current_dir(&ctx.config.project.root);
    let outcome = Outcome::from_exit_code(ctx.runner.status(&invocation)?.code);
    if outcome.is_success() {
        println!("✅ Done");
    } else {
        println!("❌ {} exited with status {}", invocation.program, outcome.code());
    }
    Ok(outcome)
}

fn existing_file(ctx: &Context<'_>, flags: &FlagMap, default: &Path, what: &str) -> Result<PathBuf> {
    let path = flags.text("file").map_or_else(|| default.to_path_buf(), PathBuf::from);
    let path = ctx.config.project_path(path);
    if !path.is_file() {
        bail!("{what} file not found at: {}", path.display());
    }
    Ok(path)
}

fn status(ctx: &Context<'_>, url: &str) -> Result<Outcome> {
    let invocation = Invocation::new(&ctx.config.tools.psql)
        .args([url, "-At", "-F", "|", "-c", STATUS_QUERY])
        .current_dir(&ctx.config.project.root);
    let output = ctx.runner.output(&invocation)?;

    if !output.is_success() {
        println!("❌ Could not query the database: {}", output.stderr.trim());
        return Ok(Outcome::from_exit_code(output.code));
    }

    let rows: Vec<(&str, &str)> = output.stdout.lines().filter_map(|line| line.split_once('|')).collect();
    if rows.is_empty() {
        println!("ℹ️ No tables in the public schema.");
        return Ok(Outcome::Success);
    }

    let width = rows.iter().map(|(table, _)| table.len()).max().unwrap_or(0);
    println!("📊 {} table(s):", rows.len());
    for (table, count) in rows {
        println!("   {table:<width$}  {count:>8} rows");
    }
    Ok(Outcome::Success)
}
