use crate::dispatch::HandlerDescriptor;
use crate::models::{Context, Outcome};
use crate::services::files::{FILES_FLAG, MODE_FLAG, MODES, Selection};
use crate::services::languages::{self, Language, Tool, group_by_tool};
use crate::services::process::Invocation;
use anyhow::Result;
use folio_flags::{FlagKind, FlagMap, FlagSpec, exactly_one_of, one_of_choices};

pub const NAME: &str = "lint";
pub const DOCS: &str = include_str!("../../docs/lint.md");

const LANGUAGES: &[&str] = &["py", "js", "ts", "astro"];

#[must_use]
pub fn descriptor() -> HandlerDescriptor {
    HandlerDescriptor::new(NAME, DOCS, validate_flags, run)
}

fn spec() -> FlagSpec {
    FlagSpec::new()
        .flag(MODE_FLAG, FlagKind::Text)
        .flag(FILES_FLAG, FlagKind::List)
        .flag("languages", FlagKind::List)
        .flag("fix", FlagKind::Bool)
        .flag("verbose", FlagKind::Bool)
        .with_default("languages", LANGUAGES)
}

/// Checks lint flags: `--mode` XOR `--files`, known modes and languages.
///
/// # Errors
/// Any [`folio_flags::FlagError`] describing the first problem found.
pub fn validate_flags(flags: FlagMap) -> folio_flags::Result<FlagMap> {
    let flags = spec().validate(flags)?;
    exactly_one_of(&flags, &[MODE_FLAG, FILES_FLAG])?;
    one_of_choices(&flags, MODE_FLAG, MODES)?;
    one_of_choices(&flags, "languages", LANGUAGES)?;
    Ok(flags)
}

/// Runs Ruff and ESLint over the selected files.
///
/// # Errors
/// Returns an error if file selection fails or a linter cannot be started.
pub fn run(flags: &FlagMap, ctx: &Context<'_>) -> Result<Outcome> {
    let files = Selection::from_flags(flags)?.resolve(ctx)?;
    let wanted = languages::from_keys(flags.list("languages").unwrap_or_default());
    let groups = group_by_tool(&files, &wanted, Language::linter);

    if groups.is_empty() {
        println!("ℹ️ No files to lint.");
        return Ok(Outcome::Success);
    }

    let fix = flags.is_set("fix");
    let mut outcome = Outcome::Success;

    for (tool, files) in groups {
        if flags.is_set("verbose") {
            println!("📄 {} file(s) for {tool:?}:", files.len());
            for file in &files {
                println!("   {file}");
            }
        }

        let invocation = linter_invocation(ctx, tool, fix, files);
        println!("🔍 {invocation}");

        let result = ctx.runner.status(&invocation)?;
        if result.is_success() {
            println!("✅ {tool:?}: no issues");
        } else {
            println!("❌ {tool:?}: issues found");
            outcome = Outcome::ISSUES_FOUND;
        }
    }

    Ok(outcome)
}

fn linter_invocation(ctx: &Context<'_>, tool: Tool, fix: bool, files: Vec<String>) -> Invocation {
    let tools = &ctx.config.tools;
    let invocation = match tool {
        Tool::Ruff => Invocation::new(&tools.ruff).arg("check").arg_if(fix, "--fix"),
        Tool::Eslint | Tool::Prettier => {
            Invocation::new(&tools.npx).args(["--no-install", "eslint"]).arg_if(fix, "--fix")
        },
    };
    invocation.args(files).current_dir(&ctx.config.project.root)
}
