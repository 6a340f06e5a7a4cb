use crate::dispatch::HandlerDescriptor;
use crate::models::{Context, Outcome};
use crate::services::files::{FILES_FLAG, MODE_FLAG, MODES, Selection};
use crate::services::languages::{self, Tool, group_by_tool};
use crate::services::process::Invocation;
use anyhow::Result;
use folio_flags::{FlagKind, FlagMap, FlagSpec, exactly_one_of, one_of_choices};

pub const NAME: &str = "format";
pub const DOCS: &str = include_str!("../../docs/format.md");

const LANGUAGES: &[&str] = &["py", "js", "ts", "astro", "json", "css", "md"];

#[must_use]
pub fn descriptor() -> HandlerDescriptor {
    HandlerDescriptor::new(NAME, DOCS, validate_flags, run)
}

fn spec() -> FlagSpec {
    FlagSpec::new()
        .flag(MODE_FLAG, FlagKind::Text)
        .flag(FILES_FLAG, FlagKind::List)
        .flag("languages", FlagKind::List)
        .flag("check", FlagKind::Bool)
        .flag("verbose", FlagKind::Bool)
        .with_default("languages", LANGUAGES)
}

/// Checks format flags: `--mode` XOR `--files`, known modes and languages.
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

/// Runs Ruff and Prettier over the selected files, writing or only checking.
///
/// # Errors
/// Returns an error if file selection fails or a formatter cannot be started.
pub fn run(flags: &FlagMap, ctx: &Context<'_>) -> Result<Outcome> {
    let files = Selection::from_flags(flags)?.resolve(ctx)?;
    let wanted = languages::from_keys(flags.list("languages").unwrap_or_default());
    let groups = group_by_tool(&files, &wanted, |lang| Some(lang.formatter()));

    if groups.is_empty() {
        println!("ℹ️ No files to format.");
        return Ok(Outcome::Success);
    }

    let check = flags.is_set("check");
    let mut outcome = Outcome::Success;

    for (tool, files) in groups {
        if flags.is_set("verbose") {
            println!("📄 {} file(s) for {tool:?}: {}", files.len(), files.join(", "));
        }

        let invocation = formatter_invocation(ctx, tool, check, files);
        println!("🎨 {invocation}");

        let result = ctx.runner.status(&invocation)?;
        match (result.is_success(), check) {
            (true, true) => println!("✅ {tool:?}: already formatted"),
            (true, false) => println!("✅ {tool:?}: formatted"),
            (false, true) => {
                println!("❌ {tool:?}: some files need formatting");
                outcome = Outcome::ISSUES_FOUND;
            },
            (false, false) => {
                println!("❌ {tool:?}: formatter failed");
                outcome = Outcome::from_exit_code(result.code);
            },
        }
    }

    Ok(outcome)
}

fn formatter_invocation(ctx: &Context<'_>, tool: Tool, check: bool, files: Vec<String>) -> Invocation {
    let tools = &ctx.config.tools;
    let invocation = match tool {
        Tool::Ruff => Invocation::new(&tools.ruff).arg("format").arg_if(check, "--check"),
        Tool::Prettier | Tool::Eslint => Invocation::new(&tools.npx)
            .args(["--no-install", "prettier"])
            .arg(if check { "--check" } else { "--write" }),
    };
    invocation.args(files).current_dir(&ctx.config.project.root)
}
