use crate::dispatch::HandlerDescriptor;
use crate::models::{Context, Outcome};
use crate::services::docker::DockerCompose;
use anyhow::Result;
use folio_flags::{FlagError, FlagKind, FlagMap, FlagSpec, one_of_choices};

pub const NAME: &str = "docker";
pub const DOCS: &str = include_str!("../../docs/docker.md");

const ACTIONS: &[&str] = &["up", "down", "logs", "ps", "build", "restart"];

#[must_use]
pub fn descriptor() -> HandlerDescriptor {
    HandlerDescriptor::new(NAME, DOCS, validate_flags, run)
}

fn spec() -> FlagSpec {
    FlagSpec::new()
        .flag("action", FlagKind::Text)
        .flag("service", FlagKind::List)
        .flag("volumes", FlagKind::Bool)
        .flag("follow", FlagKind::Bool)
        .required("action")
}

/// Checks docker flags; `--volumes` and `--follow` only make sense for one action each.
///
/// # Errors
/// Any [`FlagError`] describing the first problem found.
pub fn validate_flags(flags: FlagMap) -> folio_flags::Result<FlagMap> {
    let flags = spec().validate(flags)?;
    one_of_choices(&flags, "action", ACTIONS)?;

    let action = flags.text("action").unwrap_or_default();
    only_with(&flags, "volumes", action, "down")?;
    only_with(&flags, "follow", action, "logs")?;
    if flags.contains("service") && matches!(action, "down" | "ps") {
        return Err(FlagError::InvalidValue {
            flag: "service".to_owned(),
            value: flags.list("service").unwrap_or_default().join("|"),
            reason: format!("not supported with --action={action}").into(),
        });
    }
    Ok(flags)
}

fn only_with(flags: &FlagMap, flag: &str, action: &str, required: &'static str) -> folio_flags::Result<()> {
    if flags.is_set(flag) && action != required {
        return Err(FlagError::InvalidValue {
            flag: flag.to_owned(),
            value: "true".to_owned(),
            reason: format!("only valid with --action={required}").into(),
        });
    }
    Ok(())
}

/// Runs the requested `docker compose` action; the outcome follows its exit code.
///
/// # Errors
/// Returns an error if the compose file is missing or docker cannot be started.
pub fn run(flags: &FlagMap, ctx: &Context<'_>) -> Result<Outcome> {
    let compose = DockerCompose::new(*ctx);
    let services: Vec<&str> = flags.list("service").unwrap_or_default().iter().map(String::as_str).collect();

    let output = match flags.text("action").unwrap_or_default() {
        "up" => compose.up(&services)?,
        "down" => compose.down(flags.is_set("volumes"))?,
        "logs" => compose.logs(&services, flags.is_set("follow"))?,
        "ps" => compose.ps()?,
        "build" => compose.build(&services)?,
        "restart" => compose.restart(&services)?,
        other => anyhow::bail!("Unsupported docker action '{other}'"),
    };

    let outcome = Outcome::from_exit_code(output.code);
    if !outcome.is_success() {
        println!("❌ docker compose exited with status {}", outcome.code());
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::process::{ProcessOutput, RecordingRunner};
    use folio_domain::config::{RunnerConfig, RunnerConfigInner};
    use folio_flags::normalize;
    use std::fs;

    fn project() -> Result<(tempfile::TempDir, RunnerConfig)> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("docker-compose.yml"), "services: {}\n")?;
        let mut inner = RunnerConfigInner::default();
        inner.project.root = dir.path().to_path_buf();
        inner.docker.project_name = Some("folio".to_owned());
        Ok((dir, RunnerConfig::new(inner)))
    }

    #[test]
    fn action_is_required_and_checked() {
        let err = validate_flags(FlagMap::new()).unwrap_err();
        assert!(matches!(err, FlagError::Missing { .. }));

        let err = validate_flags(normalize(["--action=explode"]).unwrap()).unwrap_err();
        assert!(matches!(err, FlagError::InvalidChoice { .. }));
    }

    #[test]
    fn switches_are_tied_to_their_action() {
        let err = validate_flags(normalize(["--action=up", "--volumes"]).unwrap()).unwrap_err();
        assert!(err.to_string().contains("--action=down"), "got: {err}");

        let err = validate_flags(normalize(["--action=ps", "--follow"]).unwrap()).unwrap_err();
        assert!(err.to_string().contains("--action=logs"), "got: {err}");

        assert!(validate_flags(normalize(["--action=logs", "--follow", "--service=api"]).unwrap()).is_ok());
    }

    #[test]
    fn compose_arguments_are_built_from_flags() -> Result<()> {
        let (dir, config) = project()?;
        let runner = RecordingRunner::new().respond("docker", ProcessOutput::failure(3));
        let ctx = Context::new(&config, &runner);

        let flags = validate_flags(normalize(["--action=up", "--service=db|api"])?)?;
        assert_eq!(run(&flags, &ctx)?, Outcome::Failure(3));

        let compose = dir.path().join("docker-compose.yml");
        assert_eq!(
            runner.command_lines(),
            vec![format!("docker compose -f {} -p folio up -d --remove-orphans db api", compose.display())]
        );
        Ok(())
    }
}
