use crate::dispatch::error::DispatchError;
use crate::dispatch::registry::Registry;
use std::fmt::Write as _;

const USAGE: &str = "Usage: run [--config <PATH>] [--log-level <LEVEL>] <command> [--flag]... [--flag=value]... [--flag=\"a|b|c\"]...";

/// Help text for the whole runner, or the documentation of one command.
///
/// Never runs a handler.
///
/// # Errors
/// [`DispatchError::UnknownCommand`] if `command` is not discovered.
pub fn show_help(registry: &Registry, command: Option<&str>) -> Result<String, DispatchError> {
    let Some(name) = command else {
        return Ok(render_overview(registry));
    };

    registry
        .find(name)
        .map(|handler| handler.docs.to_owned())
        .ok_or_else(|| DispatchError::UnknownCommand { command: name.to_owned(), available: registry.names() })
}

fn render_overview(registry: &Registry) -> String {
    let handlers = registry.discover();
    let width = handlers.iter().map(|h| h.name.len()).max().unwrap_or(0).max(12);

    let mut text = String::new();
    let _ = writeln!(text, "{USAGE}\n");
    let _ = writeln!(text, "Commands:");
    for handler in handlers {
        let _ = writeln!(text, "  {:<width$}  {}", handler.name, handler.summary());
    }
    let _ = writeln!(text, "\nRun `run --help <command>` for the documentation of a command.");
    text
}
