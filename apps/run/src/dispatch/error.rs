use folio_flags::FlagError;

/// Dispatcher-level failures. All of them are usage errors (exit status 2).
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("No command given. Available commands: {}", .available.join(", "))]
    MissingCommand { available: Vec<String> },

    #[error("Unknown command '{command}'. Available commands: {}", .available.join(", "))]
    UnknownCommand { command: String, available: Vec<String> },

    #[error("Invalid flags for '{command}'")]
    Flags {
        command: String,
        #[source]
        source: FlagError,
    },
}
