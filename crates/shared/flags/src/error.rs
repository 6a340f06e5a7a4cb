use crate::value::FlagKind;
use std::borrow::Cow;

/// A specialized [`Result`] for flag parsing and validation.
pub type Result<T, E = FlagError> = std::result::Result<T, E>;

/// Errors raised while normalizing raw tokens or validating a [`crate::FlagMap`].
///
/// Flag names are stored in their normalized form (`dry_run`) and rendered back
/// as `--dry_run` in messages.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlagError {
    /// A token is neither `--name` nor `--name=value`.
    #[error("Malformed flag '{token}': expected --name or --name=value")]
    Malformed { token: String },

    /// The same flag was passed more than once.
    #[error("Flag --{name} was given more than once")]
    Duplicate { name: String },

    /// Keys outside of the handler's allow-list.
    #[error("Unknown flag(s): {}", render_flags(.flags))]
    Unknown { flags: Vec<String> },

    /// Required keys that are absent.
    #[error("Missing required flag(s): {}", render_flags(.flags))]
    Missing { flags: Vec<String> },

    /// None of a set of alternative selector flags was given.
    #[error("Expected exactly one of {}", render_flags(.flags))]
    MissingOneOf { flags: Vec<String> },

    /// Several mutually exclusive flags were given together.
    #[error("Flags {} are mutually exclusive; use exactly one", render_flags(.flags))]
    MutuallyExclusive { flags: Vec<String> },

    /// The value shape does not match the declared kind.
    #[error("Flag --{flag} expects {expected}, got {found}")]
    WrongKind { flag: String, expected: FlagKind, found: FlagKind },

    /// The value is not one of the accepted choices.
    #[error("Invalid value '{value}' for --{flag}; expected one of: {}", .allowed.join(", "))]
    InvalidChoice { flag: String, value: String, allowed: Vec<String> },

    /// The value has the right shape but cannot be interpreted.
    #[error("Invalid value '{value}' for --{flag}: {reason}")]
    InvalidValue { flag: String, value: String, reason: Cow<'static, str> },
}

fn render_flags(flags: &[String]) -> String {
    flags.iter().map(|f| format!("--{f}")).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_render_flag_names_with_dashes() {
        let err = FlagError::Unknown { flags: vec!["foo".to_owned(), "dry_run".to_owned()] };
        assert_eq!(err.to_string(), "Unknown flag(s): --foo, --dry_run");

        let err = FlagError::MutuallyExclusive { flags: vec!["mode".to_owned(), "files".to_owned()] };
        assert!(err.to_string().contains("mutually exclusive"));
    }
}
