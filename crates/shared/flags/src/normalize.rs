use crate::error::{FlagError, Result};
use crate::value::{FlagMap, FlagValue};
use std::collections::btree_map::Entry;

const PREFIX: &str = "--";
const LIST_SEPARATOR: char = '|';

/// Converts raw argument tokens into a [`FlagMap`].
///
/// # Errors
/// * [`FlagError::Malformed`] if a token is not `--name` or `--name=value`, or the name is
///   empty or contains characters other than ASCII alphanumerics, `-` and `_`.
/// * [`FlagError::Duplicate`] if two tokens resolve to the same normalized name.
pub fn normalize<I, S>(raw: I) -> Result<FlagMap>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut flags = FlagMap::new();

    for token in raw {
        let token = token.as_ref();
        let (name, value) = parse_token(token)?;

        match flags.entry(name) {
            Entry::Vacant(slot) => {
                slot.insert(value);
            },
            Entry::Occupied(slot) => {
                return Err(FlagError::Duplicate { name: slot.key().clone() });
            },
        }
    }

    Ok(flags)
}

/// Folds a user-facing flag name into its internal identifier (`dry-run` -> `dry_run`).
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.replace('-', "_")
}

/// Serializes a map back into tokens accepted by [`normalize`].
///
/// `Bool(false)` entries carry no information on the command line and are omitted.
/// Single-item lists get a trailing separator so they parse back as lists.
#[must_use]
pub fn to_args(flags: &FlagMap) -> Vec<String> {
    flags
        .iter()
        .filter_map(|(name, value)| match value {
            FlagValue::Bool(true) => Some(format!("{PREFIX}{name}")),
            FlagValue::Bool(false) => None,
            FlagValue::Text(text) => Some(format!("{PREFIX}{name}={}", protect_quotes(text))),
            FlagValue::List(items) => {
                let mut joined = items.join("|");
                if items.len() <= 1 {
                    joined.push(LIST_SEPARATOR);
                }
                Some(format!("{PREFIX}{name}={}", protect_quotes(&joined)))
            },
        })
        .collect()
}

fn parse_token(token: &str) -> Result<(String, FlagValue)> {
    let malformed = || FlagError::Malformed { token: token.to_owned() };

    let body = token.strip_prefix(PREFIX).ok_or_else(malformed)?;
    let (name, value) = match body.split_once('=') {
        Some((name, raw)) => (name, parse_value(raw)),
        None => (body, FlagValue::Bool(true)),
    };

    if !is_valid_name(name) {
        return Err(malformed());
    }

    Ok((normalize_name(name), value))
}

fn parse_value(raw: &str) -> FlagValue {
    let value = strip_quotes(raw);
    if value.contains(LIST_SEPARATOR) {
        FlagValue::List(
            value
                .split(LIST_SEPARATOR)
                .map(str::trim)
                .filter(|segment| !segment.is_empty())
                .map(str::to_owned)
                .collect(),
        )
    } else {
        FlagValue::Text(value.to_owned())
    }
}

fn is_valid_name(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_alphanumeric())
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn is_quoted(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() >= 2
        && bytes[0] == bytes[bytes.len() - 1]
        && (bytes[0] == b'"' || bytes[0] == b'\'')
}

fn strip_quotes(value: &str) -> &str {
    if is_quoted(value) { &value[1..value.len() - 1] } else { value }
}

fn protect_quotes(value: &str) -> String {
    if is_quoted(value) { format!("\"{value}\"") } else { value.to_owned() }
}
