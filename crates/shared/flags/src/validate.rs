use crate::error::{FlagError, Result};
use crate::value::{FlagMap, FlagValue};
use std::collections::BTreeSet;
use std::collections::btree_map::Entry;

/// Fails if `flags` contains any key outside of `allowed`.
///
/// # Errors
/// [`FlagError::Unknown`] listing every offending key, sorted.
pub fn validate_allowed<I, S>(flags: &FlagMap, allowed: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let allowed: BTreeSet<String> = allowed.into_iter().map(|s| s.as_ref().to_owned()).collect();
    let unknown: Vec<String> =
        flags.keys().filter(|key| !allowed.contains(*key)).map(str::to_owned).collect();

    if unknown.is_empty() { Ok(()) } else { Err(FlagError::Unknown { flags: unknown }) }
}

/// Fails if any key of `required` is absent from `flags`.
///
/// # Errors
/// [`FlagError::Missing`] listing exactly the absent keys, sorted and deduplicated.
pub fn validate_required<I, S>(flags: &FlagMap, required: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let missing: BTreeSet<String> = required
        .into_iter()
        .map(|s| s.as_ref().to_owned())
        .filter(|key| !flags.contains(key))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(FlagError::Missing { flags: missing.into_iter().collect() })
    }
}

/// Returns a copy of `flags` with every absent key of `defaults` filled in.
///
/// Keys already present are never overwritten and the input is left untouched.
#[must_use]
pub fn apply_defaults(flags: &FlagMap, defaults: &FlagMap) -> FlagMap {
    let mut merged = flags.clone();
    for (name, value) in defaults {
        if let Entry::Vacant(slot) = merged.entry(name.clone()) {
            slot.insert(value.clone());
        }
    }
    merged
}

/// Checks that exactly one of the alternative selector flags is present.
///
/// # Errors
/// * [`FlagError::MutuallyExclusive`] with the present flags when more than one is given.
/// * [`FlagError::MissingOneOf`] with all alternatives when none is given.
pub fn exactly_one_of(flags: &FlagMap, alternatives: &[&str]) -> Result<()> {
    let present: Vec<String> =
        alternatives.iter().filter(|name| flags.contains(name)).map(|s| (*s).to_owned()).collect();

    match present.len() {
        1 => Ok(()),
        0 => Err(FlagError::MissingOneOf {
            flags: alternatives.iter().map(|s| (*s).to_owned()).collect(),
        }),
        _ => Err(FlagError::MutuallyExclusive { flags: present }),
    }
}

/// Checks that a flag, when present, only holds values from `choices`.
///
/// Text flags are checked as a whole, list flags item by item.
///
/// # Errors
/// [`FlagError::InvalidChoice`] naming the first value that is not listed.
pub fn one_of_choices(flags: &FlagMap, flag: &str, choices: &[&str]) -> Result<()> {
    let values: Vec<&str> = match flags.get(flag) {
        Some(FlagValue::Text(value)) => vec![value.as_str()],
        Some(FlagValue::List(values)) => values.iter().map(String::as_str).collect(),
        Some(FlagValue::Bool(_)) | None => return Ok(()),
    };

    match values.into_iter().find(|value| !choices.contains(value)) {
        None => Ok(()),
        Some(value) => Err(FlagError::InvalidChoice {
            flag: flag.to_owned(),
            value: value.to_owned(),
            allowed: choices.iter().map(|s| (*s).to_owned()).collect(),
        }),
    }
}
