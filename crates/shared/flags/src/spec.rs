use crate::error::{FlagError, Result};
use crate::normalize::normalize_name;
use crate::validate::{apply_defaults, validate_allowed, validate_required};
use crate::value::{FlagKind, FlagMap, FlagValue};
use std::collections::BTreeMap;

/// Declaration of a single flag inside a [`FlagSpec`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagDecl {
    pub kind: FlagKind,
    pub default: Option<FlagValue>,
    pub required: bool,
}

/// The flags a handler accepts, with their kinds, defaults and required markers.
///
/// Built fresh per invocation from the handler's constants; it is the allow-list, the
/// required-list and the default set in one place.
#[derive(Debug, Clone, Default)]
pub struct FlagSpec {
    decls: BTreeMap<String, FlagDecl>,
}

impl FlagSpec {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a flag. Redeclaring a name replaces its kind and keeps the other settings.
    #[must_use]
    pub fn flag(mut self, name: &str, kind: FlagKind) -> Self {
        self.decls
            .entry(normalize_name(name))
            .and_modify(|decl| decl.kind = kind)
            .or_insert(FlagDecl { kind, default: None, required: false });
        self
    }

    /// Sets the default value of a declared flag; undeclared names are declared with
    /// the kind of the default.
    #[must_use]
    pub fn with_default(mut self, name: &str, value: impl Into<FlagValue>) -> Self {
        let value = value.into();
        let kind = value.kind();
        self.decls
            .entry(normalize_name(name))
            .or_insert(FlagDecl { kind, default: None, required: false })
            .default = Some(value);
        self
    }

    /// Marks a flag as required; an undeclared name is declared as [`FlagKind::Text`].
    #[must_use]
    pub fn required(mut self, name: &str) -> Self {
        self.decls
            .entry(normalize_name(name))
            .or_insert(FlagDecl { kind: FlagKind::Text, default: None, required: false })
            .required = true;
        self
    }

    /// Looks a declaration up by user-facing or normalized name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FlagDecl> {
        self.decls.get(&normalize_name(name))
    }

    pub fn allowed(&self) -> impl Iterator<Item = &str> {
        self.decls.keys().map(String::as_str)
    }

    pub fn required_flags(&self) -> impl Iterator<Item = &str> {
        self.decls.iter().filter(|(_, decl)| decl.required).map(|(name, _)| name.as_str())
    }

    #[must_use]
    pub fn defaults(&self) -> FlagMap {
        self.decls
            .iter()
            .filter_map(|(name, decl)| decl.default.clone().map(|value| (name.clone(), value)))
            .collect()
    }

    /// Runs the full check: allow-list, kinds, required flags, then defaults.
    ///
    /// A single [`FlagValue::Text`] given to a list flag is promoted to a one-item list,
    /// and `true`/`false` text is accepted for switches.
    ///
    /// # Errors
    /// [`FlagError::Unknown`], [`FlagError::WrongKind`] or [`FlagError::Missing`].
    pub fn validate(&self, flags: FlagMap) -> Result<FlagMap> {
        validate_allowed(&flags, self.allowed())?;

        let mut flags = flags;
        for (name, decl) in &self.decls {
            if let Some(value) = flags.get_mut(name) {
                coerce(name, decl.kind, value)?;
            }
        }

        validate_required(&flags, self.required_flags())?;
        Ok(apply_defaults(&flags, &self.defaults()))
    }
}

fn coerce(name: &str, expected: FlagKind, value: &mut FlagValue) -> Result<()> {
    let coerced = match (expected, &*value) {
        (FlagKind::Bool, FlagValue::Bool(_))
        | (FlagKind::Text, FlagValue::Text(_))
        | (FlagKind::List, FlagValue::List(_)) => return Ok(()),
        (FlagKind::List, FlagValue::Text(text)) => FlagValue::List(vec![text.clone()]),
        (FlagKind::Bool, FlagValue::Text(text)) if text == "true" => FlagValue::Bool(true),
        (FlagKind::Bool, FlagValue::Text(text)) if text == "false" => FlagValue::Bool(false),
        (expected, found) => {
            return Err(FlagError::WrongKind {
                flag: name.to_owned(),
                expected,
                found: found.kind(),
            });
        },
    };
    *value = coerced;
    Ok(())
}
