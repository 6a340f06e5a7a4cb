use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;

/// Declared shape of a flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlagKind {
    /// `--name`
    Bool,
    /// `--name=value`
    Text,
    /// `--name=a|b|c`
    List,
}

impl fmt::Display for FlagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Bool => "a switch",
            Self::Text => "a value",
            Self::List => "a list",
        };
        f.write_str(label)
    }
}

/// A resolved flag value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagValue {
    Bool(bool),
    Text(String),
    List(Vec<String>),
}

impl FlagValue {
    /// Returns the shape of this value.
    #[must_use]
    pub const fn kind(&self) -> FlagKind {
        match self {
            Self::Bool(_) => FlagKind::Bool,
            Self::Text(_) => FlagKind::Text,
            Self::List(_) => FlagKind::List,
        }
    }
}

impl From<bool> for FlagValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for FlagValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for FlagValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&[&str]> for FlagValue {
    fn from(values: &[&str]) -> Self {
        Self::List(values.iter().map(|v| (*v).to_owned()).collect())
    }
}

impl From<Vec<String>> for FlagValue {
    fn from(values: Vec<String>) -> Self {
        Self::List(values)
    }
}

/// Mapping from normalized flag name to its value.
///
/// Keys are kept sorted so that iteration, error listings and serialization are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagMap {
    entries: BTreeMap<String, FlagValue>,
}

impl FlagMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, returning the previous one if the key was present.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FlagValue>) -> Option<FlagValue> {
        self.entries.insert(name.into(), value.into())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FlagValue> {
        self.entries.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// `true` only for a present boolean flag set to `true`.
    #[must_use]
    pub fn is_set(&self, name: &str) -> bool {
        matches!(self.entries.get(name), Some(FlagValue::Bool(true)))
    }

    /// Returns the string value of a [`FlagValue::Text`] flag.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.entries.get(name) {
            Some(FlagValue::Text(value)) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Returns the items of a [`FlagValue::List`] flag.
    #[must_use]
    pub fn list(&self, name: &str) -> Option<&[String]> {
        match self.entries.get(name) {
            Some(FlagValue::List(values)) => Some(values.as_slice()),
            _ => None,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, FlagValue> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn entry(&mut self, name: String) -> btree_map::Entry<'_, String, FlagValue> {
        self.entries.entry(name)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut FlagValue> {
        self.entries.get_mut(name)
    }
}

impl<K: Into<String>, V: Into<FlagValue>> FromIterator<(K, V)> for FlagMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self { entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }
}

impl IntoIterator for FlagMap {
    type Item = (String, FlagValue);
    type IntoIter = btree_map::IntoIter<String, FlagValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a FlagMap {
    type Item = (&'a String, &'a FlagValue);
    type IntoIter = btree_map::Iter<'a, String, FlagValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_accessors_match_only_their_shape() {
        let flags: FlagMap = [
            ("fix", FlagValue::Bool(true)),
            ("mode", FlagValue::from("all")),
            ("languages", FlagValue::from(&["py", "js"][..])),
        ]
        .into_iter()
        .collect();

        assert!(flags.is_set("fix"));
        assert!(!flags.is_set("mode"));
        assert_eq!(flags.text("mode"), Some("all"));
        assert_eq!(flags.text("languages"), None);
        assert_eq!(flags.list("languages").map(<[String]>::len), Some(2));
        assert_eq!(flags.keys().collect::<Vec<_>>(), vec!["fix", "languages", "mode"]);
    }
}
