use std::collections::BTreeMap;
use std::path::Path;

/// Source languages the lint and format commands know about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Language {
    Python,
    JavaScript,
    TypeScript,
    Astro,
    Json,
    Css,
    Markdown,
}

/// External tool a group of files is handed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tool {
    Ruff,
    Eslint,
    Prettier,
}

impl Language {
    pub const ALL: [Self; 7] = [
        Self::Python,
        Self::JavaScript,
        Self::TypeScript,
        Self::Astro,
        Self::Json,
        Self::Css,
        Self::Markdown,
    ];

    /// Short key used in `--languages`.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Python => "py",
            Self::JavaScript => "js",
            Self::TypeScript => "ts",
            Self::Astro => "astro",
            Self::Json => "json",
            Self::Css => "css",
            Self::Markdown => "md",
        }
    }

    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|lang| lang.key() == key)
    }

    /// Detects the language from a file extension.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        let ext = Path::new(path).extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "py" | "pyi" => Some(Self::Python),
            "js" | "mjs" | "cjs" | "jsx" => Some(Self::JavaScript),
            "ts" | "mts" | "cts" | "tsx" => Some(Self::TypeScript),
            "astro" => Some(Self::Astro),
            "json" => Some(Self::Json),
            "css" | "scss" => Some(Self::Css),
            "md" | "mdx" => Some(Self::Markdown),
            _ => None,
        }
    }

    #[must_use]
    pub const fn linter(self) -> Option<Tool> {
        match self {
            Self::Python => Some(Tool::Ruff),
            Self::JavaScript | Self::TypeScript | Self::Astro => Some(Tool::Eslint),
            Self::Json | Self::Css | Self::Markdown => None,
        }
    }

    #[must_use]
    pub const fn formatter(self) -> Tool {
        match self {
            Self::Python => Tool::Ruff,
            _ => Tool::Prettier,
        }
    }
}

/// Maps `--languages` keys to languages; unknown keys are ignored (validation rejects them).
#[must_use]
pub fn from_keys(keys: &[String]) -> Vec<Language> {
    keys.iter().filter_map(|key| Language::from_key(key)).collect()
}

/// Groups `files` by the tool that handles them, keeping only the wanted languages.
///
/// Files with unknown extensions, or languages `tool_for` maps to `None`, are dropped.
#[must_use]
pub fn group_by_tool<F>(files: &[String], wanted: &[Language], tool_for: F) -> BTreeMap<Tool, Vec<String>>
where
    F: Fn(Language) -> Option<Tool>,
{
    let mut groups: BTreeMap<Tool, Vec<String>> = BTreeMap::new();
    for file in files {
        let Some(lang) = Language::from_path(file) else { continue };
        if !wanted.contains(&lang) {
            continue;
        }
        if let Some(tool) = tool_for(lang) {
            groups.entry(tool).or_default().push(file.clone());
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_are_grouped_by_linter() {
        let files: Vec<String> = ["api/main.py", "src/pages/index.astro", "src/lib/x.ts", "README.md", "Makefile"]
            .into_iter()
            .map(String::from)
            .collect();

        let groups = group_by_tool(&files, &Language::ALL, Language::linter);
        assert_eq!(groups.get(&Tool::Ruff), Some(&vec!["api/main.py".to_owned()]));
        assert_eq!(
            groups.get(&Tool::Eslint),
            Some(&vec!["src/pages/index.astro".to_owned(), "src/lib/x.ts".to_owned()])
        );
        assert!(!groups.contains_key(&Tool::Prettier));
    }

    #[test]
    fn unwanted_languages_are_skipped() {
        let files = vec!["a.py".to_owned(), "b.js".to_owned()];
        let groups = group_by_tool(&files, &[Language::JavaScript], |lang| Some(lang.formatter()));
        assert_eq!(groups.len(), 1);
        assert_eq!(groups.get(&Tool::Prettier), Some(&vec!["b.js".to_owned()]));
    }

    #[test]
    fn keys_round_trip() {
        for lang in Language::ALL {
            assert_eq!(Language::from_key(lang.key()), Some(lang));
        }
        assert_eq!(Language::from_path("Component.TSX"), Some(Language::TypeScript));
        assert_eq!(Language::from_path("no_extension"), None);
    }
}
