use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Python,
    JavaScript,
    TypeScript,
    Rust,
    Markdown,
    Text,
    #[serde(rename = "HTML")]
    Html,
    #[serde(rename = "CSS")]
    Css,
    #[serde(rename = "YAML")]
    Yaml,
    #[serde(rename = "JSON")]
    Json,
    #[serde(rename = "TOML")]
    Toml,
    Shell,
    Other,
}

const EXTENSIONS: &[(&str, Category)] = &[
    ("py", Category::Python),
    ("js", Category::JavaScript),
    ("jsx", Category::JavaScript),
    ("ts", Category::TypeScript),
    ("tsx", Category::TypeScript),
    ("rs", Category::Rust),
    ("md", Category::Markdown),
    ("txt", Category::Text),
    ("html", Category::Html),
    ("css", Category::Css),
    ("yml", Category::Yaml),
    ("yaml", Category::Yaml),
    ("json", Category::Json),
    ("toml", Category::Toml),
    ("sh", Category::Shell),
];

const ALL: &[Category] = &[
    Category::Python,
    Category::JavaScript,
    Category::TypeScript,
    Category::Rust,
    Category::Markdown,
    Category::Text,
    Category::Html,
    Category::Css,
    Category::Yaml,
    Category::Json,
    Category::Toml,
    Category::Shell,
    Category::Other,
];

impl Category {
    pub fn from_path(path: &str) -> Self {
        let extension = Path::new(path)
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase();
        Self::from_extension(&extension).unwrap_or(Category::Other)
    }

    pub fn from_extension(extension: &str) -> Option<Self> {
        let extension = extension.trim_start_matches('.');
        EXTENSIONS
            .iter()
            .find(|(ext, _)| ext.eq_ignore_ascii_case(extension))
            .map(|(_, category)| *category)
    }

    /// Resolves a user-facing key: either a label such as `"Markdown"` or an
    /// extension such as `"md"`.
    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim();
        ALL.iter()
            .copied()
            .find(|c| c.label().eq_ignore_ascii_case(key))
            .or_else(|| Self::from_extension(key))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Python => "Python",
            Category::JavaScript => "JavaScript",
            Category::TypeScript => "TypeScript",
            Category::Rust => "Rust",
            Category::Markdown => "Markdown",
            Category::Text => "Text",
            Category::Html => "HTML",
            Category::Css => "CSS",
            Category::Yaml => "YAML",
            Category::Json => "JSON",
            Category::Toml => "TOML",
            Category::Shell => "Shell",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Categories left out of language breakdowns. Gross line totals are not
/// affected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreSet {
    categories: HashSet<Category>,
}

impl IgnoreSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the set from configuration keys. Keys that name no known
    /// category are returned separately so the caller can report them.
    pub fn from_keys<'a, I>(keys: I) -> (Self, Vec<String>)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut set = Self::new();
        let mut unknown = Vec::new();
        for key in keys {
            match Category::from_key(key) {
                Some(category) => {
                    set.categories.insert(category);
                }
                None => unknown.push(key.to_string()),
            }
        }
        (set, unknown)
    }

    pub fn with(mut self, category: Category) -> Self {
        self.categories.insert(category);
        self
    }

    pub fn contains(&self, category: Category) -> bool {
        self.categories.contains(&category)
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}
