use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Ordered string-keyed mapping used for theme tokens and plugin options.
pub type TokenMap = serde_json::Map<String, serde_json::Value>;

/// The style build configuration handed to the CSS toolchain.
///
/// Fields are private: a record is built once and read through accessors.
/// Merging presets or CLI overrides produces a new record.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct StyleConfig {
    content: Vec<String>,
    // Kept ahead of `theme` so TOML output lists plain values before tables.
    plugins: Vec<Plugin>,
    theme: Theme,
}

impl StyleConfig {
    pub fn new(content: Vec<String>, theme: Theme, plugins: Vec<Plugin>) -> Self {
        Self {
            content,
            theme,
            plugins,
        }
    }

    /// The record `init` writes for a fresh project.
    pub fn starter() -> Self {
        Self::new(
            vec![
                "src/main.rs".to_string(),
                "src/components/*.rs".to_string(),
                "src/templates/*.rs".to_string(),
            ],
            Theme::default(),
            vec![
                Plugin::Name("@tailwindcss/typography".to_string()),
                Plugin::Name("daisyui".to_string()),
            ],
        )
    }

    pub fn content(&self) -> &[String] {
        &self.content
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn plugins(&self) -> &[Plugin] {
        &self.plugins
    }
}

/// Theme section. `extend` adds to the build tool's defaults, every other key
/// replaces the default token group of the same name.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Theme {
    #[serde(flatten)]
    overrides: TokenMap,
    #[serde(default)]
    extend: TokenMap,
}

impl Theme {
    pub fn new(overrides: TokenMap, extend: TokenMap) -> Self {
        Self { overrides, extend }
    }

    pub fn overrides(&self) -> &TokenMap {
        &self.overrides
    }

    pub fn extend(&self) -> &TokenMap {
        &self.extend
    }

    /// Overlays `other` on top of `self`, key by key. Later keys win.
    pub fn overlay(&self, other: &Theme) -> Theme {
        let mut overrides = self.overrides.clone();
        overrides.extend(other.overrides.clone());
        let mut extend = self.extend.clone();
        extend.extend(other.extend.clone());
        Theme { overrides, extend }
    }
}

/// A plugin reference. The name is opaque; resolving it is the build tool's job.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Plugin {
    Name(String),
    Configured {
        name: String,
        #[serde(default)]
        options: TokenMap,
    },
}

impl Plugin {
    pub fn name(&self) -> &str {
        match self {
            Plugin::Name(name) => name,
            Plugin::Configured { name, .. } => name,
        }
    }

    pub fn options(&self) -> Option<&TokenMap> {
        match self {
            Plugin::Name(_) => None,
            Plugin::Configured { options, .. } => Some(options),
        }
    }
}

impl From<&str> for Plugin {
    fn from(name: &str) -> Self {
        Plugin::Name(name.to_string())
    }
}

/// A project file matched by the content globs.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct FileEntry {
    pub path: PathBuf,
    pub relative_path: String,
}
