use crate::app::models::{FileEntry, StyleConfig};
use anyhow::{Context, Result};
use globset::{Glob, GlobBuilder, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use pathdiff::diff_paths;
use std::path::{Path, PathBuf};

/// Resolves a record's content globs to the project files they select.
pub struct Scanner {
    root: PathBuf,
    include_set: GlobSet,
    exclude_set: GlobSet,
}

impl Scanner {
    pub fn new(root: PathBuf, config: &StyleConfig) -> Result<Self> {
        let mut include = Vec::new();
        let mut exclude = Vec::new();
        for pattern in config.content() {
            match split_negation(pattern) {
                (true, glob) => exclude.push(glob),
                (false, glob) => include.push(glob),
            }
        }

        Ok(Self {
            root,
            include_set: build_globset(&include)?,
            exclude_set: build_globset(&exclude)?,
        })
    }

    /// Walks the root and returns matched files sorted by path.
    pub fn scan(&self) -> Vec<FileEntry> {
        let mut entries = Vec::new();

        let walker = WalkBuilder::new(&self.root)
            .hidden(false)
            .git_ignore(true)
            .require_git(false)
            .build();

        for result in walker {
            match result {
                Ok(entry) => {
                    if let Some(processed) = self.process_entry(entry.path()) {
                        entries.push(processed);
                    }
                }
                Err(err) => log::warn!("Error walking entry: {}", err),
            }
        }

        entries.sort();
        entries
    }

    fn process_entry(&self, path: &Path) -> Option<FileEntry> {
        if path == self.root || path.is_dir() {
            return None;
        }

        // Hidden files are walked, the repository itself never is.
        if path.components().any(|c| c.as_os_str() == ".git") {
            return None;
        }

        let relative = diff_paths(path, &self.root)?;
        if !self.include_set.is_match(&relative) || self.exclude_set.is_match(&relative) {
            return None;
        }

        let relative_path = relative.to_string_lossy().replace('\\', "/");
        log::debug!("matched {}", relative_path);

        Some(FileEntry {
            path: path.to_path_buf(),
            relative_path,
        })
    }
}

/// Splits a leading `!` off a content glob.
pub fn split_negation(pattern: &str) -> (bool, &str) {
    match pattern.strip_prefix('!') {
        Some(rest) => (true, rest),
        None => (false, pattern),
    }
}

/// Drops a leading `./`; globs are matched against root-relative paths.
pub fn strip_dot_slash(pattern: &str) -> &str {
    pattern.strip_prefix("./").unwrap_or(pattern)
}

/// Compiles one content glob. `*` stays within a path segment, `**` crosses
/// segments, and a leading `./` is ignored.
pub fn compile_glob(pattern: &str) -> Result<Glob, globset::Error> {
    GlobBuilder::new(strip_dot_slash(pattern))
        .literal_separator(true)
        .build()
}

fn build_globset(patterns: &[&str]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        builder.add(compile_glob(pat).context(format!("Invalid glob pattern: {}", pat))?);
    }
    Ok(builder.build()?)
}
