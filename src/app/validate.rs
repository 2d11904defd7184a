use crate::app::error::{ConfigError, Diagnostics};
use crate::app::models::StyleConfig;
use crate::app::models::TokenMap;
use crate::app::scanner::{compile_glob, split_negation, strip_dot_slash};
use serde_json::Value;
use std::collections::HashSet;

impl StyleConfig {
    /// Structural checks. Every problem is collected before returning.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = Diagnostics::default();

        if self.content().is_empty() {
            diag.push("content", "no content globs configured");
        }

        let mut positives = 0;
        for (i, pattern) in self.content().iter().enumerate() {
            let field = format!("content[{}]", i);
            let (negated, glob) = split_negation(pattern);
            if strip_dot_slash(glob).trim().is_empty() {
                diag.push(field, format!("empty glob `{}`", pattern));
                continue;
            }
            if let Err(err) = compile_glob(glob) {
                diag.push(field, format!("invalid glob `{}`: {}", pattern, err));
                continue;
            }
            if !negated {
                positives += 1;
            }
        }
        if !self.content().is_empty() && positives == 0 {
            diag.push("content", "only negated globs configured; nothing can match");
        }

        let mut seen = HashSet::new();
        for (i, plugin) in self.plugins().iter().enumerate() {
            let field = format!("plugins[{}]", i);
            let name = plugin.name();
            if name.trim().is_empty() {
                diag.push(field.clone(), "plugin name is empty");
            } else if !seen.insert(name) {
                diag.push(field.clone(), format!("duplicate plugin `{}`", name));
            }
            if let Some(options) = plugin.options() {
                push_nulls(&mut diag, &format!("{}.options", field), options);
            }
        }

        push_nulls(&mut diag, "theme", self.theme().overrides());
        push_nulls(&mut diag, "theme.extend", self.theme().extend());

        diag.into_result()
    }
}

/// TOML has no null, so a null token could never be written back out.
fn push_nulls(diag: &mut Diagnostics, field: &str, map: &TokenMap) {
    for (key, value) in map {
        find_nulls(diag, &format!("{}.{}", field, key), value);
    }
}

fn find_nulls(diag: &mut Diagnostics, field: &str, value: &Value) {
    match value {
        Value::Null => diag.push(field, "null is not allowed"),
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                find_nulls(diag, &format!("{}[{}]", field, i), item);
            }
        }
        Value::Object(map) => push_nulls(diag, field, map),
        _ => {}
    }
}
