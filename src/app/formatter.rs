use crate::app::error::ConfigError;
use crate::app::models::{FileEntry, Plugin, StyleConfig, TokenMap};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt::Write;
use std::path::{Component, Path, PathBuf};

const JS_HEADER: &str = "/** @type {import('tailwindcss').Config} */\n";

pub struct OutputGenerator;

impl OutputGenerator {
    pub fn render_toml(config: &StyleConfig) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(config)?)
    }

    pub fn render_json(config: &StyleConfig) -> Result<String, ConfigError> {
        let mut out = serde_json::to_string_pretty(config)?;
        out.push('\n');
        Ok(out)
    }

    /// Renders the record as the CommonJS module the CSS build tool loads.
    pub fn render_js_module(config: &StyleConfig) -> String {
        let mut out = String::from(JS_HEADER);
        out.push_str("module.exports = {\n");

        if config.content().is_empty() {
            out.push_str("  content: [],\n");
        } else {
            let globs: Vec<String> = config
                .content()
                .iter()
                .map(|glob| format!("    {}", js_string(glob)))
                .collect();
            let _ = write!(out, "  content: [\n{}\n  ],\n", globs.join(",\n"));
        }

        let mut theme = config.theme().overrides().clone();
        theme.insert(
            "extend".to_string(),
            Value::Object(config.theme().extend().clone()),
        );
        out.push_str("  theme: ");
        write_object(&mut out, &theme, 1);
        out.push_str(",\n");

        let plugins: Vec<String> = config.plugins().iter().map(js_plugin).collect();
        let _ = writeln!(out, "  plugins: [{}],", plugins.join(", "));

        out.push_str("}\n");
        out
    }

    pub fn generate_list(entries: &[FileEntry]) -> String {
        entries
            .iter()
            .map(|e| e.relative_path.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Indented tree of the matched files. Parent directories are printed once.
    pub fn generate_tree(entries: &[FileEntry]) -> String {
        let mut output = String::new();
        let mut printed_dirs = HashSet::new();

        for entry in entries {
            let path = Path::new(&entry.relative_path);
            let components: Vec<Component> = path.components().collect();
            let mut current = PathBuf::new();

            for (i, component) in components
                .iter()
                .enumerate()
                .take(components.len().saturating_sub(1))
            {
                current.push(component);
                if printed_dirs.insert(current.clone()) {
                    let indent = "    ".repeat(i);
                    let _ = writeln!(output, "{}{}/", indent, component.as_os_str().to_string_lossy());
                }
            }

            let indent = "    ".repeat(components.len().saturating_sub(1));
            let name = path.file_name().unwrap_or_default().to_string_lossy();
            let _ = writeln!(output, "{}{}", indent, name);
        }

        output.trim_end().to_string()
    }
}

fn js_string(s: &str) -> String {
    Value::String(s.to_string()).to_string()
}

fn js_key(key: &str) -> String {
    let mut chars = key.chars();
    let is_ident = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if is_ident {
        key.to_string()
    } else {
        js_string(key)
    }
}

fn js_plugin(plugin: &Plugin) -> String {
    let mut out = format!("require({})", js_string(plugin.name()));
    if let Some(options) = plugin.options().filter(|o| !o.is_empty()) {
        out.push('(');
        write_object(&mut out, options, 1);
        out.push(')');
    }
    out
}

fn write_object(out: &mut String, map: &TokenMap, depth: usize) {
    if map.is_empty() {
        out.push_str("{}");
        return;
    }
    out.push_str("{\n");
    for (key, value) in map {
        out.push_str(&"  ".repeat(depth + 1));
        out.push_str(&js_key(key));
        out.push_str(": ");
        write_value(out, value, depth + 1);
        out.push_str(",\n");
    }
    out.push_str(&"  ".repeat(depth));
    out.push('}');
}

fn write_value(out: &mut String, value: &Value, depth: usize) {
    match value {
        Value::Object(map) => write_object(out, map, depth),
        Value::Array(items) if items.iter().all(is_scalar) => {
            let items: Vec<String> = items.iter().map(Value::to_string).collect();
            let _ = write!(out, "[{}]", items.join(", "));
        }
        Value::Array(items) => {
            out.push_str("[\n");
            for item in items {
                out.push_str(&"  ".repeat(depth + 1));
                write_value(out, item, depth + 1);
                out.push_str(",\n");
            }
            out.push_str(&"  ".repeat(depth));
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Array(_) | Value::Object(_))
}
