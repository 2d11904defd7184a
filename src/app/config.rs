use crate::app::cli::{ConfigArgs, FileFormat};
use crate::app::error::ConfigError;
use crate::app::formatter::OutputGenerator;
use crate::app::models::{Plugin, StyleConfig, Theme};
use anyhow::{Context, Result};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// Project config files looked up under the root, in order.
pub const PROJECT_FILES: [&str; 2] = ["twconfig.toml", "twconfig.json"];

/// The merged record and the project file it came from, if any.
#[derive(Debug)]
pub struct Resolved {
    pub config: StyleConfig,
    pub source: Option<PathBuf>,
}

impl FileFormat {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Ok(FileFormat::Toml),
            Some("json") => Ok(FileFormat::Json),
            _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            FileFormat::Toml => PROJECT_FILES[0],
            FileFormat::Json => PROJECT_FILES[1],
        }
    }
}

/// Explicit path first, then the first project file present under `root`.
pub fn discover(root: &Path, explicit: Option<&Path>) -> Result<Option<PathBuf>, ConfigError> {
    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        return Ok(Some(path.to_path_buf()));
    }
    Ok(PROJECT_FILES
        .iter()
        .map(|name| root.join(name))
        .find(|path| path.is_file()))
}

/// Reads a project file. Unknown keys are logged and otherwise ignored.
pub fn load_file(path: &Path) -> Result<StyleConfig, ConfigError> {
    let format = FileFormat::from_path(path)?;
    let content =
        fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

    let (config, ignored) = parse_with_ignored(&content, format).map_err(|err| err.at(path))?;

    for field in &ignored {
        log::warn!("Unknown field `{}` in {}, ignoring", field, path.display());
    }
    Ok(config)
}

enum ParseError {
    Toml(toml::de::Error),
    Json(serde_json::Error),
}

impl ParseError {
    fn at(self, path: &Path) -> ConfigError {
        match self {
            ParseError::Toml(err) => ConfigError::Toml(path.to_path_buf(), err),
            ParseError::Json(err) => ConfigError::Json(path.to_path_buf(), err),
        }
    }
}

fn parse_with_ignored(
    content: &str,
    format: FileFormat,
) -> Result<(StyleConfig, Vec<String>), ParseError> {
    let mut ignored = Vec::new();
    let config = match format {
        FileFormat::Toml => {
            let table: toml::Table = toml::from_str(content).map_err(ParseError::Toml)?;
            serde_ignored::deserialize(toml::Value::Table(table), |path: serde_ignored::Path| {
                ignored.push(path.to_string())
            })
            .map_err(ParseError::Toml)?
        }
        FileFormat::Json => {
            let value: serde_json::Value =
                serde_json::from_str(content).map_err(ParseError::Json)?;
            serde_ignored::deserialize(value, |path: serde_ignored::Path| {
                ignored.push(path.to_string())
            })
            .map_err(ParseError::Json)?
        }
    };
    Ok((config, ignored))
}

fn presets_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("twconfig").join("presets.toml"))
}

/// Named partial records from `~/.config/twconfig/presets.toml`.
pub fn load_presets_file() -> Result<HashMap<String, StyleConfig>> {
    load_presets_from(&presets_path()?)
}

fn load_presets_from(config_path: &Path) -> Result<HashMap<String, StyleConfig>> {
    if !config_path.exists() {
        return Ok(HashMap::new());
    }

    let content = fs::read_to_string(config_path)
        .context(format!("Failed to read presets at {:?}", config_path))?;

    let presets: HashMap<String, StyleConfig> =
        toml::from_str(&content).context("Failed to parse presets.toml")?;
    log::debug!("loaded {} presets from {:?}", presets.len(), config_path);

    Ok(presets)
}

/// Concatenates and de-duplicates, keeping first occurrences in order.
fn merge_vecs(layers: &[&StyleConfig]) -> Vec<String> {
    let mut seen = HashSet::new();
    layers
        .iter()
        .flat_map(|layer| layer.content())
        .filter(|item| seen.insert(item.as_str()))
        .cloned()
        .collect()
}

/// Keyed by plugin name: a plugin keeps the position where its name first
/// appears and takes its value from the last layer naming it. A bare name
/// does not clear options set by an earlier layer.
fn merge_plugins(layers: &[&StyleConfig]) -> Vec<Plugin> {
    let mut merged: Vec<Plugin> = Vec::new();
    for plugin in layers.iter().flat_map(|layer| layer.plugins()) {
        match merged.iter_mut().find(|p| p.name() == plugin.name()) {
            Some(slot) if plugin.options().is_some() => *slot = plugin.clone(),
            Some(_) => {}
            None => merged.push(plugin.clone()),
        }
    }
    merged
}

fn merge(layers: &[&StyleConfig]) -> StyleConfig {
    let theme = layers
        .iter()
        .fold(Theme::default(), |acc, layer| acc.overlay(layer.theme()));
    StyleConfig::new(merge_vecs(layers), theme, merge_plugins(layers))
}

/// Resolves the effective record: preset, then project file, then CLI flags.
pub fn resolve_config(
    args: &ConfigArgs,
    root: &Path,
    project_name: Option<&str>,
) -> Result<Resolved> {
    let presets = load_presets_file()?;
    resolve_with_presets(args, root, project_name, &presets)
}

/// Determine preset to use: CLI flag > Auto-detect > None
fn select_preset<'a>(
    flag: Option<&'a str>,
    project_name: Option<&'a str>,
    presets: &'a HashMap<String, StyleConfig>,
) -> Result<Option<(&'a str, &'a StyleConfig)>, ConfigError> {
    match (flag, project_name) {
        (Some(name), _) => presets
            .get(name)
            .map(|preset| Some((name, preset)))
            .ok_or_else(|| ConfigError::UnknownPreset(name.to_string())),
        (None, Some(name)) => Ok(presets.get(name).map(|preset| (name, preset))),
        (None, None) => Ok(None),
    }
}

fn resolve_with_presets(
    args: &ConfigArgs,
    root: &Path,
    project_name: Option<&str>,
    presets: &HashMap<String, StyleConfig>,
) -> Result<Resolved> {
    let preset = select_preset(args.preset.as_deref(), project_name, presets)?.map(
        |(name, preset)| {
            log::info!("Using preset {}", name);
            preset
        },
    );

    let source = discover(root, args.config.as_deref())?;
    let file = match &source {
        Some(path) => {
            log::info!("Loading config from {}", path.display());
            load_file(path)?
        }
        None => {
            log::info!("No project config found under {}, using defaults", root.display());
            StyleConfig::default()
        }
    };

    let cli = StyleConfig::new(
        args.content.clone(),
        Theme::default(),
        args.plugin.iter().map(|p| Plugin::from(p.as_str())).collect(),
    );

    let empty = StyleConfig::default();
    let config = merge(&[preset.unwrap_or(&empty), &file, &cli]);

    Ok(Resolved { config, source })
}

/// Writes the starter record as the project file in `format`.
pub fn write_starter(root: &Path, format: FileFormat, force: bool) -> Result<PathBuf, ConfigError> {
    let path = root.join(format.file_name());
    if path.exists() && !force {
        return Err(ConfigError::AlreadyExists(path));
    }

    let config = StyleConfig::starter();
    let body = match format {
        FileFormat::Toml => OutputGenerator::render_toml(&config)?,
        FileFormat::Json => OutputGenerator::render_json(&config)?,
    };
    fs::write(&path, body).map_err(|err| ConfigError::Write(path.clone(), err))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn args() -> ConfigArgs {
        ConfigArgs::default()
    }

    fn names(config: &StyleConfig) -> Vec<&str> {
        config.plugins().iter().map(Plugin::name).collect()
    }

    #[test]
    fn discover_prefers_toml_over_json() {
        let dir = TempDir::new().unwrap();
        assert_eq!(discover(dir.path(), None).unwrap(), None);

        fs::write(dir.path().join("twconfig.json"), "{}").unwrap();
        assert_eq!(
            discover(dir.path(), None).unwrap(),
            Some(dir.path().join("twconfig.json"))
        );

        fs::write(dir.path().join("twconfig.toml"), "").unwrap();
        assert_eq!(
            discover(dir.path(), None).unwrap(),
            Some(dir.path().join("twconfig.toml"))
        );
    }

    #[test]
    fn explicit_path_must_exist() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("style.toml");
        let err = discover(dir.path(), Some(&missing)).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(p) if p == missing));
    }

    #[test]
    fn load_file_rejects_unknown_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tailwind.config.js");
        fs::write(&path, "module.exports = {}").unwrap();
        assert!(matches!(
            load_file(&path),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn load_file_tolerates_unknown_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("twconfig.toml");
        fs::write(
            &path,
            r#"
            content = ["src/**/*.rs"]
            darkMode = "class"
            plugins = ["daisyui"]
            "#,
        )
        .unwrap();

        let config = load_file(&path).unwrap();
        assert_eq!(config.content(), ["src/**/*.rs"]);
        assert_eq!(names(&config), ["daisyui"]);
    }

    #[test]
    fn load_file_reports_parse_errors_with_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("twconfig.json");
        fs::write(&path, r#"{ "content": "src/main.rs" }"#).unwrap();
        match load_file(&path) {
            Err(ConfigError::Json(p, _)) => assert_eq!(p, path),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn layers_merge_in_order_without_duplicates() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("twconfig.json"),
            json!({
                "content": ["src/main.rs", "src/components/*.rs"],
                "theme": { "extend": { "colors": { "brand": "#0af" } } },
                "plugins": ["daisyui"]
            })
            .to_string(),
        )
        .unwrap();

        let preset: StyleConfig = serde_json::from_value(json!({
            "content": ["src/main.rs"],
            "theme": { "extend": { "spacing": { "128": "32rem" } } },
            "plugins": ["@tailwindcss/typography", "daisyui"]
        }))
        .unwrap();
        let presets = HashMap::from([("webapp".to_string(), preset)]);

        let mut args = args();
        args.content = vec!["src/templates/*.rs".to_string(), "src/main.rs".to_string()];
        args.plugin = vec!["@tailwindcss/forms".to_string()];

        let resolved = resolve_with_presets(&args, dir.path(), Some("webapp"), &presets).unwrap();
        let config = resolved.config;

        assert_eq!(resolved.source, Some(dir.path().join("twconfig.json")));
        assert_eq!(
            config.content(),
            ["src/main.rs", "src/components/*.rs", "src/templates/*.rs"]
        );
        assert_eq!(
            names(&config),
            ["@tailwindcss/typography", "daisyui", "@tailwindcss/forms"]
        );
        let extend = config.theme().extend();
        assert!(extend.contains_key("spacing"));
        assert!(extend.contains_key("colors"));
    }

    #[test]
    fn later_layers_replace_plugin_options_in_place() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("twconfig.json"),
            json!({
                "content": ["src/**/*.rs"],
                "plugins": [{ "name": "daisyui", "options": { "themes": ["dark"] } }]
            })
            .to_string(),
        )
        .unwrap();

        let preset: StyleConfig = serde_json::from_value(json!({
            "plugins": ["daisyui", "@tailwindcss/typography"]
        }))
        .unwrap();
        let presets = HashMap::from([("webapp".to_string(), preset)]);

        let mut args = args();
        args.plugin = vec!["daisyui".to_string()];

        let config = resolve_with_presets(&args, dir.path(), Some("webapp"), &presets)
            .unwrap()
            .config;

        assert_eq!(names(&config), ["daisyui", "@tailwindcss/typography"]);
        assert_eq!(
            config.plugins()[0].options().and_then(|o| o.get("themes")),
            Some(&json!(["dark"]))
        );
    }

    #[test]
    fn missing_project_file_uses_cli_only() {
        let dir = TempDir::new().unwrap();
        let mut args = args();
        args.content = vec!["index.html".to_string()];

        let resolved = resolve_with_presets(&args, dir.path(), None, &HashMap::new()).unwrap();
        assert_eq!(resolved.source, None);
        assert_eq!(resolved.config.content(), ["index.html"]);
    }

    #[test]
    fn explicit_unknown_preset_is_an_error() {
        let dir = TempDir::new().unwrap();
        let mut args = args();
        args.preset = Some("nope".to_string());

        let err = resolve_with_presets(&args, dir.path(), None, &HashMap::new()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::UnknownPreset(name)) if name == "nope"
        ));
    }

    #[test]
    fn preset_flag_wins_over_folder_name() {
        let presets = HashMap::from([
            ("leptos".to_string(), StyleConfig::starter()),
            ("webapp".to_string(), StyleConfig::default()),
        ]);

        let (name, _) = select_preset(Some("leptos"), Some("webapp"), &presets)
            .unwrap()
            .unwrap();
        assert_eq!(name, "leptos");

        let (name, preset) = select_preset(None, Some("webapp"), &presets)
            .unwrap()
            .unwrap();
        assert_eq!(name, "webapp");
        assert_eq!(preset, &StyleConfig::default());

        assert!(select_preset(None, Some("other"), &presets).unwrap().is_none());
        assert!(select_preset(None, None, &presets).unwrap().is_none());
    }

    #[test]
    fn presets_file_parses_named_records() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("presets.toml");
        assert!(load_presets_from(&path).unwrap().is_empty());

        fs::write(
            &path,
            r#"
            [leptos]
            content = ["src/**/*.rs"]
            plugins = ["daisyui"]

            [static-site]
            content = ["**/*.html"]
            "#,
        )
        .unwrap();

        let presets = load_presets_from(&path).unwrap();
        assert_eq!(presets.len(), 2);
        assert_eq!(presets["static-site"].content(), ["**/*.html"]);
        assert!(presets["static-site"].plugins().is_empty());
    }

    #[test]
    fn starter_is_written_once_and_reloads() {
        let dir = TempDir::new().unwrap();
        for format in [FileFormat::Toml, FileFormat::Json] {
            let path = write_starter(dir.path(), format, false).unwrap();
            assert_eq!(load_file(&path).unwrap(), StyleConfig::starter());

            assert!(matches!(
                write_starter(dir.path(), format, false),
                Err(ConfigError::AlreadyExists(_))
            ));
            assert!(write_starter(dir.path(), format, true).is_ok());
        }
    }
}
