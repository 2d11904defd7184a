// Declare modules
pub mod cli;
pub mod config;
pub mod error;
pub mod formatter;
pub mod models;
pub mod scanner;
pub mod validate;

use anyhow::{Context, Result};
use clap::Parser;
use std::env;
use std::fs;
use std::path::Path;

use self::cli::{Cli, Command, ShowFormat};
use self::config::{resolve_config, write_starter, Resolved};
use self::formatter::OutputGenerator;
use self::models::{FileEntry, StyleConfig};
use self::scanner::Scanner;

/// Parses arguments and runs the selected command.
pub fn run() -> Result<()> {
    let args = Cli::parse();

    let root = match &args.config.root {
        Some(root) => root.clone(),
        None => env::current_dir().context("Failed to get current directory")?,
    };
    // Preset auto-detection keys off the project folder name
    let project_name = root.file_name().and_then(|n| n.to_str());

    let resolve = || resolve_config(&args.config, &root, project_name);

    match args.command {
        Command::Init { format, force } => {
            let path = write_starter(&root, format, force)?;
            log::info!("Wrote {}", path.display());
            println!("Created {}", path.display());
        }
        Command::Show { format } => {
            let config = resolve()?.config;
            let out = match format {
                ShowFormat::Toml => OutputGenerator::render_toml(&config)?,
                ShowFormat::Json => OutputGenerator::render_json(&config)?,
                ShowFormat::Js => OutputGenerator::render_js_module(&config),
            };
            print!("{}", out);
        }
        Command::Check => {
            let Resolved { config, source } = resolve()?;
            config.validate()?;
            let source = source
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "defaults and flags".to_string());
            println!(
                "✅ {}: {} content globs, {} plugins",
                source,
                config.content().len(),
                config.plugins().len()
            );
        }
        Command::Files { tree } => {
            let config = resolve()?.config;
            let entries = scan(&root, &config)?;
            if entries.is_empty() {
                log::warn!("⚠️ No files match the configured content globs.");
                return Ok(());
            }
            let out = if tree {
                OutputGenerator::generate_tree(&entries)
            } else {
                OutputGenerator::generate_list(&entries)
            };
            println!("{}", out);
        }
        Command::Export { output } => {
            let config = resolve()?.config;
            config.validate()?;
            let module = OutputGenerator::render_js_module(&config);
            match output {
                Some(path) => write_output(&path, &module)?,
                None => print!("{}", module),
            }
        }
    }

    Ok(())
}

fn scan(root: &Path, config: &StyleConfig) -> Result<Vec<FileEntry>> {
    config.validate()?;
    let scanner = Scanner::new(root.to_path_buf(), config)?;
    Ok(scanner.scan())
}

fn write_output(path: &Path, body: &str) -> Result<()> {
    fs::write(path, body).context(format!("Failed to write {:?}", path))?;
    log::info!("Wrote {}", path.display());
    Ok(())
}
