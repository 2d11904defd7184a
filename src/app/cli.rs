use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Manage the utility-CSS build config of a Rust web project"
)]
pub struct Cli {
    #[command(flatten)]
    pub config: ConfigArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Where the record comes from and what to add on top of it.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Project root (defaults to the current directory)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Config file to load instead of twconfig.toml / twconfig.json
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Use a predefined record from presets.toml
    #[arg(long, global = true)]
    pub preset: Option<String>,

    /// Extra content globs (e.g., 'src/**/*.rs', '!src/bin/*.rs')
    #[arg(long, global = true, num_args = 1..)]
    pub content: Vec<String>,

    /// Extra plugins to load
    #[arg(long, global = true, num_args = 1..)]
    pub plugin: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the resolved config
    Show {
        #[arg(long, value_enum, default_value_t = ShowFormat::Toml)]
        format: ShowFormat,
    },
    /// Validate the resolved config
    Check,
    /// List the files selected by the content globs
    Files {
        /// Show matches as a directory tree
        #[arg(long)]
        tree: bool,
    },
    /// Write a starter config into the project root
    Init {
        #[arg(long, value_enum, default_value_t = FileFormat::Toml)]
        format: FileFormat,

        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
    /// Write the config as a JavaScript module for the CSS build tool
    Export {
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowFormat {
    Toml,
    Json,
    Js,
}

/// On-disk formats a project config can be written in.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Toml,
    Json,
}
