//! Command-line argument definitions
//!
//! Global options override the values read from `--config`.

use clap::{Args, Parser, Subcommand};
use pandoc_prep::SchemaPolicy;
use std::path::PathBuf;

/// Main CLI application
#[derive(Parser, Debug)]
#[command(
    name = "pandoc-prep",
    version,
    about = "Prepare Obsidian notes for pandoc",
    long_about = "pandoc-prep inlines ![[embedded]] notes, turns pandoc-* front matter keys \
                  into pandoc command-line arguments and prints the resulting document or \
                  converter command. It never runs pandoc itself."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(flatten)]
    pub settings: SettingsOverrides,
}

/// Settings that can also come from the configuration file
#[derive(Args, Debug, Clone, Default)]
pub struct SettingsOverrides {
    /// YAML configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Vault root (default: nearest ancestor containing .obsidian)
    #[arg(long, global = true, value_name = "DIR")]
    pub vault: Option<PathBuf>,

    /// Extra folder searched for templates and other support files
    #[arg(long, global = true, value_name = "DIR")]
    pub template_folder: Option<PathBuf>,

    /// How to treat pandoc-* keys the option schema rejects
    #[arg(long, global = true, value_enum)]
    pub schema_policy: Option<SchemaPolicy>,

    /// Folder receiving converter output
    #[arg(long, global = true, value_name = "DIR")]
    pub output_folder: Option<PathBuf>,

    /// Path to the pandoc binary
    #[arg(long, global = true, value_name = "PATH")]
    pub pandoc: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print or write the prepared document
    Flatten(FlattenArgs),
    /// Print the compiled pandoc arguments, one per line
    #[command(name = "args")]
    Arguments(ArgumentsArgs),
    /// Write the prepared document and print the pandoc command line
    Command(CommandArgs),
    /// Check pandoc-* keys against the option schema
    Check(CheckArgs),
    /// List the known pandoc options
    Options(OptionsArgs),
}

/// Arguments for the flatten command
#[derive(Args, Debug)]
pub struct FlattenArgs {
    /// Markdown note to prepare
    pub file: PathBuf,

    /// Write to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Arguments for the args command
#[derive(Args, Debug)]
pub struct ArgumentsArgs {
    /// Markdown note to compile
    pub file: PathBuf,
}

/// Arguments for the command command
#[derive(Args, Debug)]
pub struct CommandArgs {
    /// Markdown note to export
    pub file: PathBuf,

    /// Output format (list them with `options --formats`)
    #[arg(short, long, default_value = "html", value_name = "FORMAT")]
    pub to: String,

    /// Write the prepared document to a temporary file instead of next to the note
    #[arg(long)]
    pub temp: bool,
}

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Files or directories to check
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Stop at the first file with problems
    #[arg(long)]
    pub fail_fast: bool,
}

/// Arguments for the options command
#[derive(Args, Debug)]
pub struct OptionsArgs {
    /// Print the option table as JSON
    #[arg(long)]
    pub json: bool,

    /// List the export formats instead of the options
    #[arg(long)]
    pub formats: bool,
}
