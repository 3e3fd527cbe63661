//! CLI argument definitions for the Paramtree binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Inspect, compare and edit parameter trees stored as JSON
#[derive(Parser, Debug)]
#[command(name = "paramtree")]
#[command(about = "Paramtree: hierarchical experiment configs")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print a config document
    Show(ShowArgs),
    /// Print a config with nested keys joined by '.'
    Flatten(FlattenArgs),
    /// Print the entries that differ between configs
    Diff(DiffArgs),
    /// Set one value in a config document in place
    Set(SetArgs),
    /// Apply command-line overrides to a config and print the result
    Overlay(OverlayArgs),
    /// Show version-control info for a config document
    Info(InfoArgs),
}

/// Arguments for the show command
#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Config document to read
    pub file: PathBuf,

    /// Sort keys in the output
    #[arg(short, long, env = "PARAMTREE_SORTED")]
    pub sorted: bool,
}

/// Arguments for the flatten command
#[derive(clap::Args, Debug)]
pub struct FlattenArgs {
    pub file: PathBuf,

    /// Expand lists into one entry per element
    #[arg(long)]
    pub no_lists: bool,

    /// Keep lists longer than this whole (0 expands every list)
    #[arg(long, default_value_t = 10, env = "PARAMTREE_MAX_SPLIT")]
    pub max_split: usize,
}

/// Arguments for the diff command
#[derive(clap::Args, Debug)]
pub struct DiffArgs {
    /// Config documents to compare
    #[arg(required = true, num_args = 2..)]
    pub files: Vec<PathBuf>,

    /// Report the distinct values instead of one value per document
    #[arg(long)]
    pub only_set: bool,
}

/// Arguments for the set command
#[derive(clap::Args, Debug)]
pub struct SetArgs {
    pub file: PathBuf,

    /// Dotted path of the entry
    pub key: String,

    /// Value in JSON or tagged-string form
    pub value: String,

    /// Treat the value as a plain string
    #[arg(long)]
    pub stringify: bool,

    /// Seconds to wait for other writers of the same file
    #[arg(long, default_value_t = 10, env = "PARAMTREE_LOCK_TIMEOUT")]
    pub lock_timeout: u64,
}

/// Arguments for the overlay command
#[derive(clap::Args, Debug)]
pub struct OverlayArgs {
    pub file: PathBuf,

    /// Warn about arguments that match no config entry
    #[arg(long, env = "PARAMTREE_WARN_UNKNOWN")]
    pub warn_unknown: bool,

    /// Overrides such as `--model.width 128`
    #[arg(last = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// Arguments for the info command
#[derive(clap::Args, Debug)]
pub struct InfoArgs {
    pub file: PathBuf,
}
