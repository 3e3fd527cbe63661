//! Output helpers. Every command writes one JSON document to stdout.

use paramtree::config::{Config, DumpOptions};

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Print a config as an indented JSON document.
pub fn print_config(config: &Config, sorted: bool) -> CommandResult {
    let options = if sorted {
        DumpOptions::sorted()
    } else {
        DumpOptions::default()
    };
    println!("{}", config.dumps(options)?);
    Ok(())
}

/// Print a JSON value as an indented document.
pub fn print_json(value: &serde_json::Value) -> CommandResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
