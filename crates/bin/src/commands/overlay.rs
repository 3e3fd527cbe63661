//! Overlay command - applies command-line overrides to a document.

use paramtree::{
    config::{Config, LoadPolicy},
    overlay::{self, OverlayOptions},
};

use crate::cli::OverlayArgs;
use crate::output::{CommandResult, print_config};

/// Run the overlay command
pub fn run(args: &OverlayArgs) -> CommandResult {
    let mut config = Config::new();
    config.load(&args.file, LoadPolicy::Strict)?;
    let options = OverlayOptions::default().warn_unknown(args.warn_unknown);
    overlay::update_from_args(&mut config, &args.args, options)?;
    print_config(&config, false)
}
