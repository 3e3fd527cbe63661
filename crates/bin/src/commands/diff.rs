//! Diff command - compares two or more config documents.

use paramtree::config::{Config, LoadPolicy};

use crate::cli::DiffArgs;
use crate::output::{CommandResult, print_config};

/// Run the diff command
pub fn run(args: &DiffArgs) -> CommandResult {
    let configs = args
        .files
        .iter()
        .map(|path| {
            let mut config = Config::new();
            config.load(path, LoadPolicy::Strict).map(|()| config)
        })
        .collect::<paramtree::Result<Vec<_>>>()?;

    let refs: Vec<&Config> = configs.iter().collect();
    let diff = Config::diff_static(&refs, args.only_set);
    tracing::debug!(files = args.files.len(), differing = diff.len(), "Compared configs");
    print_config(&diff, false)
}
