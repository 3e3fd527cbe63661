//! Set command - edits one entry of a shared document under a file lock.

use std::time::Duration;

use paramtree::{
    config::{Config, DumpOptions, LoadPolicy},
    util::{FileLock, LockOptions},
};

use crate::cli::SetArgs;
use crate::output::{CommandResult, print_config};

/// Run the set command
pub fn run(args: &SetArgs) -> CommandResult {
    // Every writer of the same path shares one lock name
    let name = std::path::absolute(&args.file)?.display().to_string();
    let _lock = FileLock::acquire(
        &name,
        LockOptions::with_timeout(Duration::from_secs(args.lock_timeout)),
    )?;

    let mut config = Config::new();
    if args.file.exists() {
        config.load(&args.file, LoadPolicy::Strict)?;
    }
    config.set_with_decode(&args.key, &args.value, args.stringify)?;
    config.dump(&args.file, DumpOptions::default())?;
    tracing::info!(file = %args.file.display(), key = %args.key, "Updated config");

    print_config(&config, false)
}
