//! Show and flatten commands.

use paramtree::config::{Config, FlattenOptions, LoadPolicy};

use crate::cli::{FlattenArgs, ShowArgs};
use crate::output::{CommandResult, print_config};

/// Run the show command
pub fn run(args: &ShowArgs) -> CommandResult {
    let mut config = Config::new();
    config.load(&args.file, LoadPolicy::Strict)?;
    print_config(&config, args.sorted)
}

/// Run the flatten command
pub fn run_flatten(args: &FlattenArgs) -> CommandResult {
    let mut config = Config::new();
    config.load(&args.file, LoadPolicy::Strict)?;

    let max_split = (args.max_split > 0).then_some(args.max_split);
    let options = FlattenOptions::default()
        .keep_lists(!args.no_lists)
        .max_split_size(max_split);
    let flat: Config = config.flatten(options).into_iter().collect();
    print_config(&flat, false)
}
