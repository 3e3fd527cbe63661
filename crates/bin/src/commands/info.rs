//! Info command - shows where a config document is versioned.

use paramtree::util::vcs;

use crate::cli::InfoArgs;
use crate::output::{CommandResult, print_json};

/// Run the info command
pub fn run(args: &InfoArgs) -> CommandResult {
    let info = vcs::probe(&args.file);
    print_json(&serde_json::json!({
        "file": args.file.display().to_string(),
        "remote": info.remote,
        "branch": info.branch,
        "commit": info.commit,
    }))
}
