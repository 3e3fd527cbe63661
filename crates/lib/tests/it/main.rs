/*! Integration tests for Paramtree.
 *
 * This test suite is organized as a single integration test binary
 * following the pattern described by matklad in
 * https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html
 *
 * The module structure mirrors the main library structure:
 * - config: Tree access, merges, diff, flatten and file round-trips
 * - codec: Tagged-string persistence and reference resolution
 * - overlay: Command-line overrides applied on top of a tree
 * - util: File lock and naming collaborators
 */

use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("paramtree=info".parse().unwrap()),
        )
        .with_test_writer()
        .try_init();
}

mod codec;
mod config;
mod helpers;
mod overlay;
mod util;
