//! File and run naming helpers.

use std::{fs, io, path::Path};

use rand::{Rng, distributions::Alphanumeric};

/// Random string of ASCII letters and digits.
pub fn random_string(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Builds a file name from a base name and a zero-padded iteration.
///
/// ```
/// use paramtree::util::naming::name_and_iter_to_filename;
///
/// assert_eq!(name_and_iter_to_filename("model", 42, ".pt", false), "model_00042.pt");
/// assert_eq!(name_and_iter_to_filename("model", 42, ".pt", true), "00042_model.pt");
/// ```
pub fn name_and_iter_to_filename(name: &str, iteration: u64, ending: &str, prefix: bool) -> String {
    if prefix {
        format!("{iteration:05}_{name}{ending}")
    } else {
        format!("{name}_{iteration:05}{ending}")
    }
}

/// Creates `path` and its parents. Returns `false` if it already existed.
pub fn create_folder(path: impl AsRef<Path>) -> io::Result<bool> {
    let path = path.as_ref();
    if path.is_dir() {
        return Ok(false);
    }
    fs::create_dir_all(path)?;
    Ok(true)
}
