//! Builder for assembling a [`Config`] from several sources.

use std::path::PathBuf;

use super::{Config, ConfigError, LoadPolicy, Value};
use crate::{
    Result,
    overlay::{self, OverlayOptions},
};

/// Assembles a [`Config`] from a file, an existing tree, literal entries and
/// command-line arguments, applied in that order.
///
/// ```
/// use paramtree::config::Config;
///
/// let mut base = Config::new();
/// base.set("train.epochs", 10).unwrap();
///
/// let config = Config::builder()
///     .config(base)
///     .entry("seed", 7)
///     .args(["--train.epochs", "20"])
///     .build()
///     .unwrap();
///
/// assert_eq!(config.get("train.epochs").unwrap(), &20);
/// assert_eq!(config.get("seed").unwrap(), &7);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    file: Option<(PathBuf, LoadPolicy)>,
    sources: Vec<Config>,
    entries: Vec<(String, Value)>,
    deep: bool,
    args: Option<(Vec<String>, OverlayOptions)>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a document first, failing the build if it cannot be read.
    pub fn file(self, path: impl Into<PathBuf>) -> Self {
        self.file_with_policy(path, LoadPolicy::Strict)
    }

    pub fn file_with_policy(mut self, path: impl Into<PathBuf>, policy: LoadPolicy) -> Self {
        self.file = Some((path.into(), policy));
        self
    }

    /// Merges an existing tree after the file.
    pub fn config(mut self, config: Config) -> Self {
        self.sources.push(config);
        self
    }

    /// Merge sources and entries with [`Config::deepupdate`] instead of
    /// [`Config::update`].
    pub fn deep(mut self, deep: bool) -> Self {
        self.deep = deep;
        self
    }

    /// Adds a literal top-level entry. Keys must not contain `.`.
    pub fn entry(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entry_mut(key, value);
        self
    }

    pub fn entry_mut(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.entries.push((key.into(), value.into()));
        self
    }

    /// Overlays command-line arguments last, as in [`overlay::update_from_args`].
    pub fn args<I, S>(self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args_with_options(args, OverlayOptions::default())
    }

    pub fn args_with_options<I, S>(mut self, args: I, options: OverlayOptions) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = Some((args.into_iter().map(Into::into).collect(), options));
        self
    }

    /// Overlays the process's own arguments (without the program name).
    pub fn env_args(self) -> Self {
        self.args(std::env::args().skip(1))
    }

    pub fn build(self) -> Result<Config> {
        let mut config = Config::new();
        if let Some((path, policy)) = &self.file {
            config.load(path, *policy)?;
        }

        let mut entries = Config::new();
        for (key, value) in self.entries {
            if key.contains('.') {
                return Err(ConfigError::InvalidKey {
                    key,
                    reason: "literal keys cannot contain '.'".into(),
                }
                .into());
            }
            entries.insert(key, value);
        }

        for source in self.sources.iter().chain(std::iter::once(&entries)) {
            if self.deep {
                config.deepupdate(source);
            } else {
                config.update(source);
            }
        }

        if let Some((args, options)) = &self.args {
            overlay::update_from_args(&mut config, args, *options)?;
        }
        Ok(config)
    }
}
