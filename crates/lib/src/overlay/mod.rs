//! Command-line overrides for a config tree.
//!
//! Every flattened leaf of the tree becomes a long flag named by its dotted
//! key (`--optimizer.lr 0.01`), typed after the leaf's current value.
//! Arguments are parsed in full, compared with the flattened defaults, and
//! only the keys that actually differ are written back into the tree.
//!
//! Re-typing a default value on the command line is therefore
//! indistinguishable from not passing the flag at all.
//!
//! ```
//! use paramtree::config::Config;
//! use paramtree::overlay::{self, OverlayOptions};
//!
//! let mut config = Config::new();
//! config.set("a.b", 3).unwrap();
//! config.set("a.c", 4).unwrap();
//!
//! overlay::update_from_args(&mut config, ["--a.b", "7"], OverlayOptions::default()).unwrap();
//!
//! assert_eq!(config.get("a.b").unwrap(), &7);
//! assert_eq!(config.get("a.c").unwrap(), &4);
//! ```

pub mod errors;

use std::collections::HashSet;

use clap::{Arg, ArgAction, ArgMatches, Command, parser::ValueSource, value_parser};
use tracing::{debug, warn};

pub use errors::OverlayError;

use crate::{
    Result,
    codec::{Decoder, Registry},
    config::{Config, FlatConfig, FlattenOptions, Key, Value},
};

/// Options for applying command-line overrides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverlayOptions {
    /// Log unrecognized arguments at warn level instead of debug
    pub warn_unknown: bool,
}

impl OverlayOptions {
    pub fn warn_unknown(mut self, warn_unknown: bool) -> Self {
        self.warn_unknown = warn_unknown;
        self
    }
}

/// Parses a boolean token.
///
/// ```
/// use paramtree::overlay::str2bool;
///
/// assert_eq!(str2bool("Yes"), Ok(true));
/// assert_eq!(str2bool("0"), Ok(false));
/// assert!(str2bool("maybe").is_err());
/// ```
pub fn str2bool(token: &str) -> std::result::Result<bool, OverlayError> {
    match token.to_lowercase().as_str() {
        "yes" | "true" | "t" | "y" | "1" => Ok(true),
        "no" | "false" | "f" | "n" | "0" => Ok(false),
        _ => Err(OverlayError::InvalidBool {
            value: token.to_string(),
        }),
    }
}

/// Element type an argument's tokens are parsed as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scalar {
    Bool,
    Int,
    Float,
    Text,
    /// Parsed as text, then decoded through the codec
    Reference,
}

impl Scalar {
    fn of(value: &Value) -> Option<Scalar> {
        match value {
            Value::Bool(_) => Some(Scalar::Bool),
            Value::Int(_) => Some(Scalar::Int),
            Value::Float(_) => Some(Scalar::Float),
            Value::Text(_) | Value::Null => Some(Scalar::Text),
            Value::Type(_) | Value::Function(_) | Value::Module(_) => Some(Scalar::Reference),
            _ => None,
        }
    }
}

/// How a flattened leaf is exposed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Single(Scalar),
    /// One or more tokens; `tuple` restores the default's tuple-ness
    Many { scalar: Scalar, tuple: bool },
}

impl Shape {
    fn infer(value: &Value) -> Option<Shape> {
        match value {
            Value::List(items) | Value::Tuple(items) => {
                let scalar = match items.first() {
                    Some(first) => Scalar::of(first).unwrap_or(Scalar::Text),
                    None => Scalar::Text,
                };
                Some(Shape::Many {
                    scalar,
                    tuple: matches!(value, Value::Tuple(_)),
                })
            }
            other => Scalar::of(other).map(Shape::Single),
        }
    }

    fn scalar(self) -> Scalar {
        match self {
            Shape::Single(scalar) | Shape::Many { scalar, .. } => scalar,
        }
    }

    fn arg(self, key: &str) -> Arg {
        let arg = Arg::new(key.to_string())
            .long(key.to_string())
            .action(ArgAction::Set)
            .allow_hyphen_values(true);
        let arg = match self.scalar() {
            Scalar::Bool => arg.value_parser(str2bool),
            Scalar::Int => arg.value_parser(value_parser!(i64)),
            Scalar::Float => arg.value_parser(value_parser!(f64)),
            Scalar::Text | Scalar::Reference => arg.value_parser(value_parser!(String)),
        };
        match self {
            Shape::Single(_) => arg.num_args(1),
            Shape::Many { .. } => arg.num_args(1..),
        }
    }

    /// Reads the parsed tokens back as a value.
    fn read(self, matches: &ArgMatches, key: &str) -> Option<Value> {
        fn many<T: Clone + Send + Sync + 'static>(
            matches: &ArgMatches,
            key: &str,
            lift: impl Fn(T) -> Value,
        ) -> Option<Vec<Value>> {
            let values = matches.try_get_many::<T>(key).ok().flatten()?;
            Some(values.cloned().map(lift).collect())
        }

        match self {
            Shape::Single(scalar) => match scalar {
                Scalar::Bool => matches.try_get_one::<bool>(key).ok().flatten().map(|b| Value::Bool(*b)),
                Scalar::Int => matches.try_get_one::<i64>(key).ok().flatten().map(|n| Value::Int(*n)),
                Scalar::Float => matches.try_get_one::<f64>(key).ok().flatten().map(|f| Value::Float(*f)),
                Scalar::Text | Scalar::Reference => matches
                    .try_get_one::<String>(key)
                    .ok()
                    .flatten()
                    .map(|s| Value::Text(s.clone())),
            },
            Shape::Many { scalar, tuple } => {
                let items = match scalar {
                    Scalar::Bool => many::<bool>(matches, key, Value::Bool),
                    Scalar::Int => many::<i64>(matches, key, Value::Int),
                    Scalar::Float => many::<f64>(matches, key, Value::Float),
                    Scalar::Text | Scalar::Reference => many::<String>(matches, key, Value::Text),
                }?;
                Some(if tuple { Value::Tuple(items) } else { Value::List(items) })
            }
        }
    }
}

/// Splits arguments into those addressed to a registered flag and the rest.
///
/// A known flag takes its inline `=value`, or else the following tokens up to
/// the next `--` flag: one token for single values, all of them for lists.
fn split_known(args: &[String], shapes: &[(String, Shape)]) -> (Vec<String>, Vec<String>) {
    let mut known = Vec::new();
    let mut unknown = Vec::new();
    let mut tokens = args.iter().peekable();

    while let Some(token) = tokens.next() {
        let Some(flag) = token.strip_prefix("--") else {
            unknown.push(token.clone());
            continue;
        };
        let (name, inline) = match flag.split_once('=') {
            Some((name, _)) => (name, true),
            None => (flag, false),
        };
        let shape = shapes.iter().find(|(key, _)| key == name).map(|(_, shape)| *shape);
        let target = if shape.is_some() { &mut known } else { &mut unknown };
        target.push(token.clone());
        if inline {
            continue;
        }
        let limit = match shape {
            Some(Shape::Single(_)) => 1,
            _ => usize::MAX,
        };
        let mut taken = 0;
        while taken < limit {
            match tokens.next_if(|next| !next.starts_with("--")) {
                Some(value) => {
                    target.push(value.clone());
                    taken += 1;
                }
                None => break,
            }
        }
    }
    (known, unknown)
}

fn strip_quotes(text: &str) -> String {
    text.chars().filter(|c| *c != '"' && *c != '\'').collect()
}

/// Drops `list.<i>` when the whole `list` flag was passed as well.
fn index_overridden_wholesale(key: &str, args: &[String]) -> bool {
    let Some((owner, index)) = key.rsplit_once('.') else {
        return false;
    };
    if owner.is_empty() || index.parse::<i64>().is_err() {
        return false;
    }
    let flag = format!("--{owner}");
    args.iter()
        .any(|arg| *arg == flag || arg.strip_prefix(&flag).is_some_and(|rest| rest.starts_with('=')))
}

/// Tuples are immutable through paths, so `tuple.<i>` gets no flag of its
/// own; the whole-tuple flag covers it.
fn is_tuple_element(key: &str, defaults: &FlatConfig) -> bool {
    let Some((owner, index)) = key.rsplit_once('.') else {
        return false;
    };
    index.parse::<i64>().is_ok() && matches!(defaults.get(owner), Some(Value::Tuple(_)))
}

/// Computes the flattened keys the arguments actually override, with their
/// new values, without touching the tree.
pub fn overrides_with<I, S>(
    config: &Config,
    args: I,
    options: OverlayOptions,
    registry: &Registry,
) -> Result<FlatConfig>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let args: Vec<String> = args.into_iter().map(|a| a.as_ref().to_string()).collect();
    let defaults = config.flatten(FlattenOptions::default());

    let shapes: Vec<(String, Shape)> = defaults
        .iter()
        .filter_map(|(key, value)| Some((key.as_text()?.to_string(), Shape::infer(value)?)))
        .filter(|(key, _)| !is_tuple_element(key, &defaults))
        .collect();

    let (known, unknown) = split_known(&args, &shapes);
    if !unknown.is_empty() {
        if options.warn_unknown {
            warn!(?unknown, "Called with unknown arguments");
        } else {
            debug!(?unknown, "Ignoring unknown arguments");
        }
    }

    let command = shapes.iter().fold(
        Command::new("paramtree")
            .no_binary_name(true)
            .args_override_self(true)
            .disable_help_flag(true)
            .disable_version_flag(true),
        |command, (key, shape)| command.arg(shape.arg(key)),
    );
    let matches = command.try_get_matches_from(&known).map_err(|e| {
        use std::error::Error as _;
        match e.source().and_then(|source| source.downcast_ref::<OverlayError>()) {
            Some(inner) => inner.clone(),
            None => OverlayError::ArgumentParse {
                message: e.to_string().trim().to_string(),
            },
        }
    })?;

    // every registered key, parsed where passed and defaulted elsewhere
    let mut parsed = Config::new();
    let mut flat_defaults = Config::new();
    for (key, shape) in &shapes {
        let default = defaults.get(key.as_str()).cloned().unwrap_or_default();
        let value = match matches.value_source(key) {
            Some(ValueSource::CommandLine) => shape.read(&matches, key).unwrap_or_else(|| default.clone()),
            _ => default.clone(),
        };
        parsed.insert(key.as_str(), value);
        flat_defaults.insert(key.as_str(), default);
    }
    let changed = Config::diff_static(&[&parsed, &flat_defaults], false);

    let decoder = Decoder::new(registry);
    let mut result = FlatConfig::new();
    let mut dropped = HashSet::new();
    for (key, shape) in &shapes {
        if !changed.contains_key(key) {
            continue;
        }
        if index_overridden_wholesale(key, &args) {
            dropped.insert(key.as_str());
            continue;
        }
        let Some(value) = parsed.remove(key) else {
            continue;
        };
        let value = match (value, shape.scalar()) {
            (Value::Text(text), _) if text == "none" || text == "None" => Value::Null,
            (Value::Text(text), Scalar::Reference) => decoder.decode_str(&strip_quotes(&text))?,
            (Value::List(items), Scalar::Reference) => Value::List(
                items
                    .iter()
                    .map(|item| match item {
                        Value::Text(text) => decoder.decode_str(&strip_quotes(text)),
                        other => Ok(other.clone()),
                    })
                    .collect::<std::result::Result<_, _>>()?,
            ),
            (value, _) => value,
        };
        result.insert(Key::Text(key.clone()), value);
    }
    if !dropped.is_empty() {
        debug!(?dropped, "Dropping element overrides superseded by whole-list flags");
    }
    Ok(result)
}

/// [`overrides_with`] against the global registry.
pub fn overrides<I, S>(config: &Config, args: I, options: OverlayOptions) -> Result<FlatConfig>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Registry::with_global(|registry| overrides_with(config, args, options, registry))
}

/// Applies command-line overrides to `config`.
///
/// Either every override is applied or, on error, none is.
pub fn update_from_args<I, S>(config: &mut Config, args: I, options: OverlayOptions) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Registry::with_global(|registry| update_from_args_with(config, args, options, registry))
}

/// [`update_from_args`] with an explicit registry.
pub fn update_from_args_with<I, S>(
    config: &mut Config,
    args: I,
    options: OverlayOptions,
    registry: &Registry,
) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let overrides = overrides_with(config, args, options, registry)?;
    if overrides.is_empty() {
        return Ok(());
    }
    let mut updated = config.clone();
    for (key, value) in overrides {
        if let Key::Text(path) = &key {
            debug!(key = %path, value = %value, "Applying command-line override");
            updated.set(path, value)?;
        }
    }
    *config = updated;
    Ok(())
}

/// Applies the process's own arguments, skipping the program name.
pub fn update_from_env_args(config: &mut Config, options: OverlayOptions) -> Result<()> {
    update_from_args(config, std::env::args().skip(1), options)
}
