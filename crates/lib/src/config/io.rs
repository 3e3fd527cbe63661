//! Reading and writing trees as JSON documents.
//!
//! Documents go through the typed codec, so tuples, references and numeric
//! keys survive a round trip. Load operations resolve references against the
//! process-wide [`Registry`] unless a registry is passed explicitly.

use std::{
    fmt,
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value as Json, ser::PrettyFormatter};
use tracing::{debug, warn};

use super::{Config, ConfigError, Value, path};
use crate::{
    Result,
    codec::{self, CodecError, Decoder, Registry},
};

/// Options for [`Config::dumps`] and [`Config::dump`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DumpOptions {
    /// Write mapping keys in sorted order instead of insertion order
    pub sort_keys: bool,
}

impl DumpOptions {
    pub fn sorted() -> Self {
        Self { sort_keys: true }
    }
}

/// What [`Config::load`] does when a document cannot be read or decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadPolicy {
    /// Return the error
    #[default]
    Strict,
    /// Log the error and leave the tree unchanged
    Lenient,
}

fn sort_json(json: Json) -> Json {
    match json {
        Json::Object(map) => {
            let mut entries: Vec<(String, Json)> = map.into_iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            Json::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, sort_json(value)))
                    .collect(),
            )
        }
        Json::Array(items) => Json::Array(items.into_iter().map(sort_json).collect()),
        other => other,
    }
}

fn write_pretty<W: Write>(writer: W, json: &Json) -> Result<()> {
    let mut serializer = serde_json::Serializer::with_formatter(writer, PrettyFormatter::with_indent(b"    "));
    json.serialize(&mut serializer)?;
    Ok(())
}

/// Wraps a bare fragment such as `"a": 1` in braces.
fn wrap_fragment(text: &str) -> String {
    let text = text.trim();
    if text.starts_with('{') {
        text.to_string()
    } else {
        format!("{{{text}}}")
    }
}

impl Config {
    /// Encodes the tree into a JSON object.
    pub fn to_json(&self) -> std::result::Result<Map<String, Json>, CodecError> {
        let mut map = Map::with_capacity(self.len());
        for (key, value) in self.iter() {
            map.insert(codec::encode_key(key), codec::encode(value)?);
        }
        Ok(map)
    }

    /// Decodes a JSON object against `registry`.
    pub fn from_json(map: &Map<String, Json>, registry: &Registry) -> std::result::Result<Config, CodecError> {
        Decoder::new(registry).decode_object(map)
    }

    fn document(&self, options: DumpOptions) -> Result<Json> {
        let json = Json::Object(self.to_json()?);
        Ok(if options.sort_keys { sort_json(json) } else { json })
    }

    /// Serializes the tree to an indented JSON document.
    ///
    /// ```
    /// use paramtree::config::{Config, DumpOptions, Value};
    ///
    /// let mut config = Config::new();
    /// config.insert("b", Value::Tuple(vec![Value::Int(1), Value::Int(2)]));
    /// config.insert("a", 1);
    ///
    /// assert_eq!(
    ///     config.dumps(DumpOptions::sorted()).unwrap(),
    ///     "{\n    \"a\": 1,\n    \"b\": \"__tuple__((1, 2))\"\n}"
    /// );
    /// ```
    pub fn dumps(&self, options: DumpOptions) -> Result<String> {
        let mut buffer = Vec::new();
        write_pretty(&mut buffer, &self.document(options)?)?;
        String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
    }

    /// Writes the tree to `writer` as an indented JSON document.
    pub fn dump_to<W: Write>(&self, writer: W, options: DumpOptions) -> Result<()> {
        write_pretty(writer, &self.document(options)?)
    }

    /// Writes the tree to a file, replacing its contents.
    pub fn dump(&self, path: impl AsRef<Path>, options: DumpOptions) -> Result<()> {
        let path = path.as_ref();
        let document = self.document(options)?;
        let mut writer = BufWriter::new(File::create(path)?);
        write_pretty(&mut writer, &document)?;
        writer.flush()?;
        debug!(path = %path.display(), keys = self.len(), "Dumped config");
        Ok(())
    }

    /// Parses a document and deep-updates the tree with it, resolving
    /// references against the global registry.
    ///
    /// A bare fragment without surrounding braces is accepted.
    pub fn loads(&mut self, text: &str) -> Result<()> {
        Registry::with_global(|registry| self.loads_with(text, registry))
    }

    /// [`loads`](Self::loads) with an explicit registry.
    pub fn loads_with(&mut self, text: &str, registry: &Registry) -> Result<()> {
        let json: Map<String, Json> = serde_json::from_str(&wrap_fragment(text))?;
        let loaded = Config::from_json(&json, registry)?;
        self.deepupdate(&loaded);
        Ok(())
    }

    /// Reads a document from a file and deep-updates the tree with it.
    pub fn load(&mut self, path: impl AsRef<Path>, policy: LoadPolicy) -> Result<()> {
        Registry::with_global(|registry| self.load_with(path, policy, registry))
    }

    /// [`load`](Self::load) with an explicit registry.
    pub fn load_with(
        &mut self,
        path: impl AsRef<Path>,
        policy: LoadPolicy,
        registry: &Registry,
    ) -> Result<()> {
        let path = path.as_ref();
        let loaded = std::fs::read_to_string(path)
            .map_err(crate::Error::from)
            .and_then(|text| {
                let json: Map<String, Json> = serde_json::from_str(&text)?;
                Ok(Config::from_json(&json, registry)?)
            });
        match (loaded, policy) {
            (Ok(loaded), _) => {
                debug!(path = %path.display(), keys = loaded.len(), "Loaded config");
                self.deepupdate(&loaded);
                Ok(())
            }
            (Err(e), LoadPolicy::Lenient) => {
                warn!(path = %path.display(), error = %e, "Ignoring unreadable config");
                Ok(())
            }
            (Err(e), LoadPolicy::Strict) => Err(e),
        }
    }

    /// Sets a dotted key from a textual value parsed as a JSON fragment.
    ///
    /// The value is read as a literal (`5`, `true`, `[1, 2]`, a tagged string)
    /// unless `stringify` is set, in which case it is taken as a string.
    ///
    /// ```
    /// use paramtree::config::Config;
    ///
    /// let mut config = Config::new();
    /// config.set_with_decode("a.b", "5", false).unwrap();
    /// assert_eq!(config.get("a.b").unwrap(), &5);
    ///
    /// config.set_with_decode("a.b", "5", true).unwrap();
    /// assert_eq!(config.get("a.b").unwrap(), &"5");
    /// ```
    pub fn set_with_decode(&mut self, key: &str, value: &str, stringify: bool) -> Result<()> {
        let key = path::expand(self, key)?;
        let key = key.as_str();
        let mut document = String::new();
        let segments: Vec<&str> = key.split('.').collect();
        for segment in &segments {
            document.push('{');
            document.push_str(&serde_json::to_string(segment)?);
            document.push(':');
        }
        if stringify {
            document.push_str(&serde_json::to_string(value)?);
        } else {
            document.push_str(value);
        }
        document.extend(std::iter::repeat_n('}', segments.len()));
        debug!(key, document = %document, "Setting decoded value");
        self.loads(&document)
    }

    /// Applies an assignment of the form `key=value` via [`set_with_decode`](Self::set_with_decode).
    pub fn set_from_string(&mut self, assignment: &str, stringify: bool) -> Result<()> {
        let mut parts = assignment.split('=');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(key), Some(value), None) => self.set_with_decode(key, value, stringify),
            _ => Err(ConfigError::InvalidAssignment {
                input: assignment.to_string(),
            }
            .into()),
        }
    }
}

/// Sorted JSON rendering. Values without a wire form are shown by their
/// canonical stand-in.
impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = sort_json(codec::canonical(&Value::Config(self.clone())));
        let mut buffer = Vec::new();
        write_pretty(&mut buffer, &json).map_err(|_| fmt::Error)?;
        f.write_str(&String::from_utf8_lossy(&buffer))
    }
}

impl Serialize for Config {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_json()
            .map_err(serde::ser::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Config {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let map = Map::<String, Json>::deserialize(deserializer)?;
        Registry::with_global(|registry| Config::from_json(&map, registry))
            .map_err(serde::de::Error::custom)
    }
}
