//! Typed codec between [`Value`]s and a JSON-compatible wire format.
//!
//! Primitives, sequences and mappings project structurally. Everything JSON
//! cannot express natively travels as a tagged string (see [`tag`]):
//!
//! | value | wire form |
//! |---|---|
//! | tuple | `__tuple__(<literal repr>)` |
//! | type reference | `__type__(module.Name)` |
//! | function reference | `__function__(module.name)` |
//! | module reference | `__module__(name)` |
//! | integer mapping key | `__int__(n)` |
//! | float mapping key | `__float__(x)` |
//!
//! Decoding consults every string's tag. Untagged strings pass through
//! unchanged; references resolve against a [`Registry`].
//!
//! ```
//! use paramtree::codec::{self, Decoder, Registry};
//! use paramtree::config::{Config, Value};
//!
//! let mut registry = Registry::new();
//! let linear = registry.register_type("models", "Linear");
//!
//! let mut config = Config::new();
//! config.insert("model", linear);
//! config.insert("shape", Value::Tuple(vec![Value::Int(3), Value::Int(4)]));
//!
//! let json = codec::encode(&Value::Config(config.clone())).unwrap();
//! assert_eq!(json["model"], "__type__(models.Linear)");
//! assert_eq!(json["shape"], "__tuple__((3, 4))");
//!
//! let decoded = Decoder::new(&registry).decode(&json).unwrap();
//! assert_eq!(decoded, Value::Config(config));
//! ```

pub mod errors;
pub mod literal;
pub mod registry;
pub mod tag;

use serde_json::{Map, Number, Value as Json};

pub use errors::CodecError;
pub use registry::{BoxError, CtorArgs, FunctionRef, Instance, ModuleRef, Object, Registry, TypeRef};
use tag::{Tag, TagKind};

use crate::config::{Config, Key, Value};

/// Encodes a value into its wire form.
///
/// Fails for instances and non-finite floats, which have no JSON-safe form.
pub fn encode(value: &Value) -> Result<Json, CodecError> {
    Ok(match value {
        Value::Null => Json::Null,
        Value::Bool(b) => Json::Bool(*b),
        Value::Int(n) => Json::Number((*n).into()),
        Value::Float(f) => Json::Number(Number::from_f64(*f).ok_or_else(|| {
            CodecError::Unrepresentable {
                what: format!("float {f}"),
                reason: "JSON has no non-finite numbers".into(),
            }
        })?),
        Value::Text(s) => Json::String(s.clone()),
        Value::List(items) => Json::Array(items.iter().map(encode).collect::<Result<_, _>>()?),
        Value::Tuple(_) => Json::String(tag::format(TagKind::Tuple, literal::repr(value)?)),
        Value::Config(config) => {
            let mut map = Map::with_capacity(config.len());
            for (key, value) in config.iter() {
                map.insert(encode_key(key), encode(value)?);
            }
            Json::Object(map)
        }
        Value::Type(t) => Json::String(tag::format(TagKind::Type, t.qualified_name())),
        Value::Function(f) => Json::String(tag::format(TagKind::Function, f.qualified_name())),
        Value::Module(m) => Json::String(tag::format(TagKind::Module, m.name())),
        Value::Instance(instance) => {
            return Err(CodecError::Unrepresentable {
                what: format!("instance of {}", instance.type_ref().qualified_name()),
                reason: "constructed objects cannot be serialized".into(),
            });
        }
    })
}

/// Encodes a mapping key. Text keys pass through unchanged.
pub fn encode_key(key: &Key) -> String {
    match key {
        Key::Text(s) => s.clone(),
        Key::Int(n) => tag::format(TagKind::Int, n),
        Key::Float(f) => tag::format(TagKind::Float, format!("{f:?}")),
        Key::Type(t) => tag::format(TagKind::Type, t.qualified_name()),
        Key::Function(f) => tag::format(TagKind::Function, f.qualified_name()),
        Key::Module(m) => tag::format(TagKind::Module, m.name()),
    }
}

/// Canonical projection used to compare values.
///
/// Behaves like [`encode`] but never fails: values without a wire form get
/// a stable textual stand-in so that they still compare by identity.
pub fn canonical(value: &Value) -> Json {
    match value {
        Value::Float(f) if !f.is_finite() => Json::String(tag::format(TagKind::Float, format!("{f:?}"))),
        Value::List(items) => Json::Array(items.iter().map(canonical).collect()),
        Value::Tuple(items) => match literal::repr(value) {
            Ok(repr) => Json::String(tag::format(TagKind::Tuple, repr)),
            Err(_) => Json::String(tag::format(
                TagKind::Tuple,
                Json::Array(items.iter().map(canonical).collect()),
            )),
        },
        Value::Config(config) => Json::Object(
            config
                .iter()
                .map(|(key, value)| (encode_key(key), canonical(value)))
                .collect(),
        ),
        Value::Instance(instance) => Json::String(format!(
            "__instance__({}@{:#x})",
            instance.type_ref().qualified_name(),
            instance.address()
        )),
        other => encode(other).unwrap_or(Json::Null),
    }
}

/// Decodes wire values, resolving references against a registry.
#[derive(Debug, Clone, Copy)]
pub struct Decoder<'r> {
    registry: &'r Registry,
}

impl<'r> Decoder<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    /// Decodes a JSON value recursively.
    pub fn decode(&self, json: &Json) -> Result<Value, CodecError> {
        Ok(match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(*b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Json::String(s) => self.decode_str(s)?,
            Json::Array(items) => Value::List(
                items
                    .iter()
                    .map(|item| self.decode(item))
                    .collect::<Result<_, _>>()?,
            ),
            Json::Object(map) => Value::Config(self.decode_object(map)?),
        })
    }

    /// Decodes a JSON object into a config.
    pub fn decode_object(&self, map: &Map<String, Json>) -> Result<Config, CodecError> {
        let mut config = Config::new();
        for (key, value) in map {
            config.insert(self.decode_key(key)?, self.decode(value)?);
        }
        Ok(config)
    }

    /// Decodes a single string, honouring its tag if it has one.
    pub fn decode_str(&self, s: &str) -> Result<Value, CodecError> {
        let Some(tag) = Tag::parse(s) else {
            return Ok(Value::Text(s.to_string()));
        };
        Ok(match tag.kind {
            TagKind::Int => Value::Int(parse_int(tag.payload)?),
            TagKind::Float => Value::Float(parse_float(tag.payload)?),
            TagKind::Tuple => Value::Tuple(literal::parse_tuple(tag.payload)?),
            TagKind::Type => Value::Type(self.registry.resolve_type(qualified(tag)?)?),
            TagKind::Function => {
                Value::Function(self.registry.resolve_function(qualified(tag)?)?)
            }
            TagKind::Module => Value::Module(self.registry.resolve_module(tag.payload)?),
        })
    }

    /// Decodes a mapping key.
    pub fn decode_key(&self, key: &str) -> Result<Key, CodecError> {
        match self.decode_str(key)? {
            Value::Text(s) => Ok(Key::Text(s)),
            Value::Int(n) => Ok(Key::Int(n)),
            Value::Float(f) => Ok(Key::Float(f)),
            Value::Type(t) => Ok(Key::Type(t)),
            Value::Function(f) => Ok(Key::Function(f)),
            Value::Module(m) => Ok(Key::Module(m)),
            _ => Err(CodecError::UnsupportedKey {
                key: key.to_string(),
            }),
        }
    }
}

fn parse_int(payload: &str) -> Result<i64, CodecError> {
    payload
        .trim()
        .parse()
        .map_err(|e: std::num::ParseIntError| CodecError::InvalidTag {
            tag: TagKind::Int.name(),
            payload: payload.to_string(),
            reason: e.to_string(),
        })
}

fn parse_float(payload: &str) -> Result<f64, CodecError> {
    payload
        .trim()
        .parse()
        .map_err(|e: std::num::ParseFloatError| CodecError::InvalidTag {
            tag: TagKind::Float.name(),
            payload: payload.to_string(),
            reason: e.to_string(),
        })
}

fn qualified<'a>(tag: Tag<'a>) -> Result<&'a str, CodecError> {
    tag::split_qualified(tag.payload)
        .map(|_| tag.payload)
        .ok_or_else(|| CodecError::InvalidTag {
            tag: tag.kind.name(),
            payload: tag.payload.to_string(),
            reason: "expected a qualified 'module.name'".into(),
        })
}
