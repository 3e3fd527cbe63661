//! The tagged-string grammar used on the wire.
//!
//! Every special value is written as `__<tag>__(<payload>)`. A string only
//! counts as tagged when it carries both the full prefix and the closing
//! parenthesis; anything else is an ordinary string.

use std::fmt;

/// The six tags understood by the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    Int,
    Float,
    Tuple,
    Type,
    Function,
    Module,
}

impl TagKind {
    const ALL: [TagKind; 6] = [
        TagKind::Type,
        TagKind::Function,
        TagKind::Module,
        TagKind::Int,
        TagKind::Float,
        TagKind::Tuple,
    ];

    /// The bare tag name, e.g. `"int"`
    pub fn name(self) -> &'static str {
        match self {
            TagKind::Int => "int",
            TagKind::Float => "float",
            TagKind::Tuple => "tuple",
            TagKind::Type => "type",
            TagKind::Function => "function",
            TagKind::Module => "module",
        }
    }

    fn prefix(self) -> &'static str {
        match self {
            TagKind::Int => "__int__(",
            TagKind::Float => "__float__(",
            TagKind::Tuple => "__tuple__(",
            TagKind::Type => "__type__(",
            TagKind::Function => "__function__(",
            TagKind::Module => "__module__(",
        }
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A parsed tagged string, borrowing its payload from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag<'a> {
    pub kind: TagKind,
    pub payload: &'a str,
}

impl<'a> Tag<'a> {
    /// Recognises a tagged string, returning `None` for ordinary strings.
    ///
    /// ```
    /// use paramtree::codec::tag::{Tag, TagKind};
    ///
    /// let tag = Tag::parse("__int__(42)").unwrap();
    /// assert_eq!(tag.kind, TagKind::Int);
    /// assert_eq!(tag.payload, "42");
    ///
    /// assert!(Tag::parse("__int__42").is_none());
    /// assert!(Tag::parse("plain").is_none());
    /// ```
    pub fn parse(input: &'a str) -> Option<Self> {
        if !input.starts_with("__") {
            return None;
        }
        TagKind::ALL.iter().find_map(|&kind| {
            input
                .strip_prefix(kind.prefix())
                .and_then(|rest| rest.strip_suffix(')'))
                .map(|payload| Tag { kind, payload })
        })
    }
}

/// Formats a payload under the given tag.
pub fn format(kind: TagKind, payload: impl fmt::Display) -> String {
    format!("{}{payload})", kind.prefix())
}

/// Splits `module.name` at its last dot.
///
/// Returns `None` when there is no dot or either side is empty.
pub fn split_qualified(qualified: &str) -> Option<(&str, &str)> {
    let (module, name) = qualified.rsplit_once('.')?;
    if module.is_empty() || name.is_empty() {
        None
    } else {
        Some((module, name))
    }
}
