//! Identity types for resources.
//!
//! Every resource type exposes exactly one identifier representation, chosen
//! at registration time. On the wire identifiers are always strings; inside
//! the service layer they are strongly typed through [`ResourceKey`].

use std::fmt;
use std::hash::Hash;

use uuid::Uuid;

/// The identifier representation declared by a resource type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IdKind {
    Int16,
    Int32,
    Int64,
    Guid,
    Text,
}

impl IdKind {
    /// True when the store can allocate identifiers of this kind from a counter.
    pub fn is_sequential(&self) -> bool {
        matches!(self, IdKind::Int16 | IdKind::Int32 | IdKind::Int64)
    }

    /// Check whether `raw` is a well-formed identifier of this kind.
    pub fn accepts(&self, raw: &str) -> bool {
        self.canonicalize(raw).is_some()
    }

    /// The stored form of `raw`, matching `ResourceKey::to_key_string` of the
    /// parsed key. `None` when `raw` is not an identifier of this kind.
    pub fn canonicalize(&self, raw: &str) -> Option<String> {
        match self {
            IdKind::Int16 => i16::parse_key(raw).map(|k| k.to_key_string()),
            IdKind::Int32 => i32::parse_key(raw).map(|k| k.to_key_string()),
            IdKind::Int64 => i64::parse_key(raw).map(|k| k.to_key_string()),
            IdKind::Guid => Uuid::parse_key(raw).map(|k| k.to_key_string()),
            IdKind::Text => String::parse_key(raw),
        }
    }

    /// Produce the identifier following `counter` for sequential kinds, or a
    /// fresh random identifier otherwise. Returns `None` on overflow.
    pub fn allocate(&self, counter: i64) -> Option<String> {
        match self {
            IdKind::Int16 => i16::try_from(counter).ok().map(|v| v.to_string()),
            IdKind::Int32 => i32::try_from(counter).ok().map(|v| v.to_string()),
            IdKind::Int64 => Some(counter.to_string()),
            IdKind::Guid => Some(Uuid::new_v4().to_string()),
            IdKind::Text => Some(Uuid::new_v4().simple().to_string()),
        }
    }
}

impl fmt::Display for IdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IdKind::Int16 => "int16",
            IdKind::Int32 => "int32",
            IdKind::Int64 => "int64",
            IdKind::Guid => "guid",
            IdKind::Text => "text",
        };
        f.write_str(name)
    }
}

/// A strongly-typed resource identifier.
///
/// Conversions to and from the wire string form must round-trip:
/// `K::parse_key(&k.to_key_string()) == Some(k)`.
pub trait ResourceKey:
    Clone + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    /// The identifier kind this key type represents.
    const KIND: IdKind;

    /// Parse the wire form.
    fn parse_key(raw: &str) -> Option<Self>;

    /// Render the wire form.
    fn to_key_string(&self) -> String {
        self.to_string()
    }
}

impl ResourceKey for i16 {
    const KIND: IdKind = IdKind::Int16;

    fn parse_key(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }
}

impl ResourceKey for i32 {
    const KIND: IdKind = IdKind::Int32;

    fn parse_key(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }
}

impl ResourceKey for i64 {
    const KIND: IdKind = IdKind::Int64;

    fn parse_key(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }
}

impl ResourceKey for Uuid {
    const KIND: IdKind = IdKind::Guid;

    fn parse_key(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw).ok()
    }
}

impl ResourceKey for String {
    const KIND: IdKind = IdKind::Text;

    fn parse_key(raw: &str) -> Option<Self> {
        if raw.is_empty() {
            None
        } else {
            Some(raw.to_string())
        }
    }
}

/// The identifier type used by most resources.
pub type DefaultKey = i32;
