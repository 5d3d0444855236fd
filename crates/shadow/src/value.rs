//! Type-erased containers produced by the shadow copier.
//!
//! A [`ShadowValue`] has no connection to the type it was copied from, so
//! encoding it only ever yields the plain tagged-field shape: record fields in
//! declared order, mappings with sorted keys, blobs as base64 and identifiers
//! in dashed form.

use std::collections::BTreeMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use uuid::Uuid;

use crate::node::FieldDirective;

/// A structurally equivalent, type-erased copy of a value.
#[derive(Debug, Clone, PartialEq)]
pub enum ShadowValue {
    /// The zero "any": absent pointer or a default record field.
    Null,
    /// Boolean.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Unsigned integer.
    Uint(u64),
    /// Floating point number.
    Float(f64),
    /// String.
    String(String),
    /// Opaque byte sequence.
    Blob(Vec<u8>),
    /// 16-byte identifier.
    Uuid(Uuid),
    /// Array or list with erased element type.
    Array(Vec<ShadowValue>),
    /// String-keyed mapping.
    Map(BTreeMap<String, ShadowValue>),
    /// Anonymous record.
    Record(ShadowRecord),
}

impl ShadowValue {
    /// Short name of the shape, used in diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) | Self::Uint(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Blob(_) => "blob",
            Self::Uuid(_) => "uuid",
            Self::Array(_) => "array",
            Self::Map(_) => "map",
            Self::Record(_) => "record",
        }
    }

    /// Whether this is the zero "any".
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// One field of an anonymous record.
#[derive(Debug, Clone, PartialEq)]
pub struct ShadowField {
    /// Declared name of the source field
    pub ident: &'static str,
    /// Directive copied from the source field
    pub directive: FieldDirective,
    /// Erased value
    pub value: ShadowValue,
}

impl ShadowField {
    /// Create a field.
    #[must_use]
    pub const fn new(ident: &'static str, directive: FieldDirective, value: ShadowValue) -> Self {
        Self {
            ident,
            directive,
            value,
        }
    }

    fn is_emitted(&self) -> bool {
        !self.directive.is_skipped() && !(self.directive.omits_empty() && self.value.is_null())
    }
}

/// An anonymous record: ordered fields with directives and erased values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShadowRecord {
    fields: Vec<ShadowField>,
}

impl ShadowRecord {
    /// Create an empty record.
    #[must_use]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Append a field.
    pub fn push(&mut self, field: ShadowField) {
        self.fields.push(field);
    }

    /// Fields in order.
    #[must_use]
    pub fn fields(&self) -> &[ShadowField] {
        &self.fields
    }

    /// Consume the record, yielding its fields in order.
    #[must_use]
    pub fn into_fields(self) -> Vec<ShadowField> {
        self.fields
    }

    /// Field with the given declared name.
    #[must_use]
    pub fn get(&self, ident: &str) -> Option<&ShadowField> {
        self.fields.iter().find(|field| field.ident == ident)
    }

    /// Number of fields, emitted or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields that appear in the encoded output, in order.
    ///
    /// When two emitted fields share a key, the later one wins. This differs
    /// from Go's `encoding/json`, which drops every field of an ambiguous key
    /// at the same depth.
    pub fn emitted(&self) -> impl Iterator<Item = &ShadowField> {
        let visible: Vec<&ShadowField> = self.fields.iter().filter(|f| f.is_emitted()).collect();
        visible
            .iter()
            .enumerate()
            .filter(|(i, field)| {
                !visible[i + 1..]
                    .iter()
                    .any(|later| later.directive.name() == field.directive.name())
            })
            .map(|(_, field)| *field)
            .collect::<Vec<_>>()
            .into_iter()
    }
}

impl FromIterator<ShadowField> for ShadowRecord {
    fn from_iter<I: IntoIterator<Item = ShadowField>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl Serialize for ShadowRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let emitted: Vec<&ShadowField> = self.emitted().collect();
        let mut map = serializer.serialize_map(Some(emitted.len()))?;
        for field in emitted {
            map.serialize_entry(field.directive.name(), &field.value)?;
        }
        map.end()
    }
}

impl Serialize for ShadowValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Int(i) => serializer.serialize_i64(*i),
            Self::Uint(u) => serializer.serialize_u64(*u),
            Self::Float(f) => serializer.serialize_f64(*f),
            Self::String(s) => serializer.serialize_str(s),
            Self::Blob(bytes) => serializer.serialize_str(&STANDARD.encode(bytes)),
            Self::Uuid(id) => serializer.serialize_str(&id.hyphenated().to_string()),
            Self::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Self::Record(record) => record.serialize(serializer),
        }
    }
}
