//! The shadow-copy engine.
//!
//! Rebuilds any [`Reflect`] value out of [`ShadowValue`] containers. Record
//! fields keep their declared order and directives but lose their types, and a
//! field whose source value is default is left as [`ShadowValue::Null`] so an
//! `omit_empty` directive drops it at encode time.

use std::collections::{BTreeMap, HashSet};

use tracing::{trace, warn};

use crate::error::{Error, Result};
use crate::node::{Node, Pointee, Record};
use crate::reflect::Reflect;
use crate::value::{ShadowField, ShadowRecord, ShadowValue};
use crate::zero::is_default;

/// Build a type-erased copy of `value`.
///
/// # Errors
///
/// Returns [`Error::UnsupportedMappingKey`] for mappings whose keys are not
/// strings and [`Error::CycleDetected`] when a value reaches itself through a
/// heap pointer.
pub fn shadow_copy(value: &dyn Reflect) -> Result<ShadowValue> {
    ShadowCopier::new().copy(value)
}

/// Recursive copier holding the pointer identities on the active path.
#[derive(Debug, Default)]
pub struct ShadowCopier {
    active: HashSet<usize>,
}

impl ShadowCopier {
    /// Create a copier with an empty path.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy one value.
    ///
    /// # Errors
    ///
    /// See [`shadow_copy`].
    pub fn copy(&mut self, value: &dyn Reflect) -> Result<ShadowValue> {
        Ok(match value.reflect() {
            Node::Bool(b) => ShadowValue::Bool(b),
            Node::Int(i) => ShadowValue::Int(i),
            Node::Uint(u) => ShadowValue::Uint(u),
            Node::Float(f) => ShadowValue::Float(f),
            Node::Str(s) => ShadowValue::String(s.to_owned()),
            Node::Blob(bytes) => ShadowValue::Blob(bytes.to_vec()),
            Node::Uuid(id) => ShadowValue::Uuid(*id),
            Node::Array(items) | Node::List(items) => ShadowValue::Array(
                items
                    .into_iter()
                    .map(|item| self.copy(item))
                    .collect::<Result<_>>()?,
            ),
            Node::Pointer(None) => ShadowValue::Null,
            Node::Pointer(Some(pointee)) => self.copy_pointee(pointee)?,
            Node::Map(entries) => self.copy_map(value.type_name(), entries)?,
            Node::Record(record) => ShadowValue::Record(self.copy_record(record)?),
        })
    }

    /// Copy a record view into an anonymous record.
    ///
    /// # Errors
    ///
    /// See [`shadow_copy`].
    pub fn copy_record(&mut self, record: Record<'_>) -> Result<ShadowRecord> {
        trace!(
            type_name = record.type_name(),
            fields = record.fields().len(),
            "Shadow copying record"
        );
        record
            .into_fields()
            .into_iter()
            .map(|field| {
                let (ident, directive, value) = field.into_parts();
                // a default value holds no present pointers, so skipping it
                // cannot hide a cycle
                let copied = if is_default(value) {
                    ShadowValue::Null
                } else if let Some(bytes) = directive.is_blob().then(|| blob_bytes(value)).flatten() {
                    ShadowValue::Blob(bytes)
                } else {
                    self.copy(value)?
                };
                Ok(ShadowField::new(ident, directive, copied))
            })
            .collect()
    }

    fn copy_pointee(&mut self, pointee: Pointee<'_>) -> Result<ShadowValue> {
        let Some(identity) = pointee.identity() else {
            return self.copy(pointee.value());
        };
        if !self.active.insert(identity) {
            let type_name = pointee.value().type_name();
            warn!(type_name, "Value cycle detected during shadow copy");
            return Err(Error::cycle_detected(type_name));
        }
        let copied = self.copy(pointee.value());
        self.active.remove(&identity);
        copied
    }

    fn copy_map(
        &mut self,
        type_name: &'static str,
        entries: Vec<(&dyn Reflect, &dyn Reflect)>,
    ) -> Result<ShadowValue> {
        let mut map = BTreeMap::new();
        for (key, value) in entries {
            let Node::Str(key_str) = key.reflect() else {
                return Err(Error::unsupported_mapping_key(type_name, key.type_name()));
            };
            map.insert(key_str.to_owned(), self.copy(value)?);
        }
        Ok(ShadowValue::Map(map))
    }
}

/// Bytes of a value holding a byte sequence, looking through pointers.
///
/// Lists and arrays qualify only when every element is an unsigned integer
/// that fits in a byte.
fn blob_bytes(value: &dyn Reflect) -> Option<Vec<u8>> {
    match value.reflect() {
        Node::Blob(bytes) => Some(bytes.to_vec()),
        Node::Array(items) | Node::List(items) => items
            .into_iter()
            .map(|item| match item.reflect() {
                Node::Uint(u) => u8::try_from(u).ok(),
                _ => None,
            })
            .collect(),
        Node::Pointer(Some(pointee)) => blob_bytes(pointee.value()),
        _ => None,
    }
}
