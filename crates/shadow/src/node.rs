//! Borrowed shape views produced by [`Reflect`](crate::Reflect).
//!
//! A [`Node`] classifies one value by shape without copying it. Records carry
//! their fields in declared order together with each field's serialization
//! directive, which is everything the shadow copier needs to rebuild the value
//! without going through the type's own `Serialize` impl.

use std::borrow::Cow;

use uuid::Uuid;

use crate::reflect::Reflect;

/// Serialization directive attached to a record field.
///
/// Mirrors the per-field knobs a derived serializer would honour: the emitted
/// key, whether a default value is dropped, and whether the field is never
/// emitted at all. A field may also be marked as a blob so a byte sequence
/// stored as `Vec<u8>` or `[u8; N]` encodes as base64.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDirective {
    name: Cow<'static, str>,
    omit_empty: bool,
    skip: bool,
    blob: bool,
}

impl FieldDirective {
    /// Directive emitting the field under `name`.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name: Cow::Borrowed(name),
            omit_empty: false,
            skip: false,
            blob: false,
        }
    }

    /// Directive with a key computed at runtime.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Cow::Owned(name.into()),
            omit_empty: false,
            skip: false,
            blob: false,
        }
    }

    /// Drop the field from the output when its value is the default.
    #[must_use]
    pub fn omit_empty(mut self) -> Self {
        self.omit_empty = true;
        self
    }

    /// Never emit the field.
    #[must_use]
    pub fn skip(mut self) -> Self {
        self.skip = true;
        self
    }

    /// Encode a byte sequence field as base64.
    #[must_use]
    pub fn blob(mut self) -> Self {
        self.blob = true;
        self
    }

    /// Emitted key.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether a default value is dropped.
    #[must_use]
    pub const fn omits_empty(&self) -> bool {
        self.omit_empty
    }

    /// Whether the field is never emitted.
    #[must_use]
    pub const fn is_skipped(&self) -> bool {
        self.skip
    }

    /// Whether a byte sequence value encodes as base64.
    #[must_use]
    pub const fn is_blob(&self) -> bool {
        self.blob
    }
}

/// One exported field of a record.
pub struct Field<'a> {
    ident: &'static str,
    directive: FieldDirective,
    value: &'a dyn Reflect,
}

impl<'a> Field<'a> {
    /// Describe a field.
    ///
    /// `ident` is the declared field name; a raw-identifier prefix (`r#`) is
    /// stripped so `r#type` and `type` name the same field.
    #[must_use]
    pub fn new(ident: &'static str, directive: FieldDirective, value: &'a dyn Reflect) -> Self {
        Self {
            ident: ident.strip_prefix("r#").unwrap_or(ident),
            directive,
            value,
        }
    }

    /// Declared field name.
    #[must_use]
    pub const fn ident(&self) -> &'static str {
        self.ident
    }

    /// Serialization directive.
    #[must_use]
    pub const fn directive(&self) -> &FieldDirective {
        &self.directive
    }

    /// Field value.
    #[must_use]
    pub const fn value(&self) -> &'a dyn Reflect {
        self.value
    }

    pub(crate) fn into_parts(self) -> (&'static str, FieldDirective, &'a dyn Reflect) {
        (self.ident, self.directive, self.value)
    }
}

/// A record (struct) view: type name plus exported fields in declared order.
pub struct Record<'a> {
    type_name: &'static str,
    fields: Vec<Field<'a>>,
}

impl<'a> Record<'a> {
    /// Create a record view.
    #[must_use]
    pub fn new(type_name: &'static str, fields: Vec<Field<'a>>) -> Self {
        Self { type_name, fields }
    }

    /// Name of the described type.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Fields in declared order.
    #[must_use]
    pub fn fields(&self) -> &[Field<'a>] {
        &self.fields
    }

    /// Consume the view, yielding its fields in declared order.
    #[must_use]
    pub fn into_fields(self) -> Vec<Field<'a>> {
        self.fields
    }
}

/// The target of a pointer-like value.
///
/// Heap pointers (`Box`, `Rc`, `Arc`) carry the address of their pointee so a
/// value that reaches itself again can be reported instead of recursing
/// forever. Inline indirections (`Option`, `OnceCell`) carry none.
#[derive(Clone, Copy)]
pub struct Pointee<'a> {
    value: &'a dyn Reflect,
    identity: Option<usize>,
}

impl<'a> Pointee<'a> {
    /// A pointee stored inline in its container.
    #[must_use]
    pub fn inline(value: &'a dyn Reflect) -> Self {
        Self {
            value,
            identity: None,
        }
    }

    /// A pointee living behind a heap pointer, identified by its address.
    ///
    /// Zero-sized pointees share dangling addresses and get no identity.
    #[must_use]
    pub fn shared<T: Reflect>(value: &'a T) -> Self {
        let identity = (std::mem::size_of::<T>() != 0).then(|| std::ptr::from_ref(value).addr());
        Self { value, identity }
    }

    /// The referenced value.
    #[must_use]
    pub const fn value(&self) -> &'a dyn Reflect {
        self.value
    }

    /// Address identity, if the pointee lives behind a heap pointer.
    #[must_use]
    pub const fn identity(&self) -> Option<usize> {
        self.identity
    }
}

/// Shape classification of a single value.
pub enum Node<'a> {
    /// Boolean.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Unsigned integer.
    Uint(u64),
    /// Floating point number.
    Float(f64),
    /// String.
    Str(&'a str),
    /// Opaque byte sequence, encoded as base64.
    Blob(&'a [u8]),
    /// 16-byte identifier, encoded in canonical dashed form.
    Uuid(&'a Uuid),
    /// Fixed-size array; default only when every element is default.
    Array(Vec<&'a dyn Reflect>),
    /// Growable list; default when empty.
    List(Vec<&'a dyn Reflect>),
    /// Reference, pointer or optional; `None` is absent.
    Pointer(Option<Pointee<'a>>),
    /// Mapping as key/value pairs; keys must reflect as [`Node::Str`].
    Map(Vec<(&'a dyn Reflect, &'a dyn Reflect)>),
    /// Record with named fields.
    Record(Record<'a>),
}

impl Node<'_> {
    /// Short name of the shape, used in diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) | Self::Uint(_) => "integer",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
            Self::Blob(_) => "blob",
            Self::Uuid(_) => "uuid",
            Self::Array(_) => "array",
            Self::List(_) => "list",
            Self::Pointer(_) => "pointer",
            Self::Map(_) => "map",
            Self::Record(_) => "record",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directive_builders() {
        let directive = FieldDirective::new("apiVersion").omit_empty();
        assert_eq!(directive.name(), "apiVersion");
        assert!(directive.omits_empty());
        assert!(!directive.is_skipped());

        let skipped = FieldDirective::named(String::from("secret")).skip();
        assert_eq!(skipped.name(), "secret");
        assert!(skipped.is_skipped());
        assert!(!skipped.is_blob());

        let blob = FieldDirective::new("certificate").omit_empty().blob();
        assert!(blob.is_blob());
        assert!(blob.omits_empty());
    }

    #[test]
    fn test_field_strips_raw_identifier_prefix() {
        let value = String::from("Microsoft.Network/virtualNetworks");
        let field = Field::new("r#type", FieldDirective::new("type"), &value);
        assert_eq!(field.ident(), "type");
    }

    #[test]
    fn test_shared_pointee_identity_tracks_address() {
        let boxed = Box::new(42_u32);
        let first = Pointee::shared(&*boxed);
        let second = Pointee::shared(&*boxed);
        assert!(first.identity().is_some());
        assert_eq!(first.identity(), second.identity());
        assert!(Pointee::inline(&*boxed).identity().is_none());
    }

    #[test]
    fn test_zero_sized_pointee_has_no_identity() {
        #[derive(Debug)]
        struct Marker;
        impl Reflect for Marker {
            fn reflect(&self) -> Node<'_> {
                Node::Record(Record::new("Marker", Vec::new()))
            }
        }

        let marker = Box::new(Marker);
        assert!(Pointee::shared(&*marker).identity().is_none());
    }
}
