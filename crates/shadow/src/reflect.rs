//! The field-descriptor trait and its implementations for std and ecosystem types.

use std::cell::OnceCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;
use std::sync::{Arc, OnceLock};

use bytes::Bytes;
use indexmap::IndexMap;
use serde::Serialize;
use uuid::Uuid;

use crate::node::{Node, Pointee};

/// Describes the serializable shape of a value.
///
/// Implementations list exactly the fields a plain tagged-field encoding of
/// the type should contain, so whatever custom `Serialize` logic the type
/// carries is never consulted by the shadow copier. Record types normally
/// implement this through [`reflect_record!`](crate::reflect_record).
pub trait Reflect {
    /// Classify this value by shape.
    fn reflect(&self) -> Node<'_>;

    /// Name of the concrete type, used in diagnostics.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// The type's own serializer, for values whose output is trusted as-is.
    fn trusted(&self) -> Option<&dyn TrustedSerialize> {
        None
    }
}

/// A serializer trusted to produce the final JSON shape of a value.
pub trait TrustedSerialize {
    /// Encode the value with its own serializer.
    ///
    /// # Errors
    ///
    /// Returns the underlying encoder error.
    fn to_json_vec(&self) -> serde_json::Result<Vec<u8>>;
}

impl<T: Serialize + ?Sized> TrustedSerialize for T {
    fn to_json_vec(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

impl Reflect for bool {
    fn reflect(&self) -> Node<'_> {
        Node::Bool(*self)
    }
}

macro_rules! reflect_signed {
    ($($ty:ty),*) => {
        $(impl Reflect for $ty {
            fn reflect(&self) -> Node<'_> {
                Node::Int(i64::from(*self))
            }
        })*
    };
}

macro_rules! reflect_unsigned {
    ($($ty:ty),*) => {
        $(impl Reflect for $ty {
            fn reflect(&self) -> Node<'_> {
                Node::Uint(u64::from(*self))
            }
        })*
    };
}

reflect_signed!(i8, i16, i32, i64);
reflect_unsigned!(u8, u16, u32, u64);

impl Reflect for isize {
    #[allow(clippy::cast_possible_truncation)]
    fn reflect(&self) -> Node<'_> {
        Node::Int(*self as i64)
    }
}

impl Reflect for usize {
    #[allow(clippy::cast_possible_truncation)]
    fn reflect(&self) -> Node<'_> {
        Node::Uint(*self as u64)
    }
}

impl Reflect for f32 {
    fn reflect(&self) -> Node<'_> {
        Node::Float(f64::from(*self))
    }
}

impl Reflect for f64 {
    fn reflect(&self) -> Node<'_> {
        Node::Float(*self)
    }
}

impl Reflect for String {
    fn reflect(&self) -> Node<'_> {
        Node::Str(self.as_str())
    }
}

impl Reflect for Uuid {
    fn reflect(&self) -> Node<'_> {
        Node::Uuid(self)
    }
}

impl Reflect for Bytes {
    fn reflect(&self) -> Node<'_> {
        Node::Blob(self.as_ref())
    }
}

impl<T: Reflect> Reflect for Option<T> {
    fn reflect(&self) -> Node<'_> {
        Node::Pointer(self.as_ref().map(|value| Pointee::inline(value)))
    }
}

impl<T: Reflect> Reflect for OnceCell<T> {
    fn reflect(&self) -> Node<'_> {
        Node::Pointer(self.get().map(|value| Pointee::inline(value)))
    }
}

impl<T: Reflect> Reflect for OnceLock<T> {
    fn reflect(&self) -> Node<'_> {
        Node::Pointer(self.get().map(|value| Pointee::inline(value)))
    }
}

impl<T: Reflect> Reflect for Box<T> {
    fn reflect(&self) -> Node<'_> {
        Node::Pointer(Some(Pointee::shared(&**self)))
    }
}

impl<T: Reflect> Reflect for Rc<T> {
    fn reflect(&self) -> Node<'_> {
        Node::Pointer(Some(Pointee::shared(&**self)))
    }
}

impl<T: Reflect> Reflect for Arc<T> {
    fn reflect(&self) -> Node<'_> {
        Node::Pointer(Some(Pointee::shared(&**self)))
    }
}

impl<T: Reflect> Reflect for Vec<T> {
    fn reflect(&self) -> Node<'_> {
        Node::List(self.iter().map(|item| item as &dyn Reflect).collect())
    }
}

impl<T: Reflect, const N: usize> Reflect for [T; N] {
    fn reflect(&self) -> Node<'_> {
        Node::Array(self.iter().map(|item| item as &dyn Reflect).collect())
    }
}

impl<K: Reflect, V: Reflect, S> Reflect for HashMap<K, V, S> {
    fn reflect(&self) -> Node<'_> {
        Node::Map(
            self.iter()
                .map(|(key, value)| (key as &dyn Reflect, value as &dyn Reflect))
                .collect(),
        )
    }
}

impl<K: Reflect, V: Reflect> Reflect for BTreeMap<K, V> {
    fn reflect(&self) -> Node<'_> {
        Node::Map(
            self.iter()
                .map(|(key, value)| (key as &dyn Reflect, value as &dyn Reflect))
                .collect(),
        )
    }
}

impl<K: Reflect, V: Reflect, S> Reflect for IndexMap<K, V, S> {
    fn reflect(&self) -> Node<'_> {
        Node::Map(
            self.iter()
                .map(|(key, value)| (key as &dyn Reflect, value as &dyn Reflect))
                .collect(),
        )
    }
}

// `serde_json::Value` plays the role of an untyped "any": `Null` is absent,
// every other variant is a present value wrapping its payload.
impl Reflect for serde_json::Value {
    fn reflect(&self) -> Node<'_> {
        use serde_json::Value;

        let payload: &dyn Reflect = match self {
            Value::Null => return Node::Pointer(None),
            Value::Bool(b) => b,
            Value::Number(n) => n,
            Value::String(s) => s,
            Value::Array(items) => items,
            Value::Object(map) => map,
        };
        Node::Pointer(Some(Pointee::inline(payload)))
    }
}

impl Reflect for serde_json::Number {
    fn reflect(&self) -> Node<'_> {
        if let Some(u) = self.as_u64() {
            Node::Uint(u)
        } else if let Some(i) = self.as_i64() {
            Node::Int(i)
        } else {
            Node::Float(self.as_f64().unwrap_or_default())
        }
    }
}

impl Reflect for serde_json::Map<String, serde_json::Value> {
    fn reflect(&self) -> Node<'_> {
        Node::Map(
            self.iter()
                .map(|(key, value)| (key as &dyn Reflect, value as &dyn Reflect))
                .collect(),
        )
    }
}
