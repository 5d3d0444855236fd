//! Default-value detection.

use crate::node::Node;
use crate::reflect::Reflect;

/// Whether `value` is the default for its type.
///
/// `false`, zero, the empty string, an empty blob, the nil UUID, empty lists
/// and maps, and absent pointers are default. Fixed-size arrays and records
/// are default when every element or field is. Present pointers are never
/// default, whatever they point at, so this never follows a pointer and always
/// terminates.
#[must_use]
pub fn is_default(value: &dyn Reflect) -> bool {
    match value.reflect() {
        Node::Bool(b) => !b,
        Node::Int(i) => i == 0,
        Node::Uint(u) => u == 0,
        // negative zero is not the default
        Node::Float(f) => f.to_bits() == 0,
        Node::Str(s) => s.is_empty(),
        Node::Blob(b) => b.is_empty(),
        Node::Uuid(u) => u.is_nil(),
        Node::Array(items) => items.into_iter().all(is_default),
        Node::List(items) => items.is_empty(),
        Node::Map(entries) => entries.is_empty(),
        Node::Pointer(pointee) => pointee.is_none(),
        Node::Record(record) => record.fields().iter().all(|field| is_default(field.value())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflect_record;
    use bytes::Bytes;
    use serde_json::json;
    use std::collections::HashMap;
    use uuid::Uuid;

    struct Profile {
        name: String,
        count: u32,
        zones: Option<Vec<String>>,
    }

    reflect_record!(Profile {
        name => "name" (omit_empty),
        count => "count" (omit_empty),
        zones => "zones" (omit_empty),
    });

    #[test]
    fn test_scalars() {
        assert!(is_default(&false));
        assert!(!is_default(&true));
        assert!(is_default(&0_i64));
        assert!(!is_default(&-1_i64));
        assert!(is_default(&0.0_f64));
        assert!(!is_default(&-0.0_f64));
        assert!(is_default(&String::new()));
        assert!(!is_default(&String::from("eastus")));
    }

    #[test]
    fn test_leaves() {
        assert!(is_default(&Bytes::new()));
        assert!(!is_default(&Bytes::from_static(b"\x00")));
        assert!(is_default(&Uuid::nil()));
        assert!(!is_default(&Uuid::from_u128(1)));
    }

    #[test]
    fn test_containers() {
        assert!(is_default(&Vec::<u8>::new()));
        assert!(!is_default(&vec![0_u8]));
        assert!(is_default(&[0_u8; 4]));
        assert!(!is_default(&[0_u8, 0, 1, 0]));
        assert!(is_default(&HashMap::<String, u8>::new()));
        assert!(is_default(&None::<String>));
        assert!(!is_default(&Some(String::new())));
    }

    #[test]
    fn test_records_are_default_when_all_fields_are() {
        let empty = Profile {
            name: String::new(),
            count: 0,
            zones: None,
        };
        assert!(is_default(&empty));

        let with_empty_zones = Profile {
            zones: Some(Vec::new()),
            ..empty
        };
        assert!(!is_default(&with_empty_zones));
    }

    #[test]
    fn test_json_any() {
        assert!(is_default(&json!(null)));
        assert!(!is_default(&json!(false)));
        assert!(!is_default(&json!("")));
    }
}
