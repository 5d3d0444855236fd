//! Merging envelope fields over a shadow-copied inner resource.

use armgen_shadow::{Field, Reflect, ShadowCopier, ShadowField, ShadowRecord, ShadowValue, is_default};
use indexmap::IndexMap;
use tracing::debug;

use crate::error::{Error, Result};

/// Merge `envelope` fields over the shadow copy of `inner`.
///
/// The result holds the inner record's fields in declared order followed by
/// envelope fields that did not collide, in envelope order. Fields collide by
/// declared name. On a collision the envelope directive is taken, and the
/// envelope value replaces the inner value only when it is not the default.
///
/// # Errors
///
/// Returns [`Error::ShapeViolation`] when `inner` does not copy into a record,
/// and shadow copy errors for either side.
pub fn merge_fields(inner: &dyn Reflect, envelope: Vec<Field<'_>>) -> Result<ShadowRecord> {
    let mut copier = ShadowCopier::new();

    let ShadowValue::Record(record) = copier.copy(inner)? else {
        let found = inner.reflect().kind();
        return Err(Error::shape_violation(inner.type_name(), found));
    };

    let mut merged: IndexMap<&'static str, ShadowField> = record
        .into_fields()
        .into_iter()
        .map(|field| (field.ident, field))
        .collect();

    for field in envelope {
        let ident = field.ident();
        let value = if is_default(field.value()) {
            None
        } else {
            Some(copier.copy(field.value())?)
        };

        if let Some(existing) = merged.get_mut(ident) {
            existing.directive = field.directive().clone();
            if let Some(value) = value {
                debug!(field = ident, "Envelope value overrides inner resource");
                existing.value = value;
            }
        } else {
            let directive = field.directive().clone();
            merged.insert(ident, ShadowField::new(ident, directive, value.unwrap_or(ShadowValue::Null)));
        }
    }

    Ok(merged.into_values().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use armgen_shadow::{FieldDirective, reflect_record};

    struct Identity {
        name: Option<String>,
        location: Option<String>,
        tags: Option<std::collections::BTreeMap<String, String>>,
    }

    reflect_record!(Identity {
        name => "name" (omit_empty),
        location => "location" (omit_empty),
        tags => "tags" (omit_empty),
    });

    fn encode(record: &ShadowRecord) -> String {
        serde_json::to_string(record).unwrap()
    }

    #[test]
    fn test_non_default_envelope_value_wins() {
        let inner = Identity {
            name: Some("inner".into()),
            location: None,
            tags: None,
        };
        let name = String::from("outer");
        let merged = merge_fields(
            &inner,
            vec![Field::new("name", FieldDirective::new("name").omit_empty(), &name)],
        )
        .unwrap();

        assert_eq!(encode(&merged), r#"{"name":"outer"}"#);
    }

    #[test]
    fn test_default_envelope_value_keeps_inner() {
        let inner = Identity {
            name: Some("inner".into()),
            location: Some("eastus".into()),
            tags: None,
        };
        let empty = String::new();
        let merged = merge_fields(
            &inner,
            vec![
                Field::new("name", FieldDirective::new("name").omit_empty(), &empty),
                Field::new("location", FieldDirective::new("location").omit_empty(), &empty),
            ],
        )
        .unwrap();

        assert_eq!(encode(&merged), r#"{"name":"inner","location":"eastus"}"#);
    }

    #[test]
    fn test_collision_takes_envelope_directive() {
        let inner = Identity {
            name: None,
            location: None,
            tags: None,
        };
        let empty = String::new();
        // envelope field without omit_empty makes the absent inner value emit null
        let merged = merge_fields(
            &inner,
            vec![Field::new("name", FieldDirective::new("name"), &empty)],
        )
        .unwrap();

        assert_eq!(encode(&merged), r#"{"name":null}"#);
    }

    #[test]
    fn test_new_fields_append_in_envelope_order() {
        let inner = Identity {
            name: Some("a".into()),
            location: None,
            tags: None,
        };
        let api_version = String::from("2019-07-01");
        let kind = String::from("Microsoft.Network/virtualNetworks");
        let merged = merge_fields(
            &inner,
            vec![
                Field::new("r#type", FieldDirective::new("type"), &kind),
                Field::new("api_version", FieldDirective::new("apiVersion"), &api_version),
            ],
        )
        .unwrap();

        let idents: Vec<&str> = merged.fields().iter().map(|f| f.ident).collect();
        assert_eq!(idents, vec!["name", "location", "tags", "type", "api_version"]);
        assert_eq!(
            encode(&merged),
            r#"{"name":"a","type":"Microsoft.Network/virtualNetworks","apiVersion":"2019-07-01"}"#
        );
    }

    #[test]
    fn test_non_record_inner_is_shape_violation() {
        let inner = String::from("not a record");
        let err = merge_fields(&inner, Vec::new()).unwrap_err();
        assert!(matches!(
            err,
            Error::ShapeViolation { found, .. } if found == "string"
        ));
    }

    #[test]
    fn test_absent_inner_pointer_is_shape_violation() {
        let inner: Option<Identity> = None;
        let err = merge_fields(&inner, Vec::new()).unwrap_err();
        assert!(matches!(err, Error::ShapeViolation { found, .. } if found == "pointer"));
    }
}
