//! Property-based tests for envelope rendering.
//!
//! These tests verify the behavioral contracts of envelope serialization:
//! - Idempotence: rendering the same envelope twice yields identical bytes
//! - Collision precedence: a non-default envelope value always wins
//! - Passthrough injection: `dependsOn` appears iff the envelope lists any

use armgen_shadow::reflect_record;
use armgen_template::{InnerResource, ResourceEnvelope};
use proptest::prelude::*;
use serde_json::Value;

// =============================================================================
// Fixtures and strategies
// =============================================================================

struct Identity {
    name: String,
    location: String,
    tenant_id: String,
}

reflect_record!(Identity {
    name => "name" (omit_empty),
    location => "location" (omit_empty),
    tenant_id => "tenantId" (omit_empty),
});

#[derive(serde::Serialize)]
struct Lock {
    name: String,
    level: String,
}

reflect_record!(trusted Lock {
    name => "name",
    level => "level",
});

/// Possibly-empty resource-ish strings
fn text_strategy() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), "[a-z][a-z0-9-]{0,12}".prop_map(String::from)]
}

fn dependency_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z]{1,8}".prop_map(String::from), 0..4)
}

fn decode(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).unwrap()
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn prop_rendering_is_idempotent(
        name in text_strategy(),
        location in text_strategy(),
        tenant_id in text_strategy(),
        outer_name in text_strategy(),
        depends_on in dependency_strategy(),
    ) {
        let mut envelope = ResourceEnvelope::new(InnerResource::legacy(Identity { name, location, tenant_id }))
            .with_name(outer_name)
            .with_api_version("2018-11-30");
        envelope.depends_on = depends_on;

        let first = envelope.to_json().unwrap();
        let second = envelope.to_json().unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_collision_precedence(
        inner_name in text_strategy(),
        outer_name in text_strategy(),
        location in text_strategy(),
    ) {
        let envelope = ResourceEnvelope::new(InnerResource::legacy(Identity {
            name: inner_name.clone(),
            location: location.clone(),
            tenant_id: String::new(),
        }))
        .with_name(outer_name.clone());

        let value = decode(&envelope.to_json().unwrap());
        let expected = if outer_name.is_empty() { inner_name } else { outer_name };
        if expected.is_empty() {
            prop_assert!(value.get("name").is_none());
        } else {
            prop_assert_eq!(value["name"].as_str(), Some(expected.as_str()));
        }
        prop_assert_eq!(value.get("location").is_some(), !location.is_empty());
        prop_assert!(value.get("tenantId").is_none());
    }

    #[test]
    fn prop_passthrough_injection(
        name in "[a-z]{1,8}",
        api_version in "20[0-9]{2}-[01][0-9]-[0-3][0-9]",
        depends_on in dependency_strategy(),
    ) {
        let mut envelope = ResourceEnvelope::new(InnerResource::self_describing(Lock {
            name: name.clone(),
            level: "CanNotDelete".into(),
        }))
        .with_api_version(api_version.clone());
        envelope.depends_on = depends_on.clone();

        let value = decode(&envelope.to_json().unwrap());
        prop_assert_eq!(value["apiVersion"].as_str(), Some(api_version.as_str()));
        prop_assert_eq!(value.get("dependsOn").is_some(), !depends_on.is_empty());
        prop_assert_eq!(value["name"].as_str(), Some(name.as_str()));
        prop_assert_eq!(value["level"].as_str(), Some("CanNotDelete"));
    }
}
