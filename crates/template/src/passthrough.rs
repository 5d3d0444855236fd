//! Splicing envelope keys into the output of a trusted serializer.

use armgen_shadow::Reflect;
use serde_json::{Map, Value};
use tracing::{trace, warn};

use crate::error::{Error, Result};

/// Serialize a self-describing resource and splice envelope keys into it.
///
/// `apiVersion` is always set, overwriting any key the resource produced.
/// `dependsOn` is set only when `depends_on` is non-empty. Every other key is
/// left exactly as the resource's serializer produced it.
///
/// # Errors
///
/// Returns [`Error::SelfDescribingContractViolation`] when the resource has no
/// trusted serializer, [`Error::Json`] when its serializer fails, and
/// [`Error::ShapeViolation`] when its output is not a JSON object.
pub fn splice(resource: &dyn Reflect, api_version: &str, depends_on: &[String]) -> Result<Map<String, Value>> {
    let Some(trusted) = resource.trusted() else {
        warn!(type_name = resource.type_name(), "Self-describing resource has no trusted serializer");
        return Err(Error::contract_violation(resource.type_name()));
    };

    let encoded = trusted.to_json_vec()?;
    let mut document = match serde_json::from_slice::<Value>(&encoded)? {
        Value::Object(document) => document,
        other => {
            return Err(Error::shape_violation(resource.type_name(), json_kind(&other)));
        }
    };
    trace!(keys = document.len(), "Decoded trusted resource output");

    document.insert("apiVersion".to_string(), Value::String(api_version.to_string()));
    if !depends_on.is_empty() {
        document.insert(
            "dependsOn".to_string(),
            Value::Array(depends_on.iter().cloned().map(Value::String).collect()),
        );
    }
    Ok(document)
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
