//! Error types for template rendering.

// Rust 1.92 compiler bug: false positives for thiserror/miette derive macro fields
// https://github.com/rust-lang/rust/issues/147648
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

/// Result type alias using the template error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while rendering resources and templates.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// The inner resource did not render as a record.
    #[error("Inner resource {type_name} must render as a record, found {found}")]
    #[diagnostic(
        code(armgen::template::shape_violation),
        help("Wrap a struct value in the resource envelope, not a scalar, list or map")
    )]
    ShapeViolation {
        /// Type of the inner resource
        type_name: &'static str,
        /// Shape that was found instead
        found: &'static str,
    },

    /// A resource tagged self-describing has no trusted serializer.
    #[error("Self-describing resource {type_name} does not provide a trusted serializer")]
    #[diagnostic(
        code(armgen::template::self_describing_contract),
        help("Declare the type with `reflect_record!(trusted ...)` or wrap it with InnerResource::legacy")
    )]
    SelfDescribingContractViolation {
        /// Type of the offending resource
        type_name: &'static str,
    },

    /// Shadow copy failure (unsupported mapping key or value cycle).
    #[error(transparent)]
    #[diagnostic(transparent)]
    Shadow(#[from] armgen_shadow::Error),

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(armgen::template::invalid_config))]
    InvalidConfig {
        /// Error message
        message: String,
    },

    /// JSON encoding or decoding error.
    #[error("JSON error: {0}")]
    #[diagnostic(code(armgen::template::json))]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a shape violation error
    #[must_use]
    pub const fn shape_violation(type_name: &'static str, found: &'static str) -> Self {
        Self::ShapeViolation { type_name, found }
    }

    /// Create a self-describing contract violation error
    #[must_use]
    pub const fn contract_violation(type_name: &'static str) -> Self {
        Self::SelfDescribingContractViolation { type_name }
    }

    /// Create an invalid configuration error
    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_violation_display() {
        let error = Error::shape_violation("alloc::string::String", "string");
        assert_eq!(
            error.to_string(),
            "Inner resource alloc::string::String must render as a record, found string"
        );
    }

    #[test]
    fn test_contract_violation_names_type() {
        let error = Error::contract_violation("armnetwork::Subnet");
        assert!(error.to_string().contains("armnetwork::Subnet"));
    }

    #[test]
    fn test_shadow_error_is_transparent() {
        let error: Error = armgen_shadow::Error::cycle_detected("Node").into();
        assert_eq!(error.to_string(), "Value cycle detected at Node");
        let code = error.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("armgen::shadow::cycle_detected"));
    }

    #[test]
    fn test_json_error_from() {
        let json_error = serde_json::from_str::<serde_json::Value>("{ invalid").unwrap_err();
        let error: Error = json_error.into();
        assert!(matches!(error, Error::Json(_)));
        assert!(error.to_string().contains("JSON error"));
    }
}
