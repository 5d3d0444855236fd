//! Error types for the shadow-copy engine

// Rust 1.92 compiler bug: false positives for thiserror/miette derive macro fields
// https://github.com/rust-lang/rust/issues/147648
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

/// Result type alias using the shadow-copy error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building a shadow copy.
#[derive(Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
pub enum Error {
    /// A mapping whose keys do not reflect as strings.
    #[error("Mapping {type_name} has unsupported key type {key_type}: only string keys can be encoded")]
    #[diagnostic(
        code(armgen::shadow::unsupported_mapping_key),
        help("Use a string-keyed map (HashMap<String, _>, BTreeMap<String, _>, IndexMap<String, _>)")
    )]
    UnsupportedMappingKey {
        /// Type of the offending mapping
        type_name: &'static str,
        /// Type of its keys
        key_type: &'static str,
    },

    /// A value refers back to itself through a shared pointer.
    #[error("Value cycle detected at {type_name}")]
    #[diagnostic(
        code(armgen::shadow::cycle_detected),
        help("Shared pointers (Rc/Arc) inside a resource must form a tree, not a cycle")
    )]
    CycleDetected {
        /// Type of the pointee that was re-entered
        type_name: &'static str,
    },
}

impl Error {
    /// Create an unsupported mapping key error
    #[must_use]
    pub const fn unsupported_mapping_key(type_name: &'static str, key_type: &'static str) -> Self {
        Self::UnsupportedMappingKey {
            type_name,
            key_type,
        }
    }

    /// Create a cycle detected error
    #[must_use]
    pub const fn cycle_detected(type_name: &'static str) -> Self {
        Self::CycleDetected { type_name }
    }
}
