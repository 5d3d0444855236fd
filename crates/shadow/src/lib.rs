//! # armgen-shadow
//!
//! Type-erasing shadow copies of strongly-typed provider resource values.
//!
//! Provider client libraries ship resource types whose `Serialize` impls do
//! more than emit their tagged fields (flattening, synthesized keys, wire-only
//! conventions). Deployment templates need the plain tagged-field shape
//! instead. This crate rebuilds a value from its field descriptors into
//! anonymous containers that no longer carry the original type, so encoding
//! the copy can only ever produce that plain shape.
//!
//! ## How it works
//!
//! - [`Reflect`] describes a value's shape as a borrowed [`Node`]. Records list
//!   their exported fields in declared order with a [`FieldDirective`] each;
//!   [`reflect_record!`] writes these descriptors.
//! - [`is_default`] decides whether a value is the default for its type.
//! - [`shadow_copy`] rebuilds the value as a [`ShadowValue`], leaving default
//!   record fields as the zero "any" so `omit_empty` drops them, and reporting
//!   value cycles through shared pointers instead of recursing forever.
//! - Encoding a [`ShadowValue`] with `serde_json` renders blobs as base64 and
//!   UUIDs in dashed form.
//!
//! ## Example
//!
//! ```
//! use armgen_shadow::{reflect_record, shadow_copy};
//!
//! pub struct Identity {
//!     pub name: Option<String>,
//!     pub location: Option<String>,
//! }
//!
//! reflect_record!(Identity {
//!     name => "name" (omit_empty),
//!     location => "location" (omit_empty),
//! });
//!
//! let identity = Identity { name: None, location: Some("eastus".into()) };
//! let copy = shadow_copy(&identity)?;
//! assert_eq!(serde_json::to_string(&copy)?, r#"{"location":"eastus"}"#);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod copy;
mod error;
mod macros;
mod node;
mod reflect;
mod value;
mod zero;

pub use copy::{ShadowCopier, shadow_copy};
pub use error::{Error, Result};
pub use node::{Field, FieldDirective, Node, Pointee, Record};
pub use reflect::{Reflect, TrustedSerialize};
pub use value::{ShadowField, ShadowRecord, ShadowValue};
pub use zero::is_default;
