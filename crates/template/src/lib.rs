//! # armgen-template
//!
//! Deployment template documents whose resources are serialized through a
//! resource envelope.
//!
//! A [`ResourceEnvelope`] wraps one provider resource together with
//! deployment metadata (`name`, `type`, `apiVersion`, `dependsOn`, ...).
//! Rendering dispatches on the resource's [`ResourceFamily`]:
//!
//! - **Legacy** resources are shadow-copied, which bypasses their own
//!   `Serialize` impls, and the envelope's fields are merged over the copy.
//! - **Self-describing** resources are serialized by their own trusted
//!   serializer and only `apiVersion` and `dependsOn` are spliced in.
//!
//! [`Template::to_json`] renders every resource and encodes the document
//! using a [`TemplateFormat`].
//!
//! ## Example
//!
//! ```
//! use armgen_shadow::reflect_record;
//! use armgen_template::{InnerResource, ResourceEnvelope, Template, TemplateFormat};
//!
//! pub struct UserAssignedIdentity {
//!     pub name: Option<String>,
//!     pub location: Option<String>,
//! }
//!
//! reflect_record!(UserAssignedIdentity {
//!     name => "name" (omit_empty),
//!     location => "location" (omit_empty),
//! });
//!
//! let mut template = Template::deployment();
//! template.add_resource(
//!     ResourceEnvelope::new(InnerResource::legacy(UserAssignedIdentity {
//!         name: Some("rp-identity".into()),
//!         location: Some("[resourceGroup().location]".into()),
//!     }))
//!     .with_type("Microsoft.ManagedIdentity/userAssignedIdentities")
//!     .with_api_version("2018-11-30"),
//! );
//!
//! let json = template.to_json(&TemplateFormat::default())?;
//! assert!(json.ends_with(b"}\n"));
//! # Ok::<(), armgen_template::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod api_versions;
mod config;
mod error;
mod merge;
mod passthrough;
mod resource;
mod template;

pub use api_versions::ApiVersions;
pub use config::{IndentStyle, TemplateFormat};
pub use error::{Error, Result};
pub use merge::merge_fields;
pub use passthrough::splice;
pub use resource::{
    Condition, InnerResource, RenderedResource, ResourceCopy, ResourceEnvelope, ResourceFamily,
};
pub use template::{
    CONTENT_VERSION, DEPLOYMENT_PARAMETERS_SCHEMA, DEPLOYMENT_TEMPLATE_SCHEMA,
    DeploymentParameters, Output, Parameter, ParameterValue, Template,
};
