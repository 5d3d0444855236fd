//! Resource envelopes: deployment metadata wrapped around one inner resource.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use armgen_shadow::{Field, FieldDirective, Node, Reflect, ShadowRecord, reflect_record};
use serde::{Deserialize, Serialize, Serializer};
use tracing::debug;

use crate::error::Result;
use crate::{merge, passthrough};

/// Deployment condition of a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Condition {
    /// A literal boolean.
    Literal(bool),
    /// A template expression such as `[parameters('fullDeploy')]`.
    Expression(String),
}

impl Condition {
    /// Condition evaluating a template expression.
    #[must_use]
    pub fn expression(expression: impl Into<String>) -> Self {
        Self::Expression(expression.into())
    }

    /// Condition reading a boolean template parameter.
    #[must_use]
    pub fn parameter(name: &str) -> Self {
        Self::Expression(format!("[parameters('{name}')]"))
    }
}

impl Reflect for Condition {
    fn reflect(&self) -> Node<'_> {
        match self {
            Self::Literal(b) => Node::Bool(*b),
            Self::Expression(expression) => Node::Str(expression),
        }
    }
}

/// Copy loop stanza deploying several instances of a resource.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceCopy {
    /// Loop name
    pub name: String,
    /// Number of instances
    pub count: u32,
    /// `Serial` or `Parallel`
    pub mode: String,
    /// Instances deployed at a time in serial mode
    pub batch_size: u32,
}

reflect_record!(ResourceCopy {
    name => "name" (omit_empty),
    count => "count" (omit_empty),
    mode => "mode" (omit_empty),
    batch_size => "batchSize" (omit_empty),
});

/// How an inner resource is turned into JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceFamily {
    /// Shadow-copied; the type's own serializer is bypassed.
    Legacy,
    /// Serialized by the type's own trusted serializer.
    SelfDescribing,
}

/// The provider-defined payload of a resource.
///
/// The family is chosen where the value is constructed, never inferred from
/// the type.
#[derive(Clone)]
pub enum InnerResource {
    /// A value whose serializer must be bypassed.
    Legacy(Arc<dyn Reflect + Send + Sync>),
    /// A value whose serializer is trusted as-is.
    SelfDescribing(Arc<dyn Reflect + Send + Sync>),
}

impl InnerResource {
    /// Wrap a value whose own serializer must be bypassed.
    pub fn legacy<T: Reflect + Send + Sync + 'static>(value: T) -> Self {
        Self::Legacy(Arc::new(value))
    }

    /// Wrap a value whose own serializer is trusted.
    pub fn self_describing<T: Reflect + Send + Sync + 'static>(value: T) -> Self {
        Self::SelfDescribing(Arc::new(value))
    }

    /// Family of this resource.
    #[must_use]
    pub const fn family(&self) -> ResourceFamily {
        match self {
            Self::Legacy(_) => ResourceFamily::Legacy,
            Self::SelfDescribing(_) => ResourceFamily::SelfDescribing,
        }
    }

    /// The wrapped value.
    #[must_use]
    pub fn value(&self) -> &(dyn Reflect + Send + Sync) {
        match self {
            Self::Legacy(value) | Self::SelfDescribing(value) => &**value,
        }
    }
}

impl fmt::Debug for InnerResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InnerResource")
            .field("family", &self.family())
            .field("type_name", &self.value().type_name())
            .finish()
    }
}

/// A template resource: one inner resource plus deployment metadata.
///
/// Rendering merges the envelope's fields over same-named fields of the inner
/// resource; a non-default envelope value always wins.
#[derive(Debug, Clone)]
pub struct ResourceEnvelope {
    /// The wrapped provider resource
    pub resource: InnerResource,
    /// Resource name
    pub name: String,
    /// Resource type, e.g. `Microsoft.Network/virtualNetworks`
    pub r#type: String,
    /// Deployment condition
    pub condition: Option<Condition>,
    /// API version used to deploy the resource
    pub api_version: String,
    /// Resources that must be deployed first
    pub depends_on: Vec<String>,
    /// Resource location
    pub location: String,
    /// Resource tags
    pub tags: BTreeMap<String, serde_json::Value>,
    /// Copy loop
    pub copy: Option<ResourceCopy>,
    /// Free-form comments
    pub comments: String,
}

impl ResourceEnvelope {
    /// Wrap an inner resource with empty metadata.
    #[must_use]
    pub fn new(resource: InnerResource) -> Self {
        Self {
            resource,
            name: String::new(),
            r#type: String::new(),
            condition: None,
            api_version: String::new(),
            depends_on: Vec::new(),
            location: String::new(),
            tags: BTreeMap::new(),
            copy: None,
            comments: String::new(),
        }
    }

    /// Set the name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the resource type.
    #[must_use]
    pub fn with_type(mut self, resource_type: impl Into<String>) -> Self {
        self.r#type = resource_type.into();
        self
    }

    /// Set the deployment condition.
    #[must_use]
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Set the API version.
    #[must_use]
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    /// Add a dependency.
    #[must_use]
    pub fn depends_on(mut self, dependency: impl Into<String>) -> Self {
        self.depends_on.push(dependency.into());
        self
    }

    /// Set the location.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Add a tag.
    #[must_use]
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Set the copy loop.
    #[must_use]
    pub fn with_copy(mut self, copy: ResourceCopy) -> Self {
        self.copy = Some(copy);
        self
    }

    /// Set the comments.
    #[must_use]
    pub fn with_comments(mut self, comments: impl Into<String>) -> Self {
        self.comments = comments.into();
        self
    }

    /// Envelope fields in declared order, excluding the inner resource.
    pub(crate) fn declared_fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::new("name", FieldDirective::new("name").omit_empty(), &self.name),
            Field::new("type", FieldDirective::new("type").omit_empty(), &self.r#type),
            Field::new(
                "condition",
                FieldDirective::new("condition").omit_empty(),
                &self.condition,
            ),
            Field::new(
                "api_version",
                FieldDirective::new("apiVersion").omit_empty(),
                &self.api_version,
            ),
            Field::new(
                "depends_on",
                FieldDirective::new("dependsOn").omit_empty(),
                &self.depends_on,
            ),
            Field::new("location", FieldDirective::new("location").omit_empty(), &self.location),
            Field::new("tags", FieldDirective::new("tags").omit_empty(), &self.tags),
            Field::new("copy", FieldDirective::new("copy").omit_empty(), &self.copy),
            Field::new("comments", FieldDirective::new("comments").omit_empty(), &self.comments),
        ]
    }

    /// Render this resource into its final document shape.
    ///
    /// Legacy resources are shadow-copied and merged with the envelope fields;
    /// self-describing resources are serialized by their own serializer with
    /// `apiVersion` and `dependsOn` spliced in.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeViolation`](crate::Error::ShapeViolation) when a
    /// legacy resource is not a record or a trusted serializer does not yield
    /// an object, [`Error::SelfDescribingContractViolation`](crate::Error::SelfDescribingContractViolation)
    /// when a self-describing resource has no trusted serializer, and shadow
    /// copy errors for unsupported mapping keys or value cycles.
    #[tracing::instrument(
        name = "render_resource",
        skip(self),
        fields(name = %self.name, family = ?self.resource.family())
    )]
    pub fn render(&self) -> Result<RenderedResource> {
        match &self.resource {
            InnerResource::Legacy(value) => {
                let record = merge::merge_fields(&**value, self.declared_fields())?;
                debug!(fields = record.len(), "Merged envelope over shadow copy");
                Ok(RenderedResource::Record(record))
            }
            InnerResource::SelfDescribing(value) => {
                let document = passthrough::splice(&**value, &self.api_version, &self.depends_on)?;
                debug!(keys = document.len(), "Spliced envelope into trusted output");
                Ok(RenderedResource::Document(document))
            }
        }
    }

    /// Render and encode this resource as compact JSON.
    ///
    /// # Errors
    ///
    /// See [`ResourceEnvelope::render`].
    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&self.render()?)?)
    }
}

impl Serialize for ResourceEnvelope {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.render()
            .map_err(<S::Error as serde::ser::Error>::custom)?
            .serialize(serializer)
    }
}

/// A rendered resource, ready to encode.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderedResource {
    /// Merged anonymous record; keys follow declared field order.
    Record(ShadowRecord),
    /// Trusted output with spliced envelope keys; keys are sorted.
    Document(serde_json::Map<String, serde_json::Value>),
}

impl Serialize for RenderedResource {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Record(record) => record.serialize(serializer),
            Self::Document(document) => document.serialize(serializer),
        }
    }
}
