//! Deployment template and parameters file documents.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::config::TemplateFormat;
use crate::error::Result;
use crate::resource::{Condition, RenderedResource, ResourceEnvelope};

/// Schema of a resource group deployment template.
pub const DEPLOYMENT_TEMPLATE_SCHEMA: &str =
    "https://schema.management.azure.com/schemas/2015-01-01/deploymentTemplate.json#";

/// Schema of a deployment parameters file.
pub const DEPLOYMENT_PARAMETERS_SCHEMA: &str =
    "https://schema.management.azure.com/schemas/2015-01-01/deploymentParameters.json#";

/// Content version stamped on generated documents.
pub const CONTENT_VERSION: &str = "1.0.0.0";

/// A deployment template.
///
/// Every field is omitted from the output when empty. Resources keep their
/// insertion order, as do parameters; variables and outputs are emitted with
/// sorted keys.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    /// Template schema URL
    #[serde(rename = "$schema", skip_serializing_if = "String::is_empty")]
    pub schema: String,

    /// API profile
    #[serde(skip_serializing_if = "String::is_empty")]
    pub api_profile: String,

    /// Content version
    #[serde(skip_serializing_if = "String::is_empty")]
    pub content_version: String,

    /// Template variables
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub variables: BTreeMap<String, Value>,

    /// Template parameters
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub parameters: IndexMap<String, Parameter>,

    /// User-defined functions
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub functions: Vec<Value>,

    /// Resources to deploy
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<ResourceEnvelope>,

    /// Deployment outputs
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub outputs: BTreeMap<String, Output>,
}

impl Template {
    /// An empty deployment template with schema and content version set.
    #[must_use]
    pub fn deployment() -> Self {
        Self {
            schema: DEPLOYMENT_TEMPLATE_SCHEMA.to_string(),
            content_version: CONTENT_VERSION.to_string(),
            ..Self::default()
        }
    }

    /// Append a resource.
    pub fn add_resource(&mut self, resource: ResourceEnvelope) -> &mut Self {
        self.resources.push(resource);
        self
    }

    /// Add or replace a parameter.
    pub fn add_parameter(&mut self, name: impl Into<String>, parameter: Parameter) -> &mut Self {
        self.parameters.insert(name.into(), parameter);
        self
    }

    /// Add or replace a variable.
    pub fn add_variable(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    /// Add or replace an output.
    pub fn add_output(&mut self, name: impl Into<String>, output: Output) -> &mut Self {
        self.outputs.insert(name.into(), output);
        self
    }

    /// Render every resource and encode the template with `format`.
    ///
    /// # Errors
    ///
    /// Returns the first resource rendering error, in resource order.
    #[tracing::instrument(name = "render_template", skip_all, fields(resources = self.resources.len()))]
    pub fn to_json(&self, format: &TemplateFormat) -> Result<Vec<u8>> {
        let resources = self
            .resources
            .iter()
            .map(ResourceEnvelope::render)
            .collect::<Result<Vec<_>>>()?;
        debug!(parameters = self.parameters.len(), "Rendered template resources");

        format.encode(&TemplateDocument {
            schema: &self.schema,
            api_profile: &self.api_profile,
            content_version: &self.content_version,
            variables: &self.variables,
            parameters: &self.parameters,
            functions: &self.functions,
            resources,
            outputs: &self.outputs,
        })
    }
}

/// Borrowed view of a template with its resources already rendered.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TemplateDocument<'a> {
    #[serde(rename = "$schema", skip_serializing_if = "str::is_empty")]
    schema: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    api_profile: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    content_version: &'a str,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    variables: &'a BTreeMap<String, Value>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    parameters: &'a IndexMap<String, Parameter>,
    #[serde(skip_serializing_if = "<[Value]>::is_empty")]
    functions: &'a [Value],
    #[serde(skip_serializing_if = "Vec::is_empty")]
    resources: Vec<RenderedResource>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    outputs: &'a BTreeMap<String, Output>,
}

/// A template parameter declaration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    /// Parameter type, e.g. `string` or `securestring`
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub r#type: String,

    /// Value used when the deployment supplies none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,

    /// Permitted values
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_values: Vec<Value>,

    /// Free-form metadata such as a description
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, Value>,

    /// Smallest permitted integer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<i64>,

    /// Largest permitted integer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<i64>,

    /// Shortest permitted string or array
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,

    /// Longest permitted string or array
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
}

impl Parameter {
    /// Parameter of the given type.
    #[must_use]
    pub fn of_type(parameter_type: impl Into<String>) -> Self {
        Self {
            r#type: parameter_type.into(),
            ..Self::default()
        }
    }

    /// `string` parameter.
    #[must_use]
    pub fn string() -> Self {
        Self::of_type("string")
    }

    /// `securestring` parameter.
    #[must_use]
    pub fn secure_string() -> Self {
        Self::of_type("securestring")
    }

    /// `int` parameter.
    #[must_use]
    pub fn int() -> Self {
        Self::of_type("int")
    }

    /// `bool` parameter.
    #[must_use]
    pub fn bool() -> Self {
        Self::of_type("bool")
    }

    /// `object` parameter.
    #[must_use]
    pub fn object() -> Self {
        Self::of_type("object")
    }

    /// `array` parameter.
    #[must_use]
    pub fn array() -> Self {
        Self::of_type("array")
    }

    /// Set the default value.
    #[must_use]
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Restrict the permitted values.
    #[must_use]
    pub fn with_allowed_values<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.allowed_values = values.into_iter().map(Into::into).collect();
        self
    }

    /// Set `metadata.description`.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.metadata
            .insert("description".to_string(), Value::String(description.into()));
        self
    }
}

/// A deployment output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Output {
    /// Output type
    pub r#type: String,

    /// Output value, usually an expression
    pub value: Value,

    /// Condition under which the output is produced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
}

impl Output {
    /// Output of the given type.
    #[must_use]
    pub fn new(output_type: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            r#type: output_type.into(),
            value: value.into(),
            condition: None,
        }
    }

    /// Set the condition.
    #[must_use]
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }
}

/// A deployment parameters file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentParameters {
    /// Parameters file schema URL
    #[serde(rename = "$schema", default, skip_serializing_if = "String::is_empty")]
    pub schema: String,

    /// Content version
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub content_version: String,

    /// Parameter values by name
    #[serde(default)]
    pub parameters: IndexMap<String, ParameterValue>,
}

impl DeploymentParameters {
    /// An empty parameters file with schema and content version set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            schema: DEPLOYMENT_PARAMETERS_SCHEMA.to_string(),
            content_version: CONTENT_VERSION.to_string(),
            parameters: IndexMap::new(),
        }
    }

    /// Add or replace a parameter value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.parameters
            .insert(name.into(), ParameterValue { value: value.into() });
        self
    }

    /// Value of a parameter.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.parameters.get(name).map(|parameter| &parameter.value)
    }

    /// Encode with `format`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`](crate::Error::Json) when a value fails to encode.
    pub fn to_json(&self, format: &TemplateFormat) -> Result<Vec<u8>> {
        format.encode(self)
    }
}

/// One entry of a parameters file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParameterValue {
    /// Supplied value
    pub value: Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(bytes: &[u8]) -> Value {
        serde_json::from_slice(bytes).unwrap()
    }

    #[test]
    fn test_empty_template_omits_everything() {
        let out = Template::default().to_json(&TemplateFormat::compact()).unwrap();
        assert_eq!(out, b"{}");
    }

    #[test]
    fn test_deployment_stanza() {
        let out = Template::deployment().to_json(&TemplateFormat::compact()).unwrap();
        assert_eq!(
            decode(&out),
            json!({
                "$schema": DEPLOYMENT_TEMPLATE_SCHEMA,
                "contentVersion": "1.0.0.0",
            })
        );
    }

    #[test]
    fn test_parameters_keep_insertion_order() {
        let mut template = Template::default();
        template
            .add_parameter("zeta", Parameter::string())
            .add_parameter("alpha", Parameter::int().with_default(3));

        let out = String::from_utf8(template.to_json(&TemplateFormat::compact()).unwrap()).unwrap();
        assert_eq!(
            out,
            r#"{"parameters":{"zeta":{"type":"string"},"alpha":{"type":"int","defaultValue":3}}}"#
        );
    }

    #[test]
    fn test_parameter_builders() {
        let parameter = Parameter::string()
            .with_allowed_values(["Basic", "Standard"])
            .with_description("SKU name");
        let value = serde_json::to_value(&parameter).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "string",
                "allowedValues": ["Basic", "Standard"],
                "metadata": {"description": "SKU name"},
            })
        );
    }

    #[test]
    fn test_parameter_round_trips_through_json() {
        let input = json!({"type": "int", "minValue": 1, "maxValue": 5});
        let parameter: Parameter = serde_json::from_value(input.clone()).unwrap();
        assert_eq!(parameter.min_value, Some(1));
        assert_eq!(serde_json::to_value(&parameter).unwrap(), input);
    }

    #[test]
    fn test_output_with_condition() {
        let output = Output::new("string", "[reference('rp').id]")
            .with_condition(Condition::parameter("fullDeploy"));
        assert_eq!(
            serde_json::to_value(&output).unwrap(),
            json!({
                "type": "string",
                "value": "[reference('rp').id]",
                "condition": "[parameters('fullDeploy')]",
            })
        );
    }

    #[test]
    fn test_deployment_parameters_file() {
        let mut parameters = DeploymentParameters::new();
        parameters.insert("location", "eastus").insert("replicas", 3);

        assert_eq!(parameters.get("replicas"), Some(&json!(3)));
        let out = parameters.to_json(&TemplateFormat::compact()).unwrap();
        assert_eq!(
            decode(&out),
            json!({
                "$schema": DEPLOYMENT_PARAMETERS_SCHEMA,
                "contentVersion": "1.0.0.0",
                "parameters": {
                    "location": {"value": "eastus"},
                    "replicas": {"value": 3},
                },
            })
        );
    }
}
