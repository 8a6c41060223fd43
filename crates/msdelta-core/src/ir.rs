//! IR record types.
//!
//! Field names mirror the JSON the upstream analyzer writes (camelCase).
//! Optional payloads default to empty so that partial records still load;
//! only the container fields checked by [`crate::validate_shape`] are hard
//! requirements.

use crate::call_site::CallSite;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Attribute that overrides a method's routing URL.
const DEFAULT_ROUTE_ATTRIBUTE: &str = "default";

/// Reads `null` the same as an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One commit's worth of analyzed microservices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IrDocument {
    pub microservices: Vec<Microservice>,

    #[serde(rename = "commitID", default, deserialize_with = "null_as_default")]
    pub commit_id: String,
}

/// A deployable service unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Microservice {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub path: String,

    pub controllers: Vec<Controller>,

    pub services: Vec<Service>,
}

impl Microservice {
    /// Call sites in walk order: services first, then controllers.
    pub fn call_sites(&self) -> impl Iterator<Item = &dyn CallSite> {
        self.services
            .iter()
            .map(|s| s as &dyn CallSite)
            .chain(self.controllers.iter().map(|c| c as &dyn CallSite))
    }
}

/// A class exposing routed endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Controller {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub implemented_types: Vec<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub methods: Vec<Method>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub method_calls: Vec<MethodCall>,
}

/// A business-logic class. Only its outbound calls matter here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub implemented_types: Vec<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub method_calls: Vec<MethodCall>,
}

/// A routed controller method.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Method {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(default)]
    pub parameters: Value,

    #[serde(default, deserialize_with = "null_as_default")]
    pub return_type: String,

    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub http_method: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub annotations: Vec<Annotation>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub class_name: String,
}

impl Method {
    /// The URL this method is reachable under.
    ///
    /// A `default` attribute on the first annotation replaces `url`
    /// entirely; later annotations are never consulted.
    pub fn route(&self) -> Option<String> {
        match self.annotations.first().and_then(Annotation::default_route) {
            Some(route) => Some(route),
            None => self.url.clone(),
        }
    }
}

/// A single annotation attached to a method.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub attributes: BTreeMap<String, Value>,
}

impl Annotation {
    /// Value of the `default` attribute, if present.
    ///
    /// Non-string values are rendered as their JSON text.
    pub fn default_route(&self) -> Option<String> {
        self.attributes
            .get(DEFAULT_ROUTE_ATTRIBUTE)
            .map(|value| match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
    }
}

/// An outbound call made from a controller or service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodCall {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    /// Target route. `None` means the call stays inside its service.
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub http_method: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub called_from: String,

    #[serde(default)]
    pub microservice_name: Option<String>,

    #[serde(default)]
    pub parameter_contents: Value,
}
