//! Service graph data structure.
//!
//! An [`MsGraph`] is one snapshot of the service dependency graph: the
//! microservices of a commit and the directed links between them, each link
//! carrying every request that contributes to it. The JSON shape produced by
//! `Serialize` is the wire format downstream renderers consume.

use crate::method_index::MethodEntry;
use msdelta_core::MethodCall;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

/// Value of `graphName` on every graph.
pub const GRAPH_NAME: &str = "msgraph";

/// Value of `nodeType` on every node.
pub const MICROSERVICE_NODE_TYPE: &str = "microservice";

/// Builds the identity key of a directed link.
pub fn link_key(source: &str, target: &str) -> String {
    format!("{} --> {}", source, target)
}

/// Change annotation on nodes and links.
///
/// `Unchanged` is never written out; the other states serialize as the
/// color names renderers expect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum ChangeStatus {
    #[default]
    #[serde(rename = "none")]
    Unchanged,
    #[serde(rename = "green")]
    Added,
    #[serde(rename = "red")]
    Removed,
    #[serde(rename = "yellow")]
    Changed,
}

impl ChangeStatus {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unchanged => "unchanged",
            Self::Added => "added",
            Self::Removed => "removed",
            Self::Changed => "changed",
        }
    }
}

impl std::fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A microservice in the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceNode {
    #[serde(rename = "nodeName")]
    pub name: String,

    #[serde(rename = "nodeType")]
    pub node_type: String,

    #[serde(rename = "nodePath")]
    pub path: String,

    #[serde(skip_serializing_if = "ChangeStatus::is_unchanged")]
    pub color: ChangeStatus,
}

impl ServiceNode {
    /// Creates an unannotated microservice node.
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            node_type: MICROSERVICE_NODE_TYPE.to_string(),
            path: path.into(),
            color: ChangeStatus::Unchanged,
        }
    }

    pub fn with_color(mut self, color: ChangeStatus) -> Self {
        self.color = color;
        self
    }
}

/// One call instance carried by a link.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Request {
    #[serde(rename = "destinationUrl")]
    pub destination_url: String,

    /// Method the call was made from.
    #[serde(rename = "sourceMethod")]
    pub source_method: String,

    /// Name of the invoked call-site function.
    #[serde(rename = "endpointFunction")]
    pub endpoint_function: String,

    #[serde(rename = "className")]
    pub class_name: String,

    #[serde(rename = "destinationclassName")]
    pub destination_class_name: String,

    /// HTTP verb of the call.
    #[serde(rename = "type")]
    pub verb: Option<String>,

    pub argument: Value,

    /// Declared return type of the destination method.
    #[serde(rename = "msReturn")]
    pub ms_return: String,
}

impl Request {
    /// Builds a request from a resolved call.
    pub fn from_call(
        call: &MethodCall,
        url: &str,
        class_name: &str,
        destination: &MethodEntry,
    ) -> Self {
        Self {
            destination_url: url.to_string(),
            source_method: call.called_from.clone(),
            endpoint_function: call.name.clone(),
            class_name: class_name.to_string(),
            destination_class_name: destination.class_name.clone(),
            verb: call.http_method.clone(),
            argument: call.parameter_contents.clone(),
            ms_return: destination.return_type.clone(),
        }
    }
}

/// A directed aggregation of every call from one service to another.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    pub source: String,
    pub target: String,
    pub requests: Vec<Request>,

    #[serde(skip_serializing_if = "ChangeStatus::is_unchanged")]
    pub color: ChangeStatus,
}

impl Link {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            requests: Vec::new(),
            color: ChangeStatus::Unchanged,
        }
    }

    pub fn key(&self) -> String {
        link_key(&self.source, &self.target)
    }

    pub fn with_color(mut self, color: ChangeStatus) -> Self {
        self.color = color;
        self
    }
}

/// Links keyed by `"source --> target"`, kept in insertion order.
///
/// Serializes as a JSON object whose key order is the insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkMap {
    entries: Vec<(String, Link)>,
    positions: HashMap<String, usize>,
}

impl LinkMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a link under `key`, replacing any existing link in place.
    pub fn insert(&mut self, key: String, link: Link) -> Option<Link> {
        match self.positions.get(&key) {
            Some(&pos) => Some(std::mem::replace(&mut self.entries[pos].1, link)),
            None => {
                self.positions.insert(key.clone(), self.entries.len());
                self.entries.push((key, link));
                None
            }
        }
    }

    /// Returns the link from `source` to `target`, creating an empty one on
    /// first use.
    pub fn get_or_create(&mut self, source: &str, target: &str) -> &mut Link {
        let key = link_key(source, target);
        let pos = match self.positions.get(&key) {
            Some(&pos) => pos,
            None => {
                let pos = self.entries.len();
                self.positions.insert(key.clone(), pos);
                self.entries.push((key, Link::new(source, target)));
                pos
            }
        };
        &mut self.entries[pos].1
    }

    pub fn get(&self, key: &str) -> Option<&Link> {
        let pos = self.positions.get(key)?;
        self.entries.get(*pos).map(|(_, link)| link)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.positions.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Link> {
        self.entries.iter().map(|(_, link)| link)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Link)> {
        self.entries.iter().map(|(key, link)| (key.as_str(), link))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for LinkMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, link) in &self.entries {
            map.serialize_entry(key, link)?;
        }
        map.end()
    }
}

/// One snapshot of the service dependency graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MsGraph {
    pub graph_name: String,
    pub nodes: Vec<ServiceNode>,
    pub links: LinkMap,
    pub git_commit_id: String,
}

impl MsGraph {
    /// Creates an empty graph for a commit.
    pub fn new(commit_id: impl Into<String>) -> Self {
        Self {
            graph_name: GRAPH_NAME.to_string(),
            nodes: Vec::new(),
            links: LinkMap::new(),
            git_commit_id: commit_id.into(),
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Total requests across all links.
    pub fn request_count(&self) -> usize {
        self.links.values().map(|link| link.requests.len()).sum()
    }

    /// Finds the first node with the given name.
    pub fn find_node(&self, name: &str) -> Option<&ServiceNode> {
        self.nodes.iter().find(|node| node.name == name)
    }

    /// Gets the link from `source` to `target`.
    pub fn link(&self, source: &str, target: &str) -> Option<&Link> {
        self.links.get(&link_key(source, target))
    }

    /// Returns graph statistics.
    pub fn stats(&self) -> GraphStats {
        GraphStats {
            node_count: self.node_count(),
            link_count: self.link_count(),
            request_count: self.request_count(),
        }
    }
}

/// Size figures for a graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub link_count: usize,
    pub request_count: usize,
}
