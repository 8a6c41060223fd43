//! Graph builder for constructing a service graph from an IR document.
//!
//! The builder runs in two passes:
//! 1. Index every routed controller method by URL
//! 2. Walk every call site and resolve outbound calls against the index
//!
//! The node filter only limits which microservices appear as nodes. Routes
//! and calls of filtered-out services still take part in resolution, so a
//! filtered graph can carry links to services it does not list.

use crate::graph::{MsGraph, Request, ServiceNode};
use crate::method_index::MethodIndex;
use msdelta_core::IrDocument;
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, info};

/// Counters collected while building one graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BuildStats {
    pub call_sites: usize,
    pub calls_seen: usize,
    /// Calls that never leave their service.
    pub calls_without_url: usize,
    /// Calls whose URL no indexed method serves.
    pub unresolved_calls: usize,
    pub self_loops: usize,
    pub requests: usize,
}

/// Builds an [`MsGraph`] from an IR document.
#[derive(Debug, Default, Clone)]
pub struct GraphBuilder {
    /// Allow-list of microservice names emitted as nodes.
    node_filter: Option<HashSet<String>>,
}

impl GraphBuilder {
    /// Creates a builder that emits every microservice.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts node emission to the named microservices.
    pub fn with_node_filter<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.node_filter = Some(names.into_iter().map(Into::into).collect());
        self
    }

    fn emits_node(&self, name: &str) -> bool {
        self.node_filter
            .as_ref()
            .map_or(true, |allowed| allowed.contains(name))
    }

    /// Builds the graph for a document.
    pub fn build(&self, doc: &IrDocument) -> MsGraph {
        self.build_with_stats(doc).0
    }

    /// Builds the graph and reports what happened to every call.
    pub fn build_with_stats(&self, doc: &IrDocument) -> (MsGraph, BuildStats) {
        let mut graph = MsGraph::new(doc.commit_id.clone());
        let mut stats = BuildStats::default();

        for ms in &doc.microservices {
            if self.emits_node(&ms.name) {
                graph.nodes.push(ServiceNode::new(&ms.name, &ms.path));
            }
        }

        let index = MethodIndex::from_microservices(&doc.microservices);

        for ms in &doc.microservices {
            for site in ms.call_sites() {
                stats.call_sites += 1;
                let class_name = site.caller_class_name();

                for call in site.method_calls() {
                    stats.calls_seen += 1;

                    let Some(url) = call.url.as_deref() else {
                        stats.calls_without_url += 1;
                        continue;
                    };

                    let Some(destination) = index.resolve(url) else {
                        debug!(
                            "Unresolved call {} from {} {}",
                            url,
                            site.kind(),
                            site.own_name()
                        );
                        stats.unresolved_calls += 1;
                        continue;
                    };

                    let source = call.microservice_name.as_deref().unwrap_or(&ms.name);
                    let target = destination.microservice.as_str();

                    if source == target {
                        debug!("Skipping self call {} within {}", url, source);
                        stats.self_loops += 1;
                        continue;
                    }

                    let request = Request::from_call(call, url, class_name, destination);
                    graph.links.get_or_create(source, target).requests.push(request);
                    stats.requests += 1;
                }
            }
        }

        info!(
            "Built graph for commit {:?}: {} nodes, {} links, {} requests ({} unresolved calls)",
            graph.git_commit_id,
            graph.node_count(),
            graph.link_count(),
            stats.requests,
            stats.unresolved_calls
        );

        (graph, stats)
    }
}

/// Builds a graph with an optional node allow-list.
pub fn build_graph(doc: &IrDocument, node_filter: Option<&[String]>) -> MsGraph {
    let builder = match node_filter {
        Some(names) => GraphBuilder::new().with_node_filter(names.iter().cloned()),
        None => GraphBuilder::new(),
    };
    builder.build(doc)
}
