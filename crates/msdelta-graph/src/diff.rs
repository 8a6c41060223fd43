//! Temporal diff of two graph snapshots.
//!
//! The merged graph carries the union of both snapshots:
//! - links only in the later snapshot are `Added`, only in the early one
//!   `Removed`, and links in both are always `Changed` with the later
//!   snapshot's requests
//! - nodes are classified the same way, except matched nodes stay
//!   unannotated
//!
//! A link present in both snapshots is marked `Changed` even when its
//! requests are identical. The request-level outcome is kept in
//! [`GraphDiff::request_deltas`] for callers that need the finer picture.

use crate::differ::{key_set_diff, structural_diff};
use crate::graph::{ChangeStatus, Link, MsGraph, Request};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

/// Request-level outcome for a link present in both snapshots.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RequestDelta {
    pub added: Vec<Request>,
    pub removed: Vec<Request>,
    pub unmodified: usize,
}

impl RequestDelta {
    /// True when both snapshots carry structurally the same requests.
    pub fn is_identical(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Per-level change counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiffSummary {
    pub nodes_added: usize,
    pub nodes_removed: usize,
    pub nodes_unmodified: usize,
    pub links_added: usize,
    pub links_removed: usize,
    pub links_unmodified: usize,
    pub requests_added: usize,
    pub requests_removed: usize,
}

impl DiffSummary {
    /// True when no node, link or request was added or removed.
    pub fn is_empty(&self) -> bool {
        self.nodes_added == 0
            && self.nodes_removed == 0
            && self.links_added == 0
            && self.links_removed == 0
            && self.requests_added == 0
            && self.requests_removed == 0
    }
}

/// The merged graph plus everything learned while merging.
#[derive(Debug, Clone)]
pub struct GraphDiff {
    pub merged: MsGraph,
    /// Keyed by link key, for links present in both snapshots.
    pub request_deltas: BTreeMap<String, RequestDelta>,
    pub summary: DiffSummary,
}

impl GraphDiff {
    pub fn request_delta(&self, key: &str) -> Option<&RequestDelta> {
        self.request_deltas.get(key)
    }

    pub fn into_graph(self) -> MsGraph {
        self.merged
    }
}

/// Diffs an early snapshot against a later one.
///
/// The merged graph takes the later snapshot's commit id. Links are inserted
/// as additions, then subtractions, then links present in both; nodes follow
/// the same grouping.
pub fn diff_graphs(early: &MsGraph, later: &MsGraph) -> GraphDiff {
    let mut merged = MsGraph::new(later.git_commit_id.clone());
    let mut request_deltas = BTreeMap::new();
    let mut summary = DiffSummary::default();

    let links = key_set_diff(early.links.keys(), later.links.keys());
    summary.links_added = links.additions.len();
    summary.links_removed = links.subtractions.len();
    summary.links_unmodified = links.unmodified.len();

    for key in links.additions {
        if let Some(link) = later.links.get(key) {
            merged
                .links
                .insert(key.to_string(), link.clone().with_color(ChangeStatus::Added));
        }
    }

    for key in links.subtractions {
        if let Some(link) = early.links.get(key) {
            merged
                .links
                .insert(key.to_string(), link.clone().with_color(ChangeStatus::Removed));
        }
    }

    for key in links.unmodified {
        let (Some(before), Some(after)) = (early.links.get(key), later.links.get(key)) else {
            continue;
        };

        let requests = structural_diff(&before.requests, &after.requests);
        let delta = RequestDelta {
            added: requests.additions.into_iter().cloned().collect(),
            removed: requests.subtractions.into_iter().cloned().collect(),
            unmodified: requests.unmodified.len(),
        };
        summary.requests_added += delta.added.len();
        summary.requests_removed += delta.removed.len();
        request_deltas.insert(key.to_string(), delta);

        let link = Link {
            source: after.source.clone(),
            target: after.target.clone(),
            requests: after.requests.clone(),
            color: ChangeStatus::Changed,
        };
        merged.links.insert(key.to_string(), link);
    }

    let nodes = structural_diff(&early.nodes, &later.nodes);
    summary.nodes_added = nodes.additions.len();
    summary.nodes_removed = nodes.subtractions.len();
    summary.nodes_unmodified = nodes.unmodified.len();

    let added = nodes
        .additions
        .into_iter()
        .map(|n| n.clone().with_color(ChangeStatus::Added));
    let removed = nodes
        .subtractions
        .into_iter()
        .map(|n| n.clone().with_color(ChangeStatus::Removed));
    let kept = nodes
        .unmodified
        .into_iter()
        .map(|n| n.clone().with_color(ChangeStatus::Unchanged));
    merged.nodes = added.chain(removed).chain(kept).collect();

    info!(
        "Diffed {:?} -> {:?}: nodes +{} -{}, links +{} -{} ={}, requests +{} -{}",
        early.git_commit_id,
        later.git_commit_id,
        summary.nodes_added,
        summary.nodes_removed,
        summary.links_added,
        summary.links_removed,
        summary.links_unmodified,
        summary.requests_added,
        summary.requests_removed
    );

    GraphDiff {
        merged,
        request_deltas,
        summary,
    }
}
