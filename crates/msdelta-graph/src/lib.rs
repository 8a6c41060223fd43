//! msdelta Graph - Service dependency graphs and their diffs
//!
//! This crate turns an IR document into a graph of microservices linked by
//! the cross-service requests they make, and compares two such graphs taken
//! at different commits.
//!
//! # Architecture
//!
//! - [`MethodIndex`] maps every routed URL to the controller method serving it
//! - [`GraphBuilder`] resolves outbound calls against the index into links
//! - [`key_set_diff`] and [`structural_diff`] classify entities across
//!   snapshots
//! - [`diff_graphs`] merges two snapshots into one annotated graph
//!
//! # Example
//!
//! ```no_run
//! use msdelta_core::load_document;
//! use msdelta_graph::{diff_graphs, GraphBuilder};
//! use std::path::Path;
//!
//! let early = load_document(Path::new("before.json")).unwrap();
//! let later = load_document(Path::new("after.json")).unwrap();
//!
//! let builder = GraphBuilder::new();
//! let diff = diff_graphs(&builder.build(&early), &builder.build(&later));
//! println!("{}", serde_json::to_string_pretty(&diff.merged).unwrap());
//! ```

mod builder;
mod diff;
mod differ;
mod graph;
mod method_index;
mod topology;

pub use builder::{build_graph, BuildStats, GraphBuilder};
pub use diff::{diff_graphs, DiffSummary, GraphDiff, RequestDelta};
pub use differ::{key_set_diff, structural_diff, KeySetDiff, MatchDiff, StructuralMatch};
pub use graph::{
    link_key, ChangeStatus, GraphStats, Link, LinkMap, MsGraph, Request, ServiceNode, GRAPH_NAME,
    MICROSERVICE_NODE_TYPE,
};
pub use method_index::{MethodEntry, MethodIndex};
pub use topology::ServiceTopology;
