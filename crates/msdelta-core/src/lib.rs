//! msdelta Core - Microservice IR model
//!
//! This crate holds the intermediate representation (IR) that upstream
//! source analyzers emit for a codebase: microservices, their controllers
//! and services, the routed methods they expose and the outbound calls they
//! make. Everything downstream (graph building, diffing) consumes these
//! types.
//!
//! # Example
//!
//! ```no_run
//! use msdelta_core::{load_document, CallSite};
//! use std::path::Path;
//!
//! let doc = load_document(Path::new("ir.json")).unwrap();
//! for ms in &doc.microservices {
//!     for site in ms.call_sites() {
//!         println!("{} {} makes {} calls", site.kind(), site.own_name(), site.method_calls().len());
//!     }
//! }
//! ```

mod call_site;
pub mod error;
mod ir;
mod loader;

pub use call_site::{CallSite, CallSiteKind};
pub use error::{IrError, Result};
pub use ir::{Annotation, Controller, IrDocument, Method, MethodCall, Microservice, Service};
pub use loader::{load_document, validate_shape};
