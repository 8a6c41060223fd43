use msdelta_core::Microservice;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// Metadata of a routed method, as seen by callers.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodEntry {
    /// Microservice that owns the route.
    pub microservice: String,
    pub parameters: Value,
    pub return_type: String,
    pub method_name: String,
    pub class_name: String,
    pub http_method: Option<String>,
}

/// Route table for one snapshot.
///
/// Maps a URL to the controller method serving it. At most one entry
/// exists per URL; registering a URL twice keeps the later method.
#[derive(Debug, Default, Clone)]
pub struct MethodIndex {
    by_url: HashMap<String, MethodEntry>,
}

impl MethodIndex {
    /// Creates a new empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Indexes every controller method of every microservice.
    ///
    /// Walks microservices, controllers and methods in input order so that
    /// the last duplicate route wins deterministically. Methods without any
    /// route are skipped.
    pub fn from_microservices(microservices: &[Microservice]) -> Self {
        let mut index = Self::new();

        for ms in microservices {
            for controller in &ms.controllers {
                for method in &controller.methods {
                    let Some(url) = method.route() else {
                        debug!("{}::{} has no route", ms.name, method.name);
                        continue;
                    };

                    index.insert(
                        url,
                        MethodEntry {
                            microservice: ms.name.clone(),
                            parameters: method.parameters.clone(),
                            return_type: method.return_type.clone(),
                            method_name: method.name.clone(),
                            class_name: method.class_name.clone(),
                            http_method: method.http_method.clone(),
                        },
                    );
                }
            }
        }

        index
    }

    /// Registers a route, returning the entry it replaced.
    pub fn insert(&mut self, url: String, entry: MethodEntry) -> Option<MethodEntry> {
        let previous = self.by_url.insert(url, entry);
        if let Some(ref old) = previous {
            debug!(
                "Route registered by {}::{} was overwritten",
                old.microservice, old.method_name
            );
        }
        previous
    }

    /// Resolves a URL to the method serving it.
    pub fn resolve(&self, url: &str) -> Option<&MethodEntry> {
        self.by_url.get(url)
    }

    pub fn len(&self) -> usize {
        self.by_url.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_url.is_empty()
    }
}
