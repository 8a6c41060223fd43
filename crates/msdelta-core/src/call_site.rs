//! The call-site capability shared by controllers and services.

use crate::ir::{Controller, MethodCall, Service};

/// Which kind of class a call site is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallSiteKind {
    Controller,
    Service,
}

impl std::fmt::Display for CallSiteKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Controller => "controller",
            Self::Service => "service",
        };
        write!(f, "{}", s)
    }
}

/// Anything that issues method calls.
pub trait CallSite {
    fn kind(&self) -> CallSiteKind;

    fn method_calls(&self) -> &[MethodCall];

    /// Interface types this class implements.
    fn structural_type_names(&self) -> &[String];

    fn own_name(&self) -> &str;

    /// Class name recorded on requests issued from this site.
    ///
    /// A class implementing exactly one interface is identified by that
    /// interface, otherwise by its own name.
    fn caller_class_name(&self) -> &str {
        match self.structural_type_names() {
            [only] => only.as_str(),
            _ => self.own_name(),
        }
    }
}

impl CallSite for Controller {
    fn kind(&self) -> CallSiteKind {
        CallSiteKind::Controller
    }

    fn method_calls(&self) -> &[MethodCall] {
        &self.method_calls
    }

    fn structural_type_names(&self) -> &[String] {
        &self.implemented_types
    }

    fn own_name(&self) -> &str {
        &self.name
    }
}

impl CallSite for Service {
    fn kind(&self) -> CallSiteKind {
        CallSiteKind::Service
    }

    fn method_calls(&self) -> &[MethodCall] {
        &self.method_calls
    }

    fn structural_type_names(&self) -> &[String] {
        &self.implemented_types
    }

    fn own_name(&self) -> &str {
        &self.name
    }
}
