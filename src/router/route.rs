use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use super::segment::{Segment, SegmentTypes};
use crate::ids::HandlerId;

/// The target a route resolves to
///
/// `names` are the aliases the route can be generated by. When `href` is set,
/// generation returns it verbatim instead of replaying the pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteHandler {
    pub id: HandlerId,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub names: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

impl RouteHandler {
    pub fn new(id: impl Into<HandlerId>) -> Self {
        Self {
            id: id.into(),
            names: Vec::new(),
            href: None,
        }
    }

    /// Handler whose id doubles as its only route name
    pub fn named(name: &str) -> Self {
        Self::new(name).with_name(name)
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.names.push(name.into());
        self
    }

    #[must_use]
    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }
}

/// One route to register: a pattern plus the handler it resolves to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteConfig {
    pub path: String,
    pub handler: RouteHandler,
    /// `None` falls back to the router's configured default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_sensitive: Option<bool>,
}

impl RouteConfig {
    pub fn new(path: impl Into<String>, handler: RouteHandler) -> Self {
        Self {
            path: path.into(),
            handler,
            case_sensitive: None,
        }
    }

    #[must_use]
    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = Some(case_sensitive);
        self
    }
}

/// A handler together with the parameter names its route declares
#[derive(Debug, Clone)]
pub struct HandlerEntry {
    pub handler: Arc<RouteHandler>,
    pub names: Arc<[Arc<str>]>,
}

/// Everything generation needs to know about one registered route
#[derive(Debug, Clone)]
pub struct RouteRecord {
    /// The pattern as registered
    pub path: String,
    pub segments: Arc<[Segment]>,
    pub types: SegmentTypes,
    pub handlers: Arc<[HandlerEntry]>,
}

impl RouteRecord {
    /// Handler used for `href` overrides and reporting
    #[must_use]
    pub fn primary_handler(&self) -> Option<&RouteHandler> {
        self.handlers.first().map(|entry| entry.handler.as_ref())
    }
}

/// Lookup key for generation: a route name or a handler id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteRef<'a> {
    Name(&'a str),
    Handler(&'a HandlerId),
}

impl<'a> From<&'a str> for RouteRef<'a> {
    fn from(name: &'a str) -> Self {
        RouteRef::Name(name)
    }
}

impl<'a> From<&'a String> for RouteRef<'a> {
    fn from(name: &'a String) -> Self {
        RouteRef::Name(name)
    }
}

impl<'a> From<&'a HandlerId> for RouteRef<'a> {
    fn from(id: &'a HandlerId) -> Self {
        RouteRef::Handler(id)
    }
}

impl<'a> From<&'a RouteHandler> for RouteRef<'a> {
    fn from(handler: &'a RouteHandler) -> Self {
        RouteRef::Handler(&handler.id)
    }
}

impl fmt::Display for RouteRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteRef::Name(name) => f.write_str(name),
            RouteRef::Handler(id) => write!(f, "{}", id),
        }
    }
}
