//! Router core module: route compilation, recognition and generation.

use regex::RegexBuilder;
use serde::Serialize;
use smallvec::SmallVec;
use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::nfa::{Acceptance, Nfa, StateId, ROOT};
use super::params::{
    build_query_string, decode_path, parse_query_string, Params, QueryParams, RouteParams,
};
use super::route::{HandlerEntry, RouteConfig, RouteHandler, RouteRecord, RouteRef};
use super::segment::{parse_route, CharSpec, Segment, SegmentTypes};
use crate::config::RuntimeConfig;
use crate::error::RecognizerError;
use crate::ids::HandlerId;

/// One handler matched by [`Router::recognize`]
#[derive(Debug, Clone, Serialize)]
pub struct RecognizedRoute {
    pub handler: Arc<RouteHandler>,
    /// Parameters bound from the path (e.g., `:id` → `{"id": "123"}`)
    pub params: Params,
    /// Whether the handler's route declares any named parameters
    pub is_dynamic: bool,
}

impl RecognizedRoute {
    /// Get a bound path parameter by name
    #[inline]
    #[must_use]
    pub fn get_param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }
}

/// Result batch of a successful recognition
///
/// Holds one [`RecognizedRoute`] per handler registered on the winning
/// accepting state, plus the query string of the recognized path.
#[derive(Debug, Clone, Serialize)]
pub struct RecognizeResults {
    pub routes: Vec<RecognizedRoute>,
    pub query_params: QueryParams,
}

impl RecognizeResults {
    #[must_use]
    pub fn first(&self) -> Option<&RecognizedRoute> {
        self.routes.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RecognizedRoute> {
        self.routes.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl<'a> IntoIterator for &'a RecognizeResults {
    type Item = &'a RecognizedRoute;
    type IntoIter = std::slice::Iter<'a, RecognizedRoute>;

    fn into_iter(self) -> Self::IntoIter {
        self.routes.iter()
    }
}

/// Route recognizer backed by a character-level NFA
///
/// Every registered pattern is merged into one shared automaton. Recognition
/// walks the automaton once per character of the path, so its cost depends on
/// the path length and the number of simultaneously active states, not on the
/// number of registered routes.
///
/// Registration (`add`) needs `&mut self`; recognition and generation only
/// read. For concurrent serving, build the router first and publish it through
/// [`SharedRouter`](super::SharedRouter).
#[derive(Clone, Debug)]
pub struct Router {
    nfa: Nfa,
    /// Records indexed by alias; the first registration of an alias wins
    names: HashMap<String, Arc<RouteRecord>>,
    /// Records indexed by handler id; the last registration wins
    handlers: HashMap<HandlerId, Arc<RouteRecord>>,
    /// Every record in registration order
    records: Vec<Arc<RouteRecord>>,
    default_case_sensitive: bool,
    slow_match_threshold: Duration,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    /// Create an empty router with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&RuntimeConfig::default())
    }

    /// Create an empty router using runtime settings
    #[must_use]
    pub fn with_config(config: &RuntimeConfig) -> Self {
        Self {
            nfa: Nfa::new(),
            names: HashMap::new(),
            handlers: HashMap::new(),
            records: Vec::new(),
            default_case_sensitive: config.default_case_sensitive,
            slow_match_threshold: config.slow_match_threshold,
        }
    }

    /// Build a router from a list of routes
    pub fn from_routes(
        config: &RuntimeConfig,
        routes: impl IntoIterator<Item = RouteConfig>,
    ) -> Result<Self, RecognizerError> {
        let mut router = Self::with_config(config);
        router.add_all(routes)?;
        info!(
            routes_count = router.route_count(),
            states_count = router.state_count(),
            "Routing table loaded"
        );
        Ok(router)
    }

    /// Number of successfully registered routes
    #[must_use]
    pub fn route_count(&self) -> usize {
        self.records.len()
    }

    /// Number of automaton states, the root included
    #[must_use]
    pub fn state_count(&self) -> usize {
        self.nfa.state_count()
    }

    /// Registered routes in registration order
    pub fn routes(&self) -> impl Iterator<Item = &RouteRecord> {
        self.records.iter().map(|r| r.as_ref())
    }

    /// Register several routes in order
    ///
    /// Stops at the first rejected route; routes before it stay registered.
    pub fn add_all(
        &mut self,
        routes: impl IntoIterator<Item = RouteConfig>,
    ) -> Result<(), RecognizerError> {
        for route in routes {
            self.add(route)?;
        }
        Ok(())
    }

    /// Compile one route into the shared automaton
    ///
    /// The whole pattern is parsed before any state is created, so a rejected
    /// route leaves the router untouched.
    ///
    /// # Errors
    ///
    /// * `DefaultValueNotSupported` - a dynamic segment is written `:name=value`
    /// * `InvalidPattern` - the capture pattern could not be compiled
    pub fn add(&mut self, route: RouteConfig) -> Result<(), RecognizerError> {
        let case_sensitive = route.case_sensitive.unwrap_or(self.default_case_sensitive);
        let parsed = parse_route(&route.path, case_sensitive)?;

        for (i, name) in parsed.names.iter().enumerate() {
            if parsed.names[..i].contains(name) {
                warn!(
                    route = %route.path,
                    param = %name,
                    "Duplicate parameter name; the last capture wins"
                );
            }
        }

        // Compile the capture pattern up front so a failure leaves no states behind.
        let mut pattern = String::with_capacity(route.path.len() + 16);
        pattern.push('^');
        for segment in parsed.segments.iter().filter(|s| !matches!(s, Segment::Epsilon)) {
            if segment.is_optional() {
                pattern.push_str("(?:/");
                pattern.push_str(&segment.pattern_fragment());
                pattern.push_str(")?");
            } else {
                pattern.push('/');
                pattern.push_str(&segment.pattern_fragment());
            }
        }
        let is_empty = parsed
            .segments
            .iter()
            .all(|s| matches!(s, Segment::Epsilon) || s.is_optional());
        if is_empty {
            pattern.push_str("/?");
        }
        pattern.push('$');

        let regex = RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| RecognizerError::InvalidPattern {
                route: route.path.clone(),
                reason: e.to_string(),
            })?;

        let mut current: StateId = ROOT;
        let mut skippable: SmallVec<[StateId; 4]> = SmallVec::new();

        for segment in parsed.segments.iter() {
            if matches!(segment, Segment::Epsilon) {
                continue;
            }

            let first = self.nfa.put(current, CharSpec::separator());
            let mut next = first;
            for spec in segment.char_specs() {
                next = self.nfa.put(next, spec);
            }

            for &state in &skippable {
                self.nfa.link(state, first);
            }

            if segment.is_optional() {
                skippable.push(next);
            } else {
                current = next;
                skippable.clear();
            }
        }

        if is_empty {
            current = self.nfa.put(current, CharSpec::separator());
        }

        let handler = Arc::new(route.handler);
        let entries: Arc<[HandlerEntry]> = Arc::from(vec![HandlerEntry {
            handler: Arc::clone(&handler),
            names: Arc::from(parsed.names),
        }]);
        let acceptance = Acceptance {
            handlers: Arc::clone(&entries),
            regex: Arc::new(regex),
            pattern: Arc::from(pattern),
            types: parsed.types,
        };

        for &state in &skippable {
            self.nfa.accept(state, acceptance.clone());
        }
        self.nfa.accept(current, acceptance);

        let record = Arc::new(RouteRecord {
            path: route.path,
            segments: Arc::from(parsed.segments),
            types: parsed.types,
            handlers: entries,
        });
        for name in &handler.names {
            self.names
                .entry(name.clone())
                .or_insert_with(|| Arc::clone(&record));
        }
        self.handlers.insert(handler.id.clone(), Arc::clone(&record));
        self.records.push(Arc::clone(&record));

        debug!(
            route = %record.path,
            handler = %handler.id,
            statics = parsed.types.statics,
            dynamics = parsed.types.dynamics,
            stars = parsed.types.stars,
            accepting_states = skippable.len() + 1,
            "Route registered"
        );

        Ok(())
    }

    /// Match a path against every registered route
    ///
    /// The path may carry a `?query` suffix and percent-encoding. A trailing
    /// `/` is ignored unless the winning route ends in a star segment, which
    /// then captures it.
    ///
    /// # Returns
    ///
    /// * `Some(RecognizeResults)` - the winning route's handlers and the query string
    /// * `None` - no route matches (or the path does not decode to UTF-8)
    #[must_use]
    pub fn recognize(&self, path: &str) -> Option<RecognizeResults> {
        debug!(path = %path, "Route match attempt");
        let match_start = Instant::now();

        let (raw_path, query_params) = match path.find('?') {
            Some(pos) => (&path[..pos], parse_query_string(&path[pos + 1..])),
            None => (path, QueryParams::new()),
        };

        let Some(decoded) = decode_path(raw_path) else {
            debug!(path = %path, "Path does not percent-decode to UTF-8");
            return None;
        };
        let mut normalized = if decoded.starts_with('/') {
            decoded.into_owned()
        } else {
            format!("/{decoded}")
        };
        let mut slash_dropped = false;
        if normalized.len() > 1 && normalized.ends_with('/') {
            normalized.pop();
            slash_dropped = true;
        }

        let active = self.nfa.simulate(&normalized);
        let mut solutions: SmallVec<[&Acceptance; 4]> = active
            .iter()
            .filter_map(|&id| self.nfa.state(id).accept.as_ref())
            .collect();
        solutions.sort_by(|a, b| compare_specificity(&a.types, &b.types));

        let mut matched = None;
        for candidate in solutions.iter() {
            let subject = if slash_dropped && candidate.pattern.ends_with(STAR_SUFFIX) {
                Cow::Owned(format!("{normalized}/"))
            } else {
                Cow::Borrowed(normalized.as_str())
            };
            match candidate.regex.captures(&subject) {
                Some(captures) => {
                    matched = Some(bind_captures(candidate, &captures));
                    break;
                }
                None => warn!(
                    path = %path,
                    pattern = %candidate.pattern,
                    "Automaton accepted a path its capture pattern rejects"
                ),
            }
        }

        let Some(routes) = matched else {
            debug!(
                path = %path,
                candidates = solutions.len(),
                duration_us = match_start.elapsed().as_micros(),
                "No route matched"
            );
            return None;
        };

        let match_duration = match_start.elapsed();
        let handler = routes.first().map(|r| r.handler.id.to_string()).unwrap_or_default();
        if match_duration > self.slow_match_threshold {
            warn!(
                path = %path,
                handler = %handler,
                candidates = solutions.len(),
                duration_us = match_duration.as_micros(),
                "Slow route matching detected"
            );
        } else {
            debug!(
                path = %path,
                handler = %handler,
                candidates = solutions.len(),
                duration_us = match_duration.as_micros(),
                "Route matched"
            );
        }

        Some(RecognizeResults {
            routes,
            query_params,
        })
    }

    /// Resolve a route record by name or handler id
    #[must_use]
    pub fn get_route<'a>(&self, route: impl Into<RouteRef<'a>>) -> Option<&RouteRecord> {
        let record = match route.into() {
            RouteRef::Name(name) => self.names.get(name),
            RouteRef::Handler(id) => self.handlers.get(id),
        };
        record.map(|r| r.as_ref())
    }

    #[must_use]
    pub fn has_route<'a>(&self, route: impl Into<RouteRef<'a>>) -> bool {
        self.get_route(route).is_some()
    }

    /// Handlers registered for a route
    ///
    /// # Errors
    ///
    /// `UnknownRoute` if nothing is registered under the name or handler id.
    pub fn handlers_for<'a>(
        &self,
        route: impl Into<RouteRef<'a>>,
    ) -> Result<Vec<RouteHandler>, RecognizerError> {
        let route = route.into();
        let record = self
            .get_route(route)
            .ok_or_else(|| RecognizerError::UnknownRoute {
                route: route.to_string(),
            })?;
        Ok(record
            .handlers
            .iter()
            .map(|entry| entry.handler.as_ref().clone())
            .collect())
    }

    /// Build a concrete path for a route
    ///
    /// Dynamic and star segments take their value from `params`; everything
    /// left over is appended as a query string with sorted keys. Values are
    /// written into the path as given.
    ///
    /// # Errors
    ///
    /// * `UnknownRoute` - nothing is registered under the name or handler id
    /// * `MissingParameter` - a required segment has no value in `params`
    pub fn generate<'a>(
        &self,
        route: impl Into<RouteRef<'a>>,
        params: &RouteParams,
    ) -> Result<String, RecognizerError> {
        let route = route.into();
        let record = self
            .get_route(route)
            .ok_or_else(|| RecognizerError::UnknownRoute {
                route: route.to_string(),
            })?;

        if let Some(href) = record.primary_handler().and_then(|h| h.href.as_ref()) {
            debug!(route = %route, href = %href, "Route generation uses href");
            return Ok(href.clone());
        }

        let mut consumed: SmallVec<[Arc<str>; 8]> = SmallVec::new();
        let mut output = String::with_capacity(record.path.len() + 8);

        for segment in record.segments.iter() {
            if matches!(segment, Segment::Epsilon) {
                continue;
            }
            match segment.render(params, &mut consumed) {
                Some(value) => {
                    output.push('/');
                    output.push_str(&value);
                }
                None if segment.is_optional() => {}
                None => {
                    return Err(RecognizerError::MissingParameter {
                        param: segment.name().map(|n| n.to_string()).unwrap_or_default(),
                        route: route.to_string(),
                    });
                }
            }
        }

        if !output.starts_with('/') {
            output.insert(0, '/');
        }

        let query = build_query_string(
            params
                .iter()
                .filter(|(key, _)| !consumed.iter().any(|c| c.as_ref() == *key)),
        );
        if !query.is_empty() {
            output.push('?');
            output.push_str(&query);
        }

        debug!(route = %route, path = %output, "Route generated");
        Ok(output)
    }
}

/// Pattern suffix of routes ending in a star segment (`STAR_FRAGMENT` + `$`)
const STAR_SUFFIX: &str = "(.+)$";

/// Assign capture groups to each handler's names, in registration order
fn bind_captures(
    acceptance: &Acceptance,
    captures: &regex::Captures<'_>,
) -> Vec<RecognizedRoute> {
    let mut routes = Vec::with_capacity(acceptance.handlers.len());
    let mut capture_index = 1;
    for entry in acceptance.handlers.iter() {
        let mut params = Params::new();
        for name in entry.names.iter() {
            match captures.get(capture_index) {
                Some(value) => params.insert(Arc::clone(name), value.as_str().to_string()),
                None => {
                    params.remove(name);
                }
            }
            capture_index += 1;
        }
        routes.push(RecognizedRoute {
            handler: Arc::clone(&entry.handler),
            params,
            is_dynamic: !entry.names.is_empty(),
        });
    }
    routes
}

/// Disambiguation order between accepting states (lower wins)
///
/// Fewer stars first. Between star routes, more statics and then more
/// dynamics win; otherwise fewer dynamics and then more statics win.
pub(crate) fn compare_specificity(a: &SegmentTypes, b: &SegmentTypes) -> Ordering {
    a.stars
        .cmp(&b.stars)
        .then_with(|| {
            if a.stars > 0 {
                b.statics
                    .cmp(&a.statics)
                    .then_with(|| b.dynamics.cmp(&a.dynamics))
            } else {
                Ordering::Equal
            }
        })
        .then_with(|| a.dynamics.cmp(&b.dynamics))
        .then_with(|| b.statics.cmp(&a.statics))
}
