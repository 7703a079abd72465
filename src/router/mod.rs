//! # Router Module
//!
//! The router module compiles URL path patterns into a shared character-level
//! automaton, recognizes concrete paths against it, and generates paths back
//! from route names or handler ids.
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Compiling patterns (`/users/:id`, `/posts/:slug?`, `/files/*path`) into one NFA
//! - Matching incoming paths and choosing a single winner among overlapping routes
//! - Extracting path parameters and query-string parameters
//! - Generating paths from a route name (or handler id) and a parameter set
//!
//! ## Pattern Syntax
//!
//! Per `/`-delimited component:
//!
//! | Component | Segment | Matches |
//! |-----------|---------|---------|
//! | `users`   | static  | the literal, case-insensitive unless the route is case-sensitive |
//! | `:id`     | dynamic | one run of characters without `/` |
//! | `:id?`    | optional dynamic | the same, or nothing |
//! | `*path`   | star    | the rest of the path, `/` included |
//! | (empty)   | epsilon | nothing |
//!
//! `:name=value` (a default value) is rejected at registration.
//!
//! ## Architecture
//!
//! 1. **Compilation**: each pattern is split into [`Segment`]s, every segment
//!    is expanded into [`CharSpec`]s and folded into the shared automaton
//!    behind a `/` boundary. Routes sharing a literal prefix share states.
//!    Optional segments leave "skippable" states that link straight to the
//!    next segment's boundary.
//!
//! 2. **Matching**: the path is walked one character at a time over the set of
//!    active states. Accepting states left at the end are ordered by
//!    specificity (fewer stars, then fewer dynamics, then more statics) and
//!    the winner's anchored capture pattern extracts the parameters.
//!
//! 3. **Generation**: the winner-independent route record replays its segment
//!    list with the caller's values; leftovers become a sorted query string.
//!
//! ## Example
//!
//! ```rust
//! use brrtrecognizer::router::{RouteConfig, RouteHandler, RouteParams, Router};
//!
//! let mut router = Router::new();
//! router
//!     .add(RouteConfig::new("/users/:id", RouteHandler::named("user")))
//!     .unwrap();
//!
//! let results = router.recognize("/users/42?tab=posts").unwrap();
//! let matched = results.first().unwrap();
//! assert_eq!(matched.get_param("id"), Some("42"));
//! assert_eq!(results.query_params.get_text("tab"), Some("posts"));
//!
//! let path = router
//!     .generate("user", &RouteParams::from([("id", "42"), ("tab", "posts")]))
//!     .unwrap();
//! assert_eq!(path, "/users/42?tab=posts");
//! ```

mod core;
mod nfa;
mod params;
mod route;
mod segment;
mod shared;

pub use self::core::{RecognizeResults, RecognizedRoute, Router};
pub use params::{
    build_query_string, decode_path, parse_query_string, ParamVec, Params, QueryParams,
    QueryValue, RouteParams, MAX_INLINE_PARAMS,
};
pub use route::{HandlerEntry, RouteConfig, RouteHandler, RouteRecord, RouteRef};
pub use segment::{CharClass, CharSpec, Segment, SegmentTypes};
pub use shared::SharedRouter;
