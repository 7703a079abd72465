//! # brrtrecognizer
//!
//! **brrtrecognizer** is a URL route recognizer: it compiles path patterns
//! into one character-level NFA, matches concrete paths against it, and
//! generates paths back from route names.
//!
//! ## Overview
//!
//! Routes are registered as a pattern plus a handler description:
//!
//! - `users/:id` binds one component to `id`
//! - `posts/:slug?` makes the component optional
//! - `files/*path` binds the rest of the path, slashes included
//!
//! When several routes accept the same path, the most specific one wins:
//! fewer star segments first, then fewer dynamic segments, then more static
//! segments. Query strings are parsed into [`QueryParams`] and
//! percent-encoded paths are decoded before matching.
//!
//! ## Architecture
//!
//! - **[`router`]** - Pattern compilation, the shared automaton, recognition and generation
//! - **[`config`]** - Environment settings and route table files (YAML, TOML, JSON)
//! - **[`error`]** - [`RecognizerError`], returned by registration and generation
//! - **[`ids`]** - [`HandlerId`], the identity of a route target
//! - **[`logging`]** - `tracing` subscriber setup for the binary
//! - **[`cli`]** - The `brrtrecognizer` command-line tool
//!
//! ### Recognition Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Caller
//!     participant Router
//!     participant Nfa as NFA
//!     participant Regex as Capture Pattern
//!
//!     Caller->>Router: recognize("/users/42?tab=posts")
//!     Router->>Router: Split query, parse into QueryParams
//!     Router->>Router: Decode path, add leading /, drop trailing /
//!     Router->>Nfa: simulate("/users/42")
//!     Nfa-->>Router: Active states
//!     Router->>Router: Keep accepting states,<br/>sort by specificity
//!     Router->>Regex: captures(path)
//!     Regex-->>Router: {id: "42"}
//!     Router-->>Caller: RecognizeResults
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use brrtrecognizer::{RouteConfig, RouteHandler, RouteParams, Router};
//!
//! let mut router = Router::new();
//! router.add(RouteConfig::new("/posts/new", RouteHandler::named("new_post")))?;
//! router.add(RouteConfig::new("/posts/:id", RouteHandler::named("post")))?;
//!
//! let results = router.recognize("/posts/new").expect("route exists");
//! assert_eq!(results.first().unwrap().handler.id.as_str(), "new_post");
//!
//! let path = router.generate("post", &RouteParams::from([("id", "7")]))?;
//! assert_eq!(path, "/posts/7");
//! # Ok::<(), brrtrecognizer::RecognizerError>(())
//! ```
//!
//! ## Concurrency
//!
//! A [`Router`] is mutated only while routes are added. Once built, share it
//! read-only, or publish it through [`SharedRouter`] to swap in rebuilt
//! tables without blocking readers.

pub mod cli;
pub mod config;
pub mod error;
pub mod ids;
pub mod logging;
pub mod router;

pub use config::{load_route_table, RouteTable, RuntimeConfig};
pub use error::RecognizerError;
pub use ids::HandlerId;
pub use router::{
    QueryParams, QueryValue, RecognizeResults, RecognizedRoute, RouteConfig, RouteHandler,
    RouteParams, RouteRef, Router, SharedRouter,
};
