//! # CLI Module
//!
//! Command-line access to a route table: recognize a path, generate a path
//! from a route name, or list what a table compiles to.
//!
//! ## Commands
//!
//! ### `recognize`
//!
//! Match a path and print the result as JSON:
//!
//! ```bash
//! brrtrecognizer recognize --routes routes.yaml '/users/42?tab=posts'
//! ```
//!
//! Exits with status 1 when no route matches.
//!
//! ### `generate`
//!
//! Build a path from a route name (or handler id with `--handler`):
//!
//! ```bash
//! brrtrecognizer generate --routes routes.yaml --route user --param id=42 --param tab=posts
//! ```
//!
//! Repeating a `--param` key produces a list value.
//!
//! ### `inspect`
//!
//! Print every route in the table with its handler, aliases and segment tally:
//!
//! ```bash
//! brrtrecognizer inspect --routes routes.yaml
//! ```
//!
//! `--routes` falls back to `BRRTR_ROUTES_FILE` for every command.

mod commands;


pub use commands::{execute, run_cli, Cli, CommandOutcome, Commands};
