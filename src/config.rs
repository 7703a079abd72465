//! # Configuration Module
//!
//! Environment-variable runtime settings for the recognizer, plus loading of
//! route tables from YAML, TOML or JSON files.
//!
//! ## Environment Variables
//!
//! ### `BRRTR_CASE_SENSITIVE`
//!
//! Default case sensitivity for routes that do not set `case_sensitive`
//! themselves. Accepts `true`/`false`/`1`/`0`. Default: `false`.
//!
//! ### `BRRTR_SLOW_MATCH_US`
//!
//! Recognition taking longer than this many microseconds is logged at `warn`.
//! Default: `1000` (1 ms).
//!
//! ### `BRRTR_ROUTES_FILE`
//!
//! Route table used by the `brrtrecognizer` binary when `--routes` is omitted.
//!
//! ## Route Tables
//!
//! ```yaml
//! routes:
//!   - path: /users/:id
//!     handler: { id: user, names: [user] }
//!   - path: /files/*path
//!     handler: { id: files }
//!     case_sensitive: true
//!   - path: /docs
//!     handler: { id: docs, names: [docs], href: "https://docs.example.com" }
//! ```
//!
//! ```rust,ignore
//! use brrtrecognizer::config::{load_route_table, RuntimeConfig};
//! use brrtrecognizer::Router;
//!
//! let config = RuntimeConfig::from_env();
//! let table = load_route_table("routes.yaml")?;
//! let router = Router::from_routes(&config, table.routes)?;
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::router::RouteConfig;

/// Default slow-match warning threshold in microseconds
pub const DEFAULT_SLOW_MATCH_US: u64 = 1_000;

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Case sensitivity for routes that leave `case_sensitive` unset
    pub default_case_sensitive: bool,
    /// Recognition slower than this is logged at `warn`
    pub slow_match_threshold: Duration,
    /// Route table file for the CLI
    pub routes_file: Option<PathBuf>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            default_case_sensitive: false,
            slow_match_threshold: Duration::from_micros(DEFAULT_SLOW_MATCH_US),
            routes_file: None,
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    ///
    /// Invalid values fall back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let default_case_sensitive = lookup("BRRTR_CASE_SENSITIVE")
            .and_then(|v| parse_bool(&v))
            .unwrap_or(defaults.default_case_sensitive);
        let slow_match_threshold = lookup("BRRTR_SLOW_MATCH_US")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_micros)
            .unwrap_or(defaults.slow_match_threshold);
        let routes_file = lookup("BRRTR_ROUTES_FILE")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        RuntimeConfig {
            default_case_sensitive,
            slow_match_threshold,
            routes_file,
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// A list of routes as stored on disk
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteTable {
    #[serde(default)]
    pub routes: Vec<RouteConfig>,
}

/// Supported route table encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Yaml,
    Toml,
    Json,
}

impl TableFormat {
    /// Pick a format from the file extension; unknown extensions are read as YAML
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .as_deref()
        {
            Some("toml") => TableFormat::Toml,
            Some("json") => TableFormat::Json,
            _ => TableFormat::Yaml,
        }
    }
}

/// Parse a route table from a string
pub fn parse_route_table(contents: &str, format: TableFormat) -> Result<RouteTable> {
    let table = match format {
        TableFormat::Yaml => {
            serde_yaml::from_str(contents).context("failed to parse YAML route table")?
        }
        TableFormat::Toml => toml::from_str(contents).context("failed to parse TOML route table")?,
        TableFormat::Json => {
            serde_json::from_str(contents).context("failed to parse JSON route table")?
        }
    };
    Ok(table)
}

/// Read and parse a route table file
pub fn load_route_table(path: impl AsRef<Path>) -> Result<RouteTable> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read route table {}", path.display()))?;
    let table = parse_route_table(&contents, TableFormat::from_path(path))
        .with_context(|| format!("invalid route table {}", path.display()))?;
    tracing::debug!(
        file = %path.display(),
        routes_count = table.routes.len(),
        "Route table loaded"
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = RuntimeConfig::from_lookup(lookup(&[]));
        assert_eq!(config, RuntimeConfig::default());
    }

    #[test]
    fn test_values_from_lookup() {
        let config = RuntimeConfig::from_lookup(lookup(&[
            ("BRRTR_CASE_SENSITIVE", "TRUE"),
            ("BRRTR_SLOW_MATCH_US", "250"),
            ("BRRTR_ROUTES_FILE", "routes.toml"),
        ]));
        assert!(config.default_case_sensitive);
        assert_eq!(config.slow_match_threshold, Duration::from_micros(250));
        assert_eq!(config.routes_file, Some(PathBuf::from("routes.toml")));
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = RuntimeConfig::from_lookup(lookup(&[
            ("BRRTR_CASE_SENSITIVE", "maybe"),
            ("BRRTR_SLOW_MATCH_US", "fast"),
            ("BRRTR_ROUTES_FILE", "  "),
        ]));
        assert_eq!(config, RuntimeConfig::default());
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(TableFormat::from_path(Path::new("r.TOML")), TableFormat::Toml);
        assert_eq!(TableFormat::from_path(Path::new("r.json")), TableFormat::Json);
        assert_eq!(TableFormat::from_path(Path::new("r.yml")), TableFormat::Yaml);
        assert_eq!(TableFormat::from_path(Path::new("routes")), TableFormat::Yaml);
    }

    #[test]
    fn test_parse_toml_table() {
        let table = parse_route_table(
            r#"
[[routes]]
path = "/users/:id"
handler = { id = "user", names = ["user"] }

[[routes]]
path = "/Files/*path"
case_sensitive = true
handler = { id = "files" }
"#,
            TableFormat::Toml,
        )
        .unwrap();
        assert_eq!(table.routes.len(), 2);
        assert_eq!(table.routes[0].handler.names, vec!["user".to_string()]);
        assert_eq!(table.routes[1].case_sensitive, Some(true));
        assert!(table.routes[1].handler.href.is_none());
    }

    #[test]
    fn test_parse_rejects_missing_handler() {
        let err = parse_route_table("routes:\n  - path: /a\n", TableFormat::Yaml);
        assert!(err.is_err());
    }
}
