use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::{load_route_table, RuntimeConfig};
use crate::ids::HandlerId;
use crate::router::{QueryValue, RouteParams, RouteRef, Router, SegmentTypes};

/// Command-line interface for brrtrecognizer
#[derive(Parser)]
#[command(name = "brrtrecognizer")]
#[command(about = "Route recognizer CLI", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Match a path against a route table and print the result as JSON
    Recognize {
        /// Route table file (YAML, TOML or JSON); defaults to `BRRTR_ROUTES_FILE`
        #[arg(short, long)]
        routes: Option<PathBuf>,

        /// Path to recognize, optionally with a query string
        path: String,
    },
    /// Generate a path for a named route
    Generate {
        /// Route table file (YAML, TOML or JSON); defaults to `BRRTR_ROUTES_FILE`
        #[arg(short, long)]
        routes: Option<PathBuf>,

        /// Route name (or handler id with --handler)
        #[arg(long)]
        route: String,

        /// Look the route up by handler id instead of by name
        #[arg(long, default_value_t = false)]
        handler: bool,

        /// Parameter as key=value; repeat a key for a list value
        #[arg(short, long = "param", value_parser = parse_key_val)]
        params: Vec<(String, String)>,
    },
    /// List the routes a table compiles to
    Inspect {
        /// Route table file (YAML, TOML or JSON); defaults to `BRRTR_ROUTES_FILE`
        #[arg(short, long)]
        routes: Option<PathBuf>,
    },
}

/// How a successfully executed command ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Success,
    /// `recognize` found no matching route
    NoMatch,
}

impl CommandOutcome {
    /// Process exit status for this outcome
    pub fn exit_code(self) -> i32 {
        match self {
            CommandOutcome::Success => 0,
            CommandOutcome::NoMatch => 1,
        }
    }
}

#[derive(Serialize)]
struct RouteSummary<'a> {
    path: &'a str,
    handler: &'a str,
    names: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    href: Option<&'a str>,
    types: SegmentTypes,
}

#[derive(Serialize)]
struct TableSummary<'a> {
    routes_count: usize,
    states_count: usize,
    routes: Vec<RouteSummary<'a>>,
}

/// Parse the process arguments and execute the command, writing to stdout
///
/// # Errors
///
/// Returns an error if the route table cannot be loaded or compiled, or if
/// generation fails.
pub fn run_cli() -> Result<CommandOutcome> {
    let cli = Cli::parse();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    execute(&cli, &mut out)
}

/// Execute a parsed command, writing its output to `out`
pub fn execute(cli: &Cli, out: &mut impl Write) -> Result<CommandOutcome> {
    let config = RuntimeConfig::from_env();
    match &cli.command {
        Commands::Recognize { routes, path } => {
            let router = build_router(&config, routes.as_deref())?;
            match router.recognize(path) {
                Some(results) => {
                    serde_json::to_writer_pretty(&mut *out, &results)?;
                    writeln!(out)?;
                    Ok(CommandOutcome::Success)
                }
                None => {
                    info!(path = %path, "No route matched");
                    Ok(CommandOutcome::NoMatch)
                }
            }
        }
        Commands::Generate {
            routes,
            route,
            handler,
            params,
        } => {
            let router = build_router(&config, routes.as_deref())?;
            let params = collect_params(params);
            let id;
            let target = if *handler {
                id = HandlerId::new(route.as_str());
                RouteRef::from(&id)
            } else {
                RouteRef::from(route)
            };
            let path = router.generate(target, &params)?;
            writeln!(out, "{}", path)?;
            Ok(CommandOutcome::Success)
        }
        Commands::Inspect { routes } => {
            let router = build_router(&config, routes.as_deref())?;
            let summary = TableSummary {
                routes_count: router.route_count(),
                states_count: router.state_count(),
                routes: router
                    .routes()
                    .filter_map(|record| {
                        let handler = record.primary_handler()?;
                        Some(RouteSummary {
                            path: &record.path,
                            handler: handler.id.as_str(),
                            names: &handler.names,
                            href: handler.href.as_deref(),
                            types: record.types,
                        })
                    })
                    .collect(),
            };
            serde_json::to_writer_pretty(&mut *out, &summary)?;
            writeln!(out)?;
            Ok(CommandOutcome::Success)
        }
    }
}

fn build_router(config: &RuntimeConfig, routes: Option<&Path>) -> Result<Router> {
    let routes = routes
        .or(config.routes_file.as_deref())
        .ok_or_else(|| anyhow!("no route table given: pass --routes or set BRRTR_ROUTES_FILE"))?;
    let table = load_route_table(routes)?;
    Router::from_routes(config, table.routes)
        .with_context(|| format!("failed to compile routes from {}", routes.display()))
}

/// Fold repeated `--param` keys into list values
fn collect_params(pairs: &[(String, String)]) -> RouteParams {
    let mut params = RouteParams::new();
    for (key, value) in pairs {
        let merged = match params.remove(key) {
            Some(QueryValue::List(mut items)) => {
                items.push(value.clone());
                QueryValue::List(items)
            }
            Some(QueryValue::Text(previous)) => QueryValue::List(vec![previous, value.clone()]),
            Some(QueryValue::Flag(_)) | None => QueryValue::Text(value.clone()),
        };
        params.insert(key.clone(), merged);
    }
    params
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid KEY=value: no `=` found in `{s}`"))?;
    if key.is_empty() {
        return Err(format!("invalid KEY=value: empty key in `{s}`"));
    }
    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_val() {
        assert_eq!(
            parse_key_val("id=42").unwrap(),
            ("id".to_string(), "42".to_string())
        );
        assert_eq!(
            parse_key_val("q=a=b").unwrap(),
            ("q".to_string(), "a=b".to_string())
        );
        assert_eq!(
            parse_key_val("empty=").unwrap(),
            ("empty".to_string(), String::new())
        );
        assert!(parse_key_val("novalue").is_err());
        assert!(parse_key_val("=1").is_err());
    }

    #[test]
    fn test_repeated_params_become_lists() {
        let pairs = vec![
            ("id".to_string(), "1".to_string()),
            ("tag".to_string(), "a".to_string()),
            ("tag".to_string(), "b".to_string()),
            ("tag".to_string(), "c".to_string()),
        ];
        let params = collect_params(&pairs);
        assert_eq!(params.get("id"), Some(&QueryValue::Text("1".to_string())));
        assert_eq!(
            params.get("tag"),
            Some(&QueryValue::from(vec!["a", "b", "c"]))
        );
    }
}
