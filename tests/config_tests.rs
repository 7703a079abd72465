use brrtrecognizer::{load_route_table, RouteHandler, Router, RuntimeConfig};
use std::io::Write;
use std::time::Duration;

fn write_table(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_yaml_table() {
    let file = write_table(
        ".yaml",
        r#"
routes:
  - path: /users/:id
    handler:
      id: user
      names: [user, profile]
  - path: /Docs
    handler: { id: docs, href: "https://docs.example.com" }
    case_sensitive: true
"#,
    );
    let table = load_route_table(file.path()).unwrap();
    assert_eq!(table.routes.len(), 2);
    assert_eq!(
        table.routes[0].handler,
        RouteHandler::new("user").with_name("user").with_name("profile")
    );
    assert_eq!(table.routes[0].case_sensitive, None);
    assert_eq!(table.routes[1].case_sensitive, Some(true));
    assert_eq!(
        table.routes[1].handler.href.as_deref(),
        Some("https://docs.example.com")
    );
}

#[test]
fn test_load_toml_table() {
    let file = write_table(
        ".toml",
        r#"
[[routes]]
path = "/files/*path"

[routes.handler]
id = "files"
names = ["files"]
"#,
    );
    let table = load_route_table(file.path()).unwrap();
    let router = Router::from_routes(&RuntimeConfig::default(), table.routes).unwrap();
    let results = router.recognize("/files/a/b.txt").unwrap();
    assert_eq!(results.first().unwrap().get_param("path"), Some("a/b.txt"));
}

#[test]
fn test_load_json_table() {
    let file = write_table(
        ".json",
        r#"{"routes": [{"path": "/ping", "handler": {"id": "ping", "names": ["ping"]}}]}"#,
    );
    let table = load_route_table(file.path()).unwrap();
    assert_eq!(table.routes[0].path, "/ping");
}

#[test]
fn test_invalid_table_is_an_error() {
    let file = write_table(".yaml", "routes:\n  - path: /x\n    handler: { id: \"\" }\n");
    let err = load_route_table(file.path()).unwrap_err();
    assert!(format!("{err:#}").contains("invalid route table"));

    let err = load_route_table("/no/such/routes.yaml").unwrap_err();
    assert!(format!("{err:#}").contains("failed to read route table"));
}

#[test]
fn test_runtime_config_applies_to_router() {
    let config = RuntimeConfig::from_lookup(|key| match key {
        "BRRTR_CASE_SENSITIVE" => Some("1".to_string()),
        "BRRTR_SLOW_MATCH_US" => Some("50".to_string()),
        _ => None,
    });
    assert_eq!(config.slow_match_threshold, Duration::from_micros(50));

    let file = write_table(
        ".yaml",
        "routes:\n  - path: /Exact\n    handler: { id: exact, names: [exact] }\n",
    );
    let table = load_route_table(file.path()).unwrap();
    let router = Router::from_routes(&config, table.routes).unwrap();
    assert!(router.recognize("/Exact").is_some());
    assert!(router.recognize("/exact").is_none());
}

#[test]
fn test_rejected_route_fails_the_table() {
    let file = write_table(
        ".yaml",
        "routes:\n  - path: /users/:id=1\n    handler: { id: user }\n",
    );
    let table = load_route_table(file.path()).unwrap();
    let err = Router::from_routes(&RuntimeConfig::default(), table.routes).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Parameter id=1 in route /users/:id=1 has a default value, which is not supported."
    );
}
