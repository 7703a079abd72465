use std::io::Write;
use std::process::Command;

const ROUTES: &str = r#"
routes:
  - path: /pets
    handler: { id: list_pets, names: [pets] }
  - path: /pets/:id
    handler: { id: get_pet, names: [pet] }
"#;

fn routes_file() -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    file.write_all(ROUTES.as_bytes()).unwrap();
    file
}

fn cli() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_brrtrecognizer"));
    cmd.env("BRRTR_LOG_LEVEL", "error")
        .env_remove("BRRTR_ROUTES_FILE")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_recognize_prints_json() {
    let file = routes_file();
    let output = cli()
        .arg("recognize")
        .arg("--routes")
        .arg(file.path())
        .arg("/pets/12")
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["routes"][0]["handler"]["id"], "get_pet");
    assert_eq!(json["routes"][0]["params"]["id"], "12");
}

#[test]
fn test_cli_recognize_no_match_exits_with_one() {
    let file = routes_file();
    let status = cli()
        .arg("recognize")
        .arg("--routes")
        .arg(file.path())
        .arg("/owners")
        .status()
        .expect("run cli");
    assert_eq!(status.code(), Some(1));
}

#[test]
fn test_cli_routes_file_from_env() {
    let file = routes_file();
    let output = cli()
        .env("BRRTR_ROUTES_FILE", file.path())
        .args(["generate", "--route", "pet", "--param", "id=3", "--param", "q=x y"])
        .output()
        .expect("run cli");
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "/pets/3?q=x+y");
}

#[test]
fn test_cli_without_routes_file_fails() {
    let status = cli().args(["inspect"]).status().expect("run cli");
    assert!(!status.success());
}
