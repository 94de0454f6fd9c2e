//! End-to-end checks of the command line front end

use std::io::Write;
use std::process::{Command, Output};

use tempfile::NamedTempFile;

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tpf2-fielddata"))
        .args(args)
        // Keep a user config file from changing the results
        .env("TPF2_FIELDDATA_CONFIG", "/nonexistent/tpf2-fielddata.json")
        .output()
        .expect("failed to run binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn json_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_encode_commands() {
    let output = run(&["encode", "-1"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "FFFFFFFF");

    let output = run(&["encode-reg", "AB"]);
    assert_eq!(stdout(&output), "000000AB");
}

#[test]
fn test_decode_commands() {
    let output = run(&["decode", "wcLD"]);
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value, serde_json::json!(["C1C2C3", 12698307, "ABC"]));

    let output = run(&["decode-hex", "8000"]);
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value[1], serde_json::json!(-32768));
}

#[test]
fn test_record_id_command() {
    let output = run(&["rec-id", "C6C6"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "50886");

    assert!(!run(&["rec-id", "C6C"]).status.success());
}

#[test]
fn test_invalid_token_fails() {
    let output = run(&["encode", "-2147483649"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).starts_with("Error:"));
}

#[test]
fn test_fields_with_catalog() {
    let catalog = json_file(
        r#"[{"label": "EBW000", "name": "EB0EB", "length": 1},
            {"label": "EBW001", "name": "EB0EB", "length": 1}]"#,
    );
    let output = run(&[
        "fields",
        "EBW000:'A,EBW001:01",
        "--catalog",
        catalog.path().to_str().unwrap(),
    ]);
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(
        value,
        serde_json::json!({"macro_name": "EB0EB", "field_data": {"EBW000": "wQ==", "EBW001": "AQ=="}})
    );
}

#[test]
fn test_sixteen_bit_config_file() {
    let config = json_file(r#"{"reg_bits": 16}"#);
    let output = run(&["--config", config.path().to_str().unwrap(), "encode", "-1"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "FFFF");
}
