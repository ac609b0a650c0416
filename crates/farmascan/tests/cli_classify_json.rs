mod cli_support;

use cli_support::{parse_json_value, run_cli, run_cli_json, run_cli_json_value, TestHome};
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
struct ClassifyOutput {
    sanitized: String,
    symbology: String,
    outcome: serde_json::Value,
    action: serde_json::Value,
}

#[test]
fn test_classify_deep_link() {
    let home = TestHome::new();
    let out: ClassifyOutput = run_cli_json(
        &["classify", "myfarmaciafrontend://detalle?id=AB12-cd_34", "--json"],
        &home,
    );
    assert_eq!(out.outcome["kind"], "deep_link");
    assert_eq!(out.outcome["path"], "detalle");
    let params: BTreeMap<String, String> =
        serde_json::from_value(out.outcome["params"].clone()).unwrap();
    assert_eq!(params.get("id").map(String::as_str), Some("AB12-cd_34"));
    assert_eq!(out.action["action"], "navigate");
    assert_eq!(out.action["route"], "/detalle");
}

#[test]
fn test_classify_external_url_requires_confirmation() {
    let home = TestHome::new();
    let out: ClassifyOutput =
        run_cli_json(&["classify", "https://api.example.com/p/1", "--json"], &home);
    assert_eq!(out.outcome["kind"], "external_url");
    assert_eq!(out.outcome["url"], "https://api.example.com/p/1");
    assert_eq!(out.action["action"], "confirm_external");
    assert_eq!(out.action["host"], "api.example.com");
}

#[test]
fn test_classify_record_lookup_with_symbology() {
    let home = TestHome::new();
    let out: ClassifyOutput = run_cli_json(
        &["classify", "AB12-CD34", "--symbology", "ean13", "--json"],
        &home,
    );
    assert_eq!(out.symbology, "ean13");
    assert_eq!(out.outcome["kind"], "record_lookup");
    assert_eq!(out.outcome["id"], "AB12-CD34");
    assert_eq!(out.outcome["symbology"], "ean13");
    assert_eq!(out.action["params"]["symbology"], "ean13");
}

#[test]
fn test_classify_rejections() {
    let home = TestHome::new();
    let cases = [
        ("http://insecure.example.com", "unsupported"),
        ("\t\n\r", "invalid_format"),
        ("myfarmaciafrontend://admin?id=ABCD1234", "unknown_deep_link"),
        ("myfarmaciafrontend://detalle?id=x", "invalid_deep_link_param"),
    ];
    for (payload, reason) in cases {
        let out: ClassifyOutput = run_cli_json(&["classify", payload, "--json"], &home);
        assert_eq!(out.outcome["kind"], "rejected", "payload {:?}", payload);
        assert_eq!(out.outcome["reason"], reason, "payload {:?}", payload);
        assert_eq!(out.action["action"], "alert");
    }
}

#[test]
fn test_classify_reports_sanitized_payload() {
    let home = TestHome::new();
    let out: ClassifyOutput =
        run_cli_json(&["classify", "\u{FEFF}  AB12-CD34\u{0007} ", "--json"], &home);
    assert_eq!(out.sanitized, "AB12-CD34");
}

#[test]
fn test_classify_uses_home_config() {
    let home = TestHome::new();
    home.write_config(
        r#"
app_scheme = "otraapp"
allowed_deep_link_paths = ["receta"]
"#,
    );
    let value = run_cli_json_value(&["classify", "otraapp://receta?id=RX-0001", "--json"], &home);
    assert_eq!(value["outcome"]["kind"], "deep_link");
    assert_eq!(value["outcome"]["path"], "receta");
}

#[test]
fn test_classify_human_output() {
    let home = TestHome::new();
    let output = run_cli(&["classify", "AB12-CD34"], &home);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("record AB12-CD34 (qr)"));
    assert!(stdout.contains("navigate /detalle?id=AB12-CD34&symbology=qr"));
}

#[test]
fn test_invalid_config_fails_with_json_error() {
    let home = TestHome::new();
    home.write_config("app_scheme = \"https\"\n");
    let output = run_cli(&["classify", "AB12-CD34", "--json"], &home);
    assert!(!output.status.success());
    let value = parse_json_value(&output);
    assert!(value["error"]
        .as_str()
        .unwrap()
        .contains("Invalid config file"));
    assert!(value["suggestions"].as_array().is_some());
}

#[test]
fn test_missing_explicit_config_fails() {
    let home = TestHome::new();
    let missing = home.dir.path().join("nope.toml");
    let missing = missing.to_string_lossy().to_string();
    let output = run_cli(&["--config", &missing, "classify", "AB12-CD34"], &home);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Config file not found"));
}
