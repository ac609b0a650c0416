#![allow(dead_code)]

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

pub fn farmascan_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_farmascan"))
}

/// Isolated home directory so tests never touch ~/.farmascan.
pub struct TestHome {
    pub dir: TempDir,
}

impl TestHome {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp home"),
        }
    }

    pub fn path_str(&self) -> String {
        self.dir.path().to_string_lossy().to_string()
    }

    pub fn write_config(&self, contents: &str) -> PathBuf {
        let path = self.dir.path().join("config.toml");
        std::fs::write(&path, contents).expect("write config.toml");
        path
    }

    pub fn envs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("FARMASCAN_HOME", self.path_str()),
            ("RUST_LOG", "error".to_string()),
        ]
    }
}

pub fn run_cli(args: &[&str], home: &TestHome) -> Output {
    run_cli_with_stdin(args, home, None)
}

pub fn run_cli_with_stdin(args: &[&str], home: &TestHome, stdin: Option<&str>) -> Output {
    let mut cmd = Command::new(farmascan_bin());
    cmd.args(args);
    cmd.env_remove("FARMASCAN_CONFIG");
    for (key, value) in home.envs() {
        cmd.env(key, value);
    }
    cmd.stdin(Stdio::piped()).stdout(Stdio::piped()).stderr(Stdio::piped());

    let mut child = cmd.spawn().expect("failed to execute farmascan CLI");
    {
        let mut pipe = child.stdin.take().expect("stdin pipe");
        if let Some(input) = stdin {
            pipe.write_all(input.as_bytes()).expect("write stdin");
        }
    }
    child.wait_with_output().expect("wait for farmascan CLI")
}

pub fn assert_cli_success(output: &Output, args: &[&str]) {
    assert!(
        output.status.success(),
        "command failed: {}\nstdout:\n{}\nstderr:\n{}",
        args.join(" "),
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

pub fn parse_json_value(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let json_start = stdout.find(|c| c == '{' || c == '[').unwrap_or_else(|| {
        panic!(
            "no JSON payload found in output\nstdout:\n{}\nstderr:\n{}",
            stdout,
            String::from_utf8_lossy(&output.stderr)
        )
    });
    let mut deserializer = serde_json::Deserializer::from_str(&stdout[json_start..]);
    serde_json::Value::deserialize(&mut deserializer).unwrap_or_else(|err| {
        panic!(
            "failed to parse JSON output: {}\nstdout:\n{}\nstderr:\n{}",
            err,
            stdout,
            String::from_utf8_lossy(&output.stderr)
        )
    })
}

pub fn run_cli_json_value(args: &[&str], home: &TestHome) -> serde_json::Value {
    let output = run_cli(args, home);
    assert_cli_success(&output, args);
    parse_json_value(&output)
}

pub fn run_cli_json<T: DeserializeOwned>(args: &[&str], home: &TestHome) -> T {
    let value = run_cli_json_value(args, home);
    serde_json::from_value(value).expect("failed to deserialize JSON output")
}
