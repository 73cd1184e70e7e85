use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::{json, Value};
use uuid::Uuid;

struct Sandbox {
    root: PathBuf,
}

impl Sandbox {
    fn new() -> Self {
        let root = std::env::temp_dir().join(format!("ingest_cli_{}", Uuid::new_v4()));
        fs::create_dir_all(&root).expect("sandbox dir should be created");
        Self { root }
    }

    fn store(&self) -> PathBuf {
        self.root.join("data").join("posts.json")
    }

    fn event(&self, issue_body: &str) -> PathBuf {
        let path = self.root.join(format!("event_{}.json", Uuid::new_v4()));
        let event = json!({"action": "opened", "issue": {"number": 3, "body": issue_body}});
        fs::write(&path, serde_json::to_vec(&event).expect("event should serialize")).expect("event should be written");
        path
    }

    /// Run the binary inside the sandbox with logging silenced, so anything
    /// on stdout comes from the plain diagnostics.
    fn run(&self, event_env: Option<&Path>) -> Output {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_ingest"));
        cmd.current_dir(&self.root)
            .env("RUST_LOG", "off")
            .env_remove("CONFIG_PATH")
            .env_remove("POSTS_PATH")
            .env_remove("INGEST_LOG_FORMAT")
            .env_remove("GITHUB_EVENT_PATH");
        if let Some(path) = event_env {
            cmd.env("GITHUB_EVENT_PATH", path);
        }
        cmd.output().expect("ingest binary should run")
    }

    fn stored(&self) -> Vec<Value> {
        let raw = fs::read(self.store()).expect("store should exist");
        serde_json::from_slice(&raw).expect("store should be a JSON array")
    }
}

impl Drop for Sandbox {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn valid_event_exits_zero_and_writes_default_store() {
    let sb = Sandbox::new();
    let event = sb.event(r#"{"user_id":"alice","trip_key":"A","body":"hello"}"#);

    let output = sb.run(Some(&event));

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("Successfully processed post."));
    let stored = sb.stored();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0]["user_id"], "alice");
}

#[test]
fn missing_body_exits_one_with_message() {
    let sb = Sandbox::new();
    let event = sb.event(r#"{"user_id":"alice","trip_key":"A"}"#);

    let output = sb.run(Some(&event));

    assert_eq!(output.status.code(), Some(1));
    let out = stdout(&output);
    assert!(out.contains("Error:"), "stdout was: {out}");
    assert!(out.contains("body"), "stdout was: {out}");
    assert!(!sb.store().exists());
}

#[test]
fn malformed_issue_body_exits_one_with_message() {
    let sb = Sandbox::new();
    let event = sb.event("{\"user_id\": \"alice\",");

    let output = sb.run(Some(&event));

    assert_eq!(output.status.code(), Some(1));
    let out = stdout(&output);
    assert!(out.contains("not valid JSON"), "stdout was: {out}");
    assert!(!sb.store().exists());
}

#[test]
fn trip_key_mismatch_exits_one_and_keeps_store() {
    let sb = Sandbox::new();
    let first = sb.event(r#"{"user_id":"alice","trip_key":"A","body":"mine"}"#);
    assert_eq!(sb.run(Some(&first)).status.code(), Some(0));
    let before = fs::read(sb.store()).expect("store should exist");

    let second = sb.event(r#"{"user_id":"alice","trip_key":"B","body":"not mine"}"#);
    let output = sb.run(Some(&second));

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("trip key does not match"));
    assert_eq!(fs::read(sb.store()).expect("store should exist"), before);
}

#[test]
fn unset_event_variable_exits_one_with_message() {
    let sb = Sandbox::new();

    let output = sb.run(None);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("GITHUB_EVENT_PATH is not set"));
}

#[test]
fn cli_flags_override_environment_and_config() {
    let sb = Sandbox::new();
    let event = sb.event(r#"{"user_id":"bob","trip_key":"B","body":"flags"}"#);
    let store = sb.root.join("custom").join("board.json");

    let output = Command::new(env!("CARGO_BIN_EXE_ingest"))
        .current_dir(&sb.root)
        .env("RUST_LOG", "off")
        .env_remove("CONFIG_PATH")
        .env_remove("POSTS_PATH")
        .env_remove("GITHUB_EVENT_PATH")
        .arg("--event")
        .arg(&event)
        .arg("--store")
        .arg(&store)
        .output()
        .expect("ingest binary should run");

    assert_eq!(output.status.code(), Some(0));
    assert!(store.exists());
    assert!(!sb.store().exists());
}
