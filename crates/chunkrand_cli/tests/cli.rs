//! End-to-end tests of the `chunkrand` binary.

use std::process::{Command, Output};

fn chunkrand(dir: &tempfile::TempDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_chunkrand"))
        .arg("--config")
        .arg(dir.path().join("chunkrand.toml"))
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("CHUNKRAND_SEED")
        .env_remove("CHUNKRAND_LOG_LEVEL")
        .output()
        .expect("failed to run chunkrand")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn test_generate_is_reproducible() {
    let dir = tempfile::tempdir().unwrap();
    let args = [
        "generate", "normal", "--size", "20,5", "--chunks", "7,5", "--seed", "11", "--format",
        "json",
    ];
    let first = chunkrand(&dir, &args);
    let second = chunkrand(&dir, &args);
    assert!(first.status.success());
    assert_eq!(stdout(&first), stdout(&second));

    let serial = chunkrand(&dir, &[&args[..], &["--engine", "serial"]].concat());
    assert_eq!(stdout(&first), stdout(&serial));
}

#[test]
fn test_config_file_supplies_defaults() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("chunkrand.toml"),
        "[generation]\nseed = 5\nchunk_size = 3\nengine = \"serial\"\n",
    )
    .unwrap();

    let output = chunkrand(&dir, &["generate", "poisson", "-p", "2.5", "-s", "10", "-f", "json"]);
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["chunks"], serde_json::json!([[3, 3, 3, 1]]));
    assert_eq!(value["dtype"], "int64");

    let flagged = chunkrand(
        &dir,
        &["generate", "poisson", "-p", "2.5", "-s", "10", "-f", "json", "--seed", "5"],
    );
    assert_eq!(stdout(&output), stdout(&flagged));
}

#[test]
fn test_seeds() {
    let dir = tempfile::tempdir().unwrap();
    let output = chunkrand(&dir, &["seeds", "--seed", "42", "--count", "4", "--format", "json"]);
    assert!(output.status.success());
    let seeds: Vec<u64> = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(seeds.len(), 4);

    let negative = chunkrand(&dir, &["seeds", "--seed", "42", "--count", "-1"]);
    assert!(!negative.status.success());
    assert!(String::from_utf8_lossy(&negative.stderr).contains("Invalid argument"));
}

#[test]
fn test_errors_exit_non_zero() {
    let dir = tempfile::tempdir().unwrap();
    let unknown = chunkrand(&dir, &["generate", "nope", "--size", "4"]);
    assert!(!unknown.status.success());
    assert!(String::from_utf8_lossy(&unknown.stderr).contains("Unknown distribution"));

    let mismatch = chunkrand(&dir, &["plan", "--size", "10", "--chunks", "3+3+3"]);
    assert!(!mismatch.status.success());
}

#[test]
fn test_list() {
    let dir = tempfile::tempdir().unwrap();
    let output = chunkrand(&dir, &["list"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.lines().any(|l| l.starts_with("zipf(")));
    assert_eq!(text.lines().count(), 37);
}
