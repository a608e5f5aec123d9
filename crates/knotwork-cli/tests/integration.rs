//! Integration tests for knotwork CLI commands.
//!
//! These tests run the actual binary and verify end-to-end behavior.

use std::path::PathBuf;
use std::process::{Command, Output};

/// Path to the knotwork binary built for this test run.
fn binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_knotwork"))
}

/// Path to a file under the repository's test_assets/.
fn asset(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.pop(); // Go up from knotwork-cli to crates
    path.pop(); // Go up from crates to repo root
    path.push("test_assets");
    path.push(name);
    path
}

fn run(args: &[&str]) -> Output {
    Command::new(binary_path())
        .args(args)
        .output()
        .expect("Failed to execute command")
}

fn json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

#[test]
fn help_lists_commands() {
    let output = run(&["help"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(output.status.success());
    assert!(stderr.contains("generate"));
    assert!(stderr.contains("trace"));
    assert!(stderr.contains("benchmark"));
}

#[test]
fn unknown_command_fails() {
    let output = run(&["weave"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown command"));
}

#[test]
fn generate_produces_layered_svg() {
    let output = run(&["generate", "--seed", "3"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.contains("<?xml"), "Should have XML declaration");
    assert!(stdout.contains("<svg"), "Should have SVG element");
    assert!(stdout.contains(r#"id="under""#));
    assert!(stdout.contains(r#"id="over""#));
    assert!(stdout.contains("</svg>"), "Should close SVG element");
}

#[test]
fn generate_is_deterministic_per_seed() {
    let a = run(&["generate", "--seed", "11", "--format", "json"]);
    let b = run(&["generate", "--seed", "11", "--format", "json"]);
    assert_eq!(a.stdout, b.stdout);

    let value = json(&a);
    assert_eq!(value["seed"], 11);
    assert!(value["strokes"].is_array());
    assert!(value["threads"].is_array());
}

#[test]
fn generate_full_lattice_has_threads() {
    let output = run(&["generate", "--seed", "1", "--density", "6", "--no-delete", "-f", "json"]);
    assert!(output.status.success());

    let value = json(&output);
    let strokes = value["strokes"].as_array().unwrap();
    let threads = value["threads"].as_array().unwrap();
    assert!(!strokes.is_empty());
    assert!(!threads.is_empty());

    // Every knot belongs to exactly one stroke midpoint pass: two nodes per sample, four per stroke.
    let samples: usize = threads.iter().map(|t| t["knots"].as_array().unwrap().len()).sum();
    assert_eq!(samples * 2, strokes.len() * 4);
}

#[test]
fn generate_with_recipe() {
    let output = run(&["generate", "--config", asset("braid.yaml").to_str().unwrap()]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.contains("#264653"));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Seed 42"));
}

#[test]
fn generate_renders_png() {
    let path = std::env::temp_dir().join(format!("knotwork-test-{}.png", std::process::id()));
    let output = run(&["generate", "--seed", "5", "-o", "/dev/null", "--png", path.to_str().unwrap()]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let bytes = std::fs::read(&path).expect("PNG should be written");
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    let _ = std::fs::remove_file(&path);
}

#[test]
fn trace_square_gives_two_threads() {
    let output = run(&["trace", asset("square.svg").to_str().unwrap(), "--format", "json"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let value = json(&output);
    let threads = value["threads"].as_array().unwrap();
    assert_eq!(value["strokes"].as_array().unwrap().len(), 4);
    assert_eq!(threads.len(), 2);

    for thread in threads {
        let overs: Vec<bool> = thread["knots"]
            .as_array()
            .unwrap()
            .iter()
            .map(|k| k["over"].as_bool().unwrap())
            .collect();
        assert_eq!(overs.len(), 4);
        assert!(overs.windows(2).all(|w| w[0] != w[1]));
    }
}

#[test]
fn trace_strict_rejects_dangling_graph() {
    let path = asset("dangling.svg");
    let lenient = run(&["trace", path.to_str().unwrap(), "-f", "json"]);
    assert!(lenient.status.success());
    assert_eq!(json(&lenient)["threads"].as_array().unwrap().len(), 3);

    let strict = run(&["trace", path.to_str().unwrap(), "--strict"]);
    assert!(!strict.status.success());
    assert!(String::from_utf8_lossy(&strict.stderr).contains("Error:"));
}

#[test]
fn trace_requires_input() {
    let output = run(&["trace"]);
    assert!(!output.status.success());
}

#[test]
fn benchmark_reports_timings() {
    let output = run(&["benchmark", "-n", "2", "-d", "6"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("KNOTWORK BENCHMARK"));
    assert!(stdout.contains("Tracing"));
}
