//! CLI binary smoke tests using assert_cmd.
//!
//! These tests exercise the compiled `booking` binary against a small set of
//! artifacts written to a temporary directory.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;

fn cmd() -> Command {
    Command::cargo_bin("booking").unwrap()
}

fn write_json(path: &Path, value: serde_json::Value) {
    std::fs::write(path, serde_json::to_string(&value).unwrap()).unwrap();
}

/// Artifacts for a two-feature model that cancels expensive bookings.
fn write_artifacts(dir: &Path) -> PathBuf {
    std::fs::create_dir_all(dir.join("models")).unwrap();
    write_json(&dir.join("models/selected_features.json"), json!(["adr", "total_guests"]));
    write_json(
        &dir.join("models/scaler.json"),
        json!({"mean": [100.0, 2.0], "scale": [50.0, 1.0]}),
    );
    write_json(
        &dir.join("models/label_encoders.json"),
        json!({
            "hotel": ["City Hotel", "Resort Hotel"],
            "meal": ["BB"],
            "deposit_type": ["No Deposit"],
            "customer_type": ["Transient"],
            "reserved_room_type": ["A"],
            "assigned_room_type": ["A"]
        }),
    );
    write_json(
        &dir.join("models/mlp_model.json"),
        json!({"coefs": [[[4.0], [0.0]]], "intercepts": [[0.0]]}),
    );
    let config = dir.join("config.json");
    write_json(&config, json!({"model_type": "mlp"}));
    config
}

fn booking(adr: f64) -> serde_json::Value {
    json!({
        "hotel": "Resort Hotel",
        "meal": "BB",
        "deposit_type": "No Deposit",
        "customer_type": "Transient",
        "reserved_room_type": "A",
        "assigned_room_type": "A",
        "stays_in_weekend_nights": 1,
        "stays_in_week_nights": 2,
        "adults": 2,
        "children": null,
        "babies": 0,
        "adr": adr
    })
}

// ---------------------------------------------------------------------------
// Top-level
// ---------------------------------------------------------------------------

#[test]
fn no_args_shows_help() {
    cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn help_flag() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("predict"))
        .stdout(predicate::str::contains("features"));
}

#[test]
fn predict_requires_input() {
    cmd()
        .arg("predict")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--input"));
}

// ---------------------------------------------------------------------------
// predict
// ---------------------------------------------------------------------------

#[test]
fn predict_single_record_prints_response() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_artifacts(dir.path());
    let input = dir.path().join("booking.json");
    write_json(&input, booking(180.0));

    cmd()
        .arg("predict")
        .arg(&config)
        .arg("--input")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"prediction\": 1"))
        .stdout(predicate::str::contains("Booking Likely to be Canceled"));
}

#[test]
fn predict_batch_writes_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_artifacts(dir.path());
    let input = dir.path().join("bookings.json");
    let output = dir.path().join("predictions.json");
    write_json(&input, json!([booking(20.0), booking(180.0)]));

    cmd()
        .args(["predict", "-o"])
        .arg(&output)
        .arg(&config)
        .arg("-i")
        .arg(&input)
        .assert()
        .success();

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(written[0]["prediction"], 0);
    assert_eq!(written[0]["result"], "Booking Likely to be Not Canceled");
    assert_eq!(written[1]["prediction"], 1);
}

#[test]
fn predict_reports_malformed_records_and_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_artifacts(dir.path());
    let input = dir.path().join("bookings.json");
    let mut bad = booking(50.0);
    bad["adults"] = json!("two");
    write_json(&input, json!([booking(20.0), bad]));

    cmd()
        .arg("predict")
        .arg(&config)
        .arg("--input")
        .arg(&input)
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"error\""))
        .stdout(predicate::str::contains("adults"));
}

#[test]
fn predict_without_encoders_reports_not_ready() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_artifacts(dir.path());
    std::fs::remove_file(dir.path().join("models/label_encoders.json")).unwrap();
    let input = dir.path().join("booking.json");
    write_json(&input, booking(20.0));

    cmd()
        .arg("predict")
        .arg(&config)
        .arg("--input")
        .arg(&input)
        .assert()
        .failure()
        .stdout(predicate::str::contains("not ready"));
}

#[test]
fn predict_with_missing_model_fails_at_startup() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_artifacts(dir.path());
    std::fs::remove_file(dir.path().join("models/mlp_model.json")).unwrap();
    let input = dir.path().join("booking.json");
    write_json(&input, booking(20.0));

    cmd()
        .arg("predict")
        .arg(&config)
        .arg("--input")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("MLP model"));
}

// ---------------------------------------------------------------------------
// features
// ---------------------------------------------------------------------------

#[test]
fn features_writes_canonical_header() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_artifacts(dir.path());
    let input = dir.path().join("booking.json");
    write_json(&input, booking(150.0));

    cmd()
        .arg("features")
        .arg(&config)
        .arg("--input")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("adr,total_guests\n"))
        .stdout(predicate::str::contains("1,0"));
}

#[test]
fn features_skip_scaling_keeps_raw_values() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_artifacts(dir.path());
    let input = dir.path().join("booking.json");
    write_json(&input, booking(150.0));

    cmd()
        .arg("features")
        .arg(&config)
        .arg("--skip-scaling")
        .arg("--input")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("150,2"));
}

#[test]
fn features_failure_leaves_no_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_artifacts(dir.path());
    let input = dir.path().join("bookings.json");
    let output = dir.path().join("features.csv");
    let mut bad = booking(50.0);
    bad["stays_in_week_nights"] = json!("three");
    write_json(&input, json!([booking(20.0), bad]));

    cmd()
        .arg("features")
        .arg(&config)
        .arg("--input")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("record 1"));
    assert!(!output.exists());
}
