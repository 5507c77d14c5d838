//! Integration tests for the BeachSafe CLI

use std::process::{Command, Output};

/// Run the binary with no provider keys and no config file
fn beachsafe(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_beachsafe"))
        .args(["--config", "/nonexistent/beachsafe.toml"])
        .args(args)
        .env_remove("GOOGLE_MAPS_API_KEY")
        .env_remove("STORMGLASS_API_KEY")
        .env_remove("OPENAI_API_KEY")
        .env_remove("BEACHSAFE_GEOCODING__API_KEY")
        .env_remove("BEACHSAFE_TIDES__API_KEY")
        .env_remove("BEACHSAFE_AI__API_KEY")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute command")
}

#[test]
fn test_cli_help() {
    let output = beachsafe(&["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("beachsafe"));
    assert!(stdout.contains("analyze"));
    assert!(stdout.contains("serve"));
}

#[test]
fn test_analyze_help_lists_options() {
    let output = beachsafe(&["analyze", "--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--from"));
    assert!(stdout.contains("--hazard"));
    assert!(stdout.contains("--no-guide"));
}

#[test]
fn test_no_subcommand_prints_hints() {
    let output = beachsafe(&["--verbose"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("beachsafe analyze"));
    assert!(stdout.contains("Using config from: /nonexistent/beachsafe.toml"));
    assert!(stdout.contains("Log level: info"));
}

#[test]
fn test_blank_location_is_a_warning() {
    let output = beachsafe(&["analyze", "   "]);

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Please enter a location"), "stderr: {stderr}");
    assert!(output.stdout.is_empty());
}

#[test]
fn test_unresolved_location_fails() {
    // without a geocoding key nothing can be resolved
    let output = beachsafe(&["analyze", "Atlantis", "--no-guide"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Could not find coordinates for: Atlantis"),
        "stderr: {stderr}"
    );
}

#[test]
fn test_invalid_config_is_rejected() {
    let output = Command::new(env!("CARGO_BIN_EXE_beachsafe"))
        .args(["--config", "/nonexistent/beachsafe.toml", "analyze", "Goa"])
        .env("BEACHSAFE_LOGGING__LEVEL", "loud")
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid log level"), "stderr: {stderr}");
}
