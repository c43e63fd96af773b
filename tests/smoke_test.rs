/// Smoke tests to verify the binary runs without panicking
use std::process::Command;

fn fractree(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_fractree"))
        .args(args)
        .env("XDG_CONFIG_HOME", env!("CARGO_TARGET_TMPDIR"))
        .output()
        .expect("Failed to execute fractree")
}

#[test]
fn binary_shows_help() {
    let output = fractree(&["--help"]);

    assert!(
        output.status.success(),
        "Binary failed to run --help: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("fractree"), "Help output should mention fractree");
    assert!(stdout.contains("print"), "Help output should list the print subcommand");
}

#[test]
fn binary_shows_version() {
    let output = fractree(&["--version"]);

    assert!(
        output.status.success(),
        "Binary failed to run --version: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn invalid_subcommand_fails_gracefully() {
    let output = fractree(&["nonexistent-command"]);

    // Should fail with error, not panic
    assert!(
        !output.status.success(),
        "Invalid subcommand should return error status"
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        !stderr.contains("panicked at"),
        "Invalid subcommand should not cause panic"
    );
}

#[test]
fn print_renders_requested_size() {
    let output = fractree(&["print", "--cols", "40", "--rows", "20", "--max-depth", "3", "--branches", "2"]);

    assert!(
        output.status.success(),
        "print failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 20);
    assert!(
        stdout.chars().any(|c| ('\u{2801}'..='\u{28FF}').contains(&c)),
        "print output should contain braille tree glyphs"
    );
}

#[test]
fn out_of_range_flags_are_clamped_not_rejected() {
    let output = fractree(&["print", "--cols", "30", "--rows", "12", "--branches", "50", "--max-depth", "2"]);

    assert!(
        output.status.success(),
        "print with out-of-range value failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn print_stats_reports_segment_count() {
    let output = fractree(&["print", "--stats", "--cols", "100", "--rows", "40", "-d", "2", "-b", "3"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("segments  13 (expected 13)"),
        "unexpected stats output: {}",
        stdout
    );
}

#[test]
fn out_of_range_settings_warn_on_load() {
    let home = std::path::Path::new(env!("CARGO_TARGET_TMPDIR")).join("clamped-settings");
    std::fs::create_dir_all(home.join("fractree")).expect("Failed to create config dir");
    std::fs::write(home.join("fractree").join("config.toml"), "[tree]\nmax_depth = 40\n")
        .expect("Failed to write config");

    let output = Command::new(env!("CARGO_BIN_EXE_fractree"))
        .args(["print", "--stats", "--cols", "60", "--rows", "30"])
        .env("XDG_CONFIG_HOME", &home)
        .env("RUST_LOG", "warn")
        .output()
        .expect("Failed to execute fractree");

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("clamped"), "expected a clamp warning, got: {}", stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("segments  97656 (expected 97656)"), "unexpected stats output: {}", stdout);
}

#[test]
fn print_rotation_starts_from_upright_trunk() {
    let output = fractree(&["print", "--stats", "--cols", "100", "--rows", "40", "-d", "1", "-b", "1", "--rotation", "0"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("extent    x 400.0..400.0"),
        "rotating tree at 0 degrees should be vertical: {}",
        stdout
    );
}
