//! Integration tests for the setconf binary.
//!
//! These tests exercise the actual compiled binary using assert_cmd.

use assert_cmd::Command;
use pretty_assertions::assert_eq;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::{TempDir, tempdir};

/// Get a Command for the setconf binary
fn setconf_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("setconf"));
    cmd.env("NO_COLOR", "1").env_remove("SETCONF_SYNTAX").env_remove("RUST_LOG");
    cmd
}

fn fixture(content: &str) -> (TempDir, std::path::PathBuf) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.conf");
    fs::write(&path, content).unwrap();
    (dir, path)
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

// ============================================================================
// Help and Version Tests
// ============================================================================

#[test]
fn test_help_output() {
    setconf_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Change a key in a text file"))
        .stdout(predicate::str::contains("--add"));
}

#[test]
fn test_version_output() {
    setconf_cmd()
        .arg("-V")
        .assert()
        .success()
        .stdout(predicate::str::contains("setconf"));
}

#[test]
fn test_missing_arguments_is_usage_error() {
    setconf_cmd().assert().failure().code(2);
}

// ============================================================================
// Single-line changes
// ============================================================================

#[test]
fn test_set_key_value() {
    let (_dir, path) = fixture("CC=gcc\nCFLAGS = -O2\n");

    setconf_cmd().arg(&path).args(["CC", "clang"]).assert().success();

    assert_eq!(read(&path), "CC=clang\nCFLAGS = -O2\n");
}

#[test]
fn test_set_literal_assignment() {
    let (_dir, path) = fixture("x := 1\n");

    setconf_cmd().arg(&path).arg("x=42").assert().success();

    assert_eq!(read(&path), "x := 42\n");
}

#[test]
fn test_increment_and_decrement() {
    let (_dir, path) = fixture("version=7\n");

    setconf_cmd().arg(&path).arg("version+=0.5").assert().success();
    assert_eq!(read(&path), "version=7.5\n");

    setconf_cmd().arg(&path).arg("version-=10").assert().success();
    assert_eq!(read(&path), "version=-2.5\n");
}

#[test]
fn test_literal_without_operator_fails() {
    let (_dir, path) = fixture("x=1\n");

    setconf_cmd()
        .arg(&path)
        .arg("nothing")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("error"));

    assert_eq!(read(&path), "x=1\n");
}

#[test]
fn test_missing_file_fails_with_read_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("absent.conf");

    setconf_cmd()
        .arg(&path)
        .args(["x", "1"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Can't read"));
}

#[cfg(unix)]
#[test]
fn test_read_only_file_fails_with_write_error() {
    use std::os::unix::fs::PermissionsExt;

    let (_dir, path) = fixture("x=1\n");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o444)).unwrap();
    if fs::OpenOptions::new().write(true).open(&path).is_ok() {
        return;
    }

    setconf_cmd()
        .arg(&path)
        .args(["x", "2"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Can't write"));

    assert_eq!(read(&path), "x=1\n");
}

#[test]
fn test_unchanged_file_is_not_rewritten() {
    let (_dir, path) = fixture("x=1\n");
    let before = fs::metadata(&path).unwrap().modified().unwrap();

    setconf_cmd().arg(&path).args(["y", "2"]).assert().success();

    assert_eq!(read(&path), "x=1\n");
    assert_eq!(fs::metadata(&path).unwrap().modified().unwrap(), before);
}

#[test]
fn test_no_final_newline_is_kept() {
    let (_dir, path) = fixture("a=1\nb=2");

    setconf_cmd().arg(&path).args(["b", "3"]).assert().success();

    assert_eq!(read(&path), "a=1\nb=3");
}

// ============================================================================
// Multi-line changes
// ============================================================================

#[test]
fn test_multiline_value() {
    let (_dir, path) = fixture("a=(0, 0, 0)\nb=(1\n2\n3\n)\nc=(7, 8, 9)");

    setconf_cmd()
        .arg(&path)
        .args(["b", "(4, 5, 6)", ")"])
        .assert()
        .success();

    assert_eq!(read(&path), "a=(0, 0, 0)\nb=(4, 5, 6)\nc=(7, 8, 9)");
}

#[test]
fn test_missing_end_marker_warns() {
    let (_dir, path) = fixture("a=(1, 2, 3\n");

    setconf_cmd()
        .arg(&path)
        .args(["a", "(4, 5, 6)", ")"])
        .assert()
        .success()
        .stderr(predicate::str::contains("end marker not found"));

    assert_eq!(read(&path), "a=(1, 2, 3\n");
}

#[test]
fn test_quiet_suppresses_warning() {
    let (_dir, path) = fixture("a=(1, 2, 3\n");

    setconf_cmd()
        .arg("-q")
        .arg(&path)
        .args(["a", "(4, 5, 6)", ")"])
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}

// ============================================================================
// Add mode
// ============================================================================

#[test]
fn test_add_sequence() {
    let (_dir, path) = fixture("# cache-ttl=65000\nMOO=yes\n");

    let runs: [&[&str]; 8] = [
        &["-a", "X", "123"],
        &["--add", "Y=345"],
        &["-a", "Z:=567"],
        &["--add", "FJORD => 999"],
        &["--add", "MOO", "no"],
        &["-a", "vm.swappiness=1"],
        &["-a", "vm.swappiness=1"],
        &["-a", "cache-ttl=6"],
    ];
    for run in runs {
        let (flag, rest) = run.split_first().unwrap();
        setconf_cmd()
            .arg(flag)
            .arg(&path)
            .args(rest)
            .assert()
            .success();
    }

    assert_eq!(
        read(&path),
        "# cache-ttl=65000\nMOO=no\nX=123\nY=345\nZ:=567\nFJORD => 999\nvm.swappiness=1\ncache-ttl=6\n"
    );
}

#[test]
fn test_add_creates_missing_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("new.conf");

    setconf_cmd().arg("-a").arg(&path).arg("x=2").assert().success();

    assert_eq!(read(&path), "x=2\n");
}

#[test]
fn test_add_to_empty_file() {
    let (_dir, path) = fixture("");

    setconf_cmd().arg("-a").arg(&path).arg("x=2").assert().success();

    assert_eq!(read(&path), "x=2\n");
}

#[test]
fn test_add_rejects_extra_argument() {
    let (_dir, path) = fixture("");

    setconf_cmd()
        .arg("-a")
        .arg(&path)
        .args(["k", "v", ")"])
        .assert()
        .failure()
        .code(2);
}

// ============================================================================
// Uncomment mode
// ============================================================================

#[test]
fn test_uncomment_then_set() {
    let (_dir, path) = fixture("#Port=22\n  # Port = 23\n# Portal=1\nListen=1\n");

    setconf_cmd()
        .arg("-u")
        .arg(&path)
        .args(["Port", "2222"])
        .assert()
        .success();

    assert_eq!(read(&path), "Port=2222\n  Port = 2222\n# Portal=1\nListen=1\n");
}

#[test]
fn test_uncomment_flag_line() {
    let (_dir, path) = fixture("# CONFIG_FOO is not set\nCONFIG_BAR=y\n");

    setconf_cmd()
        .arg("-u")
        .arg(&path)
        .args(["CONFIG_FOO", "y"])
        .assert()
        .success();

    assert_eq!(read(&path), "CONFIG_FOO=y\nCONFIG_BAR=y\n");
}

#[test]
fn test_commented_flag_line_needs_uncomment() {
    let (_dir, path) = fixture("# CONFIG_FOO is not set\n");

    setconf_cmd().arg(&path).args(["CONFIG_FOO", "y"]).assert().success();

    assert_eq!(read(&path), "# CONFIG_FOO is not set\n");
}

// ============================================================================
// Dry run and syntax files
// ============================================================================

#[test]
fn test_dry_run_prints_and_does_not_write() {
    let (_dir, path) = fixture("a=1\nb=2\n");

    setconf_cmd()
        .arg("-n")
        .arg(&path)
        .args(["b", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains(":2: \"b=2\" -> \"b=3\""));

    assert_eq!(read(&path), "a=1\nb=2\n");
}

#[test]
fn test_dry_run_add_does_not_create() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("new.conf");

    setconf_cmd()
        .args(["--dry-run", "-a"])
        .arg(&path)
        .arg("x=2")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"x=2\\n\""));

    assert!(!path.exists());
}

#[test]
fn test_syntax_file() {
    let (dir, path) = fixture("; a=0\na: 1\n");
    let syntax = dir.path().join("ini.toml");
    fs::write(&syntax, "operators = [\":\"]\nline_comments = [\";\"]\nline_ending = \"lf\"\n")
        .unwrap();

    setconf_cmd()
        .arg("--syntax")
        .arg(&syntax)
        .arg(&path)
        .args(["a", "9"])
        .assert()
        .success();

    assert_eq!(read(&path), "; a=0\na: 9\n");
}

#[test]
fn test_syntax_from_environment() {
    let (dir, path) = fixture("a: 1\n");
    let syntax = dir.path().join("colon.json");
    fs::write(&syntax, r#"{"operators": [":"], "line_ending": "lf"}"#).unwrap();

    setconf_cmd()
        .env("SETCONF_SYNTAX", &syntax)
        .arg(&path)
        .args(["a", "2"])
        .assert()
        .success();

    assert_eq!(read(&path), "a: 2\n");
}

#[test]
fn test_bad_syntax_file_fails() {
    let (dir, path) = fixture("a=1\n");
    let syntax = dir.path().join("bad.toml");
    fs::write(&syntax, "operators = [\"+=\"]\n").unwrap();

    setconf_cmd()
        .arg("--syntax")
        .arg(&syntax)
        .arg(&path)
        .args(["a", "2"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("at least one assignment operator"));
}
