//! End-to-end tests for the abi-check binary
//!
//! A shell script named `llvm-readobj` is placed in a temporary directory and
//! selected through LLVM_BIN_PATH. It prints a canned `--syms` listing and
//! records that it ran, so tests can assert whether the object dump happened.
//! Tests run serially: writing a script while another thread forks can make
//! exec fail with ETXTBSY.
#![cfg(unix)]

use predicates::prelude::*;
use serial_test::serial;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct FakeToolchain {
    dir: TempDir,
}

impl FakeToolchain {
    /// Toolchain whose llvm-readobj prints `listing`
    fn with_listing(listing: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("listing.txt"), listing).unwrap();

        let script = format!(
            "#!/bin/sh\ntouch '{marker}'\n[ \"$1\" = \"--syms\" ] || exit 3\ncat '{listing}'\n",
            marker = dir.path().join("invoked").display(),
            listing = dir.path().join("listing.txt").display(),
        );
        let tool = dir.path().join("llvm-readobj");
        fs::write(&tool, script).unwrap();
        fs::set_permissions(&tool, fs::Permissions::from_mode(0o755)).unwrap();

        Self { dir }
    }

    /// Toolchain whose llvm-readobj fails like a missing input file
    fn failing() -> Self {
        let toolchain = Self::with_listing("");
        let tool = toolchain.dir.path().join("llvm-readobj");
        fs::write(
            &tool,
            "#!/bin/sh\necho \"llvm-readobj: error: 'libfoo.so': No such file or directory\" >&2\nexit 1\n",
        )
        .unwrap();
        fs::set_permissions(&tool, fs::Permissions::from_mode(0o755)).unwrap();
        toolchain
    }

    fn bin_path(&self) -> &Path {
        self.dir.path()
    }

    fn was_invoked(&self) -> bool {
        self.dir.path().join("invoked").exists()
    }

    fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("abi-check");
        cmd.env("LLVM_BIN_PATH", self.bin_path());
        cmd
    }
}

fn symbol(name: &str, binding: &str, kind: &str, section: &str) -> String {
    format!(
        "  Symbol {{\n    Name: {name} (1)\n    Value: 0x1000\n    Size: 16\n    Binding: {binding} (0x1)\n    Type: {kind} (0x2)\n    Other: 0\n    Section: {section} (0xE)\n  }}\n"
    )
}

fn listing(functions: &[&str]) -> String {
    let mut out = String::from("File: libfoo.so\nFormat: elf64-x86-64\nSymbols [\n");
    out.push_str(&symbol("", "Local", "None", "Undefined"));
    for name in functions {
        out.push_str(&symbol(name, "Global", "Function", ".text"));
    }
    out.push_str("]\n");
    out
}

fn write_reference(toolchain: &FakeToolchain, names: &[&str]) -> PathBuf {
    let path = toolchain.file("reference.dump");
    let mut text = String::from("# generated\n# REQUIRES: linux\n\n");
    for name in names {
        text.push_str(name);
        text.push('\n');
    }
    fs::write(&path, text).unwrap();
    path
}

#[test]
#[serial]
fn test_help() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("abi-check");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
#[serial]
fn test_matching_symbols_succeed_silently() {
    let toolchain = FakeToolchain::with_listing(&listing(&["foo", "bar"]));
    let reference = write_reference(&toolchain, &["foo", "bar"]);

    toolchain
        .command()
        .args(["--mode", "check_symbols", "--reference"])
        .arg(&reference)
        .arg("libfoo.so")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
#[serial]
fn test_missing_symbol_fails_as_breaking() {
    let toolchain = FakeToolchain::with_listing(&listing(&["foo"]));
    let reference = write_reference(&toolchain, &["foo", "bar"]);

    toolchain
        .command()
        .args(["--mode", "check_symbols", "--reference"])
        .arg(&reference)
        .arg("libfoo.so")
        .assert()
        .code(255)
        .stdout(predicate::str::contains("missing from the new object file"))
        .stdout(predicate::str::contains("breaking change"))
        .stdout(predicate::str::contains("bar"))
        .stdout(predicate::str::contains("new to the object file").not());
}

#[test]
#[serial]
fn test_new_symbol_fails_as_non_breaking() {
    let toolchain = FakeToolchain::with_listing(&listing(&["foo", "baz"]));
    let reference = write_reference(&toolchain, &["foo"]);

    toolchain
        .command()
        .args(["--mode", "check_symbols", "--reference"])
        .arg(&reference)
        .arg("libfoo.so")
        .assert()
        .code(255)
        .stdout(predicate::str::contains("new to the object file"))
        .stdout(predicate::str::contains("non-breaking change"))
        .stdout(predicate::str::contains("baz"))
        .stdout(predicate::str::contains("missing from the new object file").not());
}

#[test]
#[serial]
fn test_dump_excludes_local_symbols() {
    let raw = format!(
        "Symbols [\n{}{}]\n",
        symbol("foo", "Global", "Function", ".text"),
        symbol("_init", "Local", "Function", ".text"),
    );
    let toolchain = FakeToolchain::with_listing(&raw);
    let output = toolchain.file("out.dump");

    toolchain
        .command()
        .args(["--mode", "dump_symbols", "--no-default-ignores", "--output"])
        .arg(&output)
        .arg("/build/lib/libfoo.so")
        .assert()
        .success();

    let snapshot = fs::read_to_string(&output).unwrap();
    let symbols: Vec<&str> = snapshot
        .lines()
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .collect();
    assert_eq!(symbols, vec!["foo"]);
    assert!(snapshot.contains("DO NOT EDIT IT MANUALLY"));
    assert!(snapshot.contains("libfoo.so"));
    assert!(snapshot.ends_with("\nfoo\n"));
}

#[test]
#[serial]
fn test_dump_then_check_passes() {
    let toolchain = FakeToolchain::with_listing(&listing(&["zeta", "alpha", "mid"]));
    let output = toolchain.file("snapshot.dump");

    toolchain
        .command()
        .args(["--mode", "dump_symbols", "--output"])
        .arg(&output)
        .arg("libfoo.so")
        .assert()
        .success();

    let snapshot = fs::read_to_string(&output).unwrap();
    assert!(snapshot.ends_with("\n\nalpha\nmid\nzeta\n"));

    toolchain
        .command()
        .args(["--mode", "check_symbols", "--reference"])
        .arg(&output)
        .arg("libfoo.so")
        .assert()
        .success();
}

#[test]
#[serial]
fn test_check_without_reference_exits_before_dump() {
    let toolchain = FakeToolchain::with_listing(&listing(&["foo"]));

    toolchain
        .command()
        .args(["--mode", "check_symbols", "libfoo.so"])
        .assert()
        .code(254)
        .stdout(predicate::str::contains("--reference"));

    assert!(!toolchain.was_invoked());
}

#[test]
#[serial]
fn test_dump_without_output_exits_before_dump() {
    let toolchain = FakeToolchain::with_listing(&listing(&["foo"]));

    toolchain
        .command()
        .args(["--mode", "dump_symbols", "libfoo.so"])
        .assert()
        .code(254)
        .stdout(predicate::str::contains("--output"));

    assert!(!toolchain.was_invoked());
}

#[test]
#[serial]
fn test_missing_reference_file_is_fatal() {
    let toolchain = FakeToolchain::with_listing(&listing(&["foo"]));

    toolchain
        .command()
        .args(["--mode", "check_symbols", "--reference"])
        .arg(toolchain.file("absent.dump"))
        .arg("libfoo.so")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot read reference snapshot"));

    assert!(!toolchain.was_invoked());
}

#[test]
#[serial]
fn test_tool_failure_is_fatal_and_writes_nothing() {
    let toolchain = FakeToolchain::failing();
    let output = toolchain.file("out.dump");

    toolchain
        .command()
        .args(["--mode", "dump_symbols", "--output"])
        .arg(&output)
        .arg("libfoo.so")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No such file or directory"));

    assert!(!output.exists());
}

#[test]
#[serial]
fn test_missing_tool_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let reference = dir.path().join("reference.dump");
    fs::write(&reference, "foo\n").unwrap();

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("abi-check");
    cmd.env("LLVM_BIN_PATH", dir.path().join("no-such-bin"))
        .args(["--mode", "check_symbols", "--reference"])
        .arg(&reference)
        .arg("libfoo.so")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to run"));
}

#[test]
#[serial]
fn test_default_ignore_list_hides_csu_symbols() {
    let toolchain = FakeToolchain::with_listing(&listing(&["foo", "__libc_csu_init"]));
    let reference = write_reference(&toolchain, &["foo"]);

    toolchain
        .command()
        .args(["--mode", "check_symbols", "--reference"])
        .arg(&reference)
        .arg("libfoo.so")
        .assert()
        .success();
}

#[test]
#[serial]
fn test_ignore_file_extends_defaults() {
    let toolchain = FakeToolchain::with_listing(&listing(&["foo", "transitional"]));
    let reference = write_reference(&toolchain, &["foo"]);
    let ignore = toolchain.file("ignore.toml");
    fs::write(
        &ignore,
        "[[ignore]]\nsymbol = \"transitional\"\nreason = \"dropped next release\"\n",
    )
    .unwrap();

    toolchain
        .command()
        .args(["--mode", "check_symbols", "--ignore-file"])
        .arg(&ignore)
        .arg("--reference")
        .arg(&reference)
        .arg("libfoo.so")
        .assert()
        .success();
}

#[test]
#[serial]
fn test_json_report() {
    let toolchain = FakeToolchain::with_listing(&listing(&["foo", "baz"]));
    let reference = write_reference(&toolchain, &["foo", "bar"]);

    let output = toolchain
        .command()
        .args(["--mode", "check_symbols", "--format", "json", "--reference"])
        .arg(&reference)
        .arg("libfoo.so")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(255));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["compatible"], false);
    assert_eq!(value["missing"], serde_json::json!(["bar"]));
    assert_eq!(value["new"], serde_json::json!(["baz"]));
}

#[test]
#[serial]
fn test_missing_reference_option_wins_over_bad_ignore_file() {
    let toolchain = FakeToolchain::with_listing(&listing(&["foo"]));

    toolchain
        .command()
        .args(["--mode", "check_symbols", "--ignore-file"])
        .arg(toolchain.file("absent.toml"))
        .arg("libfoo.so")
        .assert()
        .code(254)
        .stdout(predicate::str::contains("--reference"))
        .stderr(predicate::str::contains("invalid ignore list").not());

    assert!(!toolchain.was_invoked());
}

#[test]
#[serial]
fn test_missing_output_option_wins_over_bad_ignore_file() {
    let toolchain = FakeToolchain::with_listing(&listing(&["foo"]));
    let ignore = toolchain.file("broken.toml");
    fs::write(&ignore, "[[ignore]]\nreason = \"no symbol\"\n").unwrap();

    toolchain
        .command()
        .args(["--mode", "dump_symbols", "--ignore-file"])
        .arg(&ignore)
        .arg("libfoo.so")
        .assert()
        .code(254)
        .stdout(predicate::str::contains("--output"));

    assert!(!toolchain.was_invoked());
}

#[test]
#[serial]
fn test_bad_ignore_file_is_fatal_once_arguments_are_complete() {
    let toolchain = FakeToolchain::with_listing(&listing(&["foo"]));
    let reference = write_reference(&toolchain, &["foo"]);

    toolchain
        .command()
        .args(["--mode", "check_symbols", "--ignore-file"])
        .arg(toolchain.file("absent.toml"))
        .arg("--reference")
        .arg(&reference)
        .arg("libfoo.so")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid ignore list"));

    assert!(!toolchain.was_invoked());
}

#[test]
#[serial]
fn test_dump_keeps_snapshot_permissions() {
    let toolchain = FakeToolchain::with_listing(&listing(&["foo"]));
    let output = toolchain.file("out.dump");
    fs::write(&output, "old\n").unwrap();
    fs::set_permissions(&output, fs::Permissions::from_mode(0o644)).unwrap();

    toolchain
        .command()
        .args(["--mode", "dump_symbols", "--output"])
        .arg(&output)
        .arg("libfoo.so")
        .assert()
        .success();

    let mode = fs::metadata(&output).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o644);
}
