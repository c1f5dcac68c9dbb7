//! Error reporting and exit codes.

use predicates::prelude::*;

use crate::support::*;

#[test]
fn test_missing_file() {
    let t = Test::new();

    let output = t.check("absent.yaml");
    assert_exit_code(&output, 1);
    assert_stderr_contains(&output, "io error");
}

#[test]
fn test_invalid_yaml() {
    let t = Test::new();
    t.write("bad.yaml", "kind: EncryptedSecret\ndata: [\n");

    let output = t.check("bad.yaml");
    assert_exit_code(&output, 1);
    assert_stderr_contains(&output, "error parsing YAML");
}

#[test]
fn test_unsupported_layout_is_internal() {
    let t = Test::new();
    t.write(
        "folded.yaml",
        "kind: DecryptedSecret\ndata:\n  NOTE: >\n    folded\n",
    );

    t.cmd()
        .args(["check", "folded.yaml"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("internal error"))
        .stderr(predicate::str::contains("this is a bug"));
}

#[test]
fn test_wrapped_plain_value_is_internal() {
    let t = Test::new();
    t.write(
        "wrapped.yaml",
        "kind: DecryptedSecret\ndata:\n  A: first\n    second\n  B: x\n",
    );

    t.cmd()
        .args(["decrypt", "wrapped.yaml", "--in-place"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("does not read back"));

    assert!(t.read("wrapped.yaml").contains("    second\n"));
}

#[test]
fn test_malformed_config() {
    let t = Test::new();
    t.write(".reseal.toml", "[kms\n");
    t.write("secret.yaml", DECRYPTED_MANIFEST);

    t.cmd()
        .args(["encrypt", "secret.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse config"));
}

#[test]
fn test_explicit_config_must_exist() {
    let t = Test::new();
    t.write("secret.yaml", DECRYPTED_MANIFEST);

    t.cmd()
        .args(["--config", "missing.toml", "encrypt", "secret.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read config missing.toml"));
}

#[test]
fn test_output_conflicts_with_in_place() {
    let t = Test::new();
    t.write("secret.yaml", DECRYPTED_MANIFEST);

    t.cmd()
        .args(["decrypt", "secret.yaml", "-o", "out.yaml", "--in-place"])
        .assert()
        .failure();
}

#[test]
fn test_no_subcommand_shows_usage() {
    Test::new()
        .cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}
