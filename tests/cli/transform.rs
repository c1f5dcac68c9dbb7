//! Tests for `reseal decrypt` and `reseal encrypt`.
//!
//! Builds without a key service cover the paths that do not reach one;
//! full cycles live in `workflow.rs`.

#[cfg(not(any(feature = "aws", feature = "test-kms")))]
use predicates::prelude::*;

use crate::support::*;

#[cfg(not(any(feature = "aws", feature = "test-kms")))]
#[test]
fn test_decrypt_without_backend() {
    let t = Test::new();
    let kms = FakeKms::new();
    t.write("secret.yaml", &encrypted_manifest(&kms, KEY_A, &[("A", "one")]));

    t.cmd()
        .args(["decrypt", "secret.yaml"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("no key service available"))
        .stderr(predicate::str::contains("--features aws"));
}

#[cfg(not(any(feature = "aws", feature = "test-kms")))]
#[test]
fn test_encrypt_without_backend_leaves_file() {
    let t = Test::new();
    t.write("secret.yaml", DECRYPTED_MANIFEST);

    t.cmd()
        .args(["encrypt", "secret.yaml", "--in-place", "--key-id", KEY_A])
        .assert()
        .code(1);

    assert_eq!(t.read("secret.yaml"), DECRYPTED_MANIFEST);
}

#[test]
fn test_decrypt_other_kind_passes_through() {
    let t = Test::new();
    t.write("config.yaml", CONFIG_MAP);

    let output = t.run(&["decrypt", "config.yaml"]);
    assert_success(&output);
    assert_eq!(stdout(&output), CONFIG_MAP);
    assert_stderr_contains(&output, "not a secret manifest");
}

#[test]
fn test_encrypt_other_kind_to_file() {
    let t = Test::new();
    t.write("config.yaml", CONFIG_MAP);

    let output = t.run(&["encrypt", "config.yaml", "-o", "out.yaml"]);
    assert_success(&output);
    assert_eq!(t.read("out.yaml"), CONFIG_MAP);
}
