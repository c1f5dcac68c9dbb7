//! Tests for `reseal check`.

use crate::support::*;

#[test]
fn test_check_reports_keys() {
    let t = Test::new();
    t.write("secret.yaml", DECRYPTED_MANIFEST);

    let output = t.check("secret.yaml");
    assert_success(&output);
    assert_stdout_contains(&output, "DecryptedSecret");
    assert_stdout_contains(&output, "payments");
    assert_stdout_contains(&output, "TLS_CERT");
    assert_stdout_contains(&output, "byte-identical");
}

#[test]
fn test_check_never_prints_values() {
    let t = Test::new();
    t.write("secret.yaml", DECRYPTED_MANIFEST);

    let output = t.check("secret.yaml");
    assert_success(&output);
    assert!(!stdout(&output).contains("whsec_123"));
}

#[test]
fn test_check_json() {
    let t = Test::new();
    let kms = FakeKms::new();
    t.write(
        "secret.yaml",
        &encrypted_manifest(&kms, KEY_A, &[("A", "one"), ("B", "two")]),
    );

    let report = t.check_json("secret.yaml");

    assert_eq!(report["kind"], "EncryptedSecret");
    assert_eq!(report["name"], "api");
    assert_eq!(report["namespace"], "prod");
    assert_eq!(report["round_trip"], true);
    let keys = report["keys"].as_array().unwrap();
    assert_eq!(keys.len(), 2);
    assert_eq!(keys[0]["key"], "A");
    assert_eq!(keys[1]["key"], "B");
    assert!(keys[0]["end"].as_u64() < keys[1]["start"].as_u64());
}

#[test]
fn test_check_other_kind() {
    let t = Test::new();
    t.write("config.yaml", CONFIG_MAP);

    let report = t.check_json("config.yaml");
    assert_eq!(report["kind"], "other");
    assert!(report["keys"].as_array().unwrap().is_empty());
}

#[test]
fn test_check_reads_stdin() {
    let t = Test::new();

    let output = t
        .cmd()
        .args(["check", "-", "--json"])
        .write_stdin(DECRYPTED_MANIFEST)
        .output()
        .unwrap();

    assert_success(&output);
    assert_stdout_contains(&output, "\"DecryptedSecret\"");
}
