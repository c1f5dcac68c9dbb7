//! Decrypt, edit and encrypt cycles through the binary.
//!
//! Needs the `test-kms` feature, which swaps in the stub key service.

use predicates::prelude::*;

use crate::support::*;

/// Encrypt the fixture manifest under `KEY_A` into `enc.yaml`.
fn sealed(t: &Test) -> String {
    t.write("plain.yaml", DECRYPTED_MANIFEST);
    let output = t.run(&["encrypt", "plain.yaml", "--key-id", KEY_A, "-o", "enc.yaml"]);
    assert_success(&output);
    t.read("enc.yaml")
}

/// `text` without the line holding `key`.
fn without_line(text: &str, key: &str) -> String {
    let prefix = format!("  {}: ", key);
    text.lines()
        .filter(|line| !line.starts_with(prefix.as_str()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_edit_cycle_rewrites_only_edited_value() {
    let t = Test::new();
    let enc = sealed(&t);

    let output = t.run(&["decrypt", "enc.yaml", "-o", "dec.yaml"]);
    assert_success(&output);
    let dec = t.read("dec.yaml");
    assert_eq!(dec, DECRYPTED_MANIFEST);

    t.write(
        "dec.yaml",
        &dec.replace("db.internal:5432/payments", "db.internal:6543/payments"),
    );
    let output = t.run(&["encrypt", "dec.yaml", "--original", "enc.yaml", "--in-place"]);
    assert_success(&output);
    assert!(output.stdout.is_empty());
    assert_stderr_contains(&output, &format!("with {}", KEY_A));

    let out = t.read("dec.yaml");
    assert_ne!(raw_value(&out, "DATABASE_URL"), raw_value(&enc, "DATABASE_URL"));
    for key in ["DB_PORT", "TLS_CERT", "WEBHOOK_SECRET"] {
        assert_eq!(raw_value(&out, key), raw_value(&enc, key), "{} changed", key);
    }
    assert_eq!(without_line(&out, "DATABASE_URL"), without_line(&enc, "DATABASE_URL"));

    let output = t.run(&["decrypt", "dec.yaml"]);
    assert_success(&output);
    assert_stdout_contains(&output, "DATABASE_URL: postgres://db.internal:6543/payments\n");
}

#[test]
fn test_decrypt_to_stdout_keeps_status_on_stderr() {
    let t = Test::new();
    sealed(&t);

    let output = t.run(&["decrypt", "enc.yaml"]);

    assert_success(&output);
    assert_eq!(stdout(&output), DECRYPTED_MANIFEST);
    assert_stderr_contains(&output, "decrypted 4 values to stdout");
}

#[test]
fn test_decrypt_from_stdin() {
    let t = Test::new();
    let enc = sealed(&t);

    t.cmd()
        .args(["decrypt", "-"])
        .write_stdin(enc)
        .assert()
        .success()
        .stdout(DECRYPTED_MANIFEST);
}

#[test]
fn test_decrypt_in_place() {
    let t = Test::new();
    sealed(&t);

    let output = t.run(&["decrypt", "enc.yaml", "--in-place"]);

    assert_success(&output);
    assert!(output.stdout.is_empty());
    assert_eq!(t.read("enc.yaml"), DECRYPTED_MANIFEST);
}

#[test]
fn test_key_id_from_environment() {
    let t = Test::new();
    t.write("plain.yaml", DECRYPTED_MANIFEST);

    t.cmd()
        .env("RESEAL_KMS_KEY_ID", KEY_B)
        .args(["encrypt", "plain.yaml", "-o", "enc.yaml"])
        .assert()
        .success()
        .stderr(predicate::str::contains(KEY_B));

    assert!(t.read("enc.yaml").contains("kind: EncryptedSecret\n"));
}

#[test]
fn test_key_id_from_project_config() {
    let t = Test::new();
    t.write("plain.yaml", DECRYPTED_MANIFEST);
    t.write(".reseal.toml", &format!("[kms]\nkey_id = \"{}\"\n", KEY_B));

    let output = t.run(&["encrypt", "plain.yaml", "-o", "enc.yaml"]);

    assert_success(&output);
    assert_stderr_contains(&output, KEY_B);
}

#[test]
fn test_flag_beats_configured_key_id() {
    let t = Test::new();
    t.write("plain.yaml", DECRYPTED_MANIFEST);
    t.write("custom.toml", &format!("[kms]\nkey_id = \"{}\"\n", KEY_B));

    let output = t.run(&[
        "encrypt",
        "plain.yaml",
        "--config",
        "custom.toml",
        "--key-id",
        KEY_A,
        "-o",
        "enc.yaml",
    ]);

    assert_success(&output);
    assert_stderr_contains(&output, KEY_A);
}

#[test]
fn test_encrypt_without_key_id_leaves_file() {
    let t = Test::new();
    t.write("plain.yaml", DECRYPTED_MANIFEST);

    let output = t.run(&["encrypt", "plain.yaml", "--in-place"]);

    assert_exit_code(&output, 1);
    assert_stderr_contains(&output, "key ID cannot be blank");
    assert_eq!(t.read("plain.yaml"), DECRYPTED_MANIFEST);
}
