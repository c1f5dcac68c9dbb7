//! Tests for `reseal completions`.

use crate::support::*;

#[test]
fn test_completions_bash() {
    let t = Test::new();

    let output = t.run(&["completions", "bash"]);
    assert_success(&output);
    assert_stdout_contains(&output, "reseal");
}

#[test]
fn test_completions_unknown_shell() {
    let t = Test::new();

    let output = t.run(&["completions", "tcsh"]);
    assert!(!output.status.success());
}
