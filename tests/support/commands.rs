//! Command helper methods for Test.

use super::Test;
use assert_cmd::Command;
use std::process::Output;

impl Test {
    /// Create a reseal command isolated from the user's environment.
    ///
    /// HOME points at a temp dir, the working directory is the test dir
    /// and every `RESEAL_*` variable is cleared.
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("reseal").expect("failed to find reseal binary");
        cmd.env("HOME", self.home.path());
        cmd.env("USERPROFILE", self.home.path());
        cmd.env("XDG_CONFIG_HOME", self.home.path());
        cmd.env("NO_COLOR", "1");
        for var in [
            "RESEAL_CONFIG",
            "RESEAL_KMS_KEY_ID",
            "RESEAL_KMS_REGION",
            "RESEAL_LOG",
        ] {
            cmd.env_remove(var);
        }
        cmd.current_dir(self.dir.path());
        cmd
    }

    /// Run reseal with `args`.
    pub fn run(&self, args: &[&str]) -> Output {
        self.cmd()
            .args(args)
            .output()
            .expect("failed to run reseal")
    }

    /// Shortcut for `reseal check`.
    pub fn check(&self, file: &str) -> Output {
        self.run(&["check", file])
    }

    /// Shortcut for `reseal check --json`, parsed.
    pub fn check_json(&self, file: &str) -> serde_json::Value {
        let output = self.run(&["check", file, "--json"]);
        super::assert_success(&output);
        serde_json::from_slice(&output.stdout).expect("check --json printed invalid JSON")
    }
}
