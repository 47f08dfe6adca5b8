use assert_cmd::Command;
use std::path::Path;
use tempfile::TempDir;

pub struct CliOutput {
    pub stdout: String,
    #[allow(dead_code)]
    pub stderr: String,
}

pub struct NavigationTestHarness {
    home: TempDir,
}

impl NavigationTestHarness {
    pub fn new() -> Self {
        Self {
            home: tempfile::tempdir().expect("create temp dir"),
        }
    }

    pub fn home(&self) -> &Path {
        self.home.path()
    }

    #[allow(dead_code)]
    pub fn run_interactive(&self, menu_sequences: &[&str], text_inputs: &[&str]) -> CliOutput {
        self.run_interactive_with_env(menu_sequences, text_inputs, &[])
    }

    pub fn run_interactive_with_env(
        &self,
        menu_sequences: &[&str],
        text_inputs: &[&str],
        extra_env: &[(&str, &str)],
    ) -> CliOutput {
        assert!(
            !menu_sequences.is_empty(),
            "provide at least one menu sequence"
        );
        let mut cmd = Command::cargo_bin("leasing_inquiry_cli").expect("binary exists");
        cmd.env("LEASING_INQUIRY_HOME", self.home())
            .env("NO_COLOR", "1")
            .env_remove("EMAIL")
            .env_remove("PASSWORD")
            .env_remove("LEASING_INQUIRY_OUTBOX");
        cmd.env("LEASING_TEST_MENU_EVENTS", join_sequences(menu_sequences));
        if !text_inputs.is_empty() {
            cmd.env("LEASING_TEST_TEXT_INPUTS", join_sequences(text_inputs));
        }
        for (key, value) in extra_env {
            cmd.env(key, value);
        }
        let output = cmd.output().expect("run interactive CLI");
        if !output.status.success() {
            panic!(
                "interactive CLI failed: status={}\nstdout:\n{}\nstderr:\n{}",
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        CliOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}

fn join_sequences(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("|")
}
