//! Common test utilities for agent-inspector integration testing.
//!
//! - `Sandbox` - private TMPDIR, config dir and record dir for one binary run
//! - Fake perimeter runtime script that records what it was handed
//! - Helpers for spotting leftover staged directories

#![allow(dead_code)]

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Output, Stdio};
use tempfile::TempDir;

pub const TEMP_PREFIX: &str = "agent-inspector-";

/// Bundled configs shipped with the crate
pub fn bundled_config_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("configs")
}

pub fn binary_path() -> &'static str {
    env!("CARGO_BIN_EXE_agent-inspector")
}

/// Isolated environment for running the binary
pub struct Sandbox {
    root: TempDir,
    config_dir: PathBuf,
    perimeter_bin: String,
    perimeter_args: String,
    extra_env: Vec<(String, String)>,
}

impl Sandbox {
    /// Sandbox using the bundled configs and a recording fake runtime
    pub fn new() -> Result<Self> {
        let root = TempDir::new()?;
        std::fs::create_dir_all(root.path().join("tmp"))?;
        std::fs::create_dir_all(root.path().join("record"))?;

        let script = root.path().join("fake-perimeter.sh");
        std::fs::write(&script, FAKE_PERIMETER)?;

        Ok(Self {
            // Run `sh <script>` rather than executing the script directly
            perimeter_bin: "sh".to_string(),
            perimeter_args: script.display().to_string(),
            config_dir: bundled_config_dir(),
            extra_env: Vec::new(),
            root,
        })
    }

    /// Use a private config dir populated with the given (file, contents) pairs
    pub fn with_configs(mut self, files: &[(&str, &str)]) -> Result<Self> {
        let dir = self.root.path().join("configs");
        std::fs::create_dir_all(&dir)?;
        for (name, contents) in files {
            std::fs::write(dir.join(name), contents)?;
        }
        self.config_dir = dir;
        Ok(self)
    }

    pub fn with_perimeter(mut self, bin: &str, args: &str) -> Self {
        self.perimeter_bin = bin.to_string();
        self.perimeter_args = args.to_string();
        self
    }

    /// Replace the fake runtime script
    pub fn with_script(self, script: &str) -> Result<Self> {
        std::fs::write(self.root.path().join("fake-perimeter.sh"), script)?;
        Ok(self)
    }

    pub fn with_env(mut self, key: &str, value: &str) -> Self {
        self.extra_env.push((key.to_string(), value.to_string()));
        self
    }

    pub fn tmp_dir(&self) -> PathBuf {
        self.root.path().join("tmp")
    }

    pub fn record_dir(&self) -> PathBuf {
        self.root.path().join("record")
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut command = Command::new(binary_path());
        command
            .args(args)
            .env("TMPDIR", self.tmp_dir())
            .env("NO_COLOR", "1")
            .env("RECORD_DIR", self.record_dir())
            .env("AGENT_INSPECTOR_CONFIG_DIR", &self.config_dir)
            .env("AGENT_INSPECTOR_PERIMETER_BIN", &self.perimeter_bin)
            .env("AGENT_INSPECTOR_PERIMETER_ARGS", &self.perimeter_args);
        for (key, value) in &self.extra_env {
            command.env(key, value);
        }
        command
    }

    /// Run the binary with the given arguments
    pub fn run(&self, args: &[&str]) -> Result<Output> {
        Ok(self.command(args).output()?)
    }

    /// Start the binary as the leader of a new process group, like a shell
    /// job, so a terminal-style interrupt can be sent to the whole group
    #[cfg(unix)]
    pub fn spawn_job(&self, args: &[&str]) -> Result<Child> {
        use std::os::unix::process::CommandExt;

        Ok(self
            .command(args)
            .process_group(0)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?)
    }

    /// Wait until `file` shows up in the record dir
    pub fn wait_for_record(&self, file: &str, timeout: std::time::Duration) -> bool {
        let path = self.record_dir().join(file);
        let deadline = std::time::Instant::now() + timeout;
        while std::time::Instant::now() < deadline {
            if path.exists() {
                return true;
            }
            std::thread::sleep(std::time::Duration::from_millis(20));
        }
        path.exists()
    }

    /// Staged directories still present in the sandbox TMPDIR
    pub fn leftover_staged_dirs(&self) -> Vec<PathBuf> {
        std::fs::read_dir(self.tmp_dir())
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .map(|e| e.path())
                    .filter(|p| {
                        p.file_name()
                            .map(|n| n.to_string_lossy().starts_with(TEMP_PREFIX))
                            .unwrap_or(false)
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Path the fake runtime was handed, if it ran
    pub fn recorded_path(&self) -> Option<PathBuf> {
        std::fs::read_to_string(self.record_dir().join("path.txt"))
            .ok()
            .map(|s| PathBuf::from(s.trim()))
    }

    /// Copy of the config the fake runtime saw, if it ran
    pub fn recorded_config(&self) -> Option<String> {
        std::fs::read_to_string(self.record_dir().join("seen.yaml")).ok()
    }

    /// Full argument list the fake runtime received, if it ran
    pub fn recorded_args(&self) -> Option<String> {
        std::fs::read_to_string(self.record_dir().join("args.txt"))
            .ok()
            .map(|s| s.trim().to_string())
    }
}

/// Records its arguments and a copy of the config, then exits with FAKE_EXIT
const FAKE_PERIMETER: &str = r#"
for arg; do last="$arg"; done
echo "$@" > "$RECORD_DIR/args.txt"
echo "$last" > "$RECORD_DIR/path.txt"
cp "$last" "$RECORD_DIR/seen.yaml"
exit "${FAKE_EXIT:-0}"
"#;

/// Records the config path, then runs until interrupted. On SIGINT it takes a
/// moment to shut down and copies the config it was given before exiting 130.
pub const SLOW_STOP_PERIMETER: &str = r#"
for arg; do last="$arg"; done
trap 'sleep 0.2; cp "$last" "$RECORD_DIR/graceful.yaml"; exit 130' INT
echo "$last" > "$RECORD_DIR/path.txt"
while :; do sleep 0.05; done
"#;

/// Send SIGINT to every process in the group led by `pgid`
#[cfg(unix)]
pub fn interrupt_group(pgid: u32) -> Result<()> {
    let status = Command::new("kill")
        .args(["-s", "INT", "--", &format!("-{}", pgid)])
        .status()?;
    anyhow::ensure!(status.success(), "kill exited with {}", status);
    Ok(())
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}
