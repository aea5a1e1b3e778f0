/// Patched configuration staged for one launch
///
/// The staged file lives in a private `agent-inspector-*` temporary directory.
/// The directory is removed when the guard is dropped or closed, on every exit
/// path including interruption. Deletion errors are ignored.
use super::document::ConfigDocument;
use super::error::ConfigError;
use crate::provider::Provider;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::debug;

pub const TEMP_DIR_PREFIX: &str = "agent-inspector-";

#[derive(Debug)]
pub struct StagedConfig {
    dir: TempDir,
    path: PathBuf,
}

impl StagedConfig {
    /// Write `document` to `<tmp>/agent-inspector-XXXX/<provider>.yaml`
    pub fn write(document: &ConfigDocument, provider: Provider) -> Result<Self, ConfigError> {
        let yaml = document.to_yaml()?;
        Self::write_in(std::env::temp_dir(), &yaml, provider)
    }

    /// Same as [`StagedConfig::write`] but under an explicit parent directory
    pub fn write_in(
        parent: impl AsRef<Path>,
        yaml: &str,
        provider: Provider,
    ) -> Result<Self, ConfigError> {
        let dir = tempfile::Builder::new()
            .prefix(TEMP_DIR_PREFIX)
            .tempdir_in(parent)?;
        let path = dir.path().join(provider.config_file_name());

        // On failure `dir` is dropped here, which removes it
        std::fs::write(&path, yaml)?;

        debug!("Staged config at {}", path.display());
        Ok(Self { dir, path })
    }

    /// The staged configuration file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The temporary directory owning the staged file
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Remove the temporary directory now
    pub fn cleanup(self) {
        let dir = self.dir.path().to_path_buf();
        match self.dir.close() {
            Ok(()) => debug!("Removed staged config directory {}", dir.display()),
            Err(e) => debug!("Ignoring cleanup error for {}: {}", dir.display(), e),
        }
    }
}
