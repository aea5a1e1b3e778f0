/// Bundled provider configurations
///
/// The store is a read-only directory holding one `<provider>.yaml` per
/// supported provider. Directory resolution priority (highest to lowest):
/// 1. `--config-dir` flag
/// 2. AGENT_INSPECTOR_CONFIG_DIR
/// 3. `configs/` next to the executable
/// 4. `configs/` in the crate source tree
use super::document::ConfigDocument;
use super::error::ConfigError;
use crate::provider::Provider;
use crate::settings::Settings;
use serde_yaml::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

const CONFIG_DIR_NAME: &str = "configs";

#[derive(Debug, Clone)]
pub struct ConfigStore {
    dir: PathBuf,
}

impl ConfigStore {
    /// Use an explicit directory
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Locate the bundled configuration directory
    pub fn locate(settings: &Settings) -> Self {
        if let Some(dir) = &settings.config_dir {
            debug!("Using configured config directory: {}", dir.display());
            return Self::new(dir);
        }

        if let Some(dir) = Self::beside_executable().filter(|dir| dir.is_dir()) {
            debug!("Using config directory beside executable: {}", dir.display());
            return Self::new(dir);
        }

        let fallback = Path::new(env!("CARGO_MANIFEST_DIR")).join(CONFIG_DIR_NAME);
        debug!("Using source tree config directory: {}", fallback.display());
        Self::new(fallback)
    }

    fn beside_executable() -> Option<PathBuf> {
        let exe = std::env::current_exe().ok()?;
        Some(exe.parent()?.join(CONFIG_DIR_NAME))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the bundled file for a provider (which may not exist)
    pub fn path_for(&self, provider: Provider) -> PathBuf {
        self.dir.join(provider.config_file_name())
    }

    /// Literal contents of a provider's bundled file
    pub fn read_raw(&self, provider: Provider) -> Result<String, ConfigError> {
        let path = self.path_for(provider);
        if !path.exists() {
            return Err(ConfigError::NotFound { provider, path });
        }

        std::fs::read_to_string(&path).map_err(|source| ConfigError::Read { path, source })
    }

    /// Load and parse a provider's bundled configuration
    pub fn load(&self, provider: Provider) -> Result<ConfigDocument, ConfigError> {
        let contents = self.read_raw(provider)?;
        let path = self.path_for(provider);

        let root: Value =
            serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse { path, source })?;
        let document = ConfigDocument::from_value(root)?;

        debug!("Loaded {} profile from {}", provider, self.dir.display());
        Ok(document)
    }
}
