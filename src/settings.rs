/// Process-level settings
///
/// Resolved with the following priority (highest to lowest):
/// 1. CLI flags (handled in cli.rs)
/// 2. Environment variables (AGENT_INSPECTOR_*)
/// 3. Built-in defaults
use std::path::PathBuf;

/// Overrides the directory holding the bundled provider configurations
pub const CONFIG_DIR_ENV: &str = "AGENT_INSPECTOR_CONFIG_DIR";

/// Overrides the perimeter runtime executable
pub const PERIMETER_BIN_ENV: &str = "AGENT_INSPECTOR_PERIMETER_BIN";

/// Overrides the arguments placed before `--config <path>`
pub const PERIMETER_ARGS_ENV: &str = "AGENT_INSPECTOR_PERIMETER_ARGS";

pub const DEFAULT_PERIMETER_BIN: &str = "cylestio-perimeter";
pub const DEFAULT_PERIMETER_ARGS: &[&str] = &["run"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Explicit bundled-config directory; `None` means "locate it"
    pub config_dir: Option<PathBuf>,

    /// Executable that hosts the perimeter runtime
    pub perimeter_program: String,

    /// Arguments passed ahead of `--config <path>`
    pub perimeter_args: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            config_dir: None,
            perimeter_program: DEFAULT_PERIMETER_BIN.to_string(),
            perimeter_args: DEFAULT_PERIMETER_ARGS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl Settings {
    /// Defaults with environment variable overrides applied
    pub fn from_env() -> Self {
        let mut settings = Self::default();
        settings.apply_overrides(|key| std::env::var(key).ok());
        settings
    }

    /// Prefer an explicit directory from the command line
    pub fn with_config_dir(mut self, dir: Option<PathBuf>) -> Self {
        if dir.is_some() {
            self.config_dir = dir;
        }
        self
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(CONFIG_DIR_ENV).filter(|v| !v.trim().is_empty()) {
            self.config_dir = Some(PathBuf::from(dir));
        }

        if let Some(program) = lookup(PERIMETER_BIN_ENV).filter(|v| !v.trim().is_empty()) {
            self.perimeter_program = program;
        }

        // An empty value is meaningful: no leading arguments at all
        if let Some(args) = lookup(PERIMETER_ARGS_ENV) {
            self.perimeter_args = args.split_whitespace().map(str::to_string).collect();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.config_dir, None);
        assert_eq!(settings.perimeter_program, "cylestio-perimeter");
        assert_eq!(settings.perimeter_args, vec!["run"]);
    }

    #[test]
    fn test_env_overrides() {
        let mut settings = Settings::default();
        settings.apply_overrides(lookup_from(&[
            (CONFIG_DIR_ENV, "/opt/inspector/configs"),
            (PERIMETER_BIN_ENV, "/usr/local/bin/perimeter"),
            (PERIMETER_ARGS_ENV, "serve  --quiet"),
        ]));

        assert_eq!(
            settings.config_dir,
            Some(PathBuf::from("/opt/inspector/configs"))
        );
        assert_eq!(settings.perimeter_program, "/usr/local/bin/perimeter");
        assert_eq!(settings.perimeter_args, vec!["serve", "--quiet"]);
    }

    #[test]
    fn test_blank_values_keep_defaults() {
        let mut settings = Settings::default();
        settings.apply_overrides(lookup_from(&[
            (CONFIG_DIR_ENV, "  "),
            (PERIMETER_BIN_ENV, ""),
        ]));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_empty_args_clear_defaults() {
        let mut settings = Settings::default();
        settings.apply_overrides(lookup_from(&[(PERIMETER_ARGS_ENV, "")]));
        assert!(settings.perimeter_args.is_empty());
    }

    #[test]
    fn test_cli_dir_wins() {
        let settings = Settings {
            config_dir: Some(PathBuf::from("/from/env")),
            ..Default::default()
        }
        .with_config_dir(Some(PathBuf::from("/from/cli")));
        assert_eq!(settings.config_dir, Some(PathBuf::from("/from/cli")));

        let untouched = Settings {
            config_dir: Some(PathBuf::from("/from/env")),
            ..Default::default()
        }
        .with_config_dir(None);
        assert_eq!(untouched.config_dir, Some(PathBuf::from("/from/env")));
    }
}
