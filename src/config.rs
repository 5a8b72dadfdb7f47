//! Configuration for the skill tracker.
//!
//! Layered lowest to highest: built-in defaults, the YAML config file,
//! environment variables, then command-line flags (applied by the caller).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;

/// Name of the persisted state slot, kept from the browser version.
pub const DEFAULT_SLOT_NAME: &str = "skill-tracker-storage";

/// Default `tracing` filter when neither config nor `RUST_LOG` set one.
pub const DEFAULT_LOG_FILTER: &str = "skill_tracker=warn";

pub const ENV_DATA_DIR: &str = "SKILL_TRACKER_DATA_DIR";
pub const ENV_SLOT: &str = "SKILL_TRACKER_SLOT";

const CONFIG_FILE_NAME: &str = "config.yaml";

/// Resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding the state slot.
    pub data_dir: PathBuf,
    /// Slot name; the file is `<data_dir>/<slot_name>.json`.
    pub slot_name: String,
    pub log_filter: String,
}

/// On-disk form. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    data_dir: Option<PathBuf>,
    slot_name: Option<String>,
    log_filter: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = project_dirs()
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".skill-tracker"));
        Self {
            data_dir,
            slot_name: DEFAULT_SLOT_NAME.to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from `path` if given (it must exist), otherwise
    /// from the default config file if present, then apply the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        let file = match path {
            Some(path) => Some(path.to_path_buf()),
            None => default_config_path().filter(|p| p.exists()),
        };
        if let Some(file) = file {
            config.apply_file(&file)?;
        }

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Merge values from a YAML config file.
    pub fn apply_file(&mut self, path: &Path) -> Result<()> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let file: ConfigFile = serde_yaml::from_str(&contents)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        if let Some(data_dir) = file.data_dir {
            self.data_dir = data_dir;
        }
        if let Some(slot_name) = file.slot_name {
            self.slot_name = slot_name;
        }
        if let Some(log_filter) = file.log_filter {
            self.log_filter = log_filter;
        }
        Ok(())
    }

    /// Apply environment overrides using `lookup` to read variables.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup(ENV_DATA_DIR).filter(|v| !v.is_empty()) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(slot) = lookup(ENV_SLOT).filter(|v| !v.is_empty()) {
            self.slot_name = slot;
        }
    }

    /// Full path of the state file.
    pub fn slot_path(&self) -> PathBuf {
        self.data_dir.join(format!("{}.json", self.slot_name))
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "skill-tracker")
}

/// Default location of the config file, if a home directory is known.
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.slot_name, DEFAULT_SLOT_NAME);
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
        assert!(config.slot_path().ends_with("skill-tracker-storage.json"));
    }

    #[test]
    fn test_apply_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(
            &path,
            "data_dir: /tmp/skills\nslot_name: practice\nlog_filter: skill_tracker=debug\n",
        )
        .unwrap();

        let mut config = Config::default();
        config.apply_file(&path).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/skills"));
        assert_eq!(config.slot_path(), PathBuf::from("/tmp/skills/practice.json"));
        assert_eq!(config.log_filter, "skill_tracker=debug");
    }

    #[test]
    fn test_apply_file_partial() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(&path, "slot_name: other\n").unwrap();

        let mut config = Config::default();
        let before = config.data_dir.clone();
        config.apply_file(&path).unwrap();
        assert_eq!(config.data_dir, before);
        assert_eq!(config.slot_name, "other");
    }

    #[test]
    fn test_apply_file_rejects_unknown_keys() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(&path, "data_directory: /tmp\n").unwrap();

        let mut config = Config::default();
        assert!(config.apply_file(&path).is_err());
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let temp = TempDir::new().unwrap();
        assert!(Config::load(Some(&temp.path().join("nope.yaml"))).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> =
            HashMap::from([(ENV_DATA_DIR, "/data/skills"), (ENV_SLOT, "")]);

        let mut config = Config::default();
        config.apply_env(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.data_dir, PathBuf::from("/data/skills"));
        // Empty values are ignored.
        assert_eq!(config.slot_name, DEFAULT_SLOT_NAME);
    }
}
