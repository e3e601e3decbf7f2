use super::changelog::ChangelogConfig;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// name of the tool configuration file
pub const CONFIG_FILE_NAME: &str = "changelint.toml";

/// main configuration for changelint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolConfig {
    /// changelog format rules
    #[serde(default)]
    pub changelog: ChangelogConfig,
}

impl ToolConfig {
    /// load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| Error::FileReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: ToolConfig = toml::from_str(&contents).map_err(|e| Error::TomlParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(config)
    }

    /// find and load the configuration file in `dir`
    ///
    /// returns default config if the file is missing or can't be parsed
    pub fn load_or_default<P: AsRef<Path>>(dir: P) -> Self {
        match Self::find_config_file(&dir) {
            Some(config_path) => Self::load_from_file(&config_path).unwrap_or_default(),
            None => Self::default(),
        }
    }

    /// looks for `changelint.toml` directly inside `dir`
    pub fn find_config_file<P: AsRef<Path>>(dir: P) -> Option<PathBuf> {
        let config_path = dir.as_ref().join(CONFIG_FILE_NAME);

        if config_path.is_file() {
            Some(config_path)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE_NAME);
        fs::write(
            &path,
            "[changelog]\nallow_unreleased = false\nsection_character = \"=\"\n",
        )
        .unwrap();

        let config = ToolConfig::load_from_file(&path).unwrap();
        assert!(!config.changelog.allow_unreleased);
        assert_eq!(config.changelog.section_character, '=');
        assert!(config.changelog.allow_release_link);
    }

    #[test]
    fn test_load_missing_file() {
        let temp = TempDir::new().unwrap();
        let result = ToolConfig::load_from_file(temp.path().join("missing.toml"));
        assert!(matches!(result, Err(Error::FileReadError { .. })));
    }

    #[test]
    fn test_load_invalid_toml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[changelog\n").unwrap();

        assert!(matches!(
            ToolConfig::load_from_file(&path),
            Err(Error::TomlParseError { .. })
        ));
        assert_eq!(ToolConfig::load_or_default(temp.path()), ToolConfig::default());
    }

    #[test]
    fn test_load_or_default() {
        let temp = TempDir::new().unwrap();
        assert!(ToolConfig::find_config_file(temp.path()).is_none());
        assert_eq!(ToolConfig::load_or_default(temp.path()), ToolConfig::default());

        fs::write(
            temp.path().join(CONFIG_FILE_NAME),
            "[changelog]\nallow_empty_section = true\n",
        )
        .unwrap();
        assert!(ToolConfig::load_or_default(temp.path()).changelog.allow_empty_section);
    }
}
