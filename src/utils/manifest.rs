// reference values from a Cargo manifest

use super::changelog::{ReleaseVersion, ValidationReference};
use crate::error::{Error, Result};
use semver::Version;
use std::fs;
use std::path::{Path, PathBuf};

/// `[package]` name, description and version of a crate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestReference {
    pub path: PathBuf,
    pub name: String,
    pub description: Option<String>,
    pub version: Option<Version>,
}

impl ManifestReference {
    /// read a `Cargo.toml`, or the one inside `path` when it is a directory
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let manifest_path = if path.is_dir() {
            path.join("Cargo.toml")
        } else {
            path.to_path_buf()
        };

        let content = fs::read_to_string(&manifest_path).map_err(|e| Error::FileReadError {
            path: manifest_path.clone(),
            source: e,
        })?;

        Self::parse(&content, manifest_path)
    }

    pub fn parse(content: &str, path: PathBuf) -> Result<Self> {
        let invalid = |reason: String| Error::ManifestError {
            path: path.clone(),
            reason,
        };

        let value = content
            .parse::<toml::Value>()
            .map_err(|e| invalid(format!("failed to parse toml: {}", e)))?;

        // workspace-only manifests have no [package]
        let package = value
            .get("package")
            .and_then(|p| p.as_table())
            .ok_or_else(|| invalid("no [package] table".to_string()))?;

        let name = package
            .get("name")
            .and_then(|v| v.as_str())
            .ok_or_else(|| invalid("no package name".to_string()))?
            .to_string();

        let description = package
            .get("description")
            .and_then(|v| v.as_str())
            .map(str::to_string);

        // `version.workspace = true` is not a string and is treated as absent
        let version = match package.get("version").and_then(|v| v.as_str()) {
            Some(text) => Some(
                Version::parse(text)
                    .map_err(|e| invalid(format!("invalid version '{}': {}", text, e)))?,
            ),
            None => None,
        };

        Ok(Self {
            path,
            name,
            description,
            version,
        })
    }

    pub fn release_version(&self) -> Option<ReleaseVersion> {
        self.version.as_ref().map(ReleaseVersion::from)
    }

    /// reference values for validation; the description is left out when
    /// `with_description` is false
    pub fn to_reference(&self, with_description: bool) -> ValidationReference {
        let mut reference = ValidationReference::new().project_name(self.name.clone());
        if with_description {
            reference.description = self.description.clone();
        }
        if let Some(version) = self.release_version() {
            reference = reference.version(version.to_string());
        }
        reference
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const MANIFEST: &str = r#"
[package]
name = "demo"
version = "1.2.0-rc.1"
description = "A demo crate."

[dependencies]
serde = "1.0"
"#;

    #[test]
    fn test_read_manifest() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("Cargo.toml"), MANIFEST).unwrap();

        let manifest = ManifestReference::read(temp.path()).unwrap();
        assert_eq!(manifest.name, "demo");
        assert_eq!(manifest.description.as_deref(), Some("A demo crate."));
        assert_eq!(
            manifest.release_version(),
            Some(ReleaseVersion::new(1, 2, 0, Some("rc.1".to_string())))
        );

        let reference = manifest.to_reference(false);
        assert_eq!(reference.project_name.as_deref(), Some("demo"));
        assert_eq!(reference.version.as_deref(), Some("1.2.0-rc.1"));
        assert!(reference.description.is_none());
        assert_eq!(
            manifest.to_reference(true).description.as_deref(),
            Some("A demo crate.")
        );
    }

    #[test]
    fn test_workspace_version_is_absent() {
        let content = "[package]\nname = \"member\"\nversion.workspace = true\n";
        let manifest = ManifestReference::parse(content, PathBuf::from("Cargo.toml")).unwrap();
        assert!(manifest.version.is_none());
        assert!(manifest.to_reference(true).version.is_none());
    }

    #[test]
    fn test_invalid_manifests() {
        let workspace = "[workspace]\nmembers = [\"a\"]\n";
        assert!(matches!(
            ManifestReference::parse(workspace, PathBuf::from("Cargo.toml")),
            Err(Error::ManifestError { .. })
        ));

        let bad_version = "[package]\nname = \"x\"\nversion = \"one\"\n";
        assert!(matches!(
            ManifestReference::parse(bad_version, PathBuf::from("Cargo.toml")),
            Err(Error::ManifestError { .. })
        ));

        let temp = TempDir::new().unwrap();
        assert!(matches!(
            ManifestReference::read(temp.path()),
            Err(Error::FileReadError { .. })
        ));
    }
}
