// collected changelog problems

use super::version::ReleaseVersion;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// category of a problem that is not tied to a release
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ErrorCategory {
    Changelog,
    Header,
    Entries,
    Reference,
    Unreleased,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorCategory::Changelog => "CHANGELOG",
            ErrorCategory::Header => "HEADER",
            ErrorCategory::Entries => "ENTRIES",
            ErrorCategory::Reference => "REFERENCE",
            ErrorCategory::Unreleased => "UNRELEASED",
        };
        f.write_str(name)
    }
}

/// all problems found in one changelog, grouped by category and by release
///
/// keys and messages keep their first insertion order, which is also the order
/// the listing prints them in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorReport {
    general: Vec<(ErrorCategory, Vec<String>)>,
    releases: Vec<(ReleaseVersion, Vec<String>)>,
}

impl ErrorReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_general_error(&mut self, category: ErrorCategory, message: impl Into<String>) {
        let message = message.into();
        if message.trim().is_empty() {
            return;
        }

        match self.general.iter_mut().find(|(c, _)| *c == category) {
            Some((_, messages)) => messages.push(message),
            None => self.general.push((category, vec![message])),
        }
    }

    /// release scoped problem; without a version it is filed under `Header`
    pub fn add_release_error(&mut self, version: Option<&ReleaseVersion>, message: impl Into<String>) {
        let message = message.into();
        if message.trim().is_empty() {
            return;
        }

        let Some(version) = version else {
            self.add_general_error(ErrorCategory::Header, message);
            return;
        };

        match self.releases.iter_mut().find(|(v, _)| v == version) {
            Some((_, messages)) => messages.push(message),
            None => self.releases.push((version.clone(), vec![message])),
        }
    }

    /// append every message of `other`, keeping its order
    pub fn merge(&mut self, other: ErrorReport) {
        for (category, messages) in other.general {
            for message in messages {
                self.add_general_error(category, message);
            }
        }
        for (version, messages) in other.releases {
            for message in messages {
                self.add_release_error(Some(&version), message);
            }
        }
    }

    pub fn general_errors(&self) -> &[(ErrorCategory, Vec<String>)] {
        &self.general
    }

    pub fn release_errors(&self) -> &[(ReleaseVersion, Vec<String>)] {
        &self.releases
    }

    pub fn general_errors_for(&self, category: ErrorCategory) -> &[String] {
        self.general
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, messages)| messages.as_slice())
            .unwrap_or(&[])
    }

    pub fn release_errors_for(&self, version: &ReleaseVersion) -> &[String] {
        self.releases
            .iter()
            .find(|(v, _)| v == version)
            .map(|(_, messages)| messages.as_slice())
            .unwrap_or(&[])
    }

    pub fn count_general_errors(&self) -> usize {
        self.general.iter().map(|(_, m)| m.len()).sum()
    }

    pub fn count_release_errors(&self) -> usize {
        self.releases.iter().map(|(_, m)| m.len()).sum()
    }

    pub fn len(&self) -> usize {
        self.count_general_errors() + self.count_release_errors()
    }

    pub fn is_empty(&self) -> bool {
        self.general.is_empty() && self.releases.is_empty()
    }

    /// every message with its key, general problems first
    pub fn messages(&self) -> Vec<(String, &str)> {
        let general = self
            .general
            .iter()
            .flat_map(|(c, m)| m.iter().map(move |msg| (c.to_string(), msg.as_str())));
        let releases = self
            .releases
            .iter()
            .flat_map(|(v, m)| m.iter().map(move |msg| (v.to_string(), msg.as_str())));
        general.chain(releases).collect()
    }
}

// one `- <key>: <message>` line per problem
impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, message) in self.messages() {
            writeln!(f, "- {}: {}", key, message)?;
        }
        Ok(())
    }
}

struct KeyedMessages<'a, K>(&'a [(K, Vec<String>)]);

impl<K: fmt::Display> Serialize for KeyedMessages<'_, K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, messages) in self.0 {
            map.serialize_entry(&key.to_string(), messages)?;
        }
        map.end()
    }
}

impl Serialize for ErrorReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("general", &KeyedMessages(&self.general))?;
        map.serialize_entry("releases", &KeyedMessages(&self.releases))?;
        map.end()
    }
}
