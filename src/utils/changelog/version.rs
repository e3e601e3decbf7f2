// release version value type

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// a released version: `major.minor.build[-qualifier]`
///
/// this is not semver. the qualifier takes part in ordering after the numeric
/// parts and a version without qualifier sorts before any qualified one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReleaseVersion {
    pub major: u64,
    pub minor: u64,
    pub build: u64,
    pub qualifier: Option<String>,
}

impl ReleaseVersion {
    /// negative parts are clamped to zero, a blank qualifier is dropped
    pub fn new(major: i64, minor: i64, build: i64, qualifier: Option<String>) -> Self {
        Self {
            major: major.max(0) as u64,
            minor: minor.max(0) as u64,
            build: build.max(0) as u64,
            qualifier: qualifier
                .map(|q| q.trim().to_string())
                .filter(|q| !q.is_empty()),
        }
    }

    pub fn parse(input: &str) -> Result<Self> {
        let text = input.trim();
        let invalid = |reason: &str| Error::InvalidVersion {
            version: text.to_string(),
            reason: reason.to_string(),
        };

        if text.is_empty() {
            return Err(invalid("empty version"));
        }

        let mut parts = text.splitn(3, '.');
        let major = parts.next().unwrap_or_default();
        let minor = parts.next();
        let build = parts.next();

        let (major, suffix) = split_number(major).ok_or_else(|| invalid("missing major number"))?;
        if !suffix.is_empty() {
            return Err(invalid("qualifier on major number"));
        }

        let minor = match minor {
            Some(minor) => {
                let (minor, suffix) =
                    split_number(minor).ok_or_else(|| invalid("missing minor number"))?;
                if !suffix.is_empty() {
                    return Err(invalid("qualifier on minor number"));
                }
                minor
            }
            None => 0,
        };

        let (build, qualifier) = match build {
            Some(build) => {
                let (build, suffix) =
                    split_number(build).ok_or_else(|| invalid("missing build number"))?;
                let qualifier = suffix.strip_prefix('-').unwrap_or(suffix);
                let qualifier = qualifier.strip_prefix('.').unwrap_or(qualifier);
                (build, Some(qualifier.to_string()))
            }
            None => (0, None),
        };

        Ok(Self {
            major,
            minor,
            build,
            qualifier: qualifier.filter(|q| !q.trim().is_empty()),
        })
    }

    /// true when `other` is a newer release than this one
    pub fn is_newer(&self, other: &ReleaseVersion) -> bool {
        other > self
    }

    /// true when this release is newer than `other`
    pub fn is_older(&self, other: &ReleaseVersion) -> bool {
        self > other
    }
}

// leading digits and the rest; None when there are no digits or they overflow
fn split_number(part: &str) -> Option<(u64, &str)> {
    let end = part
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(part.len());
    if end == 0 {
        return None;
    }
    let number = part[..end].parse::<u64>().ok()?;
    Some((number, &part[end..]))
}

impl Ord for ReleaseVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        // a missing qualifier is less than any qualifier; qualifiers compare as plain strings
        self.major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
            .then(self.build.cmp(&other.build))
            .then_with(|| match (&self.qualifier, &other.qualifier) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (Some(a), Some(b)) => a.cmp(b),
            })
    }
}

impl PartialOrd for ReleaseVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.build)?;
        if let Some(qualifier) = &self.qualifier {
            write!(f, "-{}", qualifier)?;
        }
        Ok(())
    }
}

impl FromStr for ReleaseVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<&semver::Version> for ReleaseVersion {
    fn from(version: &semver::Version) -> Self {
        let qualifier = if version.pre.is_empty() {
            None
        } else {
            Some(version.pre.as_str().to_string())
        };
        Self {
            major: version.major,
            minor: version.minor,
            build: version.patch,
            qualifier,
        }
    }
}

// versions travel as their textual form so they can be used as json object keys
impl Serialize for ReleaseVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ReleaseVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
