// raw changelog text from a local path or a remote url

use super::changelog::{ChangelogConfig, ChangelogValidator};
use crate::error::{Error, Result};
use std::fmt;
use std::fs;
use std::path::PathBuf;
use url::Url;

#[cfg(feature = "remote")]
const REMOTE_TIMEOUT_SECONDS: u64 = 30;

/// where changelog text comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Local(PathBuf),
    Remote(Url),
}

impl Source {
    /// a location that is entirely a link (per the configured link pattern) is
    /// remote, everything else is a local path
    pub fn detect(location: &str, config: &ChangelogConfig) -> Result<Self> {
        let is_link = ChangelogValidator::new(config)?.is_link(location);
        match Url::parse(location) {
            Ok(url) if is_link => Ok(Source::Remote(url)),
            _ => Ok(Source::Local(PathBuf::from(location))),
        }
    }

    pub fn read(&self) -> Result<String> {
        match self {
            Source::Local(path) => fs::read_to_string(path).map_err(|e| Error::FileReadError {
                path: path.clone(),
                source: e,
            }),
            Source::Remote(url) => fetch(url),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Local(path) => write!(f, "{}", path.display()),
            Source::Remote(url) => write!(f, "{}", url),
        }
    }
}

#[cfg(feature = "remote")]
fn fetch(url: &Url) -> Result<String> {
    let remote_error = |e: reqwest::Error| Error::RemoteReadError {
        url: url.to_string(),
        reason: e.to_string(),
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(REMOTE_TIMEOUT_SECONDS))
        .build()
        .map_err(remote_error)?;

    client
        .get(url.clone())
        .send()
        .and_then(|response| response.error_for_status())
        .and_then(|response| response.text())
        .map_err(remote_error)
}

#[cfg(not(feature = "remote"))]
fn fetch(url: &Url) -> Result<String> {
    Err(Error::RemoteReadError {
        url: url.to_string(),
        reason: "built without the `remote` feature".to_string(),
    })
}

/// read the changelog text at `location`
pub fn load_source(location: &str, config: &ChangelogConfig) -> Result<String> {
    Source::detect(location, config)?.read()
}
