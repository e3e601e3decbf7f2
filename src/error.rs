use std::fmt;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// the changelog source carried no text at all
    EmptyInput,
    FileReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    TomlParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },
    InvalidVersion {
        version: String,
        reason: String,
    },
    ManifestError {
        path: PathBuf,
        reason: String,
    },
    RemoteReadError {
        url: String,
        reason: String,
    },
    IoError(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EmptyInput => {
                write!(f, "changelog input is empty")
            }
            Error::FileReadError { path, source } => {
                write!(f, "failed to read file: {} ({})", path.display(), source)
            }
            Error::TomlParseError { path, source } => {
                write!(
                    f,
                    "failed to parse toml file: {} ({})",
                    path.display(),
                    source
                )
            }
            Error::InvalidPattern { pattern, source } => {
                write!(f, "invalid check pattern '{}': {}", pattern, source)
            }
            Error::InvalidVersion { version, reason } => {
                write!(f, "invalid release version '{}': {}", version, reason)
            }
            Error::ManifestError { path, reason } => {
                write!(f, "invalid manifest {}: {}", path.display(), reason)
            }
            Error::RemoteReadError { url, reason } => {
                write!(f, "failed to fetch {}: {}", url, reason)
            }
            Error::IoError(err) => {
                write!(f, "io error: {}", err)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::FileReadError { source, .. } => Some(source),
            Error::TomlParseError { source, .. } => Some(source),
            Error::InvalidPattern { source, .. } => Some(source),
            Error::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err)
    }
}
