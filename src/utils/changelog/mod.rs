// changelog parsing, validation and formatting

pub mod config;
pub mod formatter;
pub mod parser;
pub mod report;
pub mod scanner;
pub mod types;
pub mod validator;
pub mod version;

pub use config::ChangelogConfig;
pub use formatter::{ChangelogFormatter, format_changelog};
pub use parser::{ChangelogParser, ParseResult, parse_changelog};
pub use report::{ErrorCategory, ErrorReport};
pub use types::{
    ChangeType, ChangeTypeSet, Changelog, ChangelogEntry, ChangelogSection, UNRELEASED_ENTRY_NAME,
};
pub use validator::{ChangeComment, ChangelogValidator, ValidationReference, validate_changelog};
pub use version::ReleaseVersion;
