pub mod error;
pub mod utils;

pub use error::*;
pub use utils::changelog::{
    ChangeComment, ChangeType, ChangeTypeSet, Changelog, ChangelogConfig, ChangelogEntry,
    ChangelogFormatter, ChangelogParser, ChangelogSection, ChangelogValidator, ErrorCategory,
    ErrorReport, ParseResult, ReleaseVersion, UNRELEASED_ENTRY_NAME, ValidationReference,
    format_changelog, parse_changelog, validate_changelog,
};
pub use utils::config::ToolConfig;
pub use utils::manifest::ManifestReference;
pub use utils::source::{Source, load_source};
