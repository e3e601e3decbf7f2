// changelog configuration

use serde::{Deserialize, Serialize};

/// link detection used in comments, descriptions and source locations
pub const LINK_PATTERN: &str =
    r"((https?|ftp|file)://)+((W|w){3}\.)?[a-zA-Z0-9_-]+\.[a-zA-Z0-9._~/%-]+";

/// issue / ticket identifier detection, e.g. `ABC-1234` or `#-123`
pub const IDENTIFIER_PATTERN: &str = r"[a-zA-Z0-9]{0,3}[-_:][0-9]{3,}";

/// configuration for changelog parsing, validation and formatting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangelogConfig {
    /// heading character (default: '#')
    pub section_character: char,

    /// separator between version, date and info in a release heading (default: '-')
    pub header_separator: char,

    /// list item marker (default: '-')
    pub item_separator: char,

    /// allow an `Unreleased` entry
    pub allow_unreleased: bool,

    /// allow change type sections without comments
    pub allow_empty_section: bool,

    /// allow `[ 1.0.0 ]`
    pub allow_space_around_version: bool,

    /// allow `[1.0.0]` without a release link
    pub allow_brackets_around_version: bool,

    /// allow `[1.0.0](https://...)`
    pub allow_release_link: bool,

    /// allow free text after the release date
    pub allow_release_info: bool,

    /// allow links in the changelog and release descriptions
    pub allow_link_in_description: bool,

    /// allow a trailing `(ID-1, ID-2)` list on comments
    pub allow_trailing_id_list: bool,

    /// pattern rejected in comments; `None` disables the check
    pub link_pattern: Option<String>,

    /// pattern rejected in comments; `None` disables the check
    pub identifier_pattern: Option<String>,
}

impl ChangelogConfig {
    /// create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    pub fn section_character(mut self, character: char) -> Self {
        self.section_character = character;
        self
    }

    pub fn header_separator(mut self, separator: char) -> Self {
        self.header_separator = separator;
        self
    }

    pub fn item_separator(mut self, separator: char) -> Self {
        self.item_separator = separator;
        self
    }

    pub fn allow_unreleased(mut self, allow: bool) -> Self {
        self.allow_unreleased = allow;
        self
    }

    pub fn allow_empty_section(mut self, allow: bool) -> Self {
        self.allow_empty_section = allow;
        self
    }

    pub fn allow_space_around_version(mut self, allow: bool) -> Self {
        self.allow_space_around_version = allow;
        self
    }

    pub fn allow_brackets_around_version(mut self, allow: bool) -> Self {
        self.allow_brackets_around_version = allow;
        self
    }

    pub fn allow_release_link(mut self, allow: bool) -> Self {
        self.allow_release_link = allow;
        self
    }

    pub fn allow_release_info(mut self, allow: bool) -> Self {
        self.allow_release_info = allow;
        self
    }

    pub fn allow_link_in_description(mut self, allow: bool) -> Self {
        self.allow_link_in_description = allow;
        self
    }

    pub fn allow_trailing_id_list(mut self, allow: bool) -> Self {
        self.allow_trailing_id_list = allow;
        self
    }

    pub fn link_pattern(mut self, pattern: Option<String>) -> Self {
        self.link_pattern = pattern;
        self
    }

    pub fn identifier_pattern(mut self, pattern: Option<String>) -> Self {
        self.identifier_pattern = pattern;
        self
    }

    /// characters accepted as list item markers
    pub fn is_item_marker(&self, character: char) -> bool {
        character == self.item_separator || character == '-' || character == '*'
    }

    /// characters accepted between version, date and info
    pub fn is_header_separator(&self, character: char) -> bool {
        character == self.header_separator || character == '-' || character == '/'
    }
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        Self {
            section_character: '#',
            header_separator: '-',
            item_separator: '-',
            allow_unreleased: true,
            allow_empty_section: false,
            allow_space_around_version: true,
            allow_brackets_around_version: true,
            allow_release_link: true,
            allow_release_info: true,
            allow_link_in_description: true,
            allow_trailing_id_list: true,
            link_pattern: Some(LINK_PATTERN.to_string()),
            identifier_pattern: Some(IDENTIFIER_PATTERN.to_string()),
        }
    }
}
