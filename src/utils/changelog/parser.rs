// changelog parser

use super::config::ChangelogConfig;
use super::report::{ErrorCategory, ErrorReport};
use super::scanner::Scanner;
use super::types::{
    ChangeType, Changelog, ChangelogEntry, ChangelogSection, UNRELEASED_ENTRY_NAME,
};
use super::version::ReleaseVersion;
use crate::error::{Error, Result};
use chrono::NaiveDate;
use serde::Serialize;
use url::Url;

const DATE_FORMAT: &str = "%Y-%m-%d";
const YANKED: &str = "YANKED";
const YANKED_MARKER: &str = "[YANKED]";
const SECTION_LEVEL: usize = 3;

/// parsed document plus every format problem met on the way
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseResult {
    pub changelog: Changelog,
    pub errors: ErrorReport,
}

/// parse changelog text with the default configuration
pub fn parse_changelog(text: &str) -> Result<ParseResult> {
    ChangelogParser::new(&ChangelogConfig::default()).parse(text)
}

/// turns changelog text into a [`Changelog`]
///
/// malformed content never fails the parse; problems are collected in the
/// returned [`ErrorReport`]. only text without any content is an error.
#[derive(Debug, Clone)]
pub struct ChangelogParser {
    config: ChangelogConfig,
}

impl ChangelogParser {
    pub fn new(config: &ChangelogConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    pub fn parse(&self, text: &str) -> Result<ParseResult> {
        if text.trim().is_empty() {
            return Err(Error::EmptyInput);
        }

        let mut session = ParseSession {
            config: &self.config,
            scanner: Scanner::new(text),
            errors: ErrorReport::new(),
            date_warning: false,
        };

        let mut changelog = session.read_header();
        session.read_entries(&mut changelog);

        Ok(ParseResult {
            changelog,
            errors: session.errors,
        })
    }
}

// state of a single parse call
struct ParseSession<'a> {
    config: &'a ChangelogConfig,
    scanner: Scanner,
    errors: ErrorReport,
    date_warning: bool,
}

struct VersionToken {
    version: Option<ReleaseVersion>,
    has_brackets: bool,
    has_space: bool,
    link: Option<Url>,
}

impl ParseSession<'_> {
    /// skip to the next heading run and return its length, 0 at the end
    fn read_marker(&mut self) -> usize {
        let section = self.config.section_character;
        self.scanner.read_until(&[section]);
        let count = self.scanner.read_run(section);
        self.scanner.skip_blanks();
        count
    }

    fn read_block(&mut self) -> String {
        self.scanner.read_block(self.config.section_character)
    }

    fn read_header(&mut self) -> Changelog {
        self.read_marker();
        let title = self.scanner.read_line().trim_end().to_string();
        if title.is_empty() {
            self.errors
                .add_general_error(ErrorCategory::Changelog, "Invalid empty changelog name!");
        }
        let description = self.read_block();
        Changelog::new(title, description)
    }

    fn read_entries(&mut self, changelog: &mut Changelog) {
        self.read_marker();
        while !self.scanner.is_at_end() {
            let mut entry = self.read_entry_header();
            let description = self.read_block();
            if !description.is_empty() {
                entry.description = Some(description);
            }

            let mut marker = self.read_marker();
            while !self.scanner.is_at_end() && marker == SECTION_LEVEL {
                let section = self.read_section(entry.version.as_ref());
                entry.sections.push(section);
                marker = self.read_marker();
            }

            changelog.entries.push(entry);
        }
    }

    fn read_entry_header(&mut self) -> ChangelogEntry {
        let token = self.read_version_token();
        let mut entry = ChangelogEntry::new(token.version, None);
        entry.has_brackets_around_version = token.has_brackets;
        entry.has_space_around_version = token.has_space;
        entry.release_link = token.link;

        let separator = self.read_header_separator();
        let (release_date, date_separator) = self.read_date_slot(entry.version.as_ref());
        entry.release_date = release_date;
        if let (Some(first), Some(second)) = (separator, date_separator) {
            if first != second {
                self.errors.add_release_error(
                    entry.version.as_ref(),
                    format!(
                        "Found mixed separator characters [{}] and [{}] in release heading!",
                        first, second
                    ),
                );
            }
        }

        let info = self.scanner.read_line().trim().to_string();
        let (info, yanked) = self.strip_yanked(info);
        entry.release_info = info;
        entry.was_yanked = yanked;
        entry
    }

    fn read_version_token(&mut self) -> VersionToken {
        self.scanner.skip_blanks();
        let mut token = self.scanner.read_until(&[' ', '\n']);

        // `[ 1.0.0 ]` carries blanks inside the brackets
        if token.starts_with('[') && !token.contains(']') {
            token.push_str(&self.scanner.read_until(&[']', '\n']));
            if self.scanner.current_is(']') && self.scanner.advance().is_ok() {
                token.push(']');
                token.push_str(&self.scanner.read_until(&[' ', '\n']));
            }
        }

        let mut result = VersionToken {
            version: None,
            has_brackets: false,
            has_space: false,
            link: None,
        };

        let mut version_text = token.as_str();
        let mut link_error = None;
        if let Some(close) = token.find(']').filter(|_| token.starts_with('[')) {
            let inner = &token[1..close];
            result.has_brackets = true;
            result.has_space = inner.trim() != inner;
            version_text = inner.trim();

            let rest = &token[close + 1..];
            let rest = rest.strip_prefix('(').unwrap_or(rest);
            let link = rest.strip_suffix(')').unwrap_or(rest);
            if !link.trim().is_empty() {
                match Url::parse(link) {
                    Ok(url) => result.link = Some(url),
                    Err(e) => {
                        link_error = Some(format!("Invalid release link [{}]: {}!", link, e))
                    }
                }
            }
        }

        if !version_text.eq_ignore_ascii_case(UNRELEASED_ENTRY_NAME) {
            match ReleaseVersion::parse(version_text) {
                Ok(version) => result.version = Some(version),
                Err(_) => self.errors.add_release_error(
                    None,
                    format!("Invalid release version [{}]!", version_text),
                ),
            }
        }

        if let Some(message) = link_error {
            self.errors.add_release_error(result.version.as_ref(), message);
        }
        result
    }

    fn read_header_separator(&mut self) -> Option<char> {
        self.scanner.skip_blanks();
        let separator = match self.scanner.current() {
            Ok(c) if self.config.is_header_separator(c) => {
                self.scanner.advance().ok();
                Some(c)
            }
            _ => None,
        };
        self.scanner.skip_blanks();
        separator
    }

    /// date and the separator behind it
    ///
    /// the slot is empty when another separator or the yanked marker
    /// takes the place of the date.
    fn read_date_slot(
        &mut self,
        version: Option<&ReleaseVersion>,
    ) -> (Option<NaiveDate>, Option<char>) {
        let token = self.scanner.remaining().split([' ', '\n']).next().unwrap_or("");
        if token == YANKED || token == YANKED_MARKER {
            return (None, None);
        }

        match self.scanner.current() {
            Ok(c) if self.config.is_header_separator(c) => (None, self.read_header_separator()),
            _ => {
                let date = self.read_release_date(version);
                (date, self.read_header_separator())
            }
        }
    }

    fn read_release_date(&mut self, version: Option<&ReleaseVersion>) -> Option<NaiveDate> {
        let raw = self.scanner.read_until(&[' ', '\n']);
        let stripped = raw.strip_prefix('(').unwrap_or(&raw);
        let stripped = stripped.strip_suffix(')').unwrap_or(stripped);

        if stripped != raw && !self.date_warning {
            self.date_warning = true;
            self.errors.add_general_error(
                ErrorCategory::Entries,
                format!("Invalid release date format, e.g. [{}]!", raw),
            );
        }

        if stripped.is_empty() {
            if !raw.is_empty() {
                self.errors
                    .add_release_error(version, format!("Invalid release date [{}]!", raw));
            }
            return None;
        }

        match NaiveDate::parse_from_str(stripped, DATE_FORMAT) {
            Ok(date) => Some(date),
            Err(_) => {
                self.errors
                    .add_release_error(version, format!("Invalid release date [{}]!", raw));
                None
            }
        }
    }

    fn strip_yanked(&self, info: String) -> (Option<String>, bool) {
        if !info.contains(YANKED) {
            return (Some(info).filter(|i| !i.is_empty()), false);
        }

        let info = info.replace(YANKED_MARKER, "").replace(YANKED, "");
        let info = info.trim();
        let info = match info.chars().next() {
            Some(c) if self.config.is_header_separator(c) => info[c.len_utf8()..].trim(),
            _ => info,
        };
        let info = Some(info.to_string()).filter(|i| !i.is_empty());
        (info, true)
    }

    fn read_section(&mut self, version: Option<&ReleaseVersion>) -> ChangelogSection {
        let label = self.scanner.read_line().trim().to_string();
        let change_type = match ChangeType::from_label(&label) {
            Some(change_type) => Some(change_type),
            None => {
                let message = if ChangeType::from_label_ignore_case(&label).is_some() {
                    format!("Change type doesn't match exactly: [{}]!", label)
                } else {
                    format!("Invalid changelog change type: [{}]!", label)
                };
                self.errors.add_release_error(version, message);
                None
            }
        };

        let mut section = ChangelogSection::new(change_type);
        let block = self.read_block();
        if block.is_empty() {
            return section;
        }

        let empty_comment = format!("Empty comment in section type {}!", section.label());
        let mut pending: Option<String> = None;
        for line in block.split('\n') {
            let marker = line.chars().next().filter(|c| self.config.is_item_marker(*c));
            if let Some(marker) = marker {
                let comment = line[marker.len_utf8()..].trim_start();
                if comment.trim().is_empty() {
                    self.errors.add_release_error(version, empty_comment.clone());
                } else if let Some(previous) = pending.replace(comment.to_string()) {
                    section.add(previous);
                }
            } else if line.trim().is_empty() {
                self.errors.add_release_error(version, empty_comment.clone());
            } else {
                match pending.as_mut() {
                    Some(comment) => {
                        comment.push('\n');
                        comment.push_str(line);
                    }
                    None => pending = Some(line.to_string()),
                }
            }
        }
        if let Some(comment) = pending {
            section.add(comment);
        }
        section
    }
}
