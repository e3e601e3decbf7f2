// changelog validator

use super::config::ChangelogConfig;
use super::report::{ErrorCategory, ErrorReport};
use super::types::{
    ChangeTypeSet, Changelog, ChangelogEntry, ChangelogSection, UNRELEASED_ENTRY_NAME,
};
use super::version::ReleaseVersion;
use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// expected values a changelog is checked against; blank values are ignored
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReference {
    pub project_name: Option<String>,
    pub description: Option<String>,
    pub version: Option<String>,
}

impl ValidationReference {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn project_name(mut self, name: impl Into<String>) -> Self {
        self.project_name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }
}

/// a comment split from its trailing `(ID-1, ID-2)` list and end punctuation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeComment {
    pub comment: String,
    pub ids: Vec<String>,
}

impl ChangeComment {
    pub fn parse(text: &str, with_id_list: bool) -> Self {
        let trimmed = text.trim();
        let mut comment = trimmed
            .strip_suffix(['.', '!'])
            .unwrap_or(trimmed)
            .to_string();
        let mut ids = Vec::new();

        if with_id_list {
            if let Some(open) = comment.rfind('(').filter(|i| *i > 0) {
                let list = comment[open + 1..].trim();
                if let Some(list) = list.strip_suffix(')').filter(|l| !l.trim().is_empty()) {
                    ids = list
                        .split(',')
                        .map(str::trim)
                        .filter(|id| !id.is_empty())
                        .map(str::to_string)
                        .collect();
                    comment = comment[..open].trim().to_string();
                }
            }
        }

        Self { comment, ids }
    }
}

// where a message is filed
#[derive(Clone, Copy)]
enum Scope<'a> {
    General(ErrorCategory),
    Release(Option<&'a ReleaseVersion>),
}

impl Scope<'_> {
    fn add(self, report: &mut ErrorReport, message: String) {
        match self {
            Scope::General(category) => report.add_general_error(category, message),
            Scope::Release(version) => report.add_release_error(version, message),
        }
    }
}

fn ends_with_punctuation(text: &str) -> bool {
    let text = text.trim();
    text.ends_with('.') || text.ends_with('!')
}

fn compile(pattern: Option<&str>) -> Result<Option<Regex>> {
    pattern
        .map(|p| {
            Regex::new(p).map_err(|e| Error::InvalidPattern {
                pattern: p.to_string(),
                source: e,
            })
        })
        .transpose()
}

/// checks a parsed changelog against the configured rules
///
/// every rule runs; the report holds all violations at once.
#[derive(Debug, Clone)]
pub struct ChangelogValidator {
    config: ChangelogConfig,
    link: Option<Regex>,
    identifier: Option<Regex>,
}

impl ChangelogValidator {
    pub fn new(config: &ChangelogConfig) -> Result<Self> {
        Ok(Self {
            config: config.clone(),
            link: compile(config.link_pattern.as_deref())?,
            identifier: compile(config.identifier_pattern.as_deref())?,
        })
    }

    pub fn config(&self) -> &ChangelogConfig {
        &self.config
    }

    /// first link found in `text`
    pub fn find_link<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.link.as_ref()?.find(text).map(|m| m.as_str())
    }

    /// true when `text` is a link and nothing else
    pub fn is_link(&self, text: &str) -> bool {
        self.link
            .as_ref()
            .and_then(|re| re.find(text))
            .is_some_and(|m| m.start() == 0 && m.end() == text.len())
    }

    /// first identifier found in `text`
    pub fn find_identifier<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.identifier.as_ref()?.find(text).map(|m| m.as_str())
    }

    pub fn validate(&self, changelog: &Changelog, reference: &ValidationReference) -> ErrorReport {
        let mut report = ErrorReport::new();

        self.validate_header(&mut report, changelog, reference);
        self.validate_unreleased(&mut report, changelog);
        let version = self.resolve_reference_version(&mut report, reference);

        if changelog.entries.is_empty() {
            report.add_general_error(ErrorCategory::Entries, "Missing changelog entries!");
        }

        self.validate_order(&mut report, changelog, version.as_ref());
        if let Some(version) = &version {
            self.validate_presence(&mut report, changelog, version);
        }

        for entry in &changelog.entries {
            self.validate_entry(&mut report, entry);
        }

        report
    }

    fn validate_header(
        &self,
        report: &mut ErrorReport,
        changelog: &Changelog,
        reference: &ValidationReference,
    ) {
        let scope = Scope::General(ErrorCategory::Header);

        if let Some(name) = non_blank(&reference.project_name) {
            if changelog.title != name {
                scope.add(
                    report,
                    format!(
                        "The name doesn't correspond to [{}], current [{}]!",
                        name, changelog.title
                    ),
                );
            }
        }

        match non_blank(&reference.description) {
            Some(description) => {
                if changelog.description.trim() != description.trim() {
                    scope.add(
                        report,
                        format!(
                            "The description doesn't correspond to [{}], current [{}]!",
                            description.trim(),
                            changelog.description.trim()
                        ),
                    );
                }
            }
            None => self.validate_description(report, scope, &changelog.description),
        }
    }

    fn validate_unreleased(&self, report: &mut ErrorReport, changelog: &Changelog) {
        if !self.config.allow_unreleased && changelog.unreleased_entry().is_some() {
            report.add_general_error(
                ErrorCategory::Unreleased,
                "The unreleased entry is not allowed!",
            );
        }
    }

    fn resolve_reference_version(
        &self,
        report: &mut ErrorReport,
        reference: &ValidationReference,
    ) -> Option<ReleaseVersion> {
        let text = non_blank(&reference.version)?.trim();
        if text.eq_ignore_ascii_case(UNRELEASED_ENTRY_NAME) {
            return None;
        }

        match ReleaseVersion::parse(text) {
            Ok(version) => Some(version),
            Err(_) => {
                report.add_general_error(
                    ErrorCategory::Reference,
                    format!("Invalid reference version [{}]!", text),
                );
                None
            }
        }
    }

    fn validate_order(
        &self,
        report: &mut ErrorReport,
        changelog: &Changelog,
        reference: Option<&ReleaseVersion>,
    ) {
        let sorted = changelog.sorted_entries();

        if let Some(reference) = reference {
            for version in sorted.iter().filter_map(|e| e.version.as_ref()) {
                if version > reference {
                    report.add_release_error(
                        Some(version),
                        format!("Newer version than [{}] in changelog found!", reference),
                    );
                }
            }
        }

        let first_released = match changelog.entries.first() {
            Some(entry) if !entry.is_released() => 1,
            _ => 0,
        };

        let mut sort_error = false;
        for (index, (entry, expected)) in changelog.entries.iter().zip(&sorted).enumerate() {
            if let Some(reference) = reference {
                if index == first_released && entry.version.as_ref() != Some(reference) {
                    report.add_release_error(
                        entry.version.as_ref(),
                        format!("The version [{}] should be referenced as first entry.", reference),
                    );
                }
            }

            if !sort_error && entry != *expected {
                report.add_release_error(entry.version.as_ref(), "Invalid sort order!");
                sort_error = true;
            }
        }
    }

    fn validate_presence(&self, report: &mut ErrorReport, changelog: &Changelog, version: &ReleaseVersion) {
        let found = changelog
            .entries
            .iter()
            .filter(|e| e.version.as_ref() == Some(version))
            .count();

        match found {
            0 => report.add_release_error(
                Some(version),
                format!("Could not find version {}!", version),
            ),
            1 => {}
            n => report.add_release_error(
                Some(version),
                format!("Found {} times the same version {}!", n, version),
            ),
        }
    }

    fn validate_entry(&self, report: &mut ErrorReport, entry: &ChangelogEntry) {
        let version = entry.version.as_ref();
        let scope = Scope::Release(version);

        if !self.config.allow_release_link {
            if let Some(link) = &entry.release_link {
                scope.add(report, format!("Release link is not allowed [{}]!", link));
            }
        }

        if !self.config.allow_release_info {
            if let Some(info) = entry.release_info.as_deref().filter(|i| !i.trim().is_empty()) {
                scope.add(
                    report,
                    format!("Additional release information is not allowed [{}]!", info),
                );
            }
        }

        if !self.config.allow_space_around_version && entry.has_space_around_version {
            scope.add(
                report,
                format!("Spaces around version [{}] are not allowed!", entry.version_label()),
            );
        }

        if !self.config.allow_brackets_around_version
            && entry.has_brackets_around_version
            && entry.release_link.is_none()
        {
            scope.add(
                report,
                format!("Brackets around version [{}] are not allowed!", entry.version_label()),
            );
        }

        if let Some(description) = &entry.description {
            let description_scope = if entry.is_released() {
                scope
            } else {
                Scope::General(ErrorCategory::Unreleased)
            };
            self.validate_description(report, description_scope, description);
        }

        self.validate_sections(report, version, &entry.sections);
    }

    fn validate_description(&self, report: &mut ErrorReport, scope: Scope<'_>, description: &str) {
        if description.trim().is_empty() {
            return;
        }

        if !self.config.allow_link_in_description {
            if let Some(link) = self.find_link(description) {
                scope.add(
                    report,
                    format!("Description has a link which is not allowed: [{}]!", link),
                );
            }
        }

        if let Some(id) = self.find_identifier(description) {
            scope.add(
                report,
                format!("Description has an id which is not allowed: [{}]!", id),
            );
        }

        if !ends_with_punctuation(description) {
            scope.add(
                report,
                "Description text doesn't end with a punctuation mark!".to_string(),
            );
        }
    }

    fn validate_sections(
        &self,
        report: &mut ErrorReport,
        version: Option<&ReleaseVersion>,
        sections: &[ChangelogSection],
    ) {
        let mut seen = ChangeTypeSet::new();
        for section in sections {
            if let Some(change_type) = section.change_type {
                if !seen.insert(change_type) {
                    report.add_release_error(
                        version,
                        format!("Duplicate section type {}!", change_type),
                    );
                } else if section.comments.is_empty() && !self.config.allow_empty_section {
                    report.add_release_error(
                        version,
                        format!("Empty comment list in section type {}!", change_type),
                    );
                }
            }

            let context = match section.change_type {
                Some(change_type) => format!("{} section", change_type),
                None => "Unknown section".to_string(),
            };
            for comment in &section.comments {
                self.validate_comment(report, version, &context, comment);
            }
        }
    }

    fn validate_comment(
        &self,
        report: &mut ErrorReport,
        version: Option<&ReleaseVersion>,
        context: &str,
        comment: &str,
    ) {
        if comment.trim().is_empty() {
            return;
        }

        if let Some(link) = self.find_link(comment) {
            report.add_release_error(
                version,
                format!("{} has a link which is not allowed: [{}]!", context, link),
            );
        }

        let change = ChangeComment::parse(comment, self.config.allow_trailing_id_list);
        if let Some(id) = self.find_identifier(&change.comment) {
            report.add_release_error(
                version,
                format!("{} has an id which is not allowed: [{}]!", context, id),
            );
        }

        if !ends_with_punctuation(comment) {
            report.add_release_error(
                version,
                format!("{} text doesn't end with a punctuation mark!", context),
            );
        }

        if change.comment.trim().is_empty() {
            report.add_release_error(version, format!("Empty comment in {}!", context));
        } else if change.comment.split_whitespace().count() < 2 {
            report.add_release_error(
                version,
                format!("Invalid sentence in {}: [{}]!", context, change.comment),
            );
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// validate with the given configuration
pub fn validate_changelog(
    changelog: &Changelog,
    config: &ChangelogConfig,
    reference: &ValidationReference,
) -> Result<ErrorReport> {
    Ok(ChangelogValidator::new(config)?.validate(changelog, reference))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::changelog::parser::parse_changelog;
    use crate::utils::changelog::types::ChangeType;

    fn v(text: &str) -> ReleaseVersion {
        text.parse().unwrap()
    }

    fn validate(text: &str, config: &ChangelogConfig, reference: &ValidationReference) -> ErrorReport {
        let result = parse_changelog(text).unwrap();
        assert!(result.errors.is_empty(), "{}", result.errors);
        ChangelogValidator::new(config)
            .unwrap()
            .validate(&result.changelog, reference)
    }

    const VALID: &str = "# Changelog\n\
All notable changes are documented here.\n\
\n\
## [Unreleased]\n\
\n\
## [1.1.0] - 2021-04-08\n\
### Added\n\
- Support custom separators (ISSUE-1234, ISSUE-1235).\n\
\n\
## 1.0.0 - 2021-01-01\n\
### Fixed\n\
- Initial public release!\n";

    #[test]
    fn test_change_comment_id_list() {
        let change = ChangeComment::parse("Fix the parser (ABC-123, DEF-456).", true);
        assert_eq!(change.comment, "Fix the parser");
        assert_eq!(change.ids, vec!["ABC-123".to_string(), "DEF-456".to_string()]);

        let kept = ChangeComment::parse("Fix the parser (ABC-123).", false);
        assert_eq!(kept.comment, "Fix the parser (ABC-123)");
        assert!(kept.ids.is_empty());

        let leading = ChangeComment::parse("(ABC-123)", true);
        assert_eq!(leading.comment, "(ABC-123)");

        let empty = ChangeComment::parse("Something ( ).", true);
        assert_eq!(empty.comment, "Something ( )");
    }

    #[test]
    fn test_invalid_pattern() {
        let config = ChangelogConfig::new().link_pattern(Some("(".to_string()));
        assert!(matches!(
            ChangelogValidator::new(&config),
            Err(Error::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_link_detection() {
        let validator = ChangelogValidator::new(&ChangelogConfig::default()).unwrap();
        assert_eq!(
            validator.find_link("see https://example.com/a for details"),
            Some("https://example.com/a")
        );
        assert!(validator.is_link("https://example.com/CHANGELOG.md"));
        assert!(!validator.is_link("CHANGELOG.md"));
        assert!(!validator.is_link("see https://example.com/a"));
    }

    #[test]
    fn test_valid_changelog() {
        let reference = ValidationReference::new()
            .project_name("Changelog")
            .version("1.1.0");
        let report = validate(VALID, &ChangelogConfig::default(), &reference);
        assert!(report.is_empty(), "{}", report);
    }

    #[test]
    fn test_reference_values() {
        let reference = ValidationReference::new()
            .project_name("Other")
            .description("Something else.");
        let report = validate(VALID, &ChangelogConfig::default(), &reference);
        assert_eq!(
            report.general_errors_for(ErrorCategory::Header),
            [
                "The name doesn't correspond to [Other], current [Changelog]!",
                "The description doesn't correspond to [Something else.], current [All notable changes are documented here.]!"
            ]
        );
        assert_eq!(report.len(), 2);
    }

    #[test]
    fn test_invalid_reference_version() {
        let reference = ValidationReference::new().version("latest");
        let report = validate(VALID, &ChangelogConfig::default(), &reference);
        assert_eq!(
            report.general_errors_for(ErrorCategory::Reference),
            ["Invalid reference version [latest]!"]
        );
        assert_eq!(report.len(), 1);
    }

    #[test]
    fn test_unreleased_reference_version_is_ignored() {
        let reference = ValidationReference::new().version("Unreleased");
        let report = validate(VALID, &ChangelogConfig::default(), &reference);
        assert!(report.is_empty(), "{}", report);
    }

    #[test]
    fn test_missing_reference_version() {
        let reference = ValidationReference::new().version("1.1.1");
        let report = validate(VALID, &ChangelogConfig::default(), &reference);
        assert_eq!(
            report.release_errors_for(&v("1.1.1")),
            ["Could not find version 1.1.1!"]
        );
        assert_eq!(
            report.release_errors_for(&v("1.1.0")),
            ["The version [1.1.1] should be referenced as first entry."]
        );
        assert_eq!(report.len(), 2);
    }

    #[test]
    fn test_newer_version_than_reference() {
        let reference = ValidationReference::new().version("1.0.0");
        let report = validate(VALID, &ChangelogConfig::default(), &reference);
        assert_eq!(
            report.release_errors_for(&v("1.1.0")),
            [
                "Newer version than [1.0.0] in changelog found!",
                "The version [1.0.0] should be referenced as first entry."
            ]
        );
        assert_eq!(report.len(), 2);
    }

    #[test]
    fn test_sort_order_reported_once() {
        let text = "# P\nDescription.\n\n## 1.0.0 - 2021-01-01\n### Added\n- First version.\n\n## 1.1.0 - 2021-02-01\n### Added\n- Second version.\n\n## 0.9.0 - 2020-01-01\n### Added\n- Beta version.\n";
        let report = validate(text, &ChangelogConfig::default(), &ValidationReference::new());
        assert_eq!(report.release_errors_for(&v("1.0.0")), ["Invalid sort order!"]);
        assert_eq!(report.len(), 1);
    }

    #[test]
    fn test_missing_entries() {
        let report = validate("# P\nDescription.\n", &ChangelogConfig::default(), &ValidationReference::new());
        assert_eq!(
            report.general_errors_for(ErrorCategory::Entries),
            ["Missing changelog entries!"]
        );
        assert_eq!(report.len(), 1);
    }

    #[test]
    fn test_duplicate_version() {
        let text = "# P\nDescription.\n\n## 1.0.0 - 2021-01-02\n### Added\n- Second build.\n\n## 1.0.0 - 2021-01-01\n### Added\n- First build.\n";
        let reference = ValidationReference::new().version("1.0.0");
        let report = validate(text, &ChangelogConfig::default(), &reference);
        assert_eq!(
            report.release_errors_for(&v("1.0.0")),
            ["Found 2 times the same version 1.0.0!"]
        );
    }

    #[test]
    fn test_one_word_sentence() {
        let text = "# P\nDescription.\n\n## 1.0.0 - 2021-01-01\n### Fixed\n- fix.\n";
        let report = validate(text, &ChangelogConfig::default(), &ValidationReference::new());
        assert_eq!(
            report.release_errors_for(&v("1.0.0")),
            ["Invalid sentence in Fixed section: [fix]!"]
        );
        assert_eq!(report.len(), 1);
    }

    #[test]
    fn test_section_rules() {
        let text = "# P\nDescription.\n\n## 1.0.0 - 2021-01-01\n### Added\n- Add a thing.\n\n### Added\n- Add another thing.\n\n### Removed\n";
        let report = validate(text, &ChangelogConfig::default(), &ValidationReference::new());
        assert_eq!(
            report.release_errors_for(&v("1.0.0")),
            [
                "Duplicate section type Added!",
                "Empty comment list in section type Removed!"
            ]
        );

        let config = ChangelogConfig::new().allow_empty_section(true);
        let report = validate(text, &config, &ValidationReference::new());
        assert_eq!(report.len(), 1);
    }

    #[test]
    fn test_comment_rules() {
        let text = "# P\nDescription.\n\n## 1.0.0 - 2021-01-01\n### Changed\n- See https://example.com/docs for details.\n- Fixes ABC-1234 in the parser.\n- Missing punctuation here\n";
        let report = validate(text, &ChangelogConfig::default(), &ValidationReference::new());
        assert_eq!(
            report.release_errors_for(&v("1.0.0")),
            [
                "Changed section has a link which is not allowed: [https://example.com/docs]!",
                "Changed section has an id which is not allowed: [ABC-1234]!",
                "Changed section text doesn't end with a punctuation mark!"
            ]
        );

        let config = ChangelogConfig::new().link_pattern(None).identifier_pattern(None);
        let report = validate(text, &config, &ValidationReference::new());
        assert_eq!(report.len(), 1);
    }

    #[test]
    fn test_description_rules() {
        let text = "# P\nSee https://example.com\n\n## [Unreleased]\nWork in progress\n\n## 1.0.0 - 2021-01-01\nRelease for TCK-1234.\n### Added\n- Add a thing.\n";
        let config = ChangelogConfig::new().allow_link_in_description(false);
        let report = validate(text, &config, &ValidationReference::new());
        assert_eq!(
            report.general_errors_for(ErrorCategory::Header),
            [
                "Description has a link which is not allowed: [https://example.com]!",
                "Description text doesn't end with a punctuation mark!"
            ]
        );
        assert_eq!(
            report.general_errors_for(ErrorCategory::Unreleased),
            ["Description text doesn't end with a punctuation mark!"]
        );
        assert_eq!(
            report.release_errors_for(&v("1.0.0")),
            ["Description has an id which is not allowed: [TCK-1234]!"]
        );
    }

    #[test]
    fn test_entry_heading_rules() {
        let text = "# P\nDescription.\n\n## [Unreleased]\n\n## [ 1.0.0 ](https://example.com/1.0.0) - 2021-01-01 - Internal build\n### Added\n- Add a thing.\n";
        let config = ChangelogConfig::new()
            .allow_unreleased(false)
            .allow_release_link(false)
            .allow_release_info(false)
            .allow_space_around_version(false)
            .allow_brackets_around_version(false);
        let report = validate(text, &config, &ValidationReference::new());
        assert_eq!(
            report.general_errors_for(ErrorCategory::Unreleased),
            ["The unreleased entry is not allowed!"]
        );
        assert_eq!(
            report.general_errors_for(ErrorCategory::Header),
            ["Brackets around version [Unreleased] are not allowed!"]
        );
        assert_eq!(
            report.release_errors_for(&v("1.0.0")),
            [
                "Release link is not allowed [https://example.com/1.0.0]!",
                "Additional release information is not allowed [Internal build]!",
                "Spaces around version [1.0.0] are not allowed!"
            ]
        );
    }

    #[test]
    fn test_validator_does_not_touch_document() {
        let mut changelog = Changelog::new("P", "Description.");
        changelog
            .add_entry(Some(v("1.0.0")), None)
            .add_section(ChangeType::Added)
            .add("Add a thing.");
        changelog.add_entry(Some(v("2.0.0")), None);
        let before = changelog.clone();

        let report = validate_changelog(
            &changelog,
            &ChangelogConfig::default(),
            &ValidationReference::new(),
        )
        .unwrap();
        assert_eq!(changelog, before);
        assert!(report.is_empty(), "{}", report);
    }
}
