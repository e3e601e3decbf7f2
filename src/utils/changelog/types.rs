// changelog data structures

use super::version::ReleaseVersion;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use url::Url;

/// heading text of the entry that has no version yet
pub const UNRELEASED_ENTRY_NAME: &str = "Unreleased";

/// kind of change a section groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeType {
    Added,
    Changed,
    Deprecated,
    Removed,
    Fixed,
    Security,
}

impl ChangeType {
    pub const ALL: [ChangeType; 6] = [
        ChangeType::Added,
        ChangeType::Changed,
        ChangeType::Deprecated,
        ChangeType::Removed,
        ChangeType::Fixed,
        ChangeType::Security,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ChangeType::Added => "Added",
            ChangeType::Changed => "Changed",
            ChangeType::Deprecated => "Deprecated",
            ChangeType::Removed => "Removed",
            ChangeType::Fixed => "Fixed",
            ChangeType::Security => "Security",
        }
    }

    /// exact, case sensitive label lookup
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.label() == label)
    }

    pub fn from_label_ignore_case(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(label))
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// small set of change types, one bit per variant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeTypeSet(u8);

impl ChangeTypeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// returns false when the type was already present
    pub fn insert(&mut self, change_type: ChangeType) -> bool {
        let present = self.contains(change_type);
        self.0 |= change_type.bit();
        !present
    }

    pub fn contains(&self, change_type: ChangeType) -> bool {
        self.0 & change_type.bit() != 0
    }
}

/// a change type heading and its comments
///
/// `change_type` is `None` when the heading could not be resolved; the comments
/// are still collected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangelogSection {
    pub change_type: Option<ChangeType>,
    pub comments: Vec<String>,
}

impl ChangelogSection {
    pub fn new(change_type: Option<ChangeType>) -> Self {
        Self {
            change_type,
            comments: Vec::new(),
        }
    }

    /// append a comment, blank ones are ignored
    pub fn add(&mut self, comment: impl Into<String>) {
        let comment = comment.into();
        if !comment.trim().is_empty() {
            self.comments.push(comment);
        }
    }

    /// heading label, empty for an unresolved change type
    pub fn label(&self) -> &'static str {
        self.change_type.map(|t| t.label()).unwrap_or("")
    }
}

/// one release block (or the single unreleased block) of a changelog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangelogEntry {
    pub version: Option<ReleaseVersion>,
    pub has_brackets_around_version: bool,
    pub has_space_around_version: bool,
    pub release_link: Option<Url>,
    pub release_date: Option<NaiveDate>,
    pub release_info: Option<String>,
    pub was_yanked: bool,
    pub description: Option<String>,
    pub sections: Vec<ChangelogSection>,
}

impl ChangelogEntry {
    pub fn new(version: Option<ReleaseVersion>, release_date: Option<NaiveDate>) -> Self {
        Self {
            version,
            release_date,
            ..Self::default()
        }
    }

    pub fn is_released(&self) -> bool {
        self.version.is_some()
    }

    /// version text, or the unreleased heading
    pub fn version_label(&self) -> String {
        match &self.version {
            Some(version) => version.to_string(),
            None => UNRELEASED_ENTRY_NAME.to_string(),
        }
    }

    pub fn section(&self, change_type: ChangeType) -> Option<&ChangelogSection> {
        self.sections
            .iter()
            .find(|s| s.change_type == Some(change_type))
    }

    /// existing section of that type, or a new one appended at the end
    pub fn add_section(&mut self, change_type: ChangeType) -> &mut ChangelogSection {
        let index = match self
            .sections
            .iter()
            .position(|s| s.change_type == Some(change_type))
        {
            Some(index) => index,
            None => {
                self.sections.push(ChangelogSection::new(Some(change_type)));
                self.sections.len() - 1
            }
        };
        &mut self.sections[index]
    }

    pub fn remove_section(&mut self, change_type: ChangeType) -> Option<ChangelogSection> {
        let index = self
            .sections
            .iter()
            .position(|s| s.change_type == Some(change_type))?;
        Some(self.sections.remove(index))
    }
}

/// entry precedence: the unreleased entry first, then newest release first
pub fn sort_order(a: &ChangelogEntry, b: &ChangelogEntry) -> Ordering {
    match (&a.version, &b.version) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => b.cmp(a),
    }
}

/// a parsed changelog document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Changelog {
    pub title: String,
    pub description: String,
    pub entries: Vec<ChangelogEntry>,
}

impl Changelog {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            entries: Vec::new(),
        }
    }

    fn position(&self, version: Option<&ReleaseVersion>) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.version.as_ref() == version)
    }

    /// entry for `version`; `None` looks up the unreleased entry
    pub fn entry(&self, version: Option<&ReleaseVersion>) -> Option<&ChangelogEntry> {
        self.position(version).map(|i| &self.entries[i])
    }

    pub fn entry_mut(&mut self, version: Option<&ReleaseVersion>) -> Option<&mut ChangelogEntry> {
        self.position(version).map(move |i| &mut self.entries[i])
    }

    pub fn unreleased_entry(&self) -> Option<&ChangelogEntry> {
        self.entry(None)
    }

    /// existing entry for `version` or a new one inserted at the front.
    /// a given date replaces the entry's release date.
    pub fn add_entry(
        &mut self,
        version: Option<ReleaseVersion>,
        release_date: Option<NaiveDate>,
    ) -> &mut ChangelogEntry {
        let index = match self.position(version.as_ref()) {
            Some(index) => index,
            None => {
                self.entries.insert(0, ChangelogEntry::new(version, None));
                0
            }
        };

        let entry = &mut self.entries[index];
        if release_date.is_some() {
            entry.release_date = release_date;
        }
        entry
    }

    pub fn remove_entry(&mut self, version: Option<&ReleaseVersion>) -> Option<ChangelogEntry> {
        let index = self.position(version)?;
        Some(self.entries.remove(index))
    }

    /// entries in precedence order; ties keep document order
    pub fn sorted_entries(&self) -> Vec<&ChangelogEntry> {
        let mut sorted: Vec<&ChangelogEntry> = self.entries.iter().collect();
        sorted.sort_by(|a, b| sort_order(a, b));
        sorted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(text: &str) -> ReleaseVersion {
        text.parse().unwrap()
    }

    fn date(text: &str) -> NaiveDate {
        NaiveDate::parse_from_str(text, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_change_type_labels() {
        assert_eq!(ChangeType::from_label("Fixed"), Some(ChangeType::Fixed));
        assert_eq!(ChangeType::from_label("fixed"), None);
        assert_eq!(
            ChangeType::from_label_ignore_case("SECURITY"),
            Some(ChangeType::Security)
        );
        assert_eq!(ChangeType::Deprecated.to_string(), "Deprecated");
    }

    #[test]
    fn test_change_type_set() {
        let mut set = ChangeTypeSet::new();
        assert!(!set.contains(ChangeType::Added));
        assert!(set.insert(ChangeType::Added));
        assert!(set.insert(ChangeType::Security));
        assert!(!set.insert(ChangeType::Added));
        assert!(set.contains(ChangeType::Security));
        assert!(!set.contains(ChangeType::Fixed));
    }

    #[test]
    fn test_section_ignores_blank_comments() {
        let mut section = ChangelogSection::new(Some(ChangeType::Added));
        section.add("New feature.");
        section.add("   ");
        section.add("");
        assert_eq!(section.comments, vec!["New feature.".to_string()]);
        assert_eq!(ChangelogSection::new(None).label(), "");
    }

    #[test]
    fn test_entry_sections() {
        let mut entry = ChangelogEntry::new(Some(v("1.0.0")), None);
        entry.add_section(ChangeType::Fixed).add("Fix a bug.");
        entry.add_section(ChangeType::Added).add("Add a feature.");
        entry.add_section(ChangeType::Fixed).add("Fix another bug.");

        assert_eq!(entry.sections.len(), 2);
        assert_eq!(entry.section(ChangeType::Fixed).unwrap().comments.len(), 2);

        let removed = entry.remove_section(ChangeType::Fixed).unwrap();
        assert_eq!(removed.comments.len(), 2);
        assert!(entry.section(ChangeType::Fixed).is_none());
        assert!(entry.remove_section(ChangeType::Security).is_none());
    }

    #[test]
    fn test_changelog_entries() {
        let mut changelog = Changelog::new("Project", "Description.");
        changelog.add_entry(Some(v("1.0.0")), Some(date("2021-01-01")));
        changelog.add_entry(None, None);
        changelog.add_entry(Some(v("1.0.0")), Some(date("2021-02-01")));

        assert_eq!(changelog.entries.len(), 2);
        assert!(!changelog.entries[0].is_released());
        assert_eq!(
            changelog.entry(Some(&v("1.0.0"))).unwrap().release_date,
            Some(date("2021-02-01"))
        );
        assert!(changelog.unreleased_entry().is_some());

        changelog.entry_mut(None).unwrap().description = Some("Soon.".to_string());
        assert_eq!(
            changelog.unreleased_entry().unwrap().description.as_deref(),
            Some("Soon.")
        );

        assert!(changelog.remove_entry(None).is_some());
        assert!(changelog.unreleased_entry().is_none());
        assert!(changelog.remove_entry(Some(&v("2.0.0"))).is_none());
    }

    #[test]
    fn test_sort_order() {
        let mut changelog = Changelog::new("P", "");
        changelog.entries.push(ChangelogEntry::new(Some(v("1.0.0")), None));
        changelog.entries.push(ChangelogEntry::new(Some(v("1.2.0")), None));
        changelog.entries.push(ChangelogEntry::new(None, None));
        changelog.entries.push(ChangelogEntry::new(Some(v("1.1.0")), None));

        let labels: Vec<String> = changelog
            .sorted_entries()
            .iter()
            .map(|e| e.version_label())
            .collect();
        assert_eq!(labels, vec!["Unreleased", "1.2.0", "1.1.0", "1.0.0"]);
    }
}
