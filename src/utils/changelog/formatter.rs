// canonical changelog text

use super::config::ChangelogConfig;
use super::types::{Changelog, ChangelogEntry, ChangelogSection};

const YANKED_MARKER: &str = "[YANKED]";

/// format a changelog with the given configuration
pub fn format_changelog(changelog: &Changelog, config: &ChangelogConfig) -> String {
    ChangelogFormatter::new(config).format(changelog)
}

/// writes a [`Changelog`] back to text
///
/// the output parses back into the same document, and formatting that result
/// again yields the same text. entries are written newest first with the
/// unreleased entry on top.
#[derive(Debug, Clone)]
pub struct ChangelogFormatter {
    config: ChangelogConfig,
}

impl ChangelogFormatter {
    pub fn new(config: &ChangelogConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    fn heading(&self, level: usize) -> String {
        self.config.section_character.to_string().repeat(level)
    }

    pub fn format(&self, changelog: &Changelog) -> String {
        let mut out = String::new();
        out.push_str(&self.heading(1));
        out.push(' ');
        out.push_str(&changelog.title);
        out.push('\n');

        if !changelog.description.is_empty() {
            out.push_str(&changelog.description);
            out.push('\n');
        }

        for entry in changelog.sorted_entries() {
            out.push('\n');
            self.format_entry(&mut out, entry);
        }
        out
    }

    fn format_entry(&self, out: &mut String, entry: &ChangelogEntry) {
        let label = entry.version_label();
        let link = entry
            .release_link
            .as_ref()
            .filter(|_| self.config.allow_release_link);

        let brackets = link.is_some()
            || (entry.has_brackets_around_version && self.config.allow_brackets_around_version);
        let spaced = entry.has_space_around_version && self.config.allow_space_around_version;

        out.push_str(&self.heading(2));
        out.push(' ');
        match (brackets, spaced) {
            (true, true) => out.push_str(&format!("[ {} ]", label)),
            (true, false) => out.push_str(&format!("[{}]", label)),
            (false, _) => out.push_str(&label),
        }
        if let Some(link) = link {
            out.push_str(&format!("({})", link));
        }

        let separator = self.config.header_separator;
        let info = entry.release_info.as_deref().filter(|i| !i.trim().is_empty());
        match entry.release_date {
            Some(date) => out.push_str(&format!(" {} {}", separator, date)),
            // info without a date goes behind an empty date slot
            None if !entry.was_yanked && info.is_some() => {
                out.push_str(&format!(" {}", separator))
            }
            None => {}
        }
        if entry.was_yanked {
            out.push_str(&format!(" {} {}", separator, YANKED_MARKER));
        }
        if let Some(info) = info {
            out.push_str(&format!(" {} {}", separator, info));
        }
        out.push('\n');

        if let Some(description) = entry.description.as_deref().filter(|d| !d.is_empty()) {
            out.push_str(description);
            out.push('\n');
            if !entry.sections.is_empty() {
                out.push('\n');
            }
        }

        for (index, section) in entry.sections.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            self.format_section(out, section);
        }
    }

    fn format_section(&self, out: &mut String, section: &ChangelogSection) {
        out.push_str(&self.heading(3));
        out.push(' ');
        out.push_str(section.label());
        out.push('\n');

        for comment in &section.comments {
            out.push(self.config.item_separator);
            out.push(' ');
            out.push_str(comment);
            out.push('\n');
        }
    }
}
