// ── Display grouping ──
//
// Sections partition the entry sequence for display. Groups borrow from
// the entry slice and keep each entry's original index, so edits made
// through a group address the right entry.

use std::mem;

use super::entry::{ConfigEntry, Section};

/// A run of entries, optionally headed by a section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryGroup<'a> {
    pub header: Option<(usize, &'a Section)>,
    pub entries: Vec<(usize, &'a ConfigEntry)>,
}

impl EntryGroup<'_> {
    pub fn title(&self) -> Option<&str> {
        self.header.map(|(_, section)| section.title())
    }

    fn is_empty(&self) -> bool {
        self.header.is_none() && self.entries.is_empty()
    }
}

/// Split `entries` at every section. Entries before the first section
/// form an unheaded group; a section with nothing under it still yields
/// a group.
pub fn group_by_section(entries: &[ConfigEntry]) -> Vec<EntryGroup<'_>> {
    let mut groups = Vec::new();
    let mut current = EntryGroup::default();

    for (index, entry) in entries.iter().enumerate() {
        if let ConfigEntry::Section(section) = entry {
            if !current.is_empty() {
                groups.push(mem::take(&mut current));
            }
            current.header = Some((index, section));
        } else {
            current.entries.push((index, entry));
        }
    }
    if !current.is_empty() {
        groups.push(current);
    }
    groups
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::entry::{Comment, Variable};

    fn var(key: &str) -> ConfigEntry {
        ConfigEntry::Variable(Variable {
            key: key.into(),
            ..Variable::default()
        })
    }

    fn section(description: &str) -> ConfigEntry {
        ConfigEntry::Section(Section {
            description: description.into(),
            original_line: format!("## {description}"),
        })
    }

    fn keys(group: &EntryGroup<'_>) -> Vec<String> {
        group
            .entries
            .iter()
            .filter_map(|(_, e)| e.as_variable().map(|v| v.key.clone()))
            .collect()
    }

    #[test]
    fn leading_entries_form_unheaded_group() {
        let entries = vec![var("FOO"), section("Net"), var("BAR")];
        let groups = group_by_section(&entries);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].title(), None);
        assert_eq!(keys(&groups[0]), ["FOO"]);
        assert_eq!(groups[1].title(), Some("Net"));
        assert_eq!(keys(&groups[1]), ["BAR"]);
        assert_eq!(groups[1].entries[0].0, 2);
    }

    #[test]
    fn empty_sections_are_kept_and_no_empty_unheaded_group() {
        let entries = vec![section("A"), section("B"), var("X")];
        let groups = group_by_section(&entries);

        assert_eq!(groups.len(), 2);
        assert!(groups[0].entries.is_empty());
        assert_eq!(groups[0].title(), Some("A"));
        assert_eq!(keys(&groups[1]), ["X"]);
    }

    #[test]
    fn no_entries_no_groups() {
        assert!(group_by_section(&[]).is_empty());
    }

    #[test]
    fn grouping_is_a_lossless_partition() {
        let entries = vec![
            var("A"),
            ConfigEntry::Comment(Comment {
                original_line: "# note".into(),
            }),
            section("One"),
            var("B"),
            section("Two"),
            section("Three"),
            var("C"),
            var("D"),
        ];

        let rebuilt: Vec<usize> = group_by_section(&entries)
            .iter()
            .flat_map(|g| {
                g.header
                    .map(|(i, _)| i)
                    .into_iter()
                    .chain(g.entries.iter().map(|(i, _)| *i))
            })
            .collect();

        assert_eq!(rebuilt, (0..entries.len()).collect::<Vec<_>>());
    }
}
