//! Env file command handlers.

use serde::Serialize;
use tabled::Tabled;

use vwpanel_core::{ConfigEntry, ConfigSynchronizer, CoreError, Panel, group_by_section};

use crate::cli::{EnvArgs, EnvCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

// ── Views ───────────────────────────────────────────────────────────

/// One listed entry, flattened with the title of its section.
#[derive(Debug, Serialize)]
struct EntryView {
    section: Option<String>,
    kind: &'static str,
    key: String,
    value: String,
    enabled: bool,
    description: String,
}

impl EntryView {
    fn from_entry(section: Option<&str>, entry: &ConfigEntry, comments: bool) -> Option<Self> {
        let section = section.map(str::to_owned);
        match entry {
            ConfigEntry::Variable(var) => Some(Self {
                section,
                kind: "variable",
                key: var.key.clone(),
                value: var.value.clone(),
                enabled: var.enabled,
                description: var.description.clone(),
            }),
            ConfigEntry::Comment(comment) if comments => Some(Self {
                section,
                kind: "comment",
                key: String::new(),
                value: comment.original_line.trim().to_owned(),
                enabled: false,
                description: String::new(),
            }),
            ConfigEntry::Comment(_) | ConfigEntry::Section(_) => None,
        }
    }

    /// `KEY=value`, commented out when disabled.
    fn line(&self) -> String {
        match (self.kind, self.enabled) {
            ("comment", _) => self.value.clone(),
            (_, true) => format!("{}={}", self.key, self.value),
            (_, false) => format!("#{}={}", self.key, self.value),
        }
    }
}

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "Section")]
    section: String,
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Enabled")]
    enabled: &'static str,
}

fn to_row(v: &EntryView) -> EntryRow {
    let enabled = match (v.kind, v.enabled) {
        ("comment", _) => "",
        (_, true) => "yes",
        (_, false) => "no",
    };
    EntryRow {
        section: v.section.clone().unwrap_or_default(),
        key: v.key.clone(),
        value: v.value.clone(),
        enabled,
    }
}

fn detail(v: &EntryView) -> String {
    let mut lines = vec![
        format!("Key:         {}", v.key),
        format!("Value:       {}", v.value),
        format!("Enabled:     {}", if v.enabled { "yes" } else { "no" }),
    ];
    if let Some(ref section) = v.section {
        lines.push(format!("Section:     {section}"));
    }
    if !v.description.is_empty() {
        lines.push(format!("Description: {}", v.description.replace('\n', "\n             ")));
    }
    lines.join("\n")
}

/// Entries to list, filtered by section title (case-insensitive).
fn collect_views(
    entries: &[ConfigEntry],
    comments: bool,
    section: Option<&str>,
) -> Result<Vec<EntryView>, CliError> {
    let groups: Vec<_> = group_by_section(entries)
        .into_iter()
        .filter(|g| section.is_none_or(|s| g.title().is_some_and(|t| t.eq_ignore_ascii_case(s))))
        .collect();

    if let Some(title) = section.filter(|_| groups.is_empty()) {
        return Err(CliError::NotFound {
            message: format!("Section '{title}' not found"),
        });
    }

    Ok(groups
        .iter()
        .flat_map(|g| {
            g.entries
                .iter()
                .filter_map(move |(_, e)| EntryView::from_entry(g.title(), e, comments))
        })
        .collect())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(panel: &Panel, args: EnvArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let env = panel.env();
    env.load().await?;

    match args.command {
        EnvCommand::List { comments, section } => {
            let entries = env.entries();
            let views = collect_views(&entries, comments, section.as_deref())?;
            let out = output::render_list(&global.output, &views, to_row, EntryView::line)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        EnvCommand::Show { key } => {
            let index = find(env, &key)?;
            let entries = env.entries();
            let groups = group_by_section(&entries);
            let view = groups
                .iter()
                .find_map(|g| {
                    g.entries
                        .iter()
                        .find(|(i, _)| *i == index)
                        .and_then(|(_, e)| EntryView::from_entry(g.title(), e, false))
                })
                .ok_or(CliError::UnknownVariable { key })?;
            let out = output::render_single(&global.output, &view, detail, |v| v.value.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        EnvCommand::Set { key, value, enable } => {
            edit_and_save(env, &key, global, |env, index| {
                env.set_value(index, value)?;
                if enable {
                    env.set_enabled(index, true)?;
                }
                Ok(())
            })
            .await
        }

        EnvCommand::Toggle { key } => {
            edit_and_save(env, &key, global, |env, index| {
                let enabled = env.toggle_enabled(index)?;
                tracing::info!(%key, enabled, "toggled variable");
                Ok(())
            })
            .await
        }

        EnvCommand::Enable { key } => {
            edit_and_save(env, &key, global, |env, index| env.set_enabled(index, true)).await
        }

        EnvCommand::Disable { key } => {
            edit_and_save(env, &key, global, |env, index| env.set_enabled(index, false)).await
        }
    }
}

fn find(env: &ConfigSynchronizer, key: &str) -> Result<usize, CliError> {
    env.index_of(key)
        .ok_or_else(|| CliError::UnknownVariable { key: key.into() })
}

/// Apply one local edit to `key`, then write the whole file back.
async fn edit_and_save(
    env: &ConfigSynchronizer,
    key: &str,
    global: &GlobalOpts,
    edit: impl FnOnce(&ConfigSynchronizer, usize) -> Result<(), CoreError>,
) -> Result<(), CliError> {
    let index = find(env, key)?;
    edit(env, index)?;
    let message = env.save().await?;
    output::print_status(&message, global.quiet);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use vwpanel_core::{Comment, Section, Variable};

    use super::*;

    fn entries() -> Vec<ConfigEntry> {
        vec![
            ConfigEntry::Variable(Variable {
                key: "DOMAIN".into(),
                value: "https://vault.lan".into(),
                enabled: true,
                ..Variable::default()
            }),
            ConfigEntry::Section(Section {
                description: "Mail".into(),
                ..Section::default()
            }),
            ConfigEntry::Comment(Comment {
                original_line: "# SMTP relay".into(),
            }),
            ConfigEntry::Variable(Variable {
                key: "SMTP_HOST".into(),
                value: "mail.lan".into(),
                enabled: false,
                ..Variable::default()
            }),
        ]
    }

    #[test]
    fn list_skips_comments_unless_asked() {
        let views = collect_views(&entries(), false, None).unwrap();
        let lines: Vec<_> = views.iter().map(EntryView::line).collect();
        assert_eq!(lines, ["DOMAIN=https://vault.lan", "#SMTP_HOST=mail.lan"]);

        let views = collect_views(&entries(), true, None).unwrap();
        assert_eq!(views.len(), 3);
        assert_eq!(views[1].line(), "# SMTP relay");
    }

    #[test]
    fn section_filter_matches_title_case_insensitively() {
        let views = collect_views(&entries(), false, Some("mail")).unwrap();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].key, "SMTP_HOST");
        assert_eq!(views[0].section.as_deref(), Some("Mail"));

        let err = collect_views(&entries(), false, Some("Push")).unwrap_err();
        assert!(matches!(err, CliError::NotFound { .. }));
    }

    #[test]
    fn row_marks_disabled_variables() {
        let views = collect_views(&entries(), false, None).unwrap();
        let row = to_row(&views[1]);
        assert_eq!(row.enabled, "no");
        assert_eq!(row.section, "Mail");
    }
}
