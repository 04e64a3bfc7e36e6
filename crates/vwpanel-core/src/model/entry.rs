// ── Env file entries ──
//
// The wire shape (`EnvVar`) marks comments and sections with two
// booleans. Here every entry is exactly one of three variants, decided
// once at the load boundary.

use serde::Serialize;
use vwpanel_api::EnvVar;

use crate::error::CoreError;

/// One line-level unit of the env file, in file order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ConfigEntry {
    Variable(Variable),
    Comment(Comment),
    Section(Section),
}

/// A `KEY=value` line, active or commented out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Variable {
    pub key: String,
    pub value: String,
    pub enabled: bool,
    /// Comment lines directly above the variable, joined with newlines.
    pub description: String,
    pub original_line: String,
}

/// A free-standing comment line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Comment {
    pub original_line: String,
}

/// A `##` header that starts a new display group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Section {
    pub description: String,
    pub original_line: String,
}

impl Section {
    /// Heading text: the description, else the raw line, minus the
    /// leading `##`.
    pub fn title(&self) -> &str {
        [&self.description, &self.original_line]
            .into_iter()
            .map(|s| {
                let s = s.trim();
                s.strip_prefix("##").unwrap_or(s).trim()
            })
            .find(|s| !s.is_empty())
            .unwrap_or("Section")
    }
}

impl ConfigEntry {
    pub fn as_variable(&self) -> Option<&Variable> {
        match self {
            Self::Variable(var) => Some(var),
            _ => None,
        }
    }

    pub fn as_variable_mut(&mut self) -> Option<&mut Variable> {
        match self {
            Self::Variable(var) => Some(var),
            _ => None,
        }
    }

    pub fn is_section(&self) -> bool {
        matches!(self, Self::Section(_))
    }

    /// Whether the entry carries anything worth showing. Blank comments,
    /// untitled sections and keyless variables do not survive a load.
    pub fn is_renderable(&self) -> bool {
        match self {
            Self::Comment(c) => !c.original_line.trim().is_empty(),
            Self::Section(s) => {
                !s.description.trim().is_empty() || !s.original_line.trim().is_empty()
            }
            Self::Variable(v) => !v.key.trim().is_empty(),
        }
    }
}

impl TryFrom<EnvVar> for ConfigEntry {
    type Error = CoreError;

    fn try_from(raw: EnvVar) -> Result<Self, Self::Error> {
        match (raw.is_comment, raw.is_section) {
            (true, true) => Err(CoreError::ValidationFailed {
                message: format!(
                    "entry {:?} is flagged as both comment and section",
                    raw.original_line
                ),
            }),
            (true, false) => Ok(Self::Comment(Comment {
                original_line: raw.original_line,
            })),
            (false, true) => Ok(Self::Section(Section {
                description: raw.description,
                original_line: raw.original_line,
            })),
            (false, false) => Ok(Self::Variable(Variable {
                key: raw.key,
                value: raw.value,
                enabled: raw.enabled,
                description: raw.description,
                original_line: raw.original_line,
            })),
        }
    }
}

/// The save boundary: only the seven wire fields leave the process.
impl From<&ConfigEntry> for EnvVar {
    fn from(entry: &ConfigEntry) -> Self {
        match entry {
            ConfigEntry::Variable(v) => EnvVar {
                key: v.key.clone(),
                value: v.value.clone(),
                enabled: v.enabled,
                description: v.description.clone(),
                original_line: v.original_line.clone(),
                ..EnvVar::default()
            },
            ConfigEntry::Comment(c) => EnvVar {
                is_comment: true,
                original_line: c.original_line.clone(),
                ..EnvVar::default()
            },
            ConfigEntry::Section(s) => EnvVar {
                is_section: true,
                description: s.description.clone(),
                original_line: s.original_line.clone(),
                ..EnvVar::default()
            },
        }
    }
}

/// Convert a wire sequence, dropping entries with nothing to render.
/// Fails on the first entry with contradictory flags.
pub fn entries_from_wire(raw: Vec<EnvVar>) -> Result<Vec<ConfigEntry>, CoreError> {
    let mut entries = Vec::with_capacity(raw.len());
    for var in raw {
        let entry = ConfigEntry::try_from(var)?;
        if entry.is_renderable() {
            entries.push(entry);
        }
    }
    Ok(entries)
}

pub fn entries_to_wire(entries: &[ConfigEntry]) -> Vec<EnvVar> {
    entries.iter().map(EnvVar::from).collect()
}
