// ── Config synchronizer ──
//
// Owns the in-memory copy of the env file. `load` and `save` move the
// whole document; edits in between are local. Every piece of state is
// published through a `watch` channel so a presentation layer can
// re-render on change.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};
use vwpanel_api::PanelClient;

use crate::error::{CoreError, MissingSettings};
use crate::model::{ConfigEntry, Variable, entries_from_wire, entries_to_wire};
use crate::status::StatusBanner;
use crate::tracker::ActionTracker;

const LOAD_FALLBACK: &str = "Failed to load environment variables";
const SAVE_FALLBACK: &str = "Failed to save environment variables";
const SAVE_SUCCESS: &str = "Environment variables saved successfully";

/// Where the last load stands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadPhase {
    #[default]
    NotLoaded,
    Loading,
    Ready,
    /// Composed error text, diagnostic suffixes included.
    Failed(String),
}

/// Fetches, edits and saves the env file as one ordered entry list.
#[derive(Debug)]
pub struct ConfigSynchronizer {
    client: PanelClient,
    missing: MissingSettings,
    banner: StatusBanner,
    entries: watch::Sender<Arc<Vec<ConfigEntry>>>,
    file_path: watch::Sender<String>,
    phase: watch::Sender<LoadPhase>,
    saving: ActionTracker,
}

impl ConfigSynchronizer {
    pub fn new(client: PanelClient, missing: MissingSettings, banner: StatusBanner) -> Self {
        let (entries, _) = watch::channel(Arc::new(Vec::new()));
        let (file_path, _) = watch::channel(String::new());
        let (phase, _) = watch::channel(LoadPhase::NotLoaded);

        Self {
            client,
            missing,
            banner,
            entries,
            file_path,
            phase,
            saving: ActionTracker::new("Save"),
        }
    }

    // ── Remote operations ────────────────────────────────────────────

    /// Fetch the env file and replace the local entries and file path.
    ///
    /// On failure the previous entries stay as they were and the phase
    /// moves to [`LoadPhase::Failed`].
    pub async fn load(&self) -> Result<(), CoreError> {
        self.phase.send_replace(LoadPhase::Loading);

        let fetched = async {
            let resp = self.client.get_env().await?;
            let entries = entries_from_wire(resp.variables)?;
            Ok::<_, CoreError>((entries, resp.file_path))
        }
        .await;

        match fetched {
            Ok((entries, file_path)) => {
                debug!(count = entries.len(), %file_path, "env file loaded");
                self.entries.send_replace(Arc::new(entries));
                self.file_path.send_replace(file_path);
                self.phase.send_replace(LoadPhase::Ready);
                Ok(())
            }
            Err(err) => {
                let message = self.missing.compose(&err.reason(), LOAD_FALLBACK);
                warn!(error = %err, "failed to load environment variables");
                self.phase.send_replace(LoadPhase::Failed(message.clone()));
                Err(CoreError::Request {
                    message,
                    source: Box::new(err),
                })
            }
        }
    }

    /// Send every entry back as a full replacement.
    ///
    /// Only one save runs at a time; a second call while one is in
    /// flight fails with [`CoreError::Busy`] and sends nothing. Returns
    /// the success message shown on the banner.
    pub async fn save(&self) -> Result<String, CoreError> {
        let _saving = self.saving.try_begin()?;
        self.banner.clear();

        let payload = entries_to_wire(&self.entries.borrow());
        debug!(count = payload.len(), "saving env file");

        match self.client.save_env(&payload).await {
            Ok(resp) => {
                if let Some(variables) = resp.variables {
                    match entries_from_wire(variables) {
                        Ok(entries) => {
                            self.entries.send_replace(Arc::new(entries));
                        }
                        Err(err) => warn!(error = %err, "ignoring malformed entries in save response"),
                    }
                }
                if let Some(file_path) = resp.file_path.filter(|p| !p.is_empty()) {
                    self.file_path.send_replace(file_path);
                }

                let message = resp
                    .message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| SAVE_SUCCESS.to_owned());
                info!("{message}");
                self.banner.success(message.clone());
                Ok(message)
            }
            Err(err) => {
                let err = CoreError::from(err);
                let message = self.missing.compose(&err.reason(), SAVE_FALLBACK);
                warn!(error = %err, "failed to save environment variables");
                self.banner.error(message.clone());
                Err(CoreError::Request {
                    message,
                    source: Box::new(err),
                })
            }
        }
    }

    // ── Local edits ──────────────────────────────────────────────────

    /// Flip `enabled` on the variable at `index`. Returns the new value.
    pub fn toggle_enabled(&self, index: usize) -> Result<bool, CoreError> {
        self.edit_variable(index, |var| {
            var.enabled = !var.enabled;
            var.enabled
        })
    }

    pub fn set_enabled(&self, index: usize, enabled: bool) -> Result<(), CoreError> {
        self.edit_variable(index, |var| var.enabled = enabled)
    }

    pub fn set_value(&self, index: usize, value: impl Into<String>) -> Result<(), CoreError> {
        let value = value.into();
        self.edit_variable(index, move |var| var.value = value)
    }

    /// Position of the first variable named `key`.
    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.entries
            .borrow()
            .iter()
            .position(|e| e.as_variable().is_some_and(|v| v.key == key))
    }

    fn edit_variable<R>(
        &self,
        index: usize,
        edit: impl FnOnce(&mut Variable) -> R,
    ) -> Result<R, CoreError> {
        let mut outcome = Err(CoreError::EntryIndex { index, len: 0 });

        self.entries.send_if_modified(|entries| {
            if let Err(err) = check_variable(entries.as_slice(), index) {
                outcome = Err(err);
                return false;
            }
            match Arc::make_mut(entries)
                .get_mut(index)
                .and_then(ConfigEntry::as_variable_mut)
            {
                Some(var) => {
                    outcome = Ok(edit(var));
                    true
                }
                None => false,
            }
        });

        outcome
    }

    // ── Accessors ────────────────────────────────────────────────────

    /// Current entries (cheap `Arc` clone).
    pub fn entries(&self) -> Arc<Vec<ConfigEntry>> {
        self.entries.borrow().clone()
    }

    pub fn subscribe_entries(&self) -> watch::Receiver<Arc<Vec<ConfigEntry>>> {
        self.entries.subscribe()
    }

    /// Path of the file the server read, empty before the first load.
    pub fn file_path(&self) -> String {
        self.file_path.borrow().clone()
    }

    pub fn subscribe_file_path(&self) -> watch::Receiver<String> {
        self.file_path.subscribe()
    }

    pub fn phase(&self) -> LoadPhase {
        self.phase.borrow().clone()
    }

    pub fn subscribe_phase(&self) -> watch::Receiver<LoadPhase> {
        self.phase.subscribe()
    }

    pub fn saving(&self) -> &ActionTracker {
        &self.saving
    }
}

fn check_variable(entries: &[ConfigEntry], index: usize) -> Result<(), CoreError> {
    match entries.get(index) {
        None => Err(CoreError::EntryIndex {
            index,
            len: entries.len(),
        }),
        Some(ConfigEntry::Variable(_)) => Ok(()),
        Some(_) => Err(CoreError::NotAVariable { index }),
    }
}
