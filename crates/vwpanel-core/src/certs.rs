// ── Certificate manager ──
//
// Upload and delete for the `cert` and `key` slots. Every successful
// change is followed by one status refresh and one config reload: the
// plugin flips `ROCKET_TLS` in the env file once both slots are filled.

use std::path::Path;
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use vwpanel_api::{MessageResponse, PanelClient, SslSlot, SslUploadRequest};

use crate::error::CoreError;
use crate::model::SslStatus;
use crate::status::StatusBanner;
use crate::sync::ConfigSynchronizer;
use crate::tracker::ActionTracker;

/// Extensions accepted for either slot, compared case-insensitively.
pub const ALLOWED_EXTENSIONS: [&str; 7] = [".pem", ".crt", ".cer", ".der", ".key", ".p12", ".pfx"];

const NO_FILE_SELECTED: &str = "Please select a file to upload";

/// One tracker per slot.
#[derive(Debug)]
struct SlotTrackers {
    cert: ActionTracker,
    key: ActionTracker,
}

impl SlotTrackers {
    fn new(action: &str) -> Self {
        Self {
            cert: ActionTracker::new(format!("{} {action}", SslSlot::Cert)),
            key: ActionTracker::new(format!("{} {action}", SslSlot::Key)),
        }
    }

    fn get(&self, slot: SslSlot) -> &ActionTracker {
        match slot {
            SslSlot::Cert => &self.cert,
            SslSlot::Key => &self.key,
        }
    }
}

/// Owns the TLS file lifecycle for both slots.
#[derive(Debug)]
pub struct CertificateManager {
    client: PanelClient,
    banner: StatusBanner,
    config: Arc<ConfigSynchronizer>,
    status: watch::Sender<SslStatus>,
    uploads: SlotTrackers,
    deletes: SlotTrackers,
}

impl CertificateManager {
    pub fn new(client: PanelClient, banner: StatusBanner, config: Arc<ConfigSynchronizer>) -> Self {
        let (status, _) = watch::channel(SslStatus::default());
        Self {
            client,
            banner,
            config,
            status,
            uploads: SlotTrackers::new("upload"),
            deletes: SlotTrackers::new("delete"),
        }
    }

    /// Fetch both slots and replace the local status wholesale.
    pub async fn refresh_status(&self) -> Result<SslStatus, CoreError> {
        match self.client.ssl_status().await {
            Ok(resp) => {
                let status = SslStatus::from(resp);
                debug!(ready = status.is_ready(), "ssl status refreshed");
                self.status.send_replace(status.clone());
                Ok(status)
            }
            Err(err) => {
                let err = CoreError::from(err);
                warn!(error = %err, "failed to fetch ssl status");
                Err(err)
            }
        }
    }

    /// Validate, read and upload one file into `slot`.
    ///
    /// The extension check happens before anything touches the disk or
    /// the network. Returns the banner text on success.
    pub async fn upload_slot(
        &self,
        slot: SslSlot,
        path: impl AsRef<Path>,
    ) -> Result<String, CoreError> {
        let path = path.as_ref();
        if let Err(err) = validate_upload_path(path) {
            self.banner.error(err.reason());
            return Err(err);
        }

        let uploading = self.uploads.get(slot).try_begin()?;
        let result = self.send_upload(slot, path).await;
        drop(uploading);

        match result {
            Ok(resp) => {
                let message = ack_message(resp, || format!("{slot} file uploaded successfully"));
                info!(%slot, path = %path.display(), "ssl file uploaded");
                self.refresh_after_change().await;
                self.banner.success(message.clone());
                Ok(message)
            }
            Err(err) => Err(self.fail(&format!("Error uploading {slot} file"), err)),
        }
    }

    /// Start a delete. Nothing is sent until the returned value is
    /// confirmed; dropping it cancels.
    pub fn request_delete(&self, slot: SslSlot) -> PendingDelete<'_> {
        PendingDelete {
            manager: self,
            slot,
        }
    }

    async fn send_upload(&self, slot: SslSlot, path: &Path) -> Result<MessageResponse, CoreError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| CoreError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        let request = SslUploadRequest {
            filename: path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
            size: u64::try_from(bytes.len()).unwrap_or(u64::MAX),
            file_data: BASE64_STANDARD.encode(&bytes),
        };
        Ok(self.client.upload_ssl(slot, &request).await?)
    }

    async fn delete_confirmed(&self, slot: SslSlot) -> Result<String, CoreError> {
        let deleting = self.deletes.get(slot).try_begin()?;
        let result = self.client.delete_ssl(slot).await;
        drop(deleting);

        match result {
            Ok(resp) => {
                let message = ack_message(resp, || format!("{slot} file deleted successfully"));
                info!(%slot, "ssl file deleted");
                self.refresh_after_change().await;
                self.banner.success(message.clone());
                Ok(message)
            }
            Err(err) => Err(self.fail(&format!("Error deleting {slot} file"), err.into())),
        }
    }

    /// One status refresh, then one config reload. Each records its own
    /// failure; the change itself already went through.
    async fn refresh_after_change(&self) {
        if let Err(err) = self.refresh_status().await {
            debug!(error = %err, "status refresh after change failed");
        }
        if let Err(err) = self.config.load().await {
            debug!(error = %err, "config reload after change failed");
        }
    }

    fn fail(&self, prefix: &str, err: CoreError) -> CoreError {
        let message = format!("{prefix}: {}", err.reason());
        warn!(error = %err, "{prefix}");
        self.banner.error(message.clone());
        CoreError::Request {
            message,
            source: Box::new(err),
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn status(&self) -> SslStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<SslStatus> {
        self.status.subscribe()
    }

    pub fn upload_tracker(&self, slot: SslSlot) -> &ActionTracker {
        self.uploads.get(slot)
    }

    pub fn delete_tracker(&self, slot: SslSlot) -> &ActionTracker {
        self.deletes.get(slot)
    }
}

/// A delete waiting for the user's go-ahead.
#[derive(Debug)]
#[must_use = "a pending delete does nothing unless confirmed"]
pub struct PendingDelete<'a> {
    manager: &'a CertificateManager,
    slot: SslSlot,
}

impl PendingDelete<'_> {
    pub fn slot(&self) -> SslSlot {
        self.slot
    }

    /// Question to put to the user.
    pub fn prompt(&self) -> String {
        format!("Are you sure you want to delete the {} file?", self.slot)
    }

    /// Send the delete.
    pub async fn confirm(self) -> Result<String, CoreError> {
        self.manager.delete_confirmed(self.slot).await
    }
}

/// Reject empty paths and disallowed extensions.
pub fn validate_upload_path(path: &Path) -> Result<(), CoreError> {
    if path.as_os_str().is_empty() {
        return Err(CoreError::ValidationFailed {
            message: NO_FILE_SELECTED.into(),
        });
    }
    if has_allowed_extension(path) {
        Ok(())
    } else {
        Err(CoreError::ValidationFailed {
            message: format!(
                "Invalid file extension. Allowed: {}",
                ALLOWED_EXTENSIONS.join(", ")
            ),
        })
    }
}

pub fn has_allowed_extension(path: &Path) -> bool {
    let Some(name) = path.file_name() else {
        return false;
    };
    let name = name.to_string_lossy().to_ascii_lowercase();
    ALLOWED_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}

fn ack_message(resp: MessageResponse, fallback: impl FnOnce() -> String) -> String {
    resp.message
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(fallback)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn extensions_are_case_insensitive() {
        for name in [
            "chain.pem",
            "server.CRT",
            "a.cer",
            "b.der",
            "c.Key",
            "d.p12",
            "e.PFX",
            ".pem",
            "/etc/ssl/.KEY",
        ] {
            assert!(has_allowed_extension(Path::new(name)), "{name}");
        }
    }

    #[test]
    fn disallowed_extensions() {
        for name in ["notes.txt", "pem", "cert.pem.bak", "certpem", "/etc/ssl/"] {
            assert!(!has_allowed_extension(Path::new(name)), "{name}");
        }
    }

    #[test]
    fn validation_messages() {
        let err = validate_upload_path(Path::new("notes.txt")).unwrap_err();
        assert_eq!(
            err.reason(),
            "Invalid file extension. Allowed: .pem, .crt, .cer, .der, .key, .p12, .pfx"
        );

        let err = validate_upload_path(Path::new("")).unwrap_err();
        assert_eq!(err.reason(), "Please select a file to upload");
    }
}
