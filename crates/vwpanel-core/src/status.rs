// ── Status banner ──
//
// The single line of feedback shown after an action. Success messages
// hide themselves after `DISMISS_AFTER`; errors stay until replaced.
// A newer message does not restart a pending countdown, so the hide can
// land on a message shown less than `DISMISS_AFTER` ago.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use strum::Display;
use tokio::sync::watch;
use tracing::trace;

pub const DISMISS_AFTER: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StatusKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

/// Shared banner; clones publish to the same channel.
#[derive(Debug, Clone)]
pub struct StatusBanner {
    current: Arc<watch::Sender<Option<StatusMessage>>>,
}

impl Default for StatusBanner {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusBanner {
    pub fn new() -> Self {
        let (current, _) = watch::channel(None);
        Self {
            current: Arc::new(current),
        }
    }

    /// Show a success message and schedule the banner to hide.
    pub fn success(&self, text: impl Into<String>) {
        self.show(StatusKind::Success, text.into());
        self.schedule_dismiss();
    }

    pub fn error(&self, text: impl Into<String>) {
        self.show(StatusKind::Error, text.into());
    }

    pub fn clear(&self) {
        self.current.send_replace(None);
    }

    pub fn current(&self) -> Option<StatusMessage> {
        self.current.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<StatusMessage>> {
        self.current.subscribe()
    }

    fn show(&self, kind: StatusKind, text: String) {
        trace!(%kind, %text, "status");
        self.current.send_replace(Some(StatusMessage { kind, text }));
    }

    fn schedule_dismiss(&self) {
        // Outside a runtime there is nothing to drive the timer; the
        // message simply stays until replaced.
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            return;
        };
        let current = Arc::downgrade(&self.current);
        handle.spawn(async move {
            tokio::time::sleep(DISMISS_AFTER).await;
            if let Some(current) = current.upgrade() {
                current.send_replace(None);
            }
        });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn text(banner: &StatusBanner) -> Option<String> {
        banner.current().map(|m| m.text)
    }

    #[tokio::test(start_paused = true)]
    async fn success_hides_after_three_seconds() {
        let banner = StatusBanner::new();
        banner.success("saved");
        assert_eq!(banner.current().unwrap().kind, StatusKind::Success);

        tokio::time::sleep(Duration::from_millis(2900)).await;
        assert_eq!(text(&banner).as_deref(), Some("saved"));

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(banner.current(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn newer_message_does_not_reset_countdown() {
        let banner = StatusBanner::new();
        banner.success("first");

        tokio::time::sleep(Duration::from_secs(2)).await;
        banner.success("second");
        assert_eq!(text(&banner).as_deref(), Some("second"));

        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert_eq!(banner.current(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn errors_do_not_schedule_a_hide() {
        let banner = StatusBanner::new();
        banner.error("Error: nope");

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(banner.current().unwrap().kind, StatusKind::Error);
    }

    #[test]
    fn success_outside_runtime_still_shows() {
        let banner = StatusBanner::new();
        banner.success("ok");
        assert_eq!(text(&banner).as_deref(), Some("ok"));
        banner.clear();
        assert_eq!(banner.current(), None);
    }
}
