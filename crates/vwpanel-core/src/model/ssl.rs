// ── TLS slot status ──

use chrono::{Local, NaiveDateTime, TimeDelta};
use serde::Serialize;
use vwpanel_api::{SslFileInfo, SslSlot, SslStatusResponse};

/// Layout of `modTime` as the plugin formats it.
const MOD_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// What the server reports for one slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum SlotStatus {
    #[default]
    Missing,
    Present(SslFileInfo),
}

impl From<SslFileInfo> for SlotStatus {
    fn from(info: SslFileInfo) -> Self {
        if info.exists {
            Self::Present(info)
        } else {
            Self::Missing
        }
    }
}

impl SlotStatus {
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    pub fn file(&self) -> Option<&SslFileInfo> {
        match self {
            Self::Present(info) => Some(info),
            Self::Missing => None,
        }
    }

    /// Size as `12.3 KB`.
    pub fn size_label(&self) -> Option<String> {
        self.file().map(|info| format_kib(info.size))
    }

    /// Last modification time, if the server sent a parseable one.
    pub fn modified(&self) -> Option<NaiveDateTime> {
        self.file()
            .and_then(|info| NaiveDateTime::parse_from_str(&info.mod_time, MOD_TIME_FORMAT).ok())
    }

    /// How long ago the file changed, as `5m ago`, `3h ago` or `2d ago`.
    pub fn age(&self) -> Option<String> {
        self.age_at(Local::now().naive_local())
    }

    /// [`age`](Self::age) measured against a fixed `now`.
    pub fn age_at(&self, now: NaiveDateTime) -> Option<String> {
        self.modified()
            .map(|modified| format_age(now.signed_duration_since(modified)))
    }
}

/// Both slots, replaced wholesale on every refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SslStatus {
    pub cert: SlotStatus,
    pub key: SlotStatus,
}

impl From<SslStatusResponse> for SslStatus {
    fn from(resp: SslStatusResponse) -> Self {
        Self {
            cert: resp.cert.into(),
            key: resp.key.into(),
        }
    }
}

impl SslStatus {
    pub fn slot(&self, slot: SslSlot) -> &SlotStatus {
        match slot {
            SslSlot::Cert => &self.cert,
            SslSlot::Key => &self.key,
        }
    }

    /// Certificate and key both present.
    pub fn is_ready(&self) -> bool {
        self.cert.is_present() && self.key.is_present()
    }
}

// A timestamp in the future reads as `just now`.
fn format_age(elapsed: TimeDelta) -> String {
    if elapsed.num_days() > 0 {
        format!("{}d ago", elapsed.num_days())
    } else if elapsed.num_hours() > 0 {
        format!("{}h ago", elapsed.num_hours())
    } else if elapsed.num_minutes() > 0 {
        format!("{}m ago", elapsed.num_minutes())
    } else {
        "just now".into()
    }
}

#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
fn format_kib(bytes: u64) -> String {
    format!("{:.1} KB", bytes as f64 / 1024.0)
}
