// ── Core error types ──
//
// User-facing errors from vwpanel-core. Callers never match on HTTP
// status lines or JSON failures directly; the `From<vwpanel_api::Error>`
// impl folds transport-layer errors into domain variants.

use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Request timed out: {reason}")]
    Timeout { reason: String },

    // ── Action failures ──────────────────────────────────────────────
    /// A load, save, upload or delete failed. `message` is the status
    /// text shown to the user; `source` keeps the original cause.
    #[error("{message}")]
    Request {
        message: String,
        #[source]
        source: Box<CoreError>,
    },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("{action} already in progress")]
    Busy { action: String },

    #[error("No entry at index {index} ({len} entries loaded)")]
    EntryIndex { index: usize, len: usize },

    #[error("Entry {index} is not a variable")]
    NotAVariable { index: usize },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("Cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if the server answered).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// The bare failure text shown after a status-banner prefix.
    pub fn reason(&self) -> String {
        match self {
            Self::ConnectionFailed { reason, .. } => reason.clone(),
            Self::AuthenticationFailed { message }
            | Self::ValidationFailed { message }
            | Self::Api { message, .. }
            | Self::Request { message, .. } => message.clone(),
            Self::Io { source, .. } => source.to_string(),
            other => other.to_string(),
        }
    }

    /// HTTP status code behind this error, looking through `Request`.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::AuthenticationFailed { .. } => Some(401),
            Self::Api { status, .. } => *status,
            Self::Request { source, .. } => source.status(),
            _ => None,
        }
    }

    /// The innermost cause, skipping `Request` wrappers.
    pub fn root(&self) -> &CoreError {
        match self {
            Self::Request { source, .. } => source.root(),
            other => other,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<vwpanel_api::Error> for CoreError {
    fn from(err: vwpanel_api::Error) -> Self {
        match err {
            vwpanel_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            vwpanel_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout {
                        reason: e.to_string(),
                    }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map(ToString::to_string)
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            vwpanel_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            vwpanel_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            vwpanel_api::Error::Api { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            vwpanel_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}

// ── Diagnostic suffixes ──────────────────────────────────────────────

/// Which client settings were absent when the client was built.
///
/// Nothing is checked up front: these only decorate the message of a
/// load or save that has already failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MissingSettings {
    pub base_url: bool,
    pub credentials: bool,
}

impl MissingSettings {
    /// `Error: <reason>` followed by one suffix per missing setting, base
    /// URL first. An empty `reason` falls back to `fallback`.
    pub fn compose(self, reason: &str, fallback: &str) -> String {
        let reason = if reason.trim().is_empty() {
            fallback
        } else {
            reason
        };
        let mut message = format!("Error: {reason}");
        if self.base_url {
            message.push_str(". Missing API base URL");
        }
        if self.credentials {
            message.push_str(". Missing API credentials");
        }
        message
    }

    pub fn any(self) -> bool {
        self.base_url || self.credentials
    }
}
