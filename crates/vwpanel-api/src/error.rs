use thiserror::Error;

/// Top-level error type for the `vwpanel-api` crate.
///
/// Covers every failure mode of the plugin API: authentication, transport,
/// non-2xx responses, and body decoding. `vwpanel-core` maps these into
/// user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The router rejected the request credentials (HTTP 401).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Plugin API ──────────────────────────────────────────────────
    /// Non-success response. The plugin answers errors with a plain-text
    /// body, which is carried here verbatim (trimmed).
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// The bare failure reason, without the variant prefix.
    ///
    /// This is what a user sees in a status banner: the server's own text
    /// for API errors, the transport description otherwise.
    pub fn reason(&self) -> String {
        match self {
            Self::Authentication { message }
            | Self::Api { message, .. }
            | Self::Deserialization { message, .. }
            | Self::Tls(message) => message.clone(),
            Self::Transport(e) => e.to_string(),
            Self::InvalidUrl(e) => e.to_string(),
        }
    }

    /// HTTP status code, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Authentication { .. } => Some(401),
            Self::Api { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
