//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a stable exit code.

use miette::Diagnostic;
use thiserror::Error;

use vwpanel_config::ConfigError;
use vwpanel_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const BUSY: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(vwpanel::connection_failed),
        help(
            "Check that the router is reachable and the plugin is installed.\n\
             URL: {url}\n\
             Set it with: vwpanel config set api_url https://192.168.2.1"
        )
    )]
    ConnectionFailed { url: String, message: String },

    #[error("{message}")]
    #[diagnostic(
        code(vwpanel::tls_error),
        help(
            "The router is probably using a self-signed certificate.\n\
             Use --insecure (-k) to accept it, or configure ca_cert in your profile."
        )
    )]
    TlsError { message: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(vwpanel::auth_failed),
        help(
            "Pass --token, set VWPANEL_TOKEN, or store one with: vwpanel config set-token"
        )
    )]
    AuthFailed { message: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(vwpanel::not_found))]
    NotFound { message: String },

    #[error("Variable '{key}' not found")]
    #[diagnostic(
        code(vwpanel::unknown_variable),
        help("Run: vwpanel env list to see available variables")
    )]
    UnknownVariable { key: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(vwpanel::api_error))]
    ApiError { message: String },

    #[error("{action} already in progress")]
    #[diagnostic(code(vwpanel::busy))]
    Busy { action: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(vwpanel::validation))]
    Validation { field: String, reason: String },

    #[error("{message}")]
    #[diagnostic(code(vwpanel::invalid_input))]
    InvalidInput { message: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(vwpanel::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: vwpanel config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("{message}")]
    #[diagnostic(code(vwpanel::config))]
    Config { message: String },

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(vwpanel::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Timeout ──────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(vwpanel::timeout),
        help("Increase timeout with --timeout or check the router's load.")
    )]
    Timeout { message: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("JSON output failed: {0}")]
    #[diagnostic(code(vwpanel::json))]
    Json(#[from] serde_json::Error),

    #[error("YAML output failed: {0}")]
    #[diagnostic(code(vwpanel::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::TlsError { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::NotFound { .. } | Self::UnknownVariable { .. } => exit_code::NOT_FOUND,
            Self::Busy { .. } => exit_code::BUSY,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. }
            | Self::InvalidInput { .. }
            | Self::ProfileNotFound { .. }
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    /// Classifies by the innermost cause but keeps the outer message,
    /// which already carries the action prefix and missing-setting
    /// suffixes.
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        match err.root() {
            CoreError::ConnectionFailed { reason, .. } if looks_like_tls(reason) => {
                CliError::TlsError { message }
            }
            CoreError::ConnectionFailed { url, .. } => CliError::ConnectionFailed {
                url: url.clone(),
                message,
            },
            CoreError::AuthenticationFailed { .. } => CliError::AuthFailed { message },
            CoreError::Timeout { .. } => CliError::Timeout { message },
            CoreError::Busy { action } => CliError::Busy {
                action: action.clone(),
            },
            CoreError::EntryIndex { .. }
            | CoreError::NotAVariable { .. }
            | CoreError::ValidationFailed { .. } => CliError::InvalidInput {
                message: err.reason(),
            },
            CoreError::Api {
                status: Some(404), ..
            } => CliError::NotFound { message },
            CoreError::Config { .. } => CliError::Config { message },
            _ => CliError::ApiError { message },
        }
    }
}

fn looks_like_tls(reason: &str) -> bool {
    let reason = reason.to_ascii_lowercase();
    reason.contains("certificate") || reason.starts_with("tls error")
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::UnknownProfile { name } => CliError::ProfileNotFound {
                name,
                available: "(see: vwpanel config profiles)".into(),
            },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrapped(source: CoreError) -> CoreError {
        CoreError::Request {
            message: "Error: boom. Missing API credentials".into(),
            source: Box::new(source),
        }
    }

    #[test]
    fn request_wrapper_keeps_message_and_classifies_by_root() {
        let err = CliError::from(wrapped(CoreError::AuthenticationFailed {
            message: "missing or invalid credentials".into(),
        }));
        assert_eq!(err.exit_code(), exit_code::AUTH);
        assert_eq!(err.to_string(), "Error: boom. Missing API credentials");
    }

    #[test]
    fn not_found_and_validation_codes() {
        let err = CliError::from(wrapped(CoreError::Api {
            message: "Certificate file not found".into(),
            status: Some(404),
        }));
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);

        let err = CliError::from(wrapped(CoreError::ValidationFailed {
            message: "unsupported file type".into(),
        }));
        assert_eq!(err.exit_code(), exit_code::USAGE);
    }

    #[test]
    fn tls_failures_point_at_insecure() {
        let err = CliError::from(CoreError::ConnectionFailed {
            url: "https://192.168.2.1/".into(),
            reason: "invalid peer certificate: UnknownIssuer".into(),
        });
        assert!(matches!(err, CliError::TlsError { .. }));
        assert_eq!(err.exit_code(), exit_code::CONNECTION);
    }

    #[test]
    fn busy_and_server_errors() {
        let err = CliError::from(CoreError::Busy {
            action: "Save".into(),
        });
        assert_eq!(err.exit_code(), exit_code::BUSY);

        let err = CliError::from(wrapped(CoreError::Api {
            message: "Failed to write file".into(),
            status: Some(500),
        }));
        assert_eq!(err.exit_code(), exit_code::GENERAL);
    }
}
