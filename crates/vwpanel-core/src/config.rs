// ── Panel connection configuration ──
//
// Describes how to reach the plugin API. Built by the CLI from a
// profile, or directly by library users.

use std::time::Duration;

use url::Url;
use vwpanel_api::{Credentials, DEFAULT_PLUGIN_PATH, PanelClient, TlsMode, TransportConfig};

use crate::error::{CoreError, MissingSettings};

/// Base URL used when none is configured, so the first request fails
/// with a transport error instead of never being attempted.
pub const FALLBACK_BASE_URL: &str = "http://localhost";

/// Everything needed to talk to one router's plugin API.
#[derive(Debug, Clone)]
pub struct PanelConfig {
    /// Router base URL (e.g., `https://192.168.2.1`). `None` falls back to
    /// [`FALLBACK_BASE_URL`] and is reported on failure.
    pub base_url: Option<Url>,
    /// Route prefix of the plugin (default `/plugins/vw`).
    pub plugin_path: String,
    /// `None` sends requests unauthenticated and is reported on failure.
    pub credentials: Option<Credentials>,
    pub tls: TlsMode,
    pub timeout: Duration,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            plugin_path: DEFAULT_PLUGIN_PATH.into(),
            credentials: None,
            tls: TlsMode::System,
            timeout: Duration::from_secs(30),
        }
    }
}

impl PanelConfig {
    /// Settings whose absence will be called out in failure messages.
    pub fn missing(&self) -> MissingSettings {
        MissingSettings {
            base_url: self.base_url.is_none(),
            credentials: self.credentials.is_none(),
        }
    }

    /// Build the HTTP client. A missing base URL is not an error here.
    pub fn build_client(&self) -> Result<PanelClient, CoreError> {
        let base_url = match &self.base_url {
            Some(url) => url.clone(),
            None => Url::parse(FALLBACK_BASE_URL).map_err(|e| CoreError::Config {
                message: format!("Invalid fallback URL: {e}"),
            })?,
        };
        let transport = TransportConfig {
            tls: self.tls.clone(),
            timeout: self.timeout,
        };
        Ok(PanelClient::new(
            base_url,
            self.plugin_path.clone(),
            self.credentials.clone(),
            &transport,
        )?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    #[test]
    fn default_config_reports_both_missing() {
        let missing = PanelConfig::default().missing();
        assert!(missing.base_url);
        assert!(missing.credentials);
    }

    #[test]
    fn configured_settings_are_not_missing() {
        let config = PanelConfig {
            base_url: Some(Url::parse("https://192.168.2.1").unwrap()),
            credentials: Some(Credentials::Token(SecretString::from("t".to_string()))),
            ..PanelConfig::default()
        };
        assert!(!config.missing().any());
    }

    #[test]
    fn missing_url_falls_back_to_localhost() {
        let client = PanelConfig::default().build_client().unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost/");
        assert_eq!(client.plugin_path(), "/plugins/vw");
        assert!(!client.has_credentials());
    }
}
