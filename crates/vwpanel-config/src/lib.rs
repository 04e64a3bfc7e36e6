//! Configuration for vwpanel.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext), and
//! translation to `vwpanel_core::PanelConfig`. The CLI layers its flag
//! overrides on top of these.
//!
//! A profile with no URL or no credentials still resolves: the panel
//! reports what was missing when a request fails.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use vwpanel_core::{Credentials, PanelConfig, TlsMode};

/// Service name for keyring entries.
pub const KEYRING_SERVICE: &str = "vwpanel";

/// Env var that overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "VWPANEL_CONFIG";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found")]
    UnknownProfile { name: String },

    #[error("keyring error: {0}")]
    Keyring(String),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named router profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::UnknownProfile { name: name.into() })
    }

    /// Copy with plaintext secrets masked, for display.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        for profile in copy.profiles.values_mut() {
            if profile.token.is_some() {
                profile.token = Some(REDACTED.into());
            }
            if profile.password.is_some() {
                profile.password = Some(REDACTED.into());
            }
        }
        copy
    }
}

/// Placeholder shown instead of a stored secret.
pub const REDACTED: &str = "****";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named router profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Router base URL (e.g., "https://192.168.2.1").
    pub api_url: Option<String>,

    /// Plugin route prefix, `/plugins/vw` when unset.
    pub plugin_path: Option<String>,

    /// Auth mode: "token" or "basic".
    #[serde(default = "default_auth_mode")]
    pub auth_mode: String,

    /// API token (plaintext; prefer keyring or env var).
    pub token: Option<String>,

    /// Environment variable name containing the API token.
    pub token_env: Option<String>,

    /// Username for basic auth.
    pub username: Option<String>,

    /// Password for basic auth (plaintext; prefer keyring).
    pub password: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            api_url: None,
            plugin_path: None,
            auth_mode: default_auth_mode(),
            token: None,
            token_env: None,
            username: None,
            password: None,
            ca_cert: None,
            insecure: None,
            timeout: None,
        }
    }
}

fn default_auth_mode() -> String {
    "token".into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path: `VWPANEL_CONFIG`, else the platform
/// config directory.
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
        return PathBuf::from(path);
    }
    ProjectDirs::from("com", "vwpanel", "vwpanel").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("vwpanel");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from a specific file. A missing file yields the defaults.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("VWPANEL_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if loading fails.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Keyring ─────────────────────────────────────────────────────────

fn keyring_entry(profile_name: &str, secret: &str) -> Result<keyring::Entry, ConfigError> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/{secret}"))
        .map_err(|e| ConfigError::Keyring(e.to_string()))
}

fn keyring_get(profile_name: &str, secret: &str) -> Option<SecretString> {
    keyring_entry(profile_name, secret)
        .ok()?
        .get_password()
        .ok()
        .map(SecretString::from)
}

/// Store the API token for a profile in the system keyring.
pub fn store_token(profile_name: &str, token: &str) -> Result<(), ConfigError> {
    keyring_entry(profile_name, "token")?
        .set_password(token)
        .map_err(|e| ConfigError::Keyring(e.to_string()))
}

/// Store the basic-auth password for a profile in the system keyring.
pub fn store_password(profile_name: &str, password: &str) -> Result<(), ConfigError> {
    keyring_entry(profile_name, "password")?
        .set_password(password)
        .map_err(|e| ConfigError::Keyring(e.to_string()))
}

// ── Credential resolution (without CLI flags) ───────────────────────

/// Resolve an API token: `token_env` var, then keyring, then plaintext.
pub fn resolve_token(profile: &Profile, profile_name: &str) -> Option<SecretString> {
    // 1. Profile's token_env → env var lookup
    if let Some(val) = profile
        .token_env
        .as_deref()
        .and_then(|name| std::env::var(name).ok())
    {
        return Some(SecretString::from(val));
    }

    // 2. System keyring
    if let Some(secret) = keyring_get(profile_name, "token") {
        return Some(secret);
    }

    // 3. Plaintext in config
    profile.token.clone().map(SecretString::from)
}

/// Resolve basic-auth credentials. `None` unless both halves are found.
pub fn resolve_basic(profile: &Profile, profile_name: &str) -> Option<(String, SecretString)> {
    let username = profile
        .username
        .clone()
        .or_else(|| std::env::var("VWPANEL_USERNAME").ok())?;

    // 1. Env var
    if let Ok(pw) = std::env::var("VWPANEL_PASSWORD") {
        return Some((username, SecretString::from(pw)));
    }

    // 2. Keyring
    if let Some(pw) = keyring_get(profile_name, "password") {
        return Some((username, pw));
    }

    // 3. Plaintext in config
    profile
        .password
        .clone()
        .map(|pw| (username, SecretString::from(pw)))
}

/// Resolve `Credentials` from a profile's `auth_mode` field. `Ok(None)`
/// means nothing is configured, which is allowed.
pub fn resolve_credentials(
    profile: &Profile,
    profile_name: &str,
) -> Result<Option<Credentials>, ConfigError> {
    match profile.auth_mode.as_str() {
        "token" => Ok(resolve_token(profile, profile_name).map(Credentials::Token)),
        "basic" => Ok(resolve_basic(profile, profile_name)
            .map(|(username, password)| Credentials::Basic { username, password })),
        other => Err(ConfigError::Validation {
            field: "auth_mode".into(),
            reason: format!("expected 'token' or 'basic', got '{other}'"),
        }),
    }
}

/// Parse an optional URL field.
pub fn parse_api_url(raw: Option<&str>) -> Result<Option<url::Url>, ConfigError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => s.parse().map(Some).map_err(|_| ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("invalid URL: {s}"),
        }),
    }
}

/// TLS mode from the insecure flag and CA path. Insecure wins.
pub fn tls_mode(insecure: bool, ca_cert: Option<&Path>) -> TlsMode {
    if insecure {
        TlsMode::DangerAcceptInvalid
    } else if let Some(path) = ca_cert {
        TlsMode::CustomCa(path.to_path_buf())
    } else {
        TlsMode::System
    }
}

/// Build a `PanelConfig` from a profile, no CLI flag overrides.
pub fn profile_to_panel_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<PanelConfig, ConfigError> {
    let base_url = parse_api_url(profile.api_url.as_deref())?;
    let credentials = resolve_credentials(profile, profile_name)?;
    let tls = tls_mode(
        profile.insecure.unwrap_or(defaults.insecure),
        profile.ca_cert.as_deref(),
    );
    let timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));

    let mut config = PanelConfig {
        base_url,
        credentials,
        tls,
        timeout,
        ..PanelConfig::default()
    };
    if let Some(path) = profile.plugin_path.as_deref().filter(|p| !p.is_empty()) {
        config.plugin_path = path.to_owned();
    }
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn profile_with_token(token: &str) -> Profile {
        Profile {
            api_url: Some("https://192.168.2.1".into()),
            auth_mode: default_auth_mode(),
            token: Some(token.into()),
            token_env: Some("VWPANEL_TEST_SURELY_UNSET_TOKEN".into()),
            ..Profile::default()
        }
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config.default_profile.as_deref(), Some("default"));
        assert_eq!(config.defaults.timeout, 30);
        assert!(config.profiles.is_empty());
    }

    #[test]
    fn save_then_load_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config
            .profiles
            .insert("home".into(), profile_with_token("abc"));
        save_config_to(&config, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        let home = loaded.profile("home").unwrap();
        assert_eq!(home.api_url.as_deref(), Some("https://192.168.2.1"));
        assert_eq!(home.auth_mode, "token");
        assert!(matches!(
            loaded.profile("work"),
            Err(ConfigError::UnknownProfile { .. })
        ));
    }

    #[test]
    fn profile_without_url_or_token_still_resolves() {
        let profile = Profile {
            auth_mode: "basic".into(),
            ..Profile::default()
        };
        let config =
            profile_to_panel_config(&profile, "vwpanel-test-empty", &Defaults::default()).unwrap();
        assert!(config.base_url.is_none());
        assert!(config.missing().base_url);
        assert_eq!(config.plugin_path, "/plugins/vw");
    }

    #[test]
    fn plaintext_token_and_overrides() {
        let mut profile = profile_with_token("abc");
        profile.plugin_path = Some("/plugins/vaultwarden".into());
        profile.timeout = Some(5);
        profile.insecure = Some(true);

        let config =
            profile_to_panel_config(&profile, "vwpanel-test-plain", &Defaults::default()).unwrap();
        assert!(matches!(config.credentials, Some(Credentials::Token(_))));
        assert_eq!(config.plugin_path, "/plugins/vaultwarden");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert!(matches!(config.tls, TlsMode::DangerAcceptInvalid));
    }

    #[test]
    fn bad_auth_mode_and_url_are_rejected() {
        let profile = Profile {
            auth_mode: "oauth".into(),
            ..Profile::default()
        };
        assert!(matches!(
            resolve_credentials(&profile, "x"),
            Err(ConfigError::Validation { .. })
        ));
        assert!(parse_api_url(Some("not a url")).is_err());
        assert!(parse_api_url(Some("  ")).unwrap().is_none());
    }

    #[test]
    fn redacted_masks_plaintext_secrets() {
        let mut config = Config::default();
        config
            .profiles
            .insert("home".into(), profile_with_token("abc"));
        config.profiles.insert(
            "office".into(),
            Profile {
                auth_mode: "basic".into(),
                username: Some("admin".into()),
                password: Some("hunter2".into()),
                ..Profile::default()
            },
        );

        let shown = config.redacted();
        assert_eq!(shown.profiles["home"].token.as_deref(), Some(REDACTED));
        assert_eq!(shown.profiles["office"].password.as_deref(), Some(REDACTED));
        assert_eq!(shown.profiles["office"].username.as_deref(), Some("admin"));
        assert_eq!(config.profiles["home"].token.as_deref(), Some("abc"));
    }

    #[test]
    fn ca_cert_applies_when_secure() {
        let path = Path::new("/etc/ssl/router.pem");
        assert!(matches!(tls_mode(false, Some(path)), TlsMode::CustomCa(_)));
        assert!(matches!(
            tls_mode(true, Some(path)),
            TlsMode::DangerAcceptInvalid
        ));
        assert!(matches!(tls_mode(false, None), TlsMode::System));
    }
}
