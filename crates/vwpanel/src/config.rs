//! CLI configuration: thin wrapper around `vwpanel_config`.
//!
//! Adds the resolution step that layers `GlobalOpts` flag overrides
//! (--api, --token, --plugin-path, ...) on top of the active profile.

use std::time::Duration;

use secrecy::SecretString;

use vwpanel_core::{Credentials, PanelConfig, TlsMode};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use vwpanel_config::{
    Config, Profile, config_path, load_config, load_config_or_default, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Comma-separated profile names for help text.
pub fn available_profiles(config: &Config) -> String {
    let mut names: Vec<_> = config.profiles.keys().cloned().collect();
    if names.is_empty() {
        return "(none)".into();
    }
    names.sort();
    names.join(", ")
}

/// Build the `PanelConfig` for a router-bound command.
///
/// Flag > env > profile > defaults. A missing URL or token is not an
/// error: the panel reports it when a request fails.
pub fn resolve_panel_config(global: &GlobalOpts) -> Result<PanelConfig, CliError> {
    let cfg = load_config()?;
    let profile_name = active_profile_name(global, &cfg);

    let mut panel = match cfg.profiles.get(&profile_name) {
        Some(profile) => {
            vwpanel_config::profile_to_panel_config(profile, &profile_name, &cfg.defaults)?
        }
        // Only an explicitly requested profile has to exist.
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: available_profiles(&cfg),
            });
        }
        None => PanelConfig {
            tls: vwpanel_config::tls_mode(cfg.defaults.insecure, None),
            timeout: Duration::from_secs(cfg.defaults.timeout),
            ..PanelConfig::default()
        },
    };

    apply_overrides(&mut panel, global)?;
    tracing::debug!(
        profile = %profile_name,
        base_url = ?panel.base_url.as_ref().map(ToString::to_string),
        plugin_path = %panel.plugin_path,
        "resolved panel config"
    );
    Ok(panel)
}

/// Layer flag values over a profile-derived config.
pub fn apply_overrides(panel: &mut PanelConfig, global: &GlobalOpts) -> Result<(), CliError> {
    if let Some(url) = vwpanel_config::parse_api_url(global.api.as_deref())? {
        panel.base_url = Some(url);
    }
    if let Some(token) = global.token.as_deref().filter(|t| !t.is_empty()) {
        panel.credentials = Some(Credentials::Token(SecretString::from(token.to_owned())));
    }
    if let Some(path) = global.plugin_path.as_deref().filter(|p| !p.is_empty()) {
        path.clone_into(&mut panel.plugin_path);
    }
    if global.insecure {
        panel.tls = TlsMode::DangerAcceptInvalid;
    }
    if let Some(secs) = global.timeout {
        panel.timeout = Duration::from_secs(secs);
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["vwpanel"];
        argv.extend_from_slice(args);
        argv.push("ping");
        Cli::try_parse_from(argv).unwrap().global
    }

    #[test]
    fn flags_override_profile_values() {
        let mut panel = PanelConfig::default();
        let opts = global(&[
            "--api",
            "https://192.168.2.1",
            "--token",
            "t0ken",
            "--plugin-path",
            "/plugins/vaultwarden",
            "--timeout",
            "5",
            "-k",
        ]);

        apply_overrides(&mut panel, &opts).unwrap();

        assert_eq!(
            panel.base_url.as_ref().map(url::Url::as_str),
            Some("https://192.168.2.1/")
        );
        assert!(matches!(panel.credentials, Some(Credentials::Token(_))));
        assert_eq!(panel.plugin_path, "/plugins/vaultwarden");
        assert_eq!(panel.timeout, Duration::from_secs(5));
        assert!(matches!(panel.tls, TlsMode::DangerAcceptInvalid));
        assert!(!panel.missing().any());
    }

    #[test]
    fn invalid_api_flag_is_a_validation_error() {
        let mut panel = PanelConfig::default();
        let opts = global(&["--api", "not a url"]);
        let err = apply_overrides(&mut panel, &opts).unwrap_err();
        assert!(matches!(err, CliError::Validation { .. }));
    }

    #[test]
    fn profile_name_prefers_flag() {
        let cfg = Config::default();
        assert_eq!(active_profile_name(&global(&[]), &cfg), "default");
        assert_eq!(
            active_profile_name(&global(&["-p", "office"]), &cfg),
            "office"
        );
        assert_eq!(available_profiles(&cfg), "(none)");
    }
}
