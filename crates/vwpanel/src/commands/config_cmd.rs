//! Config subcommand handlers.

use std::fmt::Write as _;

use dialoguer::{Input, Select};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// TOML-like view of an already redacted config.
fn format_config(cfg: &Config) -> String {
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "insecure = {}", cfg.defaults.insecure);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.profiles[name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        if let Some(ref url) = p.api_url {
            let _ = writeln!(out, "api_url = \"{url}\"");
        }
        if let Some(ref path) = p.plugin_path {
            let _ = writeln!(out, "plugin_path = \"{path}\"");
        }
        let _ = writeln!(out, "auth_mode = \"{}\"", p.auth_mode);
        if let Some(ref token) = p.token {
            let _ = writeln!(out, "token = \"{token}\"");
        }
        if let Some(ref env) = p.token_env {
            let _ = writeln!(out, "token_env = \"{env}\"");
        }
        if let Some(ref u) = p.username {
            let _ = writeln!(out, "username = \"{u}\"");
        }
        if let Some(ref pw) = p.password {
            let _ = writeln!(out, "password = \"{pw}\"");
        }
        if let Some(ref ca) = p.ca_cert {
            let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
        }
        if let Some(insecure) = p.insecure {
            let _ = writeln!(out, "insecure = {insecure}");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
    }

    out
}

fn save_config(cfg: &Config) -> Result<(), CliError> {
    config::save_config(cfg)?;
    Ok(())
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn prompt_secret(label: &str) -> Result<String, CliError> {
    let secret = rpassword::prompt_password(label).map_err(prompt_err)?;
    if secret.is_empty() {
        return Err(CliError::Validation {
            field: "secret".into(),
            reason: "value cannot be empty".into(),
        });
    }
    Ok(secret)
}

/// Offer to store a secret in the system keyring or return it for
/// plaintext config. `None` means it went to the keyring.
fn prompt_keyring_storage(
    secret: String,
    prompt: &str,
    store: impl FnOnce(&str) -> Result<(), vwpanel_config::ConfigError>,
) -> Result<Option<String>, CliError> {
    let choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let selection = Select::new()
        .with_prompt(prompt)
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    if selection == 0 {
        store(&secret)?;
        eprintln!("   ✓ stored in system keyring");
        Ok(None)
    } else {
        Ok(Some(secret))
    }
}

/// Apply one `config set` key to a profile.
fn set_profile_key(profile: &mut Profile, key: &str, value: String) -> Result<(), CliError> {
    match key {
        "api_url" | "api-url" => {
            vwpanel_config::parse_api_url(Some(value.as_str()))?;
            profile.api_url = Some(value);
        }
        "plugin_path" | "plugin-path" => profile.plugin_path = Some(value),
        "auth_mode" | "auth-mode" => {
            if !matches!(value.as_str(), "token" | "basic") {
                return Err(CliError::Validation {
                    field: "auth_mode".into(),
                    reason: "must be 'token' or 'basic'".into(),
                });
            }
            profile.auth_mode = value;
        }
        "token" => profile.token = Some(value),
        "token_env" | "token-env" => profile.token_env = Some(value),
        "username" => profile.username = Some(value),
        "insecure" => {
            profile.insecure = Some(value.parse().map_err(|_| CliError::Validation {
                field: "insecure".into(),
                reason: "must be 'true' or 'false'".into(),
            })?);
        }
        "timeout" => {
            profile.timeout = Some(value.parse().map_err(|_| CliError::Validation {
                field: "timeout".into(),
                reason: "must be a number (seconds)".into(),
            })?);
        }
        "ca_cert" | "ca-cert" => profile.ca_cert = Some(value.into()),
        other => {
            return Err(CliError::Validation {
                field: other.into(),
                reason: format!(
                    "unknown config key '{other}'. Valid keys: api_url, plugin_path, \
                     auth_mode, token, token_env, username, insecure, timeout, ca_cert"
                ),
            });
        }
    }
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(),

        ConfigCommand::Show => {
            let cfg = config::load_config_or_default().redacted();
            let out = output::render_single(&global.output, &cfg, format_config, |_| {
                config::config_path().display().to_string()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);
            let profile = cfg.profiles.entry(profile_name.clone()).or_default();
            set_profile_key(profile, &key, value)?;

            save_config(&cfg)?;
            output::print_status(&format!("Set {key} on profile '{profile_name}'"), global.quiet);
            Ok(())
        }

        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: vwpanel config init");
            } else {
                let mut names: Vec<_> = cfg.profiles.keys().collect();
                names.sort();
                for name in names {
                    let marker = if name == default { " *" } else { "" };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }

        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();

            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    available: config::available_profiles(&cfg),
                    name,
                });
            }

            cfg.default_profile = Some(name.clone());
            save_config(&cfg)?;
            output::print_status(&format!("Default profile set to '{name}'"), global.quiet);
            Ok(())
        }

        ConfigCommand::SetToken { profile } => {
            let cfg = config::load_config_or_default();
            let profile_name = profile.unwrap_or_else(|| config::active_profile_name(global, &cfg));

            let prof = cfg.profiles.get(&profile_name).ok_or_else(|| {
                CliError::ProfileNotFound {
                    name: profile_name.clone(),
                    available: config::available_profiles(&cfg),
                }
            })?;

            if prof.auth_mode == "basic" {
                let password = prompt_secret("Password: ")?;
                vwpanel_config::store_password(&profile_name, &password)?;
            } else {
                let token = prompt_secret("API token: ")?;
                vwpanel_config::store_token(&profile_name, &token)?;
            }

            output::print_status(
                &format!("Secret stored in system keyring for profile '{profile_name}'"),
                global.quiet,
            );
            Ok(())
        }
    }
}

/// Interactive wizard that writes a fresh single-profile config.
fn init() -> Result<(), CliError> {
    let config_path = config::config_path();
    eprintln!("vwpanel configuration wizard");
    eprintln!("   Config path: {}\n", config_path.display());

    let profile_name: String = Input::new()
        .with_prompt("Profile name")
        .default("default".into())
        .interact_text()
        .map_err(prompt_err)?;

    let api_url: String = Input::new()
        .with_prompt("Router URL")
        .default("https://192.168.2.1".into())
        .validate_with(|input: &String| {
            vwpanel_config::parse_api_url(Some(input.as_str()))
                .map(|_| ())
                .map_err(|e| e.to_string())
        })
        .interact_text()
        .map_err(prompt_err)?;

    let plugin_path: String = Input::new()
        .with_prompt("Plugin path")
        .default(vwpanel_core::DEFAULT_PLUGIN_PATH.into())
        .interact_text()
        .map_err(prompt_err)?;

    let auth_choices = &["API token (recommended)", "Username/Password"];
    let auth_selection = Select::new()
        .with_prompt("Authentication method")
        .items(auth_choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    let mut profile = Profile {
        api_url: Some(api_url),
        plugin_path: Some(plugin_path),
        ..Profile::default()
    };

    if auth_selection == 0 {
        let token = prompt_secret("API token: ")?;
        let name = profile_name.clone();
        profile.token = prompt_keyring_storage(token, "Where to store the token?", |secret| {
            vwpanel_config::store_token(&name, secret)
        })?;
    } else {
        let username: String = Input::new()
            .with_prompt("Username")
            .interact_text()
            .map_err(prompt_err)?;
        let password = prompt_secret("Password: ")?;
        let name = profile_name.clone();
        profile.auth_mode = "basic".into();
        profile.username = Some(username);
        profile.password =
            prompt_keyring_storage(password, "Where to store the password?", |secret| {
                vwpanel_config::store_password(&name, secret)
            })?;
    }

    let mut cfg = config::load_config_or_default();
    cfg.profiles.insert(profile_name.clone(), profile);
    cfg.default_profile = Some(profile_name.clone());
    save_config(&cfg)?;

    eprintln!("\n✓ Configuration written to {}", config_path.display());
    eprintln!("  Active profile: {profile_name}");
    eprintln!("\n  Test it: vwpanel ping");

    Ok(())
}
