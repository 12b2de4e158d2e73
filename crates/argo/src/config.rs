//! CLI-aware wrappers over `argo_config`: global flag overrides and
//! interactive fallbacks layered on top of the TOML profiles.

use std::io::IsTerminal;
use std::time::Duration;

use secrecy::SecretString;

use argo_config::{Config, ConfigError, Profile};
use argo_core::{Credentials, DiscoveryConfig, SessionConfig};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use argo_config::{config_path, load_config_or_default, save_config};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .unwrap_or_else(|| config.default_profile_name().to_owned())
}

/// The active profile, if one is configured.
///
/// A profile named explicitly with `--profile` must exist.
pub fn active_profile<'a>(
    global: &GlobalOpts,
    config: &'a Config,
) -> Result<Option<&'a Profile>, CliError> {
    if global.profile.is_some() {
        return required_profile(global, config).map(|(_, profile)| Some(profile));
    }
    Ok(config.profiles.get(&active_profile_name(global, config)))
}

/// The active profile, which must exist even when picked by default.
pub fn required_profile<'a>(
    global: &GlobalOpts,
    config: &'a Config,
) -> Result<(String, &'a Profile), CliError> {
    let name = active_profile_name(global, config);
    match config.profile(&name) {
        Ok(profile) => Ok((name, profile)),
        Err(_) => Err(CliError::ProfileNotFound {
            name,
            available: available_profiles(config),
        }),
    }
}

fn available_profiles(config: &Config) -> String {
    let mut names: Vec<&str> = config.profiles.keys().map(String::as_str).collect();
    if names.is_empty() {
        return "(none)".into();
    }
    names.sort_unstable();
    names.join(", ")
}

/// Session settings: `--timeout-ms` beats the profile, which beats defaults.
pub fn session_config(
    global: &GlobalOpts,
    config: &Config,
    profile: Option<&Profile>,
) -> SessionConfig {
    let mut session = config.session_config(profile);
    if let Some(ms) = global.timeout_ms {
        session.timeout = Duration::from_millis(ms);
    }
    session
}

/// Discovery settings, with an optional receive-window override.
pub fn discovery_config(
    global: &GlobalOpts,
    config: &Config,
    window_secs: Option<u64>,
) -> DiscoveryConfig {
    let mut discovery = config.discovery_config();
    if let Some(secs) = window_secs {
        discovery.timeout = Duration::from_secs(secs);
    }
    if let Some(ms) = global.timeout_ms {
        discovery.http_timeout = Duration::from_millis(ms);
    }
    discovery
}

/// The appliance address: `--address` beats the profile.
pub fn resolve_address(global: &GlobalOpts, profile: Option<&Profile>) -> Result<String, CliError> {
    global
        .address
        .clone()
        .or_else(|| profile.map(|p| p.address.clone()))
        .filter(|address| !address.trim().is_empty())
        .ok_or_else(|| CliError::NoConfig {
            path: config_path().display().to_string(),
        })
}

/// Build login credentials from flags, profile, env, keyring, and finally
/// an interactive password prompt when attached to a terminal.
pub fn resolve_credentials(global: &GlobalOpts, config: &Config) -> Result<Credentials, CliError> {
    let profile_name = active_profile_name(global, config);
    let profile = active_profile(global, config)?;
    let address = resolve_address(global, profile)?;

    let fallback = Profile::default();
    let profile = profile.unwrap_or(&fallback);

    let username = match &global.username {
        Some(name) => name.clone(),
        None => argo_config::resolve_username(profile, &profile_name)?,
    };

    let password = match argo_config::resolve_password(profile, &profile_name) {
        Ok(password) => password,
        Err(ConfigError::NoCredentials { .. }) if std::io::stdin().is_terminal() => {
            prompt_password(&format!("Password for {username}@{address}: "))?
        }
        Err(e) => return Err(e.into()),
    };

    Ok(Credentials::new(address, username, password))
}

/// Read a password from the terminal without echo.
pub fn prompt_password(prompt: &str) -> Result<SecretString, CliError> {
    let password = rpassword::prompt_password(prompt)?;
    Ok(SecretString::from(password))
}
