//! Configuration for the argo remote.
//!
//! TOML device profiles, password resolution (env + keyring + plaintext),
//! and translation to the runtime types in `argo_core::config`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use argo_core::version_gate::{
    DEFAULT_ALTERNATE_BUILD_TAG, DEFAULT_ALTERNATE_MINIMUM_VERSION, DEFAULT_MINIMUM_VERSION,
};
use argo_core::{DiscoveryConfig, SessionConfig, VersionPolicy};

/// Environment variable consulted first for a profile password.
pub const PASSWORD_ENV: &str = "ARGO_PASSWORD";

/// Environment variable supplying a user name when the profile has none.
pub const USERNAME_ENV: &str = "ARGO_USERNAME";

const KEYRING_SERVICE: &str = "argo";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("profile '{name}' not found in config")]
    ProfileNotFound { name: String },

    #[error("no {what} configured for profile '{profile}'")]
    NoCredentials { profile: String, what: &'static str },

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

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
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is named on the command line.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named device profiles.
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

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    /// RPC and priming timeout, in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Discovery receive window, in seconds.
    #[serde(default = "default_discovery_timeout_secs")]
    pub discovery_timeout_secs: u64,

    #[serde(default = "default_minimum_version")]
    pub minimum_version: String,

    #[serde(default = "default_alternate_minimum_version")]
    pub alternate_minimum_version: String,

    /// Substring marking builds accepted at the alternate minimum.
    #[serde(default = "default_alternate_build_tag")]
    pub alternate_build_tag: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            timeout_ms: default_timeout_ms(),
            discovery_timeout_secs: default_discovery_timeout_secs(),
            minimum_version: default_minimum_version(),
            alternate_minimum_version: default_alternate_minimum_version(),
            alternate_build_tag: default_alternate_build_tag(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout_ms() -> u64 {
    10_000
}
fn default_discovery_timeout_secs() -> u64 {
    2
}
fn default_minimum_version() -> String {
    DEFAULT_MINIMUM_VERSION.into()
}
fn default_alternate_minimum_version() -> String {
    DEFAULT_ALTERNATE_MINIMUM_VERSION.into()
}
fn default_alternate_build_tag() -> String {
    DEFAULT_ALTERNATE_BUILD_TAG.into()
}

/// A named device profile.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Appliance address, `host` or `host:port`.
    pub address: String,

    /// Login user name.
    pub username: Option<String>,

    /// Password (plaintext -- prefer keyring or env var).
    pub password: Option<String>,

    /// Override the global RPC timeout, in milliseconds.
    pub timeout_ms: Option<u64>,
}

impl Config {
    /// Look up a profile by name.
    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::ProfileNotFound { name: name.into() })
    }

    /// The profile name to use when none is given explicitly.
    pub fn default_profile_name(&self) -> &str {
        self.default_profile.as_deref().unwrap_or("default")
    }

    /// Version thresholds from the global defaults.
    pub fn version_policy(&self) -> VersionPolicy {
        VersionPolicy::new(
            self.defaults.minimum_version.clone(),
            self.defaults.alternate_minimum_version.clone(),
            self.defaults.alternate_build_tag.clone(),
        )
    }

    /// Session settings, with the profile's timeout taking precedence.
    pub fn session_config(&self, profile: Option<&Profile>) -> SessionConfig {
        let timeout_ms = profile
            .and_then(|p| p.timeout_ms)
            .unwrap_or(self.defaults.timeout_ms);
        SessionConfig {
            timeout: Duration::from_millis(timeout_ms),
            version_policy: self.version_policy(),
        }
    }

    /// Discovery settings from the global defaults.
    pub fn discovery_config(&self) -> DiscoveryConfig {
        DiscoveryConfig {
            timeout: Duration::from_secs(self.defaults.discovery_timeout_secs),
            http_timeout: Duration::from_millis(self.defaults.timeout_ms),
            ..DiscoveryConfig::default()
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "argo", "argo").map_or_else(
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
    p.push("argo");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the Config from `path` + environment.
///
/// Environment overrides use the `ARGO_` prefix with `__` between nesting
/// levels, e.g. `ARGO_DEFAULTS__TIMEOUT_MS=5000`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("ARGO_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if it cannot be read.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

/// Serialize config to TOML and write it to `path`.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, keyring::Error> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/password"))
}

/// Store a profile password in the system keyring.
pub fn store_password(profile_name: &str, password: &SecretString) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?.set_password(password.expose_secret())?;
    Ok(())
}

/// Resolve the login user name: the profile's, else `ARGO_USERNAME`.
pub fn resolve_username(profile: &Profile, profile_name: &str) -> Result<String, ConfigError> {
    profile
        .username
        .clone()
        .or_else(|| std::env::var(USERNAME_ENV).ok())
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
            what: "username",
        })
}

/// Resolve a profile password: env var, then keyring, then plaintext.
pub fn resolve_password(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    // 1. Env var
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        return Ok(SecretString::from(pw));
    }

    // 2. Keyring
    if let Ok(entry) = keyring_entry(profile_name) {
        if let Ok(pw) = entry.get_password() {
            return Ok(SecretString::from(pw));
        }
    }

    // 3. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
        what: "password",
    })
}
