//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and exit codes.

use miette::Diagnostic;
use thiserror::Error;

use argo_config::ConfigError;
use argo_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const INCOMPATIBLE: i32 = 5;
    pub const REMOTE: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Compatibility ────────────────────────────────────────────────
    #[error("{address} is not a BLOBbox (priming returned HTTP {status})")]
    #[diagnostic(
        code(argo::incompatible_device),
        help(
            "The address answered, but not like a BLOBbox appliance.\n\
             Find appliances on your network with: argo discover"
        )
    )]
    IncompatibleDevice { address: String, status: u16 },

    #[error("Appliance software version '{version}' is not supported")]
    #[diagnostic(
        code(argo::incompatible_version),
        help(
            "Update the appliance software, or lower minimum_version in the\n\
             [defaults] section of the config file."
        )
    )]
    IncompatibleVersion { version: String },

    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not communicate with appliance at {address}")]
    #[diagnostic(
        code(argo::connection_failed),
        help(
            "Check that the appliance is switched on and reachable.\n\
             Address: {address}\n\
             Try: argo validate {address}"
        )
    )]
    ConnectionFailed {
        address: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Request to {address} timed out")]
    #[diagnostic(
        code(argo::timeout),
        help("Increase the timeout with --timeout-ms or check the appliance is responsive.")
    )]
    Timeout { address: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication with {address} failed: {reason}")]
    #[diagnostic(
        code(argo::auth_failed),
        help(
            "Verify the user name and password for this appliance.\n\
             Run: argo config set-password"
        )
    )]
    AuthFailed { address: String, reason: String },

    #[error("No {what} configured for profile '{profile}'")]
    #[diagnostic(
        code(argo::no_credentials),
        help(
            "Configure credentials with: argo config init\n\
             Or pass --username and set the ARGO_PASSWORD environment variable."
        )
    )]
    NoCredentials { profile: String, what: String },

    // ── Discovery ────────────────────────────────────────────────────
    #[error("Discovery failed")]
    #[diagnostic(
        code(argo::discovery_failed),
        help("Check that this host has a network interface that allows multicast.")
    )]
    DiscoveryFailed {
        #[source]
        source: std::io::Error,
    },

    #[error("Could not read device description from {location}")]
    #[diagnostic(code(argo::description_failed))]
    DescriptionFailed {
        location: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    // ── Remote calls ─────────────────────────────────────────────────
    #[error("Appliance rejected {method}")]
    #[diagnostic(code(argo::remote_call_failed))]
    RemoteCallFailed {
        method: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(argo::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(argo::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: argo config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No appliance address configured")]
    #[diagnostic(
        code(argo::no_config),
        help(
            "Pass --address, run: argo config init\n\
             Config file expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error("Configuration error: {0}")]
    #[diagnostic(code(argo::config))]
    Config(String),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(argo::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::DiscoveryFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::IncompatibleDevice { .. } | Self::IncompatibleVersion { .. } => {
                exit_code::INCOMPATIBLE
            }
            Self::RemoteCallFailed { .. } | Self::DescriptionFailed { .. } => exit_code::REMOTE,
            Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::NoConfig { .. } => exit_code::USAGE,
            Self::Config(_) | Self::Io(_) | Self::Json(_) => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::IncompatibleDevice { address, status } => {
                CliError::IncompatibleDevice { address, status }
            }

            CoreError::IncompatibleSoftwareVersion { version } => {
                CliError::IncompatibleVersion { version }
            }

            CoreError::CommunicationFailure { address, source } => {
                if source.is_timeout() {
                    CliError::Timeout { address }
                } else {
                    CliError::ConnectionFailed {
                        address,
                        source: Box::new(source),
                    }
                }
            }

            CoreError::AuthenticationFailure { address, reason } => {
                CliError::AuthFailed { address, reason }
            }

            CoreError::DiscoveryIo(source) => CliError::DiscoveryFailed { source },

            CoreError::DescriptionFetch { location, source } => CliError::DescriptionFailed {
                location,
                source: Box::new(source),
            },

            CoreError::RemoteCall { method, source } => CliError::RemoteCallFailed {
                method,
                source: Box::new(source),
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile, what } => CliError::NoCredentials {
                profile,
                what: what.into(),
            },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_exit_codes() {
        let cases = [
            (
                CoreError::IncompatibleDevice {
                    address: "10.0.0.2".into(),
                    status: 200,
                },
                exit_code::INCOMPATIBLE,
            ),
            (
                CoreError::IncompatibleSoftwareVersion {
                    version: "1.50.0".into(),
                },
                exit_code::INCOMPATIBLE,
            ),
            (
                CoreError::AuthenticationFailure {
                    address: "10.0.0.2".into(),
                    reason: "login rejected".into(),
                },
                exit_code::AUTH,
            ),
            (
                CoreError::DiscoveryIo(std::io::Error::other("boom")),
                exit_code::CONNECTION,
            ),
        ];
        for (core, expected) in cases {
            let kind = core.kind();
            assert_eq!(CliError::from(core).exit_code(), expected, "{kind}");
        }
    }

    #[test]
    fn missing_credentials_are_auth_errors() {
        let err = CliError::from(ConfigError::NoCredentials {
            profile: "lounge".into(),
            what: "password",
        });
        assert_eq!(err.exit_code(), exit_code::AUTH);
        assert_eq!(
            err.to_string(),
            "No password configured for profile 'lounge'"
        );
    }
}
