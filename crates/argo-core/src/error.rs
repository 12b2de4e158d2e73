// ── Core error types ──
//
// Terminal failures of discovery and session establishment. None of these
// are retried here. Transport errors from `argo-api` are carried as
// `#[source]`.

use strum::Display;
use thiserror::Error;

/// Closed set of failure kinds, for exhaustive matching by presentation code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ErrorKind {
    IncompatibleDevice,
    IncompatibleSoftwareVersion,
    CommunicationFailure,
    AuthenticationFailure,
    DiscoveryIo,
    DescriptionFetch,
    RemoteCall,
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Validation ───────────────────────────────────────────────────
    /// The target answered, but not like a BLOBbox does.
    #[error("Device at {address} is not a compatible appliance (priming returned HTTP {status})")]
    IncompatibleDevice { address: String, status: u16 },

    /// Right appliance, software too old.
    #[error("Unsupported appliance software version '{version}'")]
    IncompatibleSoftwareVersion { version: String },

    /// The target could not be reached or answered garbage.
    #[error("Cannot communicate with device at {address}: {source}")]
    CommunicationFailure {
        address: String,
        #[source]
        source: argo_api::Error,
    },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication with device at {address} failed: {reason}")]
    AuthenticationFailure { address: String, reason: String },

    // ── Discovery ────────────────────────────────────────────────────
    /// Socket failure other than the normal end-of-scan timeout.
    #[error("Discovery socket error: {0}")]
    DiscoveryIo(#[from] std::io::Error),

    #[error("Failed to fetch device description from {location}: {source}")]
    DescriptionFetch {
        location: String,
        #[source]
        source: argo_api::Error,
    },

    // ── Established session ──────────────────────────────────────────
    #[error("Remote call {method} failed: {source}")]
    RemoteCall {
        method: String,
        #[source]
        source: argo_api::Error,
    },
}

impl CoreError {
    /// The failure kind, without payload.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::IncompatibleDevice { .. } => ErrorKind::IncompatibleDevice,
            Self::IncompatibleSoftwareVersion { .. } => ErrorKind::IncompatibleSoftwareVersion,
            Self::CommunicationFailure { .. } => ErrorKind::CommunicationFailure,
            Self::AuthenticationFailure { .. } => ErrorKind::AuthenticationFailure,
            Self::DiscoveryIo(_) => ErrorKind::DiscoveryIo,
            Self::DescriptionFetch { .. } => ErrorKind::DescriptionFetch,
            Self::RemoteCall { .. } => ErrorKind::RemoteCall,
        }
    }

    /// Returns `true` if the device was never reached at all.
    pub fn is_unreachable(&self) -> bool {
        match self {
            Self::CommunicationFailure { source, .. } | Self::RemoteCall { source, .. } => {
                source.is_unreachable()
            }
            _ => false,
        }
    }

    pub(crate) fn communication(address: &str, source: argo_api::Error) -> Self {
        Self::CommunicationFailure {
            address: address.to_owned(),
            source,
        }
    }

    pub(crate) fn authentication(address: &str, reason: impl Into<String>) -> Self {
        Self::AuthenticationFailure {
            address: address.to_owned(),
            reason: reason.into(),
        }
    }

    pub(crate) fn remote_call(method: &str, source: argo_api::Error) -> Self {
        Self::RemoteCall {
            method: method.to_owned(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_match_variants() {
        let err = CoreError::IncompatibleSoftwareVersion {
            version: "1.50.0".into(),
        };
        assert_eq!(err.kind(), ErrorKind::IncompatibleSoftwareVersion);
        assert_eq!(err.kind().to_string(), "IncompatibleSoftwareVersion");

        let err = CoreError::DiscoveryIo(std::io::Error::other("boom"));
        assert_eq!(err.kind(), ErrorKind::DiscoveryIo);
    }

    #[test]
    fn messages_name_the_target() {
        let err = CoreError::authentication("10.0.0.2", "login rejected");
        assert_eq!(
            err.to_string(),
            "Authentication with device at 10.0.0.2 failed: login rejected"
        );

        let err = CoreError::communication(
            "10.0.0.3",
            argo_api::Error::InvalidAddress {
                address: "10.0.0.3".into(),
            },
        );
        assert!(err.to_string().starts_with("Cannot communicate with device at 10.0.0.3"));
        assert!(!err.is_unreachable());
    }
}
