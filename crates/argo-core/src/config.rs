// ── Runtime configuration ──
//
// These types describe *how* to discover and talk to an appliance. They
// carry credentials and tuning, but never touch disk. The CLI constructs
// them (via `argo-config`) and hands them in.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::Duration;

use secrecy::SecretString;

use argo_api::ssdp::{MEDIA_RENDERER_TARGET, MULTICAST_ADDR};
use argo_api::transport::DEFAULT_TIMEOUT;

use crate::version_gate::VersionPolicy;

/// Default discovery receive window.
pub const DEFAULT_DISCOVERY_TIMEOUT: Duration = Duration::from_secs(2);

/// Who to log in as, and where.
///
/// Held only for the duration of one `establish` call.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Device address, `host` or `host:port`.
    pub address: String,
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(
        address: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<SecretString>,
    ) -> Self {
        Self {
            address: address.into(),
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Configuration for session establishment.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Connect and read timeout for every priming and RPC request.
    pub timeout: Duration,
    /// Minimum software versions accepted during validation.
    pub version_policy: VersionPolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            version_policy: VersionPolicy::default(),
        }
    }
}

/// Configuration for a discovery scan.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// How long to wait for each further reply before the scan ends.
    pub timeout: Duration,
    /// Local address the scan socket binds to.
    pub bind_addr: SocketAddr,
    /// Where the probe is sent.
    pub target_addr: SocketAddr,
    /// SSDP search target (`ST` header).
    pub search_target: String,
    /// Timeout for fetching description documents of found devices.
    pub http_timeout: Duration,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_DISCOVERY_TIMEOUT,
            bind_addr: SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 0)),
            target_addr: MULTICAST_ADDR,
            search_target: MEDIA_RENDERER_TARGET.into(),
            http_timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl DiscoveryConfig {
    /// The `MX` value advertised in the probe: the receive window in whole
    /// seconds, at least one.
    pub fn mx_secs(&self) -> u64 {
        self.timeout.as_secs().max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_protocol() {
        let discovery = DiscoveryConfig::default();
        assert_eq!(discovery.timeout, Duration::from_secs(2));
        assert_eq!(discovery.target_addr.to_string(), "239.255.255.250:1900");
        assert_eq!(discovery.mx_secs(), 2);

        let session = SessionConfig::default();
        assert_eq!(session.timeout, Duration::from_millis(10_000));
        assert_eq!(session.version_policy.minimum(), "1.66.2");
    }

    #[test]
    fn mx_never_zero() {
        let discovery = DiscoveryConfig {
            timeout: Duration::from_millis(300),
            ..DiscoveryConfig::default()
        };
        assert_eq!(discovery.mx_secs(), 1);
    }
}
