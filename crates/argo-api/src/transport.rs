// Shared transport configuration for building reqwest::Client instances.
//
// The JSON-RPC client and the description-document fetcher share timeout,
// user agent, and cookie settings through this module.

use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::Jar;

/// Default timeout applied to connect and read of every HTTP operation.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);

const USER_AGENT: &str = concat!("argo-remote/", env!("CARGO_PKG_VERSION"));

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Applied uniformly to connect and to the whole request.
    pub timeout: Duration,
    pub cookie_jar: Option<Arc<Jar>>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            cookie_jar: None,
        }
    }
}

impl TransportConfig {
    /// Config with the given timeout and no cookie jar.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            cookie_jar: None,
        }
    }

    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, crate::error::Error> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(self.timeout)
            .timeout(self.timeout)
            .user_agent(USER_AGENT);

        if let Some(ref jar) = self.cookie_jar {
            builder = builder.cookie_provider(Arc::clone(jar));
        }

        builder
            .build()
            .map_err(|e| crate::error::Error::ClientBuild(e.to_string()))
    }

    /// Create a config with a fresh cookie jar (for the servlet session).
    pub fn with_cookie_jar(mut self) -> Self {
        self.cookie_jar = Some(Arc::new(Jar::default()));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_timeout_is_ten_seconds() {
        let config = TransportConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert!(config.cookie_jar.is_none());
    }

    #[test]
    fn with_cookie_jar_installs_fresh_jar() {
        let a = TransportConfig::default().with_cookie_jar();
        let b = TransportConfig::default().with_cookie_jar();
        let (Some(ja), Some(jb)) = (a.cookie_jar, b.cookie_jar) else {
            panic!("expected cookie jars");
        };
        assert!(!Arc::ptr_eq(&ja, &jb));
    }
}
