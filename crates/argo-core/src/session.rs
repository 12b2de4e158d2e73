// ── Session establishment ──
//
// Validate the device, then authenticate against its JSON-RPC API:
//
//   Unvalidated ──prime 204 + supported version──► Validated
//   Validated ──already authorized──────────────► Authenticated
//   Validated ──challenge/login/re-prime────────► Authenticating ──► Authenticated
//   any state ──error──────────────────────────► Failed(kind)
//
// Nothing is retried. Each `establish` builds its own transport, so every
// session has its own cookie jar and servlet session.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use argo_api::jsonrpc::RpcTransport;
use argo_api::{JabsorbClient, TransportConfig, login_digest};

use crate::config::{Credentials, SessionConfig};
use crate::error::{CoreError, ErrorKind};

pub const VERSION_METHOD: &str = "version.getVersionString";
pub const AUTHORIZED_USER_METHOD: &str = "authenticationManager.getAuthorizedUserName";
pub const LOGIN_CHALLENGE_METHOD: &str = "authenticationManager.getLoginChallenge";
pub const LOGIN_METHOD: &str = "authenticationManager.login";

/// HTTP status the priming servlet answers with on a real appliance.
const PRIME_OK: u16 = 204;

/// Handshake progress, reported in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unvalidated,
    Validated,
    Authenticating,
    Authenticated,
    Failed(ErrorKind),
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unvalidated => f.write_str("unvalidated"),
            Self::Validated => f.write_str("validated"),
            Self::Authenticating => f.write_str("authenticating"),
            Self::Authenticated => f.write_str("authenticated"),
            Self::Failed(kind) => write!(f, "failed ({kind})"),
        }
    }
}

/// Tracks the state of one handshake and logs every transition.
struct Handshake<'a> {
    address: &'a str,
    state: SessionState,
}

impl<'a> Handshake<'a> {
    fn new(address: &'a str) -> Self {
        Self {
            address,
            state: SessionState::Unvalidated,
        }
    }

    fn advance(&mut self, next: SessionState) {
        debug!(address = self.address, from = %self.state, to = %next, "session state");
        self.state = next;
    }

    fn fail(&mut self, err: CoreError) -> CoreError {
        self.advance(SessionState::Failed(err.kind()));
        err
    }
}

/// An authenticated connection to one appliance.
///
/// Holds the transport whose HTTP session carries the login. Credentials
/// are not retained.
pub struct Session<T = JabsorbClient> {
    transport: T,
    user: String,
    version: String,
}

impl<T: RpcTransport> Session<T> {
    pub fn address(&self) -> &str {
        self.transport.address()
    }

    /// The user name the appliance reports as logged in.
    pub fn authorized_user(&self) -> &str {
        &self.user
    }

    /// The software version reported during validation.
    pub fn software_version(&self) -> &str {
        &self.version
    }

    /// Invoke an arbitrary remote method on the authenticated session.
    pub async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value, CoreError> {
        self.transport
            .call(method, params)
            .await
            .map_err(|e| CoreError::remote_call(method, e))
    }
}

impl<T> fmt::Debug for Session<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.user)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

/// Validates appliances and establishes authenticated sessions.
#[derive(Debug, Clone, Default)]
pub struct SessionEstablisher {
    config: SessionConfig,
}

impl SessionEstablisher {
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Build a fresh JSON-RPC transport for `address`.
    ///
    /// An address that is not a bare host or `host:port` cannot be reached
    /// and is reported as a communication failure.
    pub fn connect(&self, address: &str) -> Result<JabsorbClient, CoreError> {
        JabsorbClient::new(address, &TransportConfig::with_timeout(self.config.timeout))
            .map_err(|e| CoreError::communication(address, e))
    }

    /// Check that `address` hosts a supported appliance, without logging in.
    ///
    /// Returns the reported software version.
    pub async fn ensure_valid(&self, address: &str) -> Result<String, CoreError> {
        let transport = self.connect(address)?;
        self.validate(&transport).await
    }

    /// Validate a device through an existing transport.
    pub async fn validate<T: RpcTransport>(&self, transport: &T) -> Result<String, CoreError> {
        let mut handshake = Handshake::new(transport.address());
        let version = self
            .validate_inner(transport)
            .await
            .map_err(|e| handshake.fail(e))?;
        handshake.advance(SessionState::Validated);
        Ok(version)
    }

    /// Validate and log in with `credentials`.
    pub async fn establish(&self, credentials: &Credentials) -> Result<Session, CoreError> {
        let transport = self.connect(&credentials.address)?;
        self.establish_with(transport, &credentials.username, &credentials.password)
            .await
    }

    /// Validate and log in through a caller-supplied transport.
    pub async fn establish_with<T: RpcTransport>(
        &self,
        transport: T,
        username: &str,
        password: &SecretString,
    ) -> Result<Session<T>, CoreError> {
        let address = transport.address().to_owned();
        let mut handshake = Handshake::new(&address);

        let version = self
            .validate_inner(&transport)
            .await
            .map_err(|e| handshake.fail(e))?;
        handshake.advance(SessionState::Validated);

        let user = self
            .authenticate(&transport, &mut handshake, username, password)
            .await
            .map_err(|e| handshake.fail(e))?;
        handshake.advance(SessionState::Authenticated);

        info!(address = %address, user = %user, version = %version, "session established");
        Ok(Session {
            transport,
            user,
            version,
        })
    }

    async fn validate_inner<T: RpcTransport>(&self, transport: &T) -> Result<String, CoreError> {
        let address = transport.address();

        let status = transport
            .prime()
            .await
            .map_err(|e| CoreError::communication(address, e))?;
        if status != PRIME_OK {
            return Err(CoreError::IncompatibleDevice {
                address: address.to_owned(),
                status,
            });
        }

        let version = transport
            .call_string(VERSION_METHOD, Vec::new())
            .await
            .map_err(|e| CoreError::communication(address, e))?
            .unwrap_or_default();
        debug!(address, version = %version, "appliance software version");

        if !self.config.version_policy.is_supported(&version) {
            return Err(CoreError::IncompatibleSoftwareVersion { version });
        }
        Ok(version)
    }

    async fn authenticate<T: RpcTransport>(
        &self,
        transport: &T,
        handshake: &mut Handshake<'_>,
        username: &str,
        password: &SecretString,
    ) -> Result<String, CoreError> {
        let address = transport.address();
        let auth_error = |e: argo_api::Error| CoreError::authentication(address, e.to_string());

        if let Some(user) = authorized_user(transport).await.map_err(auth_error)? {
            debug!(address, user = %user, "already authorized");
            return Ok(user);
        }

        handshake.advance(SessionState::Authenticating);
        let challenge = transport
            .call_string(LOGIN_CHALLENGE_METHOD, vec![json!(username)])
            .await
            .map_err(auth_error)?
            .ok_or_else(|| CoreError::authentication(address, "no login challenge"))?;

        let digest = login_digest(&challenge, username, password.expose_secret());
        transport
            .call(LOGIN_METHOD, vec![json!(digest)])
            .await
            .map_err(auth_error)?;

        // The servlet publishes a different method table after login.
        let status = transport.prime().await.map_err(auth_error)?;
        if status != PRIME_OK {
            warn!(address, status, "unexpected status re-priming after login");
        }

        authorized_user(transport)
            .await
            .map_err(auth_error)?
            .ok_or_else(|| CoreError::authentication(address, "login rejected"))
    }
}

/// The logged-in user, treating JSON `null` and the string `"null"` as none.
async fn authorized_user<T: RpcTransport>(
    transport: &T,
) -> Result<Option<String>, argo_api::Error> {
    let user = transport
        .call_string(AUTHORIZED_USER_METHOD, Vec::new())
        .await?;
    Ok(user.filter(|name| name != "null"))
}
