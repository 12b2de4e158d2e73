use thiserror::Error;

/// Top-level error type for the `argo-api` crate.
///
/// Covers every transport-level failure mode: HTTP, device addresses,
/// JSON-RPC error objects, and malformed payloads. `argo-core` maps these
/// into the terminal session failure kinds.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The device address could not be turned into an endpoint URL.
    #[error("Invalid device address '{address}'")]
    InvalidAddress { address: String },

    /// The server answered with a non-success HTTP status.
    #[error("Unexpected HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    /// Building the HTTP client failed.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    // ── JSON-RPC ────────────────────────────────────────────────────
    /// Structured error object returned by the JSON-RPC endpoint.
    #[error("JSON-RPC error calling {method} (code {code}): {message}")]
    Rpc {
        method: String,
        code: i64,
        message: String,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// XML document could not be parsed.
    #[error("XML parse error: {0}")]
    Xml(String),
}

impl Error {
    /// Returns `true` if the failure happened before any response arrived
    /// (connection refused, DNS, timeout).
    pub fn is_unreachable(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// Returns `true` if the request timed out.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }
}
