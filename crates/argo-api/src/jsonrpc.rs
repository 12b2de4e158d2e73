// Jabsorb JSON-RPC client
//
// The appliance exposes its control API through a Jabsorb servlet. The
// servlet keeps a per-HTTP-session call table, which is populated by a plain
// "priming" POST to `/argo`. Both requests therefore have to share one
// cookie jar: the priming response sets the session cookie and every RPC
// call afterwards presents it.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Path of the session priming servlet.
pub const PRIME_PATH: &str = "/argo?silent=true";

/// Path of the JSON-RPC endpoint.
pub const RPC_PATH: &str = "/jabsorb/JSON-RPC";

/// The remote call surface the session establisher depends on.
///
/// One transport instance is bound to one device address and one HTTP
/// session for its whole lifetime.
pub trait RpcTransport: Send + Sync {
    /// The device address this transport talks to.
    fn address(&self) -> &str;

    /// POST to the priming endpoint and return the HTTP status code.
    ///
    /// A status is returned even when it is not a success: deciding what a
    /// status means is up to the caller.
    fn prime(&self) -> impl Future<Output = Result<u16, Error>> + Send;

    /// Invoke `method` with positional `params` and return its result.
    fn call(
        &self,
        method: &str,
        params: Vec<Value>,
    ) -> impl Future<Output = Result<Value, Error>> + Send;

    /// Invoke `method` and read the result as a string.
    ///
    /// JSON `null` maps to `None`; non-string results are rendered as JSON.
    fn call_string(
        &self,
        method: &str,
        params: Vec<Value>,
    ) -> impl Future<Output = Result<Option<String>, Error>> + Send {
        async move { self.call(method, params).await.map(value_to_string) }
    }
}

fn value_to_string(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Value,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

/// Jabsorb reports `msg`; other JSON-RPC servers use `message`.
#[derive(Deserialize)]
struct RpcErrorObject {
    #[serde(default)]
    code: i64,
    #[serde(default, alias = "message")]
    msg: Option<String>,
}

/// Build `http://{address}{path}`, rejecting addresses that are not a bare
/// host or `host:port`.
pub fn endpoint_url(address: &str, path: &str) -> Result<Url, Error> {
    let trimmed = address.trim();
    if trimmed.is_empty()
        || trimmed.contains(['/', '?', '#', '@'])
        || trimmed.contains(char::is_whitespace)
    {
        return Err(Error::InvalidAddress {
            address: address.to_owned(),
        });
    }
    Url::parse(&format!("http://{trimmed}{path}")).map_err(|_| Error::InvalidAddress {
        address: address.to_owned(),
    })
}

/// JSON-RPC client for one appliance, carrying its own servlet session.
#[derive(Debug)]
pub struct JabsorbClient {
    http: reqwest::Client,
    address: String,
    rpc_url: Url,
    prime_url: Url,
    next_id: AtomicU64,
}

impl JabsorbClient {
    /// Create a client for `address` (`host` or `host:port`).
    ///
    /// A fresh cookie jar is installed unless the config already carries
    /// one, so every client starts in its own servlet session.
    pub fn new(address: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let config = if transport.cookie_jar.is_some() {
            transport.clone()
        } else {
            transport.clone().with_cookie_jar()
        };
        Self::with_client(config.build_client()?, address)
    }

    /// Create a client around a pre-built `reqwest::Client`.
    ///
    /// The client must have a cookie store, otherwise the priming request
    /// has no effect on later calls.
    pub fn with_client(http: reqwest::Client, address: &str) -> Result<Self, Error> {
        Ok(Self {
            http,
            address: address.trim().to_owned(),
            rpc_url: endpoint_url(address, RPC_PATH)?,
            prime_url: endpoint_url(address, PRIME_PATH)?,
            next_id: AtomicU64::new(1),
        })
    }

    /// The JSON-RPC endpoint URL.
    pub fn rpc_url(&self) -> &Url {
        &self.rpc_url
    }

    /// The priming endpoint URL.
    pub fn prime_url(&self) -> &Url {
        &self.prime_url
    }

    async fn parse_response(&self, method: &str, resp: reqwest::Response) -> Result<Value, Error> {
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                url: self.rpc_url.to_string(),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        trace!(method, len = body.len(), "JSON-RPC response");

        let envelope: RpcResponse = serde_json::from_str(&body).map_err(|e| {
            let preview = body.chars().take(200).collect::<String>();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })?;

        match envelope.error {
            Some(err) => Err(Error::Rpc {
                method: method.to_owned(),
                code: err.code,
                message: err.msg.unwrap_or_default(),
            }),
            None => Ok(envelope.result),
        }
    }
}

impl RpcTransport for JabsorbClient {
    fn address(&self) -> &str {
        &self.address
    }

    async fn prime(&self) -> Result<u16, Error> {
        debug!("POST {}", self.prime_url);
        let resp = self
            .http
            .post(self.prime_url.clone())
            .send()
            .await
            .map_err(Error::Transport)?;
        let status = resp.status().as_u16();
        debug!(status, "priming response");
        Ok(status)
    }

    async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value, Error> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        // Parameters may carry the login digest, so only the arity is logged.
        debug!(method, id, arity = params.len(), "JSON-RPC call");

        let body = json!({
            "id": id,
            "method": method,
            "params": params,
        });

        let resp = self
            .http
            .post(self.rpc_url.clone())
            .json(&body)
            .send()
            .await
            .map_err(Error::Transport)?;

        self.parse_response(method, resp).await
    }
}
