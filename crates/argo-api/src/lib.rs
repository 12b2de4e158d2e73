// argo-api: Async Rust client for the Argo JSON-RPC control interface
//
// Wire-level pieces only: HTTP transport, Jabsorb JSON-RPC framing, SSDP
// probe/reply text, UPnP description documents, the login digest and
// version-string arithmetic. Session semantics live in `argo-core`.

pub mod description;
pub mod digest;
pub mod error;
pub mod jsonrpc;
pub mod ssdp;
pub mod transport;
pub mod version;

pub use description::{DeviceDescription, fetch_description};
pub use digest::{digest_hex, login_digest};
pub use error::Error;
pub use jsonrpc::{JabsorbClient, RpcTransport};
pub use transport::TransportConfig;
