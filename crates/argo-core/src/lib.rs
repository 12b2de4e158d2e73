// argo-core: Discovery and authenticated sessions for BLOBbox appliances
//
// Finds appliances with an SSDP scan, validates a target (priming servlet
// plus software version gate), logs in through the challenge/digest
// exchange and exposes remote operations on the resulting session.

pub mod config;
pub mod descriptor;
pub mod discovery;
pub mod error;
pub mod media;
pub mod remote;
pub mod session;
pub mod version_gate;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{Credentials, DiscoveryConfig, SessionConfig};
pub use descriptor::{DeviceDescriptor, TARGET_USN_PREFIX};
pub use discovery::{Scanner, scan};
pub use error::{CoreError, ErrorKind};
pub use media::{guess_mime_type, youtube_portal_url};
pub use remote::PlayOutcome;
pub use session::{Session, SessionEstablisher, SessionState};
pub use version_gate::VersionPolicy;

// Wire-level pieces callers commonly need alongside the core types.
pub use argo_api::{DeviceDescription, JabsorbClient, RpcTransport};
