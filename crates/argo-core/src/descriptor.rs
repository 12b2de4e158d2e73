// ── Discovered device ──
//
// Header fields of one discovery reply, plus the device description
// document behind its LOCATION URL. The document is fetched lazily, at most
// once per descriptor; concurrent first requests wait on the same fetch and
// a failed fetch leaves the slot empty for the next caller to retry.

use std::collections::BTreeMap;
use std::fmt;

use tokio::sync::OnceCell;
use tracing::debug;
use url::Url;

use argo_api::ssdp::{LOCATION_HEADER, USN_HEADER, parse_headers};
use argo_api::{DeviceDescription, TransportConfig, fetch_description};

use crate::error::CoreError;

/// USN prefix identifying a BLOBbox.
pub const TARGET_USN_PREFIX: &str = "uuid:blobbox-";

/// One device that answered a discovery probe.
#[derive(Debug, Clone)]
pub struct DeviceDescriptor {
    fields: BTreeMap<String, String>,
    transport: TransportConfig,
    /// `Some(None)` once we know there is no usable LOCATION.
    description: OnceCell<Option<DeviceDescription>>,
}

impl DeviceDescriptor {
    /// Parse a raw discovery reply, fetching descriptions with default
    /// transport settings.
    pub fn parse(reply: &str) -> Self {
        Self::with_transport(reply, TransportConfig::default())
    }

    /// Parse a raw discovery reply; `transport` is used if the description
    /// document is ever fetched.
    pub fn with_transport(reply: &str, transport: TransportConfig) -> Self {
        Self {
            fields: parse_headers(reply),
            transport,
            description: OnceCell::new(),
        }
    }

    /// Value of a header field, by exact (case-sensitive) name.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// All header fields, ordered by name.
    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    /// Unique service name.
    pub fn usn(&self) -> Option<&str> {
        self.field(USN_HEADER)
    }

    /// Whether this reply came from a BLOBbox. Never performs I/O.
    pub fn is_target_device(&self) -> bool {
        self.usn()
            .is_some_and(|usn| usn.starts_with(TARGET_USN_PREFIX))
    }

    /// URL of the description document.
    pub fn location_url(&self) -> Option<&str> {
        self.field(LOCATION_HEADER)
    }

    /// Host part of the LOCATION URL; `None` if missing or malformed.
    pub fn host(&self) -> Option<String> {
        let url = Url::parse(self.location_url()?).ok()?;
        url.host_str().map(str::to_owned)
    }

    /// The parsed description document, fetching it on first use.
    ///
    /// `Ok(None)` when there is no usable LOCATION URL.
    pub async fn description(&self) -> Result<Option<&DeviceDescription>, CoreError> {
        let cached = self
            .description
            .get_or_try_init(|| self.fetch_description())
            .await?;
        Ok(cached.as_ref())
    }

    /// The `friendlyName` of the first device in the description document.
    pub async fn friendly_name(&self) -> Result<Option<String>, CoreError> {
        Ok(self
            .description()
            .await?
            .and_then(|d| d.friendly_name.clone()))
    }

    async fn fetch_description(&self) -> Result<Option<DeviceDescription>, CoreError> {
        let Some(location) = self.location_url() else {
            debug!(usn = ?self.usn(), "no LOCATION, skipping description fetch");
            return Ok(None);
        };
        let Ok(url) = Url::parse(location) else {
            debug!(location, "malformed LOCATION, skipping description fetch");
            return Ok(None);
        };

        let fetch_error = |source| CoreError::DescriptionFetch {
            location: location.to_owned(),
            source,
        };
        let http = self.transport.build_client().map_err(fetch_error)?;
        let description = fetch_description(&http, &url).await.map_err(fetch_error)?;
        Ok(Some(description))
    }
}

impl fmt::Display for DeviceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_target_device() {
            write!(
                f,
                "BLOBbox on {} ({})",
                self.host().as_deref().unwrap_or("<unknown host>"),
                self.usn().unwrap_or_default()
            )
        } else {
            write!(f, "{:?}", self.fields)
        }
    }
}
