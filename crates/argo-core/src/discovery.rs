// ── SSDP discovery ──
//
// One scan sends a single M-SEARCH probe and then collects replies until no
// datagram arrives within the receive window. Each fresh reply restarts the
// window, so a chatty network extends the scan.

use std::collections::HashSet;

use tokio::net::UdpSocket;
use tokio::time::timeout;
use tracing::{debug, info, trace, warn};

use argo_api::TransportConfig;
use argo_api::ssdp::search_message;

use crate::config::DiscoveryConfig;
use crate::descriptor::DeviceDescriptor;
use crate::error::CoreError;

/// Size of the receive buffer, allocated fresh for every datagram.
const REPLY_BUFFER_SIZE: usize = 2048;

/// Discovers BLOBbox appliances on the local network.
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    config: DiscoveryConfig,
}

impl Scanner {
    pub fn new(config: DiscoveryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    /// Run one scan and return the appliances that answered.
    ///
    /// Replies from other devices are dropped, as are repeated replies with
    /// a USN already seen. An empty list is a normal outcome. Any socket
    /// error other than the end-of-window timeout aborts the scan and
    /// discards what was collected so far.
    pub async fn scan(&self) -> Result<Vec<DeviceDescriptor>, CoreError> {
        let socket = UdpSocket::bind(self.config.bind_addr).await?;
        let probe = search_message(
            self.config.target_addr,
            &self.config.search_target,
            self.config.mx_secs(),
        );
        debug!(
            target = %self.config.target_addr,
            local = ?socket.local_addr().ok(),
            "sending discovery probe"
        );
        socket
            .send_to(probe.as_bytes(), self.config.target_addr)
            .await?;

        let transport = TransportConfig::with_timeout(self.config.http_timeout);
        let mut seen = HashSet::new();
        let mut devices = Vec::new();

        loop {
            let mut buf = vec![0u8; REPLY_BUFFER_SIZE];
            let received = timeout(self.config.timeout, socket.recv_from(&mut buf)).await;
            let (len, from) = match received {
                Err(_elapsed) => break,
                Ok(Err(e)) => {
                    warn!(error = %e, "discovery receive failed");
                    return Err(CoreError::DiscoveryIo(e));
                }
                Ok(Ok(datagram)) => datagram,
            };

            let reply = String::from_utf8_lossy(&buf[..len]);
            trace!(%from, len, "discovery reply");

            let device = DeviceDescriptor::with_transport(&reply, transport.clone());
            if !device.is_target_device() {
                continue;
            }
            let Some(usn) = device.usn() else { continue };
            if !seen.insert(usn.to_owned()) {
                trace!(usn, "duplicate reply");
                continue;
            }
            debug!(%from, %device, "found appliance");
            devices.push(device);
        }

        info!(count = devices.len(), "discovery finished");
        Ok(devices)
    }
}

/// Run one scan with default settings.
pub async fn scan() -> Result<Vec<DeviceDescriptor>, CoreError> {
    Scanner::default().scan().await
}
