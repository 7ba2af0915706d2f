//! LAN discovery responder
//!
//! A connectionless UDP loop on a well-known port. Datagrams that exactly
//! match the probe literal get a unicast JSON reply with the service port
//! and the configured token; everything else is ignored silently, which
//! filters noise on a shared broadcast port. Delivery is best effort (no
//! retries) and the trust boundary is the LAN: there is no authentication.

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};
use tokio::net::UdpSocket;

/// Well-known discovery port
pub const DISCOVERY_PORT: u16 = 9999;

/// Probe literal a client must broadcast to get a reply
pub const DISCOVERY_PROBE: &str = "PC_REMOTE_DISCOVERY";

/// Reply payload sent to a matching probe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryReply {
    /// HTTP service port
    pub port: u16,
    /// Currently configured access token
    pub token: String,
}

/// Long-lived UDP responder for discovery probes
pub struct DiscoveryResponder {
    socket: UdpSocket,
    reply: Vec<u8>,
}

impl DiscoveryResponder {
    /// Bind the responder and prepare its reply payload
    pub async fn bind(
        addr: SocketAddr,
        service_port: u16,
        token: String,
    ) -> std::io::Result<Self> {
        let socket = UdpSocket::bind(addr).await?;
        socket.set_broadcast(true)?;

        let reply = serde_json::to_vec(&DiscoveryReply {
            port: service_port,
            token,
        })
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        tracing::info!(addr = %socket.local_addr()?, "Discovery listener started");
        Ok(Self { socket, reply })
    }

    /// Address the responder is bound to
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Spawn the receive loop; runs for the process lifetime
    pub fn spawn(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Receive loop
    ///
    /// Never terminates on its own: malformed datagrams and transient socket
    /// errors are logged and skipped, not propagated.
    pub async fn run(self) {
        let mut buf = [0u8; 1024];
        loop {
            let (len, peer) = match self.socket.recv_from(&mut buf).await {
                Ok(received) => received,
                Err(e) => {
                    tracing::warn!(error = %e, "Discovery receive failed");
                    continue;
                }
            };

            let message = String::from_utf8_lossy(&buf[..len]);
            if message.trim() != DISCOVERY_PROBE {
                continue;
            }

            match self.socket.send_to(&self.reply, peer).await {
                Ok(_) => tracing::debug!(peer = %peer, "Discovery reply sent"),
                Err(e) => tracing::warn!(peer = %peer, error = %e, "Discovery reply failed"),
            }
        }
    }
}
