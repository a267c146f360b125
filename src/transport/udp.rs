//! UDP transport implementation.

use super::{MAX_RESPONSE_SIZE, Transport};
use crate::error::{Error, Result};
use crate::util::bind_ephemeral_udp_socket;
use bytes::Bytes;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::UdpSocket;

/// UDP transport for a single target.
///
/// Owns an ephemeral UDP socket connected to the target, so datagrams from
/// any other source are dropped by the kernel.
#[derive(Debug)]
pub struct UdpTransport {
    socket: UdpSocket,
    target: SocketAddr,
    local_addr: SocketAddr,
}

impl UdpTransport {
    /// Connect to a resolved target address.
    pub async fn connect(target: SocketAddr) -> Result<Self> {
        tracing::debug!(target: "snmp_walker::transport", { snmp.target = %target }, "connecting UDP transport");

        let connection_error = |source: io::Error| Error::Connection {
            target: target.to_string().into_boxed_str(),
            source,
        };

        let socket = bind_ephemeral_udp_socket(target).map_err(connection_error)?;
        socket.connect(target).await.map_err(connection_error)?;
        let local_addr = socket.local_addr().map_err(connection_error)?;

        tracing::debug!(
            target: "snmp_walker::transport",
            { snmp.target = %target, snmp.local_addr = %local_addr },
            "UDP transport connected"
        );

        Ok(Self {
            socket,
            target,
            local_addr,
        })
    }

    /// Resolve `target` (`host:port`) and connect, all within `connect_timeout`.
    ///
    /// The first resolved address is used.
    pub async fn connect_timeout(target: &str, connect_timeout: Duration) -> Result<Self> {
        let connection_error = |source: io::Error| Error::Connection {
            target: target.into(),
            source,
        };

        let attempt = async {
            let addr = tokio::net::lookup_host(target)
                .await
                .map_err(connection_error)?
                .next()
                .ok_or_else(|| {
                    connection_error(io::Error::new(
                        io::ErrorKind::NotFound,
                        "no addresses resolved",
                    ))
                })?;
            Self::connect(addr).await
        };

        match tokio::time::timeout(connect_timeout, attempt).await {
            Ok(result) => result,
            Err(_) => Err(connection_error(io::Error::new(
                io::ErrorKind::TimedOut,
                format!("connect timed out after {:?}", connect_timeout),
            ))),
        }
    }
}

impl Transport for UdpTransport {
    async fn send(&self, data: &[u8]) -> Result<()> {
        tracing::trace!(
            target: "snmp_walker::transport",
            { snmp.target = %self.target, snmp.bytes = data.len() },
            "UDP send"
        );
        self.socket
            .send(data)
            .await
            .map_err(|source| Error::Write {
                target: self.target,
                source,
            })?;
        Ok(())
    }

    async fn recv(&self) -> Result<Bytes> {
        let mut buf = vec![0u8; MAX_RESPONSE_SIZE];

        match self.socket.recv(&mut buf).await {
            Ok(len) => {
                buf.truncate(len);
                tracing::trace!(
                    target: "snmp_walker::transport",
                    { snmp.target = %self.target, snmp.bytes = len },
                    "UDP recv complete"
                );
                Ok(Bytes::from(buf))
            }
            Err(source) => {
                tracing::trace!(
                    target: "snmp_walker::transport",
                    { snmp.target = %self.target, error = %source },
                    "UDP recv error"
                );
                Err(Error::Read {
                    target: self.target,
                    source,
                })
            }
        }
    }

    fn peer_addr(&self) -> SocketAddr {
        self.target
    }

    fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_udp_exchange_with_local_peer() {
        let peer = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let peer_addr = peer.local_addr().unwrap();

        let transport = UdpTransport::connect(peer_addr).await.unwrap();
        assert_eq!(transport.peer_addr(), peer_addr);

        transport.send(b"ping").await.unwrap();
        let mut buf = [0u8; 16];
        let (len, from) = peer.recv_from(&mut buf).await.unwrap();
        assert_eq!(&buf[..len], b"ping");
        assert_eq!(from, transport.local_addr());

        peer.send_to(b"pong", from).await.unwrap();
        assert_eq!(&transport.recv().await.unwrap()[..], b"pong");
    }

    #[tokio::test]
    async fn test_connect_timeout_resolves_literal() {
        let transport = UdpTransport::connect_timeout("127.0.0.1:16100", Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(transport.peer_addr(), "127.0.0.1:16100".parse().unwrap());
    }

    #[tokio::test]
    async fn test_connect_unresolvable_is_connection_error() {
        let err = UdpTransport::connect_timeout("no-such-host.invalid:161", Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Connection { .. }));
    }
}
