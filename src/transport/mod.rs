//! Transport layer abstraction.
//!
//! A transport moves opaque datagrams to and from one agent. Time limits are
//! not its concern: the session bounds each send/receive pair with a single
//! deadline.

mod udp;

#[cfg(any(test, feature = "testing"))]
mod mock;

pub use udp::*;

#[cfg(any(test, feature = "testing"))]
pub use mock::*;

use crate::error::Result;
use bytes::Bytes;
use std::future::Future;
use std::net::SocketAddr;

/// Largest response accepted from an agent, in bytes.
///
/// Datagrams larger than this are truncated by the socket and will fail to
/// decode.
pub const MAX_RESPONSE_SIZE: usize = 8192;

/// Client-side transport to a single agent.
///
/// Send failures are reported as [`Error::Write`](crate::Error::Write),
/// receive failures as [`Error::Read`](crate::Error::Read).
pub trait Transport: Send + Sync {
    /// Send one request datagram.
    fn send(&self, data: &[u8]) -> impl Future<Output = Result<()>> + Send;

    /// Wait for the next response datagram.
    ///
    /// May wait forever; callers are expected to bound it.
    fn recv(&self) -> impl Future<Output = Result<Bytes>> + Send;

    /// The peer address for this transport.
    fn peer_addr(&self) -> SocketAddr;

    /// Local bind address.
    fn local_addr(&self) -> SocketAddr;
}
