//! Mock transport for testing.
//!
//! Provides a programmable transport that can simulate agent replies, lost
//! datagrams and socket errors without a network.

use super::Transport;
use crate::codec::{BerCodec, Codec};
use crate::error::{Error, ErrorStatus, Result};
use crate::oid::Oid;
use crate::packet::Packet;
use crate::value::Value;
use crate::varbind::VarBind;
use crate::version::Version;
use bytes::Bytes;
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A mock response to return for a request.
#[derive(Clone, Debug)]
pub enum MockResponse {
    /// Return this data as the response.
    Data(Bytes),
    /// Never answer; the session deadline decides when to give up.
    Timeout,
    /// Fail the receive with an IO error.
    IoError(String),
}

/// A request sent through the mock transport.
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    /// The raw request data
    pub data: Bytes,
    /// The request, if it decodes as a community message
    pub packet: Option<Packet>,
    /// Clock reading when the request was sent
    pub sent_at: tokio::time::Instant,
}

struct MockTransportInner {
    target: SocketAddr,
    responses: VecDeque<MockResponse>,
    requests: Vec<RecordedRequest>,
    send_error: Option<String>,
}

/// Mock transport for testing sessions and walks.
///
/// Clones share state, so a test can keep one handle for inspection after
/// handing another to a session. An empty queue behaves like
/// [`MockResponse::Timeout`].
///
/// # Example
///
/// ```rust
/// use snmp_walker::transport::{MockTransport, ResponseBuilder};
/// use snmp_walker::{Value, oid};
///
/// let mock = MockTransport::new("127.0.0.1:161".parse().unwrap());
/// mock.queue_response(
///     ResponseBuilder::new(1)
///         .varbind(oid!(1, 3, 6, 1, 2, 1, 1, 5, 0), Value::from("core-sw"))
///         .build_v2c(b"public"),
/// );
/// mock.queue_timeout();
/// ```
#[derive(Clone)]
pub struct MockTransport {
    inner: Arc<Mutex<MockTransportInner>>,
}

impl MockTransport {
    /// Create a new mock transport.
    pub fn new(target: SocketAddr) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockTransportInner {
                target,
                responses: VecDeque::new(),
                requests: Vec::new(),
                send_error: None,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MockTransportInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue a data response.
    pub fn queue_response(&self, data: impl Into<Bytes>) {
        self.lock().responses.push_back(MockResponse::Data(data.into()));
    }

    /// Queue a lost reply.
    pub fn queue_timeout(&self) {
        self.lock().responses.push_back(MockResponse::Timeout);
    }

    /// Queue an IO error on receive.
    pub fn queue_io_error(&self, msg: impl Into<String>) {
        self.lock().responses.push_back(MockResponse::IoError(msg.into()));
    }

    /// Make every subsequent send fail.
    pub fn fail_sends(&self, msg: impl Into<String>) {
        self.lock().send_error = Some(msg.into());
    }

    /// Get all recorded requests.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock().requests.clone()
    }

    /// Decoded requests, in send order.
    pub fn sent_packets(&self) -> Vec<Packet> {
        self.lock()
            .requests
            .iter()
            .filter_map(|r| r.packet.clone())
            .collect()
    }

    /// Number of requests sent so far.
    pub fn request_count(&self) -> usize {
        self.lock().requests.len()
    }

    /// Get the number of queued responses remaining.
    pub fn queued_response_count(&self) -> usize {
        self.lock().responses.len()
    }
}

impl Transport for MockTransport {
    async fn send(&self, data: &[u8]) -> Result<()> {
        let data = Bytes::copy_from_slice(data);
        let packet = BerCodec.decode(data.clone()).ok();

        let mut inner = self.lock();
        if let Some(msg) = inner.send_error.clone() {
            return Err(Error::Write {
                target: inner.target,
                source: std::io::Error::other(msg),
            });
        }
        inner.requests.push(RecordedRequest {
            data,
            packet,
            sent_at: tokio::time::Instant::now(),
        });
        Ok(())
    }

    async fn recv(&self) -> Result<Bytes> {
        let (response, target) = {
            let mut inner = self.lock();
            (inner.responses.pop_front(), inner.target)
        };

        match response {
            Some(MockResponse::Data(data)) => Ok(data),
            Some(MockResponse::IoError(msg)) => Err(Error::Read {
                target,
                source: std::io::Error::other(msg),
            }),
            Some(MockResponse::Timeout) | None => std::future::pending().await,
        }
    }

    fn peer_addr(&self) -> SocketAddr {
        self.lock().target
    }

    fn local_addr(&self) -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], 0))
    }
}

/// Builder for encoded response messages.
pub struct ResponseBuilder {
    request_id: i32,
    varbinds: Vec<VarBind>,
    error_status: ErrorStatus,
    error_index: i32,
}

impl ResponseBuilder {
    /// Create a new response builder with the given request ID.
    pub fn new(request_id: i32) -> Self {
        Self {
            request_id,
            varbinds: Vec::new(),
            error_status: ErrorStatus::NoError,
            error_index: 0,
        }
    }

    /// Add a varbind to the response.
    pub fn varbind(mut self, oid: Oid, value: Value) -> Self {
        self.varbinds.push(VarBind::new(oid, value));
        self
    }

    /// Set the error status.
    pub fn error_status(mut self, status: ErrorStatus) -> Self {
        self.error_status = status;
        self
    }

    /// Set the error index.
    pub fn error_index(mut self, index: i32) -> Self {
        self.error_index = index;
        self
    }

    /// Build a v2c response message.
    pub fn build_v2c(self, community: &[u8]) -> Bytes {
        self.build(Version::V2c, community)
    }

    /// Build a v1 response message.
    pub fn build_v1(self, community: &[u8]) -> Bytes {
        self.build(Version::V1, community)
    }

    fn build(self, version: Version, community: &[u8]) -> Bytes {
        let packet = Packet::response(
            version,
            Bytes::copy_from_slice(community),
            self.request_id,
            self.varbinds,
        )
        .with_error(self.error_status, self.error_index);
        // Only fails for unencodable OIDs, which test fixtures never use
        BerCodec.encode(&packet).unwrap_or_default()
    }
}
