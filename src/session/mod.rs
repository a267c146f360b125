//! SNMP session.
//!
//! A [`Session`] owns one transport to one agent, a community string, a
//! protocol version and a request timeout. Every operation is a single
//! request/response exchange; there are no retries and at most one request is
//! in flight per call.

mod builder;
mod stream;
mod walk;

pub use builder::SessionBuilder;
pub use stream::{ResultStream, result_channel};

use std::any::Any;
use std::net::SocketAddr;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicI32, Ordering};
use std::time::Duration;

use bytes::Bytes;
use tracing::instrument;

use crate::codec::{BerCodec, Codec};
use crate::error::{EncodeErrorKind, Error, ErrorStatus, Result};
use crate::oid::Oid;
use crate::packet::{Packet, PduType};
use crate::transport::{Transport, UdpTransport};
use crate::version::Version;

/// Port appended to targets that do not name one.
pub const DEFAULT_PORT: u16 = 161;

/// Timeout used when none (or a non-positive one) is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Logging switches.
///
/// Both are off by default. Events are emitted through `tracing`; which
/// subscriber receives them is up to the application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogConfig {
    /// Emit an info event per request and response.
    pub verbose: bool,
    /// Emit a debug event per walk step.
    pub debug: bool,
}

/// Session configuration.
///
/// Most users should use [`SessionBuilder`] rather than constructing this directly.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Version placed on the wire (default: V2c)
    pub version: Version,
    /// Community string, sent unmodified (default: "public")
    pub community: Bytes,
    /// Per-request deadline (default: 5 seconds)
    pub timeout: Duration,
    /// Logging switches (default: quiet)
    pub log: LogConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            version: Version::V2c,
            community: Bytes::from_static(b"public"),
            timeout: DEFAULT_TIMEOUT,
            log: LogConfig::default(),
        }
    }
}

/// Map a timeout in whole seconds to a duration; non-positive values select
/// [`DEFAULT_TIMEOUT`].
pub(crate) fn timeout_from_secs(seconds: i64) -> Duration {
    if seconds <= 0 {
        DEFAULT_TIMEOUT
    } else {
        Duration::from_secs(seconds as u64)
    }
}

/// SNMP session to a single agent.
///
/// Generic over transport and codec, with UDP and BER as defaults.
pub struct Session<T: Transport = UdpTransport, C: Codec = BerCodec> {
    transport: T,
    codec: C,
    config: SessionConfig,
    next_request_id: AtomicI32,
}

impl Session<UdpTransport, BerCodec> {
    /// Create a new session builder.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use snmp_walker::{Session, Version};
    /// use std::time::Duration;
    ///
    /// # async fn example() -> snmp_walker::Result<()> {
    /// let session = Session::builder("192.168.1.1")
    ///     .community(b"private")
    ///     .version(Version::V2c)
    ///     .timeout(Duration::from_secs(2))
    ///     .connect()
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn builder(target: impl Into<String>) -> SessionBuilder {
        SessionBuilder::new(target)
    }

    /// Open a UDP session.
    ///
    /// Port 161 is appended when `target` carries none. `timeout_secs` is
    /// clamped like [`set_timeout`](Self::set_timeout) and also bounds
    /// address resolution and socket setup.
    pub async fn connect(
        target: &str,
        community: impl AsRef<[u8]>,
        version: Version,
        timeout_secs: i64,
    ) -> Result<Self> {
        Self::builder(target)
            .community(community.as_ref())
            .version(version)
            .timeout_secs(timeout_secs)
            .connect()
            .await
    }
}

impl<T: Transport, C: Codec> Session<T, C> {
    /// Create a session over an already-open transport.
    pub fn new(transport: T, codec: C, config: SessionConfig) -> Self {
        Self {
            transport,
            codec,
            config,
            next_request_id: AtomicI32::new(1),
        }
    }

    /// The peer address of the agent.
    pub fn peer_addr(&self) -> SocketAddr {
        self.transport.peer_addr()
    }

    /// The session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Configured protocol version.
    pub fn version(&self) -> Version {
        self.config.version
    }

    /// Community string.
    pub fn community(&self) -> &[u8] {
        &self.config.community
    }

    /// Current per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.config.timeout
    }

    /// Set the per-request timeout in seconds.
    ///
    /// Zero or negative values select the 5 second default. Requests already
    /// in flight keep the deadline they started with.
    pub fn set_timeout(&mut self, seconds: i64) {
        self.config.timeout = timeout_from_secs(seconds);
        tracing::debug!(target: "snmp_walker::session", { timeout = ?self.config.timeout }, "timeout updated");
    }

    /// Toggle per-request info events.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.config.log.verbose = verbose;
    }

    /// Toggle per-step walk debug events.
    pub fn set_debug(&mut self, debug: bool) {
        self.config.log.debug = debug;
    }

    /// Transport, for inspection.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn next_request_id(&self) -> i32 {
        // Request ids stay positive; wrap back to 1 instead of going negative.
        self.next_request_id
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |id| {
                Some(if id == i32::MAX { 1 } else { id + 1 })
            })
            .unwrap_or(1)
    }

    fn request(&self, pdu_type: PduType, oids: &[Oid]) -> Packet {
        Packet::request(
            self.config.version,
            self.config.community.clone(),
            pdu_type,
            self.next_request_id(),
            oids,
        )
    }

    /// GET a single OID.
    pub async fn get(&self, oid: &str) -> Result<Packet> {
        let oid = Oid::parse(oid)?;
        self.send_request(self.request(PduType::GetRequest, &[oid]))
            .await
    }

    /// GET several OIDs in one request.
    ///
    /// An empty list is rejected with [`Error::NoOids`] before anything is sent.
    pub async fn get_multi(&self, oids: &[&str]) -> Result<Packet> {
        let oids = parse_oids(oids)?;
        self.send_request(self.request(PduType::GetRequest, &oids))
            .await
    }

    /// GETNEXT a single OID.
    pub async fn get_next(&self, oid: &str) -> Result<Packet> {
        let oid = Oid::parse(oid)?;
        self.get_next_oid(oid).await
    }

    pub(crate) async fn get_next_oid(&self, oid: Oid) -> Result<Packet> {
        self.send_request(self.request(PduType::GetNextRequest, &[oid]))
            .await
    }

    /// GETBULK one or more OIDs.
    ///
    /// The first `non_repeaters` OIDs are fetched once; the rest are
    /// fetched up to `max_repetitions` times each. Not available in SNMPv1.
    pub async fn get_bulk(
        &self,
        non_repeaters: u8,
        max_repetitions: u8,
        oids: &[&str],
    ) -> Result<Packet> {
        let oids = parse_oids(oids)?;
        self.get_bulk_oids(non_repeaters, max_repetitions, &oids)
            .await
    }

    pub(crate) async fn get_bulk_oids(
        &self,
        non_repeaters: u8,
        max_repetitions: u8,
        oids: &[Oid],
    ) -> Result<Packet> {
        let packet = Packet::get_bulk(
            self.config.version,
            self.config.community.clone(),
            self.next_request_id(),
            i32::from(non_repeaters),
            i32::from(max_repetitions),
            oids,
        );
        self.send_request(packet).await
    }

    /// Send a request packet and wait for its response.
    ///
    /// One deadline, the session timeout anchored at call time, bounds both
    /// the write and the read. Datagrams whose request ID differs from the
    /// request's are discarded and reading continues under the same
    /// deadline. Responses with a non-zero error status fail
    /// with [`Error::Snmp`]; responses without variable bindings fail with
    /// [`Error::EmptyResponse`]. Nothing is retried.
    #[instrument(
        level = "debug",
        skip(self, request),
        err,
        fields(
            snmp.target = %self.peer_addr(),
            snmp.pdu_type = %request.pdu_type,
            snmp.request_id = request.request_id,
        )
    )]
    pub async fn send_request(&self, request: Packet) -> Result<Packet> {
        if !request.pdu_type.is_request() {
            return Err(Error::encode(EncodeErrorKind::NotARequest));
        }

        let target = self.peer_addr();
        let request_id = request.request_id;
        let timeout = self.config.timeout;
        let deadline = tokio::time::Instant::now() + timeout;

        let data = fault_boundary(|| self.codec.encode(&request))?;

        if self.config.log.verbose {
            tracing::info!(
                target: "snmp_walker::session",
                { snmp.varbind_count = request.varbinds.len(), snmp.bytes = data.len() },
                "sending {} request", request.pdu_type
            );
        }

        // Replies to earlier, timed-out requests can still be queued on the
        // socket; they are dropped until ours arrives or the deadline passes.
        let exchange = async {
            self.transport.send(&data).await?;
            loop {
                let response_data = self.transport.recv().await?;
                let response = fault_boundary(|| self.codec.decode(response_data))?;
                if response.request_id == request_id {
                    return Ok::<_, Error>(response);
                }
                tracing::debug!(
                    target: "snmp_walker::session",
                    { expected_request_id = request_id, actual_request_id = response.request_id, peer = %target },
                    "discarding response with mismatched request ID"
                );
            }
        };
        let response = match tokio::time::timeout_at(deadline, exchange).await {
            Ok(result) => result?,
            Err(_) => {
                tracing::debug!(target: "snmp_walker::session", { request_id, elapsed = ?timeout }, "request timed out");
                return Err(Error::Timeout {
                    target,
                    elapsed: timeout,
                    request_id,
                });
            }
        };

        if self.config.log.verbose {
            tracing::info!(
                target: "snmp_walker::session",
                {
                    snmp.varbind_count = response.varbinds.len(),
                    snmp.error_status = response.error_status,
                    snmp.error_index = response.error_index,
                },
                "received {} response", response.pdu_type
            );
        }

        if response.is_error() {
            return Err(Error::Snmp {
                target,
                status: response.error_status_enum(),
                index: response.error_index.max(0) as u32,
                oid: response.error_oid().cloned(),
            });
        }

        if response.varbinds.is_empty() {
            return Err(Error::EmptyResponse { target });
        }

        Ok(response)
    }

    /// Decode raw response bytes with this session's codec, without any I/O.
    pub fn decode_packet(&self, data: &[u8]) -> Result<Packet> {
        fault_boundary(|| self.codec.decode(Bytes::copy_from_slice(data)))
    }

    /// Whether `err` marks the end of the tree rather than a failure.
    ///
    /// Agents answer a GETNEXT past the last object with either no bindings
    /// or, in SNMPv1, a `noSuchName` error.
    pub(crate) fn is_end_of_tree(&self, err: &Error) -> bool {
        match err {
            Error::EmptyResponse { .. } => true,
            Error::Snmp { status, .. } => {
                *status == ErrorStatus::NoSuchName && self.config.version == Version::V1
            }
            _ => false,
        }
    }
}

impl<T: Transport + std::fmt::Debug, C: Codec> std::fmt::Debug for Session<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("transport", &self.transport)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn parse_oids(oids: &[&str]) -> Result<Vec<Oid>> {
    if oids.is_empty() {
        return Err(Error::NoOids);
    }
    oids.iter().map(|s| Oid::parse(s)).collect()
}

/// Run a codec call, turning a panic into [`Error::Internal`].
fn fault_boundary<R>(f: impl FnOnce() -> Result<R>) -> Result<R> {
    catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|payload| {
        let message = panic_message(payload.as_ref());
        tracing::warn!(target: "snmp_walker::session", { error = %message }, "codec panicked");
        Err(Error::Internal {
            message: message.into(),
        })
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "codec panicked".to_string()
    }
}
