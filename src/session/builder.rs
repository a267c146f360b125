//! Session builder.
//!
//! # Example
//!
//! ```rust,no_run
//! # use snmp_walker::Session;
//! # use std::time::Duration;
//! # async fn example() -> snmp_walker::Result<()> {
//! let session = Session::builder("192.168.1.1:161")
//!     .community(b"public")
//!     .timeout(Duration::from_secs(5))
//!     .verbose(true)
//!     .connect()
//!     .await?;
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use bytes::Bytes;

use crate::codec::{BerCodec, Codec};
use crate::error::Result;
use crate::transport::{Transport, UdpTransport};
use crate::util::with_default_port;
use crate::version::Version;

use super::{DEFAULT_PORT, DEFAULT_TIMEOUT, Session, SessionConfig, timeout_from_secs};

/// Builder for [`Session`].
///
/// Created via [`Session::builder()`].
#[derive(Debug, Clone)]
pub struct SessionBuilder {
    target: String,
    config: SessionConfig,
}

impl SessionBuilder {
    pub(crate) fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            config: SessionConfig::default(),
        }
    }

    /// Set the community string.
    pub fn community(mut self, community: &[u8]) -> Self {
        self.config.community = Bytes::copy_from_slice(community);
        self
    }

    /// Set the protocol version.
    pub fn version(mut self, version: Version) -> Self {
        self.config.version = version;
        self
    }

    /// Set the request timeout. A zero duration selects the default.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = if timeout.is_zero() {
            DEFAULT_TIMEOUT
        } else {
            timeout
        };
        self
    }

    /// Set the request timeout in whole seconds, clamping non-positive values
    /// to the default.
    pub fn timeout_secs(mut self, seconds: i64) -> Self {
        self.config.timeout = timeout_from_secs(seconds);
        self
    }

    /// Emit an info event per request and response.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.config.log.verbose = verbose;
        self
    }

    /// Emit a debug event per walk step.
    pub fn debug(mut self, debug: bool) -> Self {
        self.config.log.debug = debug;
        self
    }

    /// Target with the default port applied.
    pub fn target(&self) -> String {
        with_default_port(&self.target, DEFAULT_PORT)
    }

    /// Resolve the target and open a UDP session.
    ///
    /// Resolution and socket setup are bounded by the configured timeout.
    pub async fn connect(self) -> Result<Session<UdpTransport>> {
        let target = self.target();
        tracing::debug!(target: "snmp_walker::session", { snmp.target = %target, version = %self.config.version }, "opening session");
        let transport = UdpTransport::connect_timeout(&target, self.config.timeout).await?;
        Ok(self.build(transport))
    }

    /// Build a session over a pre-supplied transport.
    pub fn build<T: Transport>(self, transport: T) -> Session<T> {
        self.build_with_codec(transport, BerCodec)
    }

    /// Build a session over a pre-supplied transport and codec.
    pub fn build_with_codec<T: Transport, C: Codec>(self, transport: T, codec: C) -> Session<T, C> {
        Session::new(transport, codec, self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::LogConfig;

    #[test]
    fn test_defaults() {
        let builder = SessionBuilder::new("10.0.0.1");
        assert_eq!(builder.target(), "10.0.0.1:161");
        assert_eq!(builder.config.version, Version::V2c);
        assert_eq!(&builder.config.community[..], b"public");
        assert_eq!(builder.config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(builder.config.log, LogConfig::default());
    }

    #[test]
    fn test_timeout_clamping() {
        assert_eq!(
            SessionBuilder::new("h").timeout_secs(-1).config.timeout,
            DEFAULT_TIMEOUT
        );
        assert_eq!(
            SessionBuilder::new("h").timeout(Duration::ZERO).config.timeout,
            DEFAULT_TIMEOUT
        );
        assert_eq!(
            SessionBuilder::new("h").timeout_secs(2).config.timeout,
            Duration::from_secs(2)
        );
    }

    #[test]
    fn test_explicit_port_kept() {
        assert_eq!(SessionBuilder::new("router.lan:1161").target(), "router.lan:1161");
    }

    #[tokio::test]
    async fn test_connect_udp() {
        let session = SessionBuilder::new("127.0.0.1:16161")
            .community(b"private")
            .version(Version::V1)
            .verbose(true)
            .connect()
            .await
            .unwrap();
        assert_eq!(session.peer_addr(), "127.0.0.1:16161".parse().unwrap());
        assert_eq!(session.community(), b"private");
        assert_eq!(session.version(), Version::V1);
        assert!(session.config().log.verbose);
    }
}
