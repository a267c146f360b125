// Allow large error types - the Error enum includes OIDs inline for debugging convenience.
#![allow(clippy::result_large_err)]

//! # snmp-walker
//!
//! Async SNMPv1/v2c client built around subtree walks.
//!
//! ## Features
//!
//! - GET, GETNEXT and GETBULK over UDP on Tokio
//! - Sequential (GETNEXT) and batched (GETBULK) walks, collected or streamed
//! - Zero-copy BER encoding/decoding behind a pluggable [`Codec`]
//! - One deadline per request, no hidden retries
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use snmp_walker::{Session, Version};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), snmp_walker::Error> {
//!     let session = Session::connect("192.168.1.1", "public", Version::V2c, 5).await?;
//!
//!     let response = session.get("1.3.6.1.2.1.1.1.0").await?;
//!     println!("sysDescr: {}", response.varbinds[0].value);
//!
//!     for vb in session.bulk_walk(25, "1.3.6.1.2.1.2.2").await? {
//!         println!("{}", vb);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Streaming
//!
//! ```rust,no_run
//! # async fn example(session: snmp_walker::Session) -> snmp_walker::Result<()> {
//! let (tx, mut stream) = snmp_walker::result_channel(64);
//! let consumer = async {
//!     while let Some(vb) = stream.next().await {
//!         println!("{}", vb);
//!     }
//! };
//! let (result, ()) = tokio::join!(session.stream_bulk_walk(25, "1.3.6.1.2.1.2.2", tx), consumer);
//! result?;
//! # Ok(())
//! # }
//! ```

pub mod ber;
pub mod codec;
pub mod error;
pub mod oid;
pub mod packet;
pub mod prelude;
pub mod session;
pub mod transport;
pub mod value;
pub mod varbind;
pub mod version;

pub(crate) mod util;

#[cfg(feature = "cli")]
pub mod cli;

// Re-exports for convenience
pub use codec::{BerCodec, Codec};
pub use error::{DecodeErrorKind, EncodeErrorKind, Error, ErrorStatus, OidErrorKind, Result};
pub use oid::Oid;
pub use packet::{Packet, PduType};
pub use session::{
    DEFAULT_PORT, DEFAULT_TIMEOUT, LogConfig, ResultStream, Session, SessionBuilder,
    SessionConfig, result_channel,
};
pub use transport::{MAX_RESPONSE_SIZE, Transport, UdpTransport};
pub use value::Value;
pub use varbind::VarBind;
pub use version::Version;

/// Type alias for a session using a dedicated UDP socket.
pub type UdpSession = Session<UdpTransport>;
