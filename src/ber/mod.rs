//! BER (Basic Encoding Rules) primitives for SNMP.
//!
//! Encoding and decoding follow X.690 with permissive parsing aligned with
//! net-snmp behavior. Message framing lives in [`crate::codec`].

mod decode;
mod encode;
mod length;
pub mod tag;

pub use decode::*;
pub use encode::*;
pub use length::*;
