//! Prelude module for convenient imports.
//!
//! # Usage
//!
//! ```rust,no_run
//! use snmp_walker::prelude::*;
//! ```
//!
//! This imports:
//! - Core types: [`Session`], [`Oid`], [`Value`], [`VarBind`], [`Packet`]
//! - Error handling: [`Error`], [`Result`]
//! - Streaming delivery: [`ResultStream`], [`result_channel`]
//! - The [`oid!`] macro for compile-time OID construction

pub use crate::error::{Error, Result};
pub use crate::oid::Oid;
pub use crate::packet::Packet;
pub use crate::session::{ResultStream, Session, result_channel};
pub use crate::value::Value;
pub use crate::varbind::VarBind;
pub use crate::version::Version;

#[doc(no_inline)]
pub use crate::oid;
