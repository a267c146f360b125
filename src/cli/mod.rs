//! CLI utilities for snmp-walker.
//!
//! Argument parsing and output formatting shared by the `snmp-walk` and
//! `snmp-get` tools.
//!
//! This module is only available with the `cli` feature.

pub mod args;
pub mod output;
