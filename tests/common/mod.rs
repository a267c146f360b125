//! Shared test utilities for snmp-walker integration tests.

// Allow dead code and unused imports since not all test files use all utilities
#![allow(dead_code)]
#![allow(unused_imports)]

mod agent;
mod fixtures;
mod stream;

pub use agent::*;
pub use fixtures::*;
pub use stream::collect_stream;
