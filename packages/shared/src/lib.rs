//! Shared utilities for Hikyaku.
//!
//! Logging setup and time helpers used by the relay server binary and its tests.

pub mod logger;
pub mod time;
