//! Shared helpers for the integration tests.
#![allow(dead_code)]

pub mod fixtures;
#[cfg(feature = "server")]
pub mod http;
