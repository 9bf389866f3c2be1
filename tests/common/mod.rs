//! Common test utilities for infrahub-client integration tests

#[allow(dead_code)]
pub mod config;

pub use config::*;
