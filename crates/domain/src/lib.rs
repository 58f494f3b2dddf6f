//! Shared building blocks for every DomBridge crate: the error type,
//! configuration and structured trace events.

pub mod config;
pub mod error;
pub mod trace;

pub use error::{Error, Result};
