//! Core domain logic for tgscan.
//!
//! This crate is framework-agnostic. Telegram and HTTP live behind ports
//! (traits) implemented in adapter crates.

pub mod config;
pub mod domain;
pub mod errors;
pub mod links;
pub mod logging;
pub mod membership;
pub mod ports;
pub mod security;

pub use errors::{Error, Result};
