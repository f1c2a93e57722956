//! inhibryx-common — Shared types, errors, and configuration used across all Inhibryx crates.

pub mod config;
pub mod error;
pub mod sandbox;

pub use config::AppConfig;
pub use error::{InhibryxError, Result};
