//! Core functionality shared across the ztworld workspace.
//!
//! This crate provides the configuration model, logging initialisation and
//! the core error type used by the World generator and its command-line
//! entry point.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{LoggingConfig, OutputConfig, WorldgenConfig};
pub use error::{CoreError, CoreResult};
