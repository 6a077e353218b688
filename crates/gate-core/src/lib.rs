//! Core types, configuration, and utilities for the voicegate workspace.

mod config;
mod error;
mod logging;
mod paths;

pub use config::{Config, DEFAULT_LOG_LEVEL, DEFAULT_TOKEN_ENDPOINT};
pub use error::{CoreError, CoreResult};
pub use logging::init_logging;
pub use paths::Paths;
