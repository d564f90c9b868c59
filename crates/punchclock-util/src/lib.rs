//! Shared utilities for punchclock
//!
//! This crate provides:
//! - ID types (ChatId, SessionId)
//! - Time utilities (work zone, hour formatting)
//! - Error types
//! - Default paths for config and data directories

mod error;
mod ids;
mod paths;
mod time;

pub use error::*;
pub use ids::*;
pub use paths::*;
pub use time::*;
