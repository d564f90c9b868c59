//! Chat front end for punchclock
//!
//! Provides:
//! - Command parsing (`/clock_in`, `/clock_out`, ...)
//! - The dispatcher mapping commands onto the tracker and scheduler
//! - Reply texts
//! - The chat transport trait, a Bot API client and a mock for tests
//! - The failure webhook

mod commands;
mod dispatcher;
mod mock;
mod notify;
pub mod replies;
mod telegram;
mod transport;

pub use commands::*;
pub use dispatcher::*;
pub use mock::*;
pub use notify::*;
pub use telegram::*;
pub use transport::*;
