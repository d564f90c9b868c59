//! Core session tracking for punchclock
//!
//! This crate contains:
//! - The session tracker (NoOpenSession -> ClockIn -> OpenSession -> ClockOut)
//! - Time budget accumulation against the daily quota
//! - The single-slot-per-chat reminder scheduler

mod scheduler;
mod tracker;

pub use scheduler::*;
pub use tracker::*;
