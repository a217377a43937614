//! I/O helpers: configuration, session artifacts, and the decision-maker boundary.

pub mod action_log;
pub mod config;
pub mod decision;
pub mod process;
pub mod prompt;
pub mod session;
pub mod snapshot;
