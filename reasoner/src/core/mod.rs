//! Deterministic, pure logic for the reasoning tree.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data structures and return deterministic outputs suitable for tests.

pub mod action;
pub mod error;
pub mod navigator;
pub mod path;
pub mod render;
