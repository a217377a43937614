//! Tree-structured reasoning loop.
//!
//! An external decision-maker repeatedly looks at a partially-redacted view of
//! a reasoning tree and chooses to extend the current line of reasoning, jump
//! to an earlier node, or finish. The architecture enforces a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (the tree, the navigator state
//!   machine, rendering, action interpretation). No I/O.
//! - **[`io`]**: Side-effecting operations (config, session artifacts, prompt
//!   rendering, spawning the decision-maker).
//!
//! Orchestration modules ([`step`], [`looping`]) coordinate core logic with I/O
//! to implement the `reasoner run` command.

pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod looping;
pub mod step;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod tree;
