//! Stable exit codes for reasoner CLI commands.

/// Command succeeded; for `reasoner run`, the decision-maker finished.
pub const OK: i32 = 0;
/// Invalid config, I/O failure, or decision-maker failure.
pub const ERROR: i32 = 1;
/// `reasoner run` used its whole iteration budget without finishing.
pub const EXHAUSTED: i32 = 2;
/// The current node pointer referred to a node that does not exist.
pub const NOT_FOUND: i32 = 3;
/// The decision-maker returned an action that could not be interpreted.
pub const INVALID_ACTION: i32 = 4;
