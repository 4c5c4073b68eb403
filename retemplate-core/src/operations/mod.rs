//! High-level operations that correspond to CLI commands
//!
//! These modules contain the core business logic for each retemplate operation,
//! separated from CLI concerns like argument parsing and output formatting.

pub mod check;
pub mod rename;

// Re-export the main operation functions for easy access
pub use check::check_operation;
pub use rename::{rename_operation, run_rename};
