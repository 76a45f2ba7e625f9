//! Command implementations for the CLI.
//!
//! Each command is implemented in its own module.

pub mod chunk;
pub mod init;
pub mod process;
pub mod stats;
