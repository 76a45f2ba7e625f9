//! CLI module for pdfmind.
//!
//! Provides command-line interface parsing and command dispatch.

pub mod args;
pub mod commands;

pub use args::{ChunkArgs, Cli, Commands, ProcessArgs, StatsArgs};
