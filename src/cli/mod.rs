//! CLI module for solrbuddy
//!
//! Handles command-line argument parsing and command execution.

pub mod args;
pub mod commands;

pub use args::{Args, Commands, PagingArgs, Verbosity};
pub use commands::run;
