//! CLI module for the skill tracker.
//!
//! Defines command-line argument parsing and the handlers that drive the store.

pub mod args;
pub mod commands;

pub use args::{Cli, Command};
pub use commands::run;
