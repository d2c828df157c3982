//! CLI interface and argument parsing
//!
//! This module builds the clap command from a loaded command class and
//! dispatches to the selected command.

pub mod app;
pub mod init;

// Re-export main types
pub use app::*;
