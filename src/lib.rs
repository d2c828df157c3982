//! Robo - a task runner driven by a project robofile
//!
//! Robo works out how it was launched (directly, or through a shebang script
//! that may embed its own command class), loads the project's command class
//! and runs the requested command. Commands are shell steps and task stacks
//! such as [`runner::GitStack`].

// Public modules
pub mod bootstrap;
pub mod cli;
pub mod config;
pub mod error;
pub mod runner;
pub mod ui;

// Re-export commonly used types
pub use error::{Result, RoboError};

/// Current version of Robo
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
