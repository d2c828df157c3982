//! Invocation resolution and extension loading
//!
//! This module works out how the tool was launched, finds the command class
//! for the project, and hands the result to the CLI application.

pub mod loader;
pub mod resolve;
pub mod runner;
pub mod shebang;

// Re-export main types
pub use loader::*;
pub use resolve::*;
pub use runner::*;
pub use shebang::ShebangScript;

/// Name looked for in shebang lines
pub const TOOL_NAME: &str = "robo";

/// Command class expected when nothing overrides it
pub const DEFAULT_CLASS: &str = "RoboFile";

/// Extension file expected when nothing overrides it
pub const DEFAULT_FILE: &str = "robofile.yml";

/// Line that opens embedded class source in a shebang script
pub const SOURCE_MARKER: &str = "---";
