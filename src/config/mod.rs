//! Command class parsing and validation
//!
//! This module handles the YAML documents that define a project's commands,
//! whether they come from a robofile or from a shebang script.

pub mod parse;
pub mod schema;
pub mod types;

// Re-export main types
pub use parse::*;
pub use schema::*;
pub use types::*;
