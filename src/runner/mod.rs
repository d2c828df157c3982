//! Command execution engine
//!
//! This module holds the execution context, the executor seam, task stacks
//! and the runtime form of loaded commands.

pub mod context;
pub mod executor;
pub mod git;
pub mod interpolate;
pub mod stack;
pub mod task;

// Re-export main types
pub use context::*;
pub use executor::*;
pub use git::*;
pub use interpolate::*;
pub use stack::*;
pub use task::*;
