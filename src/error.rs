//! Error types for Robo

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for Robo operations
pub type Result<T> = std::result::Result<T, RoboError>;

/// Main error type for Robo
#[derive(Error, Debug)]
pub enum RoboError {
    /// Command class document errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Extension loading errors
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    /// Task execution errors
    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),

    /// Variable interpolation errors
    #[error("Interpolation error: {0}")]
    Interpolation(#[from] InterpolationError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// YAML parsing errors
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Errors raised while locating and materializing a command class
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Path in `{}` is invalid, please provide valid absolute path to load the robofile", .0.display())]
    InvalidPath(PathBuf),

    #[error("Extension file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Class {class} was not loaded from {}", path.display())]
    ClassMissing { class: String, path: PathBuf },

    #[error("Failed to parse inline class in shebang script '{}': {error}", path.display())]
    ShebangParseFailure { path: PathBuf, error: String },

    #[error("Failed to parse extension file '{}': {error}", path.display())]
    InvalidFile { path: PathBuf, error: String },
}

impl LoadError {
    /// Whether the caller may fall back to the uninitialized (init-only) surface
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            LoadError::InvalidPath(_) | LoadError::NotFound(_) | LoadError::ClassMissing { .. }
        )
    }

    /// Directory the load got as far as, when it exists
    ///
    /// `init` writes the starter file here so that `--load-from <dir> init`
    /// initializes `<dir>` rather than the invocation directory.
    pub fn load_dir(&self) -> Option<&Path> {
        match self {
            LoadError::NotFound(path) | LoadError::ClassMissing { path, .. } => {
                path.parent().filter(|dir| !dir.as_os_str().is_empty())
            }
            _ => None,
        }
    }
}

/// Command class validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Argument and option '{0}' must have unique names within a command")]
    DuplicateNames(String),

    #[error("Command '{0}' is not defined")]
    CommandNotFound(String),

    #[error("Unknown git operation '{0}'")]
    UnknownGitOperation(String),

    #[error("{} already exists", .0.display())]
    AlreadyInitialized(PathBuf),
}

/// Task execution errors
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Command failed with exit code {0:?}")]
    CommandFailed(Option<i32>),

    #[error("Argument '{0}' is required but not provided")]
    MissingArgument(String),
}

/// Variable interpolation errors
#[derive(Error, Debug)]
pub enum InterpolationError {
    #[error("Invalid interpolation syntax: {0}")]
    InvalidSyntax(String),

    #[error("Recursive interpolation detected")]
    RecursiveInterpolation,
}

/// Specialized result type for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Specialized result type for loading operations
pub type LoadResult<T> = std::result::Result<T, LoadError>;

/// Specialized result type for interpolation operations
pub type InterpolationResult<T> = std::result::Result<T, InterpolationError>;
