//! Execution context for command running
//!
//! The context carries the project base directory explicitly so that nothing
//! below the process entry point depends on the real working directory.

use colored::Colorize;
use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

/// Execution context that tracks state during command execution
pub struct Context {
    /// Directory that relative paths and step commands resolve against
    pub base_dir: PathBuf,

    /// Variables (from args, options and pass-through arguments)
    pub vars: HashMap<String, String>,

    /// Interpreter used for steps (e.g., ["bash", "-c"])
    pub interpreter: Vec<String>,

    /// Verbosity level
    pub verbosity: Verbosity,

    /// Print steps instead of executing them
    pub simulate: bool,
}

/// Verbosity levels for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Silent = 0,
    Quiet = 1,
    Normal = 2,
    Verbose = 3,
}

impl Context {
    /// Create a new context with default settings
    pub fn new() -> Self {
        Context {
            base_dir: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            vars: HashMap::new(),
            interpreter: vec!["sh".to_string(), "-c".to_string()],
            verbosity: Verbosity::Normal,
            simulate: false,
        }
    }

    /// Create a context anchored at a specific directory
    pub fn with_base_dir(mut self, dir: PathBuf) -> Self {
        self.base_dir = dir;
        self
    }

    /// Set a single variable
    pub fn set_var(&mut self, key: String, value: String) {
        self.vars.insert(key, value);
    }

    /// Set the interpreter
    pub fn with_interpreter(mut self, interpreter: Vec<String>) -> Self {
        self.interpreter = interpreter;
        self
    }

    /// Set verbosity level
    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn with_simulate(mut self, simulate: bool) -> Self {
        self.simulate = simulate;
        self
    }

    /// Print info message
    pub fn print_info(&self, message: &str) {
        if self.verbosity >= Verbosity::Normal {
            eprintln!("[INFO] {}", message);
        }
    }

    /// Print error message
    pub fn print_error(&self, message: &str) {
        if self.verbosity >= Verbosity::Quiet {
            eprintln!("{} {}", "[ERROR]".red(), message);
        }
    }

    /// Print debug message (only in verbose mode)
    pub fn print_debug(&self, message: &str) {
        if self.verbosity >= Verbosity::Verbose {
            eprintln!("[DEBUG] {}", message);
        }
    }

    /// Print a command about to run
    pub fn print_run(&self, command: &str) {
        if self.verbosity >= Verbosity::Normal {
            eprintln!("{} {}", "[RUN]".cyan(), command);
        }
    }

    /// Print command start message
    pub fn print_command_start(&self, name: &str) {
        self.print_info(&format!("Running command: {}", name));
    }

    /// Print command complete message
    pub fn print_command_complete(&self, name: &str) {
        self.print_debug(&format!("Command completed: {}", name));
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
