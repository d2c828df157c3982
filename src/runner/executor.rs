//! Command execution
//!
//! Steps reach the shell only through the [`Executor`] trait, so task stacks
//! can be driven by a recording executor in tests.

use crate::runner::{Context, Verbosity};
use std::path::PathBuf;
use std::process::Command as StdCommand;

/// Exit status used when a command could not be started at all
pub const SPAWN_FAILURE_STATUS: i32 = 127;

/// Result of executing one command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutput {
    pub status: i32,
    pub output: String,
}

impl StepOutput {
    pub fn new(status: i32, output: impl Into<String>) -> Self {
        StepOutput {
            status,
            output: output.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.status == 0
    }
}

/// Something that runs a command line synchronously
pub trait Executor {
    /// Run `command` to completion and report its status and captured output
    fn execute(&mut self, command: &str) -> StepOutput;
}

/// Runs commands through the configured interpreter in the base directory
pub struct ShellExecutor {
    interpreter: Vec<String>,
    dir: PathBuf,
    verbosity: Verbosity,
}

impl ShellExecutor {
    pub fn new(ctx: &Context) -> Self {
        ShellExecutor {
            interpreter: ctx.interpreter.clone(),
            dir: ctx.base_dir.clone(),
            verbosity: ctx.verbosity,
        }
    }

    fn echo(&self, output: &str) {
        if self.verbosity >= Verbosity::Quiet && !output.is_empty() {
            print!("{}", output);
            if !output.ends_with('\n') {
                println!();
            }
        }
    }
}

impl Executor for ShellExecutor {
    fn execute(&mut self, command: &str) -> StepOutput {
        let Some((program, interpreter_args)) = self.interpreter.split_first() else {
            return StepOutput::new(SPAWN_FAILURE_STATUS, "no interpreter configured");
        };

        let result = StdCommand::new(program)
            .args(interpreter_args)
            .arg(command)
            .current_dir(&self.dir)
            .output();

        match result {
            Ok(out) => {
                let mut text = String::from_utf8_lossy(&out.stdout).into_owned();
                text.push_str(&String::from_utf8_lossy(&out.stderr));
                self.echo(&text);
                // Killed by a signal: no code, report as generic failure
                StepOutput::new(out.status.code().unwrap_or(1), text)
            }
            Err(e) => StepOutput::new(SPAWN_FAILURE_STATUS, e.to_string()),
        }
    }
}
