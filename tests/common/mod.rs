//! Common test utilities

#![allow(dead_code)]

use robo::runner::{Executor, StepOutput};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Create a temporary project with a robofile.yml
pub fn create_project(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("robofile.yml");
    fs::write(&path, content).unwrap();
    (temp_dir, path)
}

/// Write a file under `dir`, creating parent directories
pub fn write_file(dir: &Path, relative: &str, content: &str) -> PathBuf {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

pub fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Executor that records every command line it is given
#[derive(Default)]
pub struct RecordingExecutor {
    pub calls: Vec<String>,
    pub failing: Vec<String>,
}

impl RecordingExecutor {
    pub fn failing_on(command: &str) -> Self {
        RecordingExecutor {
            calls: Vec::new(),
            failing: vec![command.to_string()],
        }
    }
}

impl Executor for RecordingExecutor {
    fn execute(&mut self, command: &str) -> StepOutput {
        self.calls.push(command.to_string());
        if self.failing.iter().any(|f| f == command) {
            StepOutput::new(1, format!("{} failed", command))
        } else {
            StepOutput::new(0, format!("{} ok", command))
        }
    }
}
