//! The `init` command offered when no command class could be loaded

use crate::error::{ConfigError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Starter command class written by `init`
pub fn starter_class(class_name: &str) -> String {
    format!(
        r#"# Commands for this project. List them with `robo --help`.
class: {class_name}
commands:
  hello:
    usage: Say hello
    args:
      - name: who
        default: world
    run: echo "Hello, ${{who}}!"
"#
    )
}

/// Write a starter extension file into `dir`
pub fn create_extension_file(dir: &Path, file_name: &str, class_name: &str) -> Result<PathBuf> {
    let path = dir.join(file_name);
    if path.exists() {
        return Err(ConfigError::AlreadyInitialized(path).into());
    }
    fs::write(&path, starter_class(class_name))?;
    Ok(path)
}
