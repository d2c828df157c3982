//! Shebang script inspection
//!
//! A shebang script names the tool in its first line and may embed a command
//! class after a `---` marker line:
//!
//! ```text
//! #!/usr/bin/env robo
//! ---
//! class: Deploy
//! commands:
//!   ship:
//!     run: ./ship.sh
//! ```

use crate::bootstrap::{SOURCE_MARKER, TOOL_NAME};
use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// A script file whose first line names the tool as its interpreter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShebangScript {
    pub path: PathBuf,

    /// Class declared by the embedded source, if any
    pub declared_class: Option<String>,

    /// Embedded source, kept only when it declares a class
    pub inline_source: Option<String>,
}

/// Whether `line` is a shebang line naming the tool
pub fn is_shebang_line(line: &str) -> bool {
    line.starts_with("#!") && line.contains(TOOL_NAME)
}

/// Find a top-level `class: Name` declaration
///
/// The value is read as a YAML scalar, so quoting and trailing comments yield
/// the same name the class parser sees. A value that is not a valid scalar is
/// returned as its first word so the parse failure still surfaces on load.
pub fn detect_class_declaration(source: &str) -> Option<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"(?m)^class:[ \t]*(\S.*)$").expect("class declaration pattern is valid")
    });
    let raw = re.captures(source)?.get(1)?.as_str().trim_end();

    match serde_yaml::from_str::<String>(raw) {
        Ok(name) if !name.is_empty() => Some(name),
        _ => raw.split_whitespace().next().map(str::to_string),
    }
}

/// Inspect `path` as a shebang script
///
/// Returns `None` when the path is not a readable file or its first line is
/// not a shebang line naming the tool.
pub fn inspect(path: &Path) -> Option<ShebangScript> {
    if !path.is_file() {
        return None;
    }
    let mut reader = BufReader::new(File::open(path).ok()?);

    let mut line = String::new();
    reader.read_line(&mut line).ok()?;
    if !is_shebang_line(&line) {
        return None;
    }

    let mut script = ShebangScript {
        path: path.to_path_buf(),
        declared_class: None,
        inline_source: None,
    };

    loop {
        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) if line.trim() == SOURCE_MARKER => {
                let mut source = String::new();
                if reader.read_to_string(&mut source).is_ok() {
                    if let Some(class) = detect_class_declaration(&source) {
                        script.declared_class = Some(class);
                        script.inline_source = Some(source);
                    }
                }
                break;
            }
            Ok(_) => {}
        }
    }

    Some(script)
}
