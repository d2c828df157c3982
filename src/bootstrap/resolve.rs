//! Invocation resolution
//!
//! Turns the raw process arguments into the argument vector the application
//! parses, plus the side-channel state used to find the command class.

use crate::bootstrap::shebang::{self, ShebangScript};
use crate::bootstrap::{DEFAULT_CLASS, DEFAULT_FILE};
use std::env;
use std::path::{Path, PathBuf};

/// Token that starts pass-through arguments
pub const PASS_THROUGH_SEPARATOR: &str = "--";

/// Option naming an alternate directory or extension file
pub const LOAD_FROM: &str = "--load-from";

/// Everything learned about one process invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationState {
    /// Arguments handed to the application, program path first
    pub args: Vec<String>,

    /// Tokens after `--`, joined with single spaces
    pub pass_through: Option<String>,

    /// Directory searched for the extension file, as given
    pub load_dir: PathBuf,

    /// Name of the extension file inside `load_dir`
    pub file_name: String,

    /// Name of the command class expected to be available
    pub class_name: String,

    /// Shebang script used to launch the tool, if any
    pub shebang: Option<ShebangScript>,
}

impl InvocationState {
    /// Inline class source embedded in the shebang script
    pub fn inline_source(&self) -> Option<&str> {
        self.shebang.as_ref()?.inline_source.as_deref()
    }
}

/// Classifies the invocation and normalizes arguments
#[derive(Debug, Clone)]
pub struct InvocationResolver {
    class_name: String,
    file_name: String,
    base_dir: PathBuf,
}

impl InvocationResolver {
    /// Resolver with the given class and file names, falling back to the defaults
    pub fn new(class_name: Option<&str>, file_name: Option<&str>) -> Self {
        InvocationResolver {
            class_name: class_name.unwrap_or(DEFAULT_CLASS).to_string(),
            file_name: file_name.unwrap_or(DEFAULT_FILE).to_string(),
            base_dir: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }

    /// Anchor relative paths (script arguments, `--load-from`) at `dir`
    pub fn with_base_dir(mut self, dir: PathBuf) -> Self {
        self.base_dir = dir;
        self
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Resolve raw process arguments
    pub fn resolve(&self, raw_args: &[String]) -> InvocationState {
        let (args, script) = self.shebang(raw_args);

        let mut state = InvocationState {
            args,
            pass_through: None,
            load_dir: self.base_dir.clone(),
            file_name: self.file_name.clone(),
            class_name: self.class_name.clone(),
            shebang: None,
        };

        if let Some(class) = script.as_ref().and_then(|s| s.declared_class.clone()) {
            state.class_name = class;
        }
        state.shebang = script;

        let (args, pass_through) = split_pass_through(&state.args);
        state.args = args;
        state.pass_through = pass_through;

        self.extract_load_from(&mut state);
        state
    }

    /// Rewrite arguments when launched through a shebang script
    ///
    /// `#!/usr/bin/env robo` runs as `robo <script> args...`, so the script
    /// path is dropped. `#!/usr/bin/env robo mycommand --opt` runs as
    /// `robo "mycommand --opt" <script> args...`, so the first argument is
    /// split into the command and its options.
    pub fn shebang(&self, args: &[String]) -> (Vec<String>, Option<ShebangScript>) {
        let Some(program) = args.first() else {
            return (Vec::new(), None);
        };

        if let Some(script) = self.inspect_arg(args.get(1)) {
            let mut rewritten = vec![program.clone()];
            rewritten.extend_from_slice(&args[2..]);
            return (rewritten, Some(script));
        }

        if let Some(script) = self.inspect_arg(args.get(2)) {
            let mut rewritten = vec![program.clone()];
            rewritten.extend(args[1].split(' ').map(str::to_string));
            rewritten.extend_from_slice(&args[3..]);
            return (rewritten, Some(script));
        }

        (args.to_vec(), None)
    }

    fn inspect_arg(&self, arg: Option<&String>) -> Option<ShebangScript> {
        let arg = arg?;
        if arg.is_empty() {
            return None;
        }
        shebang::inspect(&self.base_dir.join(arg))
    }

    fn extract_load_from(&self, state: &mut InvocationState) {
        let Some(pos) = state.args.iter().position(|a| a == LOAD_FROM) else {
            return;
        };

        if pos + 1 < state.args.len() {
            state.load_dir = PathBuf::from(state.args.remove(pos + 1));
        }
        state.args.remove(pos);

        // Pointing at a file selects both the directory and the file name
        if self.base_dir.join(&state.load_dir).is_file() {
            if let Some(name) = state.load_dir.file_name() {
                state.file_name = name.to_string_lossy().into_owned();
            }
            state.load_dir = match state.load_dir.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            };
        }
    }
}

impl Default for InvocationResolver {
    fn default() -> Self {
        InvocationResolver::new(None, None)
    }
}

/// Cut everything after the first `--` into a single pass-through string
pub fn split_pass_through(args: &[String]) -> (Vec<String>, Option<String>) {
    match args.iter().position(|a| a == PASS_THROUGH_SEPARATOR) {
        Some(pos) => (args[..pos].to_vec(), Some(args[pos + 1..].join(" "))),
        None => (args.to_vec(), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_split_pass_through() {
        let (prefix, rest) = split_pass_through(&args(&["robo", "test", "--", "-x", "y"]));
        assert_eq!(prefix, args(&["robo", "test"]));
        assert_eq!(rest, Some("-x y".to_string()));
    }

    #[test]
    fn test_split_pass_through_only_first_separator() {
        let (prefix, rest) = split_pass_through(&args(&["robo", "--", "a", "--", "b"]));
        assert_eq!(prefix, args(&["robo"]));
        assert_eq!(rest, Some("a -- b".to_string()));
    }

    #[test]
    fn test_split_pass_through_trailing_separator() {
        let (prefix, rest) = split_pass_through(&args(&["robo", "build", "--"]));
        assert_eq!(prefix, args(&["robo", "build"]));
        assert_eq!(rest, Some(String::new()));
    }

    #[test]
    fn test_no_separator() {
        let (prefix, rest) = split_pass_through(&args(&["robo", "build"]));
        assert_eq!(prefix, args(&["robo", "build"]));
        assert_eq!(rest, None);
    }

    #[test]
    fn test_defaults() {
        let dir = TempDir::new().unwrap();
        let resolver = InvocationResolver::default().with_base_dir(dir.path().to_path_buf());
        let state = resolver.resolve(&args(&["robo", "build"]));

        assert_eq!(state.args, args(&["robo", "build"]));
        assert_eq!(state.load_dir, dir.path());
        assert_eq!(state.file_name, DEFAULT_FILE);
        assert_eq!(state.class_name, DEFAULT_CLASS);
        assert_eq!(state.shebang, None);
    }

    #[test]
    fn test_load_from_without_value() {
        let dir = TempDir::new().unwrap();
        let resolver = InvocationResolver::default().with_base_dir(dir.path().to_path_buf());
        let state = resolver.resolve(&args(&["robo", "build", "--load-from"]));

        assert_eq!(state.args, args(&["robo", "build"]));
        assert_eq!(state.load_dir, dir.path());
    }

    #[test]
    fn test_load_from_nonexistent_path_kept_as_given() {
        let dir = TempDir::new().unwrap();
        let resolver = InvocationResolver::default().with_base_dir(dir.path().to_path_buf());
        let state = resolver.resolve(&args(&["robo", "--load-from", "missing/dir", "build"]));

        assert_eq!(state.args, args(&["robo", "build"]));
        assert_eq!(state.load_dir, PathBuf::from("missing/dir"));
        assert_eq!(state.file_name, DEFAULT_FILE);
    }

    #[test]
    fn test_load_from_bare_file_name() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("tasks.yml"), "class: RoboFile\n").unwrap();
        let resolver = InvocationResolver::default().with_base_dir(dir.path().to_path_buf());
        let state = resolver.resolve(&args(&["robo", "--load-from", "tasks.yml"]));

        assert_eq!(state.load_dir, PathBuf::from("."));
        assert_eq!(state.file_name, "tasks.yml");
    }

    #[test]
    fn test_custom_names() {
        let resolver = InvocationResolver::new(Some("Tasks"), Some("tasks.yml"));
        let state = resolver.resolve(&args(&["robo"]));
        assert_eq!(state.class_name, "Tasks");
        assert_eq!(state.file_name, "tasks.yml");
    }

    #[test]
    fn test_empty_args() {
        let state = InvocationResolver::default().resolve(&[]);
        assert!(state.args.is_empty());
        assert_eq!(state.pass_through, None);
    }
}
