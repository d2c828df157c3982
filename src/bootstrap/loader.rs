//! Extension loading
//!
//! Materializes command classes from extension files or from source embedded
//! in a shebang script, and keeps every class loaded during this run.

use crate::bootstrap::InvocationState;
use crate::config::{parse_class, parse_class_file, CommandClass};
use crate::error::{LoadError, LoadResult};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Where a command class comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassSource {
    /// An extension file on disk
    File(PathBuf),

    /// Source embedded in a shebang script at `origin`
    Inline { origin: PathBuf, source: String },
}

/// Command classes available to this run, by declared name
#[derive(Debug, Default)]
pub struct ClassRegistry {
    classes: HashMap<String, CommandClass>,
    loaded_files: HashSet<PathBuf>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, class: &str) -> bool {
        self.classes.contains_key(class)
    }

    pub fn get(&self, class: &str) -> Option<&CommandClass> {
        self.classes.get(class)
    }

    /// Parse `source` and register the class it declares
    ///
    /// Files are included once; loading the same path again is a no-op and
    /// returns `None`. Otherwise returns the declared class name.
    pub fn materialize(&mut self, source: &ClassSource) -> LoadResult<Option<String>> {
        let class = match source {
            ClassSource::File(path) => {
                if self.loaded_files.contains(path) {
                    return Ok(None);
                }
                let class = parse_class_file(path).map_err(|e| LoadError::InvalidFile {
                    path: path.clone(),
                    error: e.to_string(),
                })?;
                self.loaded_files.insert(path.clone());
                class
            }
            ClassSource::Inline { origin, source } => {
                parse_class(source).map_err(|e| LoadError::ShebangParseFailure {
                    path: origin.clone(),
                    error: e.to_string(),
                })?
            }
        };

        let name = class.class.clone();
        self.classes.insert(name.clone(), class);
        Ok(Some(name))
    }
}

/// A successfully loaded extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extension {
    pub class_name: String,

    /// Canonical project directory, when the class came from a file
    pub project_dir: Option<PathBuf>,
}

/// Locates and loads the command class named by an invocation
pub struct ExtensionLoader<'a> {
    registry: &'a mut ClassRegistry,
    base_dir: PathBuf,
}

impl<'a> ExtensionLoader<'a> {
    /// Loader resolving relative load directories against `base_dir`
    pub fn new(registry: &'a mut ClassRegistry, base_dir: impl AsRef<Path>) -> Self {
        ExtensionLoader {
            registry,
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    /// Make the expected command class available
    pub fn load(&mut self, state: &InvocationState) -> LoadResult<Extension> {
        if let (Some(script), Some(source)) = (&state.shebang, state.inline_source()) {
            if !self.registry.contains(&state.class_name) {
                let declared = self.registry.materialize(&ClassSource::Inline {
                    origin: script.path.clone(),
                    source: source.to_string(),
                })?;
                if declared.as_deref() != Some(state.class_name.as_str()) {
                    return Err(LoadError::ClassMissing {
                        class: state.class_name.clone(),
                        path: script.path.clone(),
                    });
                }
            }
        }

        if self.registry.contains(&state.class_name) {
            return Ok(Extension {
                class_name: state.class_name.clone(),
                project_dir: None,
            });
        }

        let dir = self.base_dir.join(&state.load_dir);
        if !dir.exists() {
            return Err(LoadError::InvalidPath(state.load_dir.clone()));
        }
        let dir = dir
            .canonicalize()
            .map_err(|_| LoadError::InvalidPath(state.load_dir.clone()))?;

        let path = dir.join(&state.file_name);
        if !path.is_file() {
            return Err(LoadError::NotFound(path));
        }

        self.registry.materialize(&ClassSource::File(path.clone()))?;

        if !self.registry.contains(&state.class_name) {
            return Err(LoadError::ClassMissing {
                class: state.class_name.clone(),
                path,
            });
        }

        Ok(Extension {
            class_name: state.class_name.clone(),
            project_dir: Some(dir),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::InvocationResolver;
    use std::fs;
    use tempfile::TempDir;

    const ROBOFILE: &str = "class: RoboFile\ncommands:\n  hello:\n    run: echo hello\n";

    fn state_for(dir: &Path, argv: &[&str]) -> InvocationState {
        let argv: Vec<String> = argv.iter().map(|s| s.to_string()).collect();
        InvocationResolver::default()
            .with_base_dir(dir.to_path_buf())
            .resolve(&argv)
    }

    #[test]
    fn test_materialize_file_once() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("robofile.yml");
        fs::write(&path, ROBOFILE).unwrap();

        let mut registry = ClassRegistry::new();
        let source = ClassSource::File(path);
        assert_eq!(
            registry.materialize(&source).unwrap(),
            Some("RoboFile".to_string())
        );
        assert_eq!(registry.materialize(&source).unwrap(), None);
        assert!(registry.contains("RoboFile"));
    }

    #[test]
    fn test_materialize_inline_parse_failure() {
        let mut registry = ClassRegistry::new();
        let result = registry.materialize(&ClassSource::Inline {
            origin: PathBuf::from("script"),
            source: "class: [unclosed\n".to_string(),
        });
        assert!(matches!(result, Err(LoadError::ShebangParseFailure { .. })));
    }

    #[test]
    fn test_load_from_directory() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("robofile.yml"), ROBOFILE).unwrap();

        let state = state_for(dir.path(), &["robo", "hello"]);
        let mut registry = ClassRegistry::new();
        let ext = ExtensionLoader::new(&mut registry, dir.path())
            .load(&state)
            .unwrap();

        assert_eq!(ext.class_name, "RoboFile");
        assert_eq!(ext.project_dir, Some(dir.path().canonicalize().unwrap()));
        assert!(registry.get("RoboFile").unwrap().commands.contains_key("hello"));
    }

    #[test]
    fn test_already_available_class_skips_filesystem() {
        let dir = TempDir::new().unwrap();
        let other = dir.path().join("other.yml");
        fs::write(&other, ROBOFILE).unwrap();

        let mut registry = ClassRegistry::new();
        registry.materialize(&ClassSource::File(other)).unwrap();

        let state = state_for(dir.path(), &["robo", "--load-from", "does/not/exist"]);
        let ext = ExtensionLoader::new(&mut registry, dir.path())
            .load(&state)
            .unwrap();
        assert_eq!(ext.project_dir, None);
    }

    #[test]
    fn test_invalid_path() {
        let dir = TempDir::new().unwrap();
        let state = state_for(dir.path(), &["robo", "--load-from", "nowhere"]);

        let mut registry = ClassRegistry::new();
        let result = ExtensionLoader::new(&mut registry, dir.path()).load(&state);
        assert!(matches!(result, Err(LoadError::InvalidPath(p)) if p == PathBuf::from("nowhere")));
    }

    #[test]
    fn test_not_found() {
        let dir = TempDir::new().unwrap();
        let state = state_for(dir.path(), &["robo"]);

        let mut registry = ClassRegistry::new();
        let result = ExtensionLoader::new(&mut registry, dir.path()).load(&state);
        match result {
            Err(e @ LoadError::NotFound(_)) => assert!(e.is_recoverable()),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_class_missing() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("robofile.yml"), "class: SomethingElse\n").unwrap();
        let state = state_for(dir.path(), &["robo"]);

        let mut registry = ClassRegistry::new();
        let result = ExtensionLoader::new(&mut registry, dir.path()).load(&state);
        assert!(matches!(
            result,
            Err(LoadError::ClassMissing { class, .. }) if class == "RoboFile"
        ));
    }

    #[test]
    fn test_invalid_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("robofile.yml"), "commands: [\n").unwrap();
        let state = state_for(dir.path(), &["robo"]);

        let mut registry = ClassRegistry::new();
        let result = ExtensionLoader::new(&mut registry, dir.path()).load(&state);
        assert!(matches!(result, Err(LoadError::InvalidFile { .. })));
    }

    #[test]
    fn test_inline_class_from_shebang() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("deploy"),
            "#!/usr/bin/env robo\n---\nclass: Deploy\ncommands:\n  ship:\n    run: echo ship\n",
        )
        .unwrap();

        let state = state_for(dir.path(), &["robo", "deploy", "ship"]);
        assert_eq!(state.class_name, "Deploy");

        let mut registry = ClassRegistry::new();
        let ext = ExtensionLoader::new(&mut registry, dir.path())
            .load(&state)
            .unwrap();
        assert_eq!(ext.class_name, "Deploy");
        assert_eq!(ext.project_dir, None);
        assert!(registry.get("Deploy").unwrap().commands.contains_key("ship"));
    }

    #[test]
    fn test_quoted_inline_class_name() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("deploy"),
            "#!/usr/bin/env robo\n---\nclass: \"Deploy\"\ncommands:\n  ship:\n    run: echo ship\n",
        )
        .unwrap();

        let state = state_for(dir.path(), &["robo", "deploy", "ship"]);
        assert_eq!(state.class_name, "Deploy");

        let mut registry = ClassRegistry::new();
        let ext = ExtensionLoader::new(&mut registry, dir.path())
            .load(&state)
            .unwrap();
        assert_eq!(ext.class_name, "Deploy");
        assert_eq!(ext.project_dir, None);
    }

    #[test]
    fn test_inline_class_mismatch_does_not_fall_back_to_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("robofile.yml"), ROBOFILE).unwrap();
        let script = dir.path().join("deploy");
        fs::write(
            &script,
            "#!/usr/bin/env robo\n---\nclass: Deploy\ncommands: {}\n",
        )
        .unwrap();

        let mut state = state_for(dir.path(), &["robo", "deploy"]);
        state.class_name = "Release".to_string();

        let mut registry = ClassRegistry::new();
        let result = ExtensionLoader::new(&mut registry, dir.path()).load(&state);
        match result {
            Err(LoadError::ClassMissing { class, path }) => {
                assert_eq!(class, "Release");
                assert_eq!(path, script);
            }
            other => panic!("expected ClassMissing, got {:?}", other),
        }
        assert!(!registry.contains("RoboFile"));
    }

    #[test]
    fn test_malformed_inline_class_is_surfaced() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("broken"),
            "#!/usr/bin/env robo\n---\nclass: Broken\ncommands: [\n",
        )
        .unwrap();

        let state = state_for(dir.path(), &["robo", "broken"]);
        let mut registry = ClassRegistry::new();
        let result = ExtensionLoader::new(&mut registry, dir.path()).load(&state);
        match result {
            Err(e @ LoadError::ShebangParseFailure { .. }) => assert!(!e.is_recoverable()),
            other => panic!("expected ShebangParseFailure, got {:?}", other),
        }
    }
}
