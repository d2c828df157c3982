//! Process entry orchestration

use crate::bootstrap::{
    ClassRegistry, Extension, ExtensionLoader, InvocationResolver, InvocationState, TOOL_NAME,
};
use crate::cli::Application;
use crate::error::{LoadError, Result};
use crate::ui;
use colored::Color;
use std::env;
use std::path::Path;

/// Resolves the invocation, loads the command class and runs the application
pub struct Runner {
    resolver: InvocationResolver,
}

impl Runner {
    /// Runner expecting `class_name` in `file_name`, defaults when `None`
    pub fn new(class_name: Option<&str>, file_name: Option<&str>) -> Self {
        Runner {
            resolver: InvocationResolver::new(class_name, file_name),
        }
    }

    /// Run with the raw process arguments and return the exit status
    ///
    /// On a successful file load the process working directory is changed to
    /// the project directory for the rest of the run.
    pub fn execute(&self, raw_args: Vec<String>) -> Result<i32> {
        let state = self.resolver.resolve(&raw_args);
        let mut registry = ClassRegistry::new();
        let loaded = ExtensionLoader::new(&mut registry, self.resolver.base_dir()).load(&state);

        let mut app = Application::new(TOOL_NAME, crate::VERSION);

        match loaded {
            Ok(Extension {
                class_name,
                project_dir,
            }) => {
                let base_dir = match project_dir {
                    Some(dir) => {
                        env::set_current_dir(&dir)?;
                        load_dotenv(&dir);
                        dir
                    }
                    None => self.resolver.base_dir().to_path_buf(),
                };
                let class = registry
                    .get(&class_name)
                    .ok_or_else(|| LoadError::ClassMissing {
                        class: class_name.clone(),
                        path: state.load_dir.join(&state.file_name),
                    })?;
                app.add_commands_from_class(class, state.pass_through.clone());
                app.set_base_dir(base_dir);
            }
            Err(e) if e.is_recoverable() => {
                report_uninitialized(&e, &state);
                app.add_init_command(&state.file_name, &state.class_name);
                let init_dir = match e.load_dir() {
                    Some(dir) => dir.to_path_buf(),
                    None => self.resolver.base_dir().to_path_buf(),
                };
                app.set_base_dir(init_dir);
            }
            Err(e) => return Err(e.into()),
        }

        app.run(state.args)
    }
}

impl Default for Runner {
    fn default() -> Self {
        Runner::new(None, None)
    }
}

fn report_uninitialized(error: &LoadError, state: &InvocationState) {
    match error {
        LoadError::InvalidPath(_) => ui::yell(&error.to_string(), Color::Red),
        LoadError::ClassMissing { .. } => ui::error(&error.to_string()),
        _ => {}
    }
    ui::yell(
        &format!(
            "Robo is not initialized here. Please run `{} init` to create a new {}",
            TOOL_NAME, state.file_name
        ),
        Color::Yellow,
    );
}

/// Load `.env` from the project directory without overriding existing variables
fn load_dotenv(dir: &Path) {
    let path = dir.join(".env");
    if path.is_file() {
        if let Err(e) = dotenvy::from_path(&path) {
            ui::warn(&format!("Ignoring {}: {}", path.display(), e));
        }
    }
}
