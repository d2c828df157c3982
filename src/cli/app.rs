//! Main CLI application

use crate::bootstrap::Runner;
use crate::cli::init::create_extension_file;
use crate::config::CommandClass;
use crate::error::{ConfigError, RoboError};
use crate::runner::{Context, Executor, ShellExecutor, Task, Verbosity};
use crate::ui;
use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::collections::{BTreeMap, HashMap};
use std::env;
use std::path::PathBuf;

/// Variable holding the arguments given after `--`
pub const PASS_THROUGH_VAR: &str = "passthru";

/// Init command settings
#[derive(Debug, Clone)]
struct InitCommand {
    file_name: String,
    class_name: String,
}

/// CLI application
pub struct Application {
    name: String,
    version: String,
    about: Option<String>,
    tasks: BTreeMap<String, Task>,
    interpreter: Option<Vec<String>>,
    pass_through: Option<String>,
    init: Option<InitCommand>,
    base_dir: PathBuf,
}

impl Application {
    pub fn new(name: &str, version: &str) -> Self {
        Application {
            name: name.to_string(),
            version: version.to_string(),
            about: None,
            tasks: BTreeMap::new(),
            interpreter: None,
            pass_through: None,
            init: None,
            base_dir: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }

    /// Register every command of `class`
    pub fn add_commands_from_class(&mut self, class: &CommandClass, pass_through: Option<String>) {
        if let Some(name) = &class.name {
            self.name = name.clone();
        }
        self.about = class.usage.clone();
        self.interpreter = class.interpreter.clone();
        self.pass_through = pass_through;

        for (name, def) in &class.commands {
            self.tasks.insert(name.clone(), Task::from_def(name, def));
        }
    }

    /// Offer `init`, writing `file_name` with a class named `class_name`
    pub fn add_init_command(&mut self, file_name: &str, class_name: &str) {
        self.init = Some(InitCommand {
            file_name: file_name.to_string(),
            class_name: class_name.to_string(),
        });
    }

    /// Directory commands run in and `init` writes to
    pub fn set_base_dir(&mut self, dir: PathBuf) {
        self.base_dir = dir;
    }

    pub fn command_names(&self) -> Vec<&str> {
        self.tasks.keys().map(String::as_str).collect()
    }

    /// Run with normalized arguments and return the exit status
    pub fn run(&self, args: Vec<String>) -> Result<i32, RoboError> {
        self.dispatch(args, None)
    }

    /// Run with a specific executor instead of the shell
    pub fn run_with(
        &self,
        args: Vec<String>,
        executor: &mut dyn Executor,
    ) -> Result<i32, RoboError> {
        self.dispatch(args, Some(executor))
    }

    fn dispatch(
        &self,
        args: Vec<String>,
        executor: Option<&mut dyn Executor>,
    ) -> Result<i32, RoboError> {
        let mut command = self.build_command();

        let matches = match command.try_get_matches_from_mut(args) {
            Ok(matches) => matches,
            Err(e) => {
                let code = e.exit_code();
                e.print()?;
                return Ok(code);
            }
        };

        let (name, sub_matches) = match matches.subcommand() {
            Some((name, sub_matches)) => (name.to_string(), sub_matches),
            None => {
                command.print_help()?;
                println!();
                return Ok(0);
            }
        };

        if name == "init" {
            if let Some(init) = &self.init {
                let path = create_extension_file(&self.base_dir, &init.file_name, &init.class_name)?;
                ui::success(&format!("{} created", path.display()));
                return Ok(0);
            }
        }

        let task = self
            .tasks
            .get(&name)
            .ok_or_else(|| ConfigError::CommandNotFound(name.clone()))?;

        let mut task = task.clone();
        let (vars, defaults) = parse_task_vars(&task, sub_matches);
        task.vars = vars;
        task.defaults = defaults;
        if let Some(pass_through) = &self.pass_through {
            task.vars
                .insert(PASS_THROUGH_VAR.to_string(), pass_through.clone());
        }

        // Global flags are propagated down to the selected subcommand
        let mut ctx = Context::new()
            .with_base_dir(self.base_dir.clone())
            .with_verbosity(get_verbosity(sub_matches))
            .with_simulate(sub_matches.get_flag("simulate"));

        if let Some(interpreter) = &self.interpreter {
            ctx = ctx.with_interpreter(interpreter.clone());
        }

        match executor {
            Some(executor) => task.execute(&mut ctx, executor)?,
            None => {
                let mut shell = ShellExecutor::new(&ctx);
                task.execute(&mut ctx, &mut shell)?;
            }
        }

        Ok(0)
    }

    /// Build the clap command from the registered commands
    fn build_command(&self) -> Command {
        let mut cmd = Command::new(self.name.clone())
            .version(self.version.clone())
            .about(
                self.about
                    .clone()
                    .unwrap_or_else(|| "Project task runner".to_string()),
            )
            .arg(
                Arg::new("quiet")
                    .short('q')
                    .long("quiet")
                    .help("Only print command output and errors")
                    .action(ArgAction::SetTrue)
                    .global(true),
            )
            .arg(
                Arg::new("silent")
                    .short('s')
                    .long("silent")
                    .help("Print no output")
                    .action(ArgAction::SetTrue)
                    .global(true),
            )
            .arg(
                Arg::new("verbose")
                    .short('v')
                    .long("verbose")
                    .help("Print verbose output")
                    .action(ArgAction::SetTrue)
                    .global(true),
            )
            .arg(
                Arg::new("simulate")
                    .long("simulate")
                    .help("Print what would run without running it")
                    .action(ArgAction::SetTrue)
                    .global(true),
            );

        if let Some(init) = &self.init {
            cmd = cmd.subcommand(Command::new("init").about(format!(
                "Create a new {} with class {}",
                init.file_name, init.class_name
            )));
        }

        for (name, task) in &self.tasks {
            cmd = cmd.subcommand(build_task_command(name, task));
        }

        cmd
    }
}

fn build_task_command(name: &str, task: &Task) -> Command {
    let mut task_cmd = Command::new(name.to_string())
        .about(task.usage.clone().unwrap_or_default())
        .hide(task.hidden);

    if let Some(desc) = &task.description {
        task_cmd = task_cmd.long_about(desc.clone());
    }

    for arg in &task.args {
        let mut arg_def = Arg::new(arg.name.clone())
            .value_name(arg.name.to_uppercase())
            .help(arg.usage.clone().unwrap_or_default());

        if arg.required {
            arg_def = arg_def.required(true);
        }
        if let Some(default) = &arg.default {
            arg_def = arg_def.default_value(default.clone());
        }

        task_cmd = task_cmd.arg(arg_def);
    }

    for (opt_name, opt) in &task.options {
        let mut opt_def = Arg::new(opt_name.clone()).long(opt_name.clone()).help(
            opt.usage
                .clone()
                .unwrap_or_else(|| format!("Option: {}", opt_name)),
        );

        if let Some(c) = opt.short.as_ref().and_then(|s| s.chars().next()) {
            opt_def = opt_def.short(c);
        }

        if opt.is_flag() {
            opt_def = opt_def.action(ArgAction::SetTrue);
        } else {
            opt_def = opt_def.value_name(opt_name.to_uppercase());
            if let Some(default) = &opt.default {
                opt_def = opt_def.default_value(default.clone());
            }
        }

        task_cmd = task_cmd.arg(opt_def);
    }

    task_cmd
}

/// Get verbosity level from matches
fn get_verbosity(matches: &ArgMatches) -> Verbosity {
    if matches.get_flag("silent") {
        Verbosity::Silent
    } else if matches.get_flag("quiet") {
        Verbosity::Quiet
    } else if matches.get_flag("verbose") {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    }
}

/// Collect command variables from parsed arguments
///
/// Returns the values given on the command line or through the environment,
/// and separately the class defaults used for anything not given.
fn parse_task_vars(
    task: &Task,
    matches: &ArgMatches,
) -> (HashMap<String, String>, HashMap<String, String>) {
    let mut vars = HashMap::new();
    let mut defaults = HashMap::new();

    for arg in &task.args {
        if given(matches, &arg.name) {
            if let Some(value) = matches.get_one::<String>(&arg.name) {
                vars.insert(arg.name.clone(), value.clone());
            }
        } else if let Some(default) = &arg.default {
            defaults.insert(arg.name.clone(), default.clone());
        }
    }

    for (opt_name, opt) in &task.options {
        let value = if opt.is_flag() {
            let set = matches.get_flag(opt_name)
                || opt
                    .environment
                    .as_ref()
                    .and_then(|var| env::var(var).ok())
                    .is_some_and(|v| v == "true" || v == "1");
            set.to_string()
        } else if given(matches, opt_name) {
            matches.get_one::<String>(opt_name).cloned().unwrap_or_default()
        } else if let Some(default) = &opt.default {
            defaults.insert(opt_name.clone(), default.clone());
            continue;
        } else if let Some(env_var) = &opt.environment {
            env::var(env_var).unwrap_or_default()
        } else {
            String::new()
        };

        if !value.is_empty() {
            vars.insert(opt_name.clone(), value);
        }
    }

    (vars, defaults)
}

fn given(matches: &ArgMatches, id: &str) -> bool {
    matches.value_source(id) == Some(ValueSource::CommandLine)
}

/// Run the CLI application with the process arguments
pub fn run() -> Result<i32, RoboError> {
    let args: Vec<String> = env::args().collect();
    Runner::default().execute(args)
}
