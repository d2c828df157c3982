//! Runtime commands
//!
//! A [`Task`] is the runtime form of one command from a loaded class.

use crate::config;
use crate::error::{ExecutionError, Result};
use crate::runner::{
    expand_definitions, interpolate, interpolate_list, Context, ExecStack, Executor, GitStack,
    StepOutput, TaskStack,
};
use std::collections::{BTreeMap, HashMap};

/// Runtime command representation
#[derive(Debug, Clone)]
pub struct Task {
    /// Command name
    pub name: String,

    /// Usage description
    pub usage: Option<String>,

    /// Longer description
    pub description: Option<String>,

    /// Whether this command is hidden from help
    pub hidden: bool,

    /// Positional arguments, in order
    pub args: Vec<config::ArgDef>,

    /// Named options
    pub options: BTreeMap<String, config::OptionDef>,

    /// Steps to execute
    pub steps: Vec<Step>,

    /// Values given for this execution, used verbatim
    pub vars: HashMap<String, String>,

    /// Class-defined defaults for values not given, expanded before use
    pub defaults: HashMap<String, String>,
}

impl Task {
    /// Create a runtime command from its definition
    pub fn from_def(name: &str, def: &config::CommandDef) -> Self {
        Task {
            name: name.to_string(),
            usage: def.usage.clone(),
            description: def.description.clone(),
            hidden: def.hidden,
            args: def.args.clone(),
            options: def.options.clone(),
            steps: def.run.iter().map(Step::from_config).collect(),
            vars: HashMap::new(),
            defaults: HashMap::new(),
        }
    }

    /// Execute every step in order, stopping at the first failing step
    pub fn execute(&self, ctx: &mut Context, executor: &mut dyn Executor) -> Result<()> {
        for (key, value) in &self.vars {
            ctx.set_var(key.clone(), value.clone());
        }
        let defaults: HashMap<String, String> = self
            .defaults
            .iter()
            .filter(|(key, _)| !ctx.vars.contains_key(*key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        for (key, value) in expand_definitions(&defaults, &ctx.vars)? {
            ctx.set_var(key, value);
        }

        if let Some(missing) = self
            .args
            .iter()
            .find(|arg| arg.required && !ctx.vars.contains_key(&arg.name))
        {
            return Err(ExecutionError::MissingArgument(missing.name.clone()).into());
        }

        ctx.print_command_start(&self.name);

        for step in &self.steps {
            self.execute_step(step, ctx, executor)?;
        }

        ctx.print_command_complete(&self.name);
        Ok(())
    }

    fn execute_step(&self, step: &Step, ctx: &Context, executor: &mut dyn Executor) -> Result<()> {
        match step {
            Step::Shell(command) => {
                let line = interpolate(command, &ctx.vars)?;
                ctx.print_run(&line);
                if ctx.simulate {
                    return Ok(());
                }
                let out = executor.execute(&line);
                if !out.success() {
                    return Err(ExecutionError::CommandFailed(Some(out.status)).into());
                }
                Ok(())
            }
            Step::Git { executable, ops } => {
                let mut git = GitStack::new(executable.clone());
                for (verb, value) in ops {
                    git = git.apply(verb, &interpolate(value, &ctx.vars)?)?;
                }
                run_stack(git.stack(), ctx, executor)
            }
            Step::Stack(commands) => {
                let stack = interpolate_list(commands, &ctx.vars)?
                    .into_iter()
                    .fold(ExecStack::new(), |stack, command| stack.exec(command));
                run_stack(stack.stack(), ctx, executor)
            }
        }
    }
}

/// Run a stack step by step and fail on the first non-zero step
fn run_stack(stack: &TaskStack, ctx: &Context, executor: &mut dyn Executor) -> Result<()> {
    if ctx.simulate {
        ctx.print_run(&stack.render());
        return Ok(());
    }

    let mut announcing = Announcing {
        ctx,
        inner: executor,
    };
    let report = stack.run(&mut announcing);

    if let Some(failed) = report.first_failure() {
        ctx.print_error(&format!(
            "'{}' exited with status {}",
            failed.command.trim_end(),
            failed.output.status
        ));
        return Err(ExecutionError::CommandFailed(Some(failed.output.status)).into());
    }
    Ok(())
}

/// Prints each command before handing it to the wrapped executor
struct Announcing<'a> {
    ctx: &'a Context,
    inner: &'a mut dyn Executor,
}

impl Executor for Announcing<'_> {
    fn execute(&mut self, command: &str) -> StepOutput {
        self.ctx.print_run(command);
        self.inner.execute(command)
    }
}

/// Runtime representation of a step
#[derive(Debug, Clone)]
pub enum Step {
    Shell(String),
    Git {
        executable: String,
        ops: Vec<(String, String)>,
    },
    Stack(Vec<String>),
}

impl Step {
    /// Create from config
    ///
    /// Git operations are expected to be validated already; malformed ones are dropped.
    pub fn from_config(step: &config::Step) -> Self {
        match step {
            config::Step::Shell(cmd) => Step::Shell(cmd.clone()),
            config::Step::Git(git) => Step::Git {
                executable: git.executable.clone(),
                ops: git
                    .git
                    .iter()
                    .filter_map(config::GitOpSpec::verb_and_value)
                    .map(|(verb, value)| (verb.to_string(), value.to_string()))
                    .collect(),
            },
            config::Step::Stack(stack) => Step::Stack(stack.stack.clone()),
        }
    }
}
