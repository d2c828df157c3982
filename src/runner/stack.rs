//! Task stacks
//!
//! A task stack is an ordered, append-only list of sub-operations. The same
//! list can be rendered as one `&&`-composed command line for embedding in a
//! larger command, or run step by step with every result kept.

use crate::runner::{Executor, StepOutput};
use std::fmt;

/// Separator used when composing a stack into a single command line
pub const COMPOSE_SEPARATOR: &str = " && ";

/// One discrete unit of command text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubOperation {
    text: String,
}

impl SubOperation {
    pub fn new(text: impl Into<String>) -> Self {
        SubOperation { text: text.into() }
    }

    /// Join a program and its arguments with single spaces
    ///
    /// Empty arguments are kept, so an absent optional argument still
    /// contributes its separator.
    pub fn from_parts(program: &str, parts: &[&str]) -> Self {
        let mut text = program.to_string();
        for part in parts {
            text.push(' ');
            text.push_str(part);
        }
        SubOperation { text }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for SubOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Ordered collection of sub-operations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskStack {
    operations: Vec<SubOperation>,
}

impl TaskStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one sub-operation
    pub fn push(&mut self, operation: SubOperation) {
        self.operations.push(operation);
    }

    pub fn operations(&self) -> &[SubOperation] {
        &self.operations
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Compose every sub-operation into one command line
    pub fn render(&self) -> String {
        self.operations
            .iter()
            .map(SubOperation::text)
            .collect::<Vec<_>>()
            .join(COMPOSE_SEPARATOR)
    }

    /// Execute each sub-operation on its own, in order
    ///
    /// Failures do not stop the run; the caller inspects the report.
    pub fn run(&self, executor: &mut dyn Executor) -> ExecutionReport {
        let steps = self
            .operations
            .iter()
            .map(|op| StepResult {
                command: op.text().to_string(),
                output: executor.execute(op.text()),
            })
            .collect();

        ExecutionReport { steps }
    }
}

/// Result of one executed sub-operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepResult {
    pub command: String,
    pub output: StepOutput,
}

/// Per-step results of [`TaskStack::run`], in execution order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionReport {
    steps: Vec<StepResult>,
}

impl ExecutionReport {
    pub fn steps(&self) -> &[StepResult] {
        &self.steps
    }

    pub fn is_success(&self) -> bool {
        self.steps.iter().all(|s| s.output.success())
    }

    /// First step that exited non-zero
    pub fn first_failure(&self) -> Option<&StepResult> {
        self.steps.iter().find(|s| !s.output.success())
    }
}

/// Stack of arbitrary command lines
#[derive(Debug, Clone, Default)]
pub struct ExecStack {
    stack: TaskStack,
}

impl ExecStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exec(mut self, command: impl Into<String>) -> Self {
        self.stack.push(SubOperation::new(command));
        self
    }

    pub fn stack(&self) -> &TaskStack {
        &self.stack
    }

    pub fn command(&self) -> String {
        self.stack.render()
    }

    pub fn run(&self, executor: &mut dyn Executor) -> ExecutionReport {
        self.stack.run(executor)
    }
}
