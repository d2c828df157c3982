//! Git task stack
//!
//! Chained builder over [`TaskStack`]: each call appends one git invocation.

use crate::error::{ConfigError, ConfigResult};
use crate::runner::{ExecutionReport, Executor, SubOperation, TaskStack};

/// Verbs accepted by [`GitStack::apply`]
pub const GIT_VERBS: &[&str] = &[
    "clone", "add", "commit", "pull", "push", "checkout", "merge", "tag",
];

/// Builder for a sequence of git commands
#[derive(Debug, Clone)]
pub struct GitStack {
    git: String,
    stack: TaskStack,
}

impl GitStack {
    pub fn new(executable: impl Into<String>) -> Self {
        GitStack {
            git: executable.into(),
            stack: TaskStack::new(),
        }
    }

    fn exec(mut self, parts: &[&str]) -> Self {
        self.stack.push(SubOperation::from_parts(&self.git, parts));
        self
    }

    pub fn clone_repo(self, repo: &str) -> Self {
        self.clone_repo_to(repo, "")
    }

    pub fn clone_repo_to(self, repo: &str, to: &str) -> Self {
        self.exec(&["clone", repo, to])
    }

    pub fn add(self, pattern: &str) -> Self {
        self.exec(&["add", pattern])
    }

    pub fn commit(self, message: &str) -> Self {
        self.commit_with(message, "")
    }

    pub fn commit_with(self, message: &str, options: &str) -> Self {
        let message = format!("-m '{}'", message);
        self.exec(&["commit", &message, options])
    }

    pub fn pull(self) -> Self {
        self.pull_from("", "")
    }

    pub fn pull_from(self, origin: &str, branch: &str) -> Self {
        self.exec(&["pull", origin, branch])
    }

    pub fn push(self) -> Self {
        self.push_to("", "")
    }

    pub fn push_to(self, origin: &str, branch: &str) -> Self {
        self.exec(&["push", origin, branch])
    }

    pub fn checkout(self, branch: &str) -> Self {
        self.exec(&["checkout", branch])
    }

    pub fn merge(self, branch: &str) -> Self {
        self.exec(&["merge", branch])
    }

    pub fn tag(self, name: &str) -> Self {
        self.exec(&["tag", name])
    }

    /// Append an operation named by verb, as written in a command class
    ///
    /// `clone`, `pull` and `push` split `value` on whitespace into their two
    /// optional arguments; every other verb takes `value` whole.
    pub fn apply(self, verb: &str, value: &str) -> ConfigResult<Self> {
        let mut words = value.split_whitespace();
        let mut next = || words.next().unwrap_or("");

        let stack = match verb {
            "clone" => {
                let (repo, to) = (next(), next());
                self.clone_repo_to(repo, to)
            }
            "add" => self.add(value),
            "commit" => self.commit(value),
            "pull" => {
                let (origin, branch) = (next(), next());
                self.pull_from(origin, branch)
            }
            "push" => {
                let (origin, branch) = (next(), next());
                self.push_to(origin, branch)
            }
            "checkout" => self.checkout(value),
            "merge" => self.merge(value),
            "tag" => self.tag(value),
            other => return Err(ConfigError::UnknownGitOperation(other.to_string())),
        };
        Ok(stack)
    }

    pub fn stack(&self) -> &TaskStack {
        &self.stack
    }

    /// The whole stack as one `&&`-composed command line
    pub fn command(&self) -> String {
        self.stack.render()
    }

    /// Run each git command on its own, in order
    pub fn run(&self, executor: &mut dyn Executor) -> ExecutionReport {
        self.stack.run(executor)
    }
}

impl Default for GitStack {
    fn default() -> Self {
        GitStack::new("git")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbs_render_with_optional_gaps() {
        let stack = GitStack::default()
            .checkout("main")
            .merge("feature")
            .tag("v1.0")
            .commit_with("fix", "--amend")
            .pull_from("origin", "main")
            .push_to("origin", "main");

        let texts: Vec<_> = stack.stack().operations().iter().map(|o| o.text()).collect();
        assert_eq!(
            texts,
            vec![
                "git checkout main",
                "git merge feature",
                "git tag v1.0",
                "git commit -m 'fix' --amend",
                "git pull origin main",
                "git push origin main",
            ]
        );
    }

    #[test]
    fn test_custom_executable() {
        let stack = GitStack::new("/usr/local/bin/git").pull();
        assert_eq!(stack.command(), "/usr/local/bin/git pull  ");
    }

    #[test]
    fn test_apply_matches_typed_builder() {
        let applied = GitStack::default()
            .apply("clone", "http://example.com/repo.git")
            .unwrap()
            .apply("pull", "")
            .unwrap()
            .apply("add", "-A")
            .unwrap()
            .apply("commit", "two words")
            .unwrap()
            .apply("push", "origin main")
            .unwrap();

        let typed = GitStack::default()
            .clone_repo("http://example.com/repo.git")
            .pull()
            .add("-A")
            .commit("two words")
            .push_to("origin", "main");

        assert_eq!(applied.command(), typed.command());
    }

    #[test]
    fn test_apply_unknown_verb() {
        let result = GitStack::default().apply("rebase", "main");
        assert!(matches!(result, Err(ConfigError::UnknownGitOperation(v)) if v == "rebase"));
    }

    #[test]
    fn test_every_listed_verb_applies() {
        for verb in GIT_VERBS {
            assert!(GitStack::default().apply(verb, "x").is_ok(), "{}", verb);
        }
    }
}
