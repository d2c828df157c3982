//! Command class document types
//!
//! A command class is the YAML document found in a robofile or embedded in a
//! shebang script. Each entry under `commands` becomes an invocable command.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Top-level command class
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CommandClass {
    /// Declared class name
    pub class: String,

    /// Application name (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Application usage description (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,

    /// Interpreter used for steps (e.g., ["bash", "-c"])
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interpreter: Option<Vec<String>>,

    /// Commands defined by this class
    #[serde(default)]
    pub commands: BTreeMap<String, CommandDef>,
}

/// A command definition
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CommandDef {
    /// Usage description for help text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,

    /// Longer description for help text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Hidden commands are callable but not listed in help
    #[serde(default)]
    pub hidden: bool,

    /// Positional arguments, in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<ArgDef>,

    /// Named options
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub options: BTreeMap<String, OptionDef>,

    /// Steps to execute
    #[serde(default, deserialize_with = "deserialize_steps")]
    pub run: Vec<Step>,
}

/// A positional argument
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArgDef {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,

    #[serde(default)]
    pub required: bool,
}

/// A named option
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OptionDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,

    /// Short flag (single character)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<String>,

    /// Option type (string or bool)
    #[serde(rename = "type", default = "default_option_type")]
    pub option_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,

    /// Environment variable to read when the option is not given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
}

impl OptionDef {
    pub fn is_flag(&self) -> bool {
        matches!(self.option_type.as_str(), "bool" | "boolean")
    }
}

fn default_option_type() -> String {
    "string".to_string()
}

/// One step of a command
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Step {
    /// Shell command line
    Shell(String),

    /// Git task stack
    Git(GitStep),

    /// Generic exec stack
    Stack(StackStep),
}

/// A git task stack step
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GitStep {
    pub git: Vec<GitOpSpec>,

    #[serde(default = "default_git")]
    pub executable: String,
}

fn default_git() -> String {
    "git".to_string()
}

/// A git operation as written in the document: `- pull` or `- add: -A`
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum GitOpSpec {
    Bare(String),
    WithValue(BTreeMap<String, String>),
}

impl GitOpSpec {
    /// The verb and its raw value, or `None` for a map with more or fewer than one key
    pub fn verb_and_value(&self) -> Option<(&str, &str)> {
        match self {
            GitOpSpec::Bare(verb) => Some((verb.as_str(), "")),
            GitOpSpec::WithValue(map) if map.len() == 1 => map
                .iter()
                .next()
                .map(|(verb, value)| (verb.as_str(), value.as_str())),
            GitOpSpec::WithValue(_) => None,
        }
    }
}

/// A generic exec stack step
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StackStep {
    pub stack: Vec<String>,
}

/// Accepts `run` as a single string or a list of steps
fn deserialize_steps<'de, D>(deserializer: D) -> Result<Vec<Step>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    use serde_yaml::Value;

    let value = Value::deserialize(deserializer)?;

    match value {
        Value::String(s) => Ok(vec![Step::Shell(s)]),
        Value::Sequence(seq) => seq
            .into_iter()
            .map(|item| Step::deserialize(item).map_err(D::Error::custom))
            .collect(),
        Value::Mapping(_) => {
            let step = Step::deserialize(value).map_err(D::Error::custom)?;
            Ok(vec![step])
        }
        Value::Null => Ok(Vec::new()),
        _ => Err(D::Error::custom("run must be a string, step, or list of steps")),
    }
}
