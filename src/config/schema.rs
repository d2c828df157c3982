//! Command class validation

use crate::config::types::{CommandClass, CommandDef, Step};
use crate::error::{ConfigError, ConfigResult};
use crate::runner::git::GIT_VERBS;

/// Command names the application itself owns
pub const RESERVED_COMMANDS: &[&str] = &["help", "init"];

/// Flag names the application itself owns
pub const RESERVED_FLAGS: &[&str] = &["help", "quiet", "silent", "verbose", "simulate"];

/// Short flags the application itself owns
pub const RESERVED_SHORTS: &[char] = &['h', 'q', 's', 'v'];

/// Validate a complete command class
pub fn validate_class(class: &CommandClass) -> ConfigResult<()> {
    validate_identifier("class name", &class.class)?;

    if let Some(interpreter) = &class.interpreter {
        if interpreter.is_empty() {
            return Err(ConfigError::Invalid("interpreter must not be empty".to_string()));
        }
    }

    for (name, command) in &class.commands {
        validate_command(name, command)?;
    }

    Ok(())
}

/// Validate a single command definition
pub fn validate_command(name: &str, command: &CommandDef) -> ConfigResult<()> {
    validate_identifier("command name", name)?;

    if RESERVED_COMMANDS.contains(&name) {
        return Err(ConfigError::Invalid(format!(
            "'{}' is a reserved command name",
            name
        )));
    }

    // Args and options share one variable namespace
    let mut seen: Vec<&str> = Vec::new();
    let mut shorts: Vec<char> = Vec::new();
    for arg_name in command.args.iter().map(|a| a.name.as_str()) {
        validate_identifier("argument name", arg_name)?;
        validate_not_reserved(arg_name)?;
        if seen.contains(&arg_name) {
            return Err(ConfigError::DuplicateNames(arg_name.to_string()));
        }
        seen.push(arg_name);
    }
    for (opt_name, option) in &command.options {
        validate_identifier("option name", opt_name)?;
        validate_not_reserved(opt_name)?;
        if seen.contains(&opt_name.as_str()) {
            return Err(ConfigError::DuplicateNames(opt_name.clone()));
        }
        seen.push(opt_name.as_str());
        validate_option_type(&option.option_type)?;
        if let Some(short) = &option.short {
            let mut chars = short.chars();
            let (first, rest) = (chars.next(), chars.next());
            if rest.is_some() || first.map_or(true, |c| RESERVED_SHORTS.contains(&c)) {
                return Err(ConfigError::Invalid(format!(
                    "short flag for '{}' must be a single character other than h, q, s, v",
                    opt_name
                )));
            }
            if let Some(c) = first {
                if shorts.contains(&c) {
                    return Err(ConfigError::Invalid(format!(
                        "short flag '{}' is used twice in '{}'",
                        c, name
                    )));
                }
                shorts.push(c);
            }
        }
    }

    for step in &command.run {
        if let Step::Git(git) = step {
            for op in &git.git {
                match op.verb_and_value() {
                    Some((verb, _)) if GIT_VERBS.contains(&verb) => {}
                    Some((verb, _)) => {
                        return Err(ConfigError::UnknownGitOperation(verb.to_string()))
                    }
                    None => {
                        return Err(ConfigError::Invalid(format!(
                            "git operation in '{}' must have exactly one verb",
                            name
                        )))
                    }
                }
            }
        }
    }

    Ok(())
}

fn validate_not_reserved(name: &str) -> ConfigResult<()> {
    if RESERVED_FLAGS.contains(&name) {
        return Err(ConfigError::Invalid(format!(
            "'{}' is reserved for a global flag",
            name
        )));
    }
    Ok(())
}

fn validate_identifier(what: &str, value: &str) -> ConfigResult<()> {
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        return Err(ConfigError::Invalid(format!(
            "{} '{}' must be non-empty and contain no whitespace",
            what, value
        )));
    }
    Ok(())
}

/// Validate an option type string
fn validate_option_type(option_type: &str) -> ConfigResult<()> {
    match option_type {
        "string" | "str" | "bool" | "boolean" => Ok(()),
        _ => Err(ConfigError::Invalid(format!(
            "Invalid option type: {}. Must be one of: string, bool",
            option_type
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class_from(yaml: &str) -> CommandClass {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_valid_class() {
        let class = class_from(
            r#"
class: RoboFile
commands:
  build:
    args:
      - name: target
    options:
      release:
        type: bool
        short: r
    run:
      - cargo build
      - git:
          - add: -A
          - pull
"#,
        );
        assert!(validate_class(&class).is_ok());
    }

    #[test]
    fn test_class_name_with_whitespace() {
        let class = class_from("class: \"Robo File\"\n");
        assert!(matches!(validate_class(&class), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_duplicate_arg_and_option() {
        let class = class_from(
            r#"
class: RoboFile
commands:
  greet:
    args:
      - name: name
    options:
      name:
        usage: clash
"#,
        );
        assert!(matches!(
            validate_class(&class),
            Err(ConfigError::DuplicateNames(n)) if n == "name"
        ));
    }

    #[test]
    fn test_unknown_git_verb() {
        let class = class_from(
            r#"
class: RoboFile
commands:
  sync:
    run:
      - git:
          - rebase: main
"#,
        );
        assert!(matches!(
            validate_class(&class),
            Err(ConfigError::UnknownGitOperation(v)) if v == "rebase"
        ));
    }

    #[test]
    fn test_invalid_option_type() {
        let class = class_from(
            r#"
class: RoboFile
commands:
  build:
    options:
      jobs:
        type: int
"#,
        );
        assert!(validate_class(&class).is_err());
    }

    #[test]
    fn test_reserved_flag_names() {
        let class = class_from(
            "class: RoboFile\ncommands:\n  build:\n    options:\n      verbose:\n        type: bool\n",
        );
        assert!(validate_class(&class).is_err());

        let class = class_from(
            "class: RoboFile\ncommands:\n  build:\n    options:\n      fast:\n        short: q\n",
        );
        assert!(validate_class(&class).is_err());
    }

    #[test]
    fn test_reserved_command_name() {
        let class = class_from("class: RoboFile\ncommands:\n  help:\n    run: echo\n");
        assert!(validate_class(&class).is_err());
    }
}
