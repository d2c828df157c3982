//! Command class parsing

use crate::config::schema::validate_class;
use crate::config::types::CommandClass;
use crate::error::RoboError;
use std::fs;
use std::path::Path;

/// Parse and validate a command class from YAML source
pub fn parse_class(yaml: &str) -> Result<CommandClass, RoboError> {
    let class: CommandClass = serde_yaml::from_str(yaml)?;
    validate_class(&class)?;
    Ok(class)
}

/// Parse and validate a command class from a file
pub fn parse_class_file(path: &Path) -> Result<CommandClass, RoboError> {
    let contents = fs::read_to_string(path)?;
    parse_class(&contents)
}
