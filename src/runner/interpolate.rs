//! Variable interpolation for command text
//!
//! Replaces `${var}` placeholders in step commands and git operation values.

use crate::error::{InterpolationError, InterpolationResult};
use regex::Regex;
use std::collections::HashMap;
use std::env;
use std::sync::OnceLock;

fn placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern is valid"))
}

/// Replace each placeholder in `template` once with what `lookup` yields
///
/// Substituted text is never scanned again. Placeholders `lookup` has no
/// value for are kept as written.
fn substitute<F>(template: &str, mut lookup: F) -> InterpolationResult<String>
where
    F: FnMut(&str) -> InterpolationResult<Option<String>>,
{
    if let Some(pos) = template.find("${") {
        if !template[pos..].contains('}') {
            return Err(InterpolationError::InvalidSyntax(template.to_string()));
        }
    }

    let mut out = String::with_capacity(template.len());
    let mut last = 0;
    for caps in placeholder().captures_iter(template) {
        let Some(whole) = caps.get(0) else { continue };
        out.push_str(&template[last..whole.start()]);
        match lookup(&caps[1])? {
            Some(value) => out.push_str(&value),
            None => out.push_str(whole.as_str()),
        }
        last = whole.end();
    }
    out.push_str(&template[last..]);
    Ok(out)
}

/// Interpolate variables in a string
///
/// Lookup order is the provided variables, then the process environment.
/// Values are inserted verbatim, so text typed on the command line is never
/// expanded. Unknown placeholders are left as written so the shell can still
/// see them.
pub fn interpolate(s: &str, vars: &HashMap<String, String>) -> InterpolationResult<String> {
    substitute(s, |name| {
        Ok(vars.get(name).cloned().or_else(|| env::var(name).ok()))
    })
}

/// Interpolate a list of strings
pub fn interpolate_list(
    list: &[String],
    vars: &HashMap<String, String>,
) -> InterpolationResult<Vec<String>> {
    list.iter()
        .map(|s| interpolate(s, vars))
        .collect::<InterpolationResult<Vec<String>>>()
}

/// Expand definitions written in a command class, such as argument defaults
///
/// A definition may refer to other definitions, which are expanded in turn,
/// to the given `vars` and to the environment. Only definitions are expanded
/// recursively; `vars` and environment values are inserted verbatim. A
/// definition that reaches itself fails with `RecursiveInterpolation`.
pub fn expand_definitions(
    defs: &HashMap<String, String>,
    vars: &HashMap<String, String>,
) -> InterpolationResult<HashMap<String, String>> {
    let mut expanded = HashMap::new();
    for (name, template) in defs {
        expand_definition(name, template, defs, vars, &mut expanded, &mut Vec::new())?;
    }
    Ok(expanded)
}

fn expand_definition(
    name: &str,
    template: &str,
    defs: &HashMap<String, String>,
    vars: &HashMap<String, String>,
    expanded: &mut HashMap<String, String>,
    active: &mut Vec<String>,
) -> InterpolationResult<String> {
    if let Some(value) = expanded.get(name) {
        return Ok(value.clone());
    }
    if active.iter().any(|n| n == name) {
        return Err(InterpolationError::RecursiveInterpolation);
    }

    active.push(name.to_string());
    let value = substitute(template, |reference| {
        if let Some(value) = vars.get(reference) {
            return Ok(Some(value.clone()));
        }
        if let Some(nested) = defs.get(reference) {
            return expand_definition(reference, nested, defs, vars, expanded, active).map(Some);
        }
        Ok(env::var(reference).ok())
    })?;
    active.pop();

    expanded.insert(name.to_string(), value.clone());
    Ok(value)
}
