//! Console styling and the process-level error report

use colored::{Color, Colorize};
use std::any::Any;
use std::panic;

/// Minimum width of a yelled banner
const YELL_WIDTH: usize = 40;

/// Lines of a boxed banner, padded to a common width
pub fn banner(text: &str) -> Vec<String> {
    let width = text.chars().count().max(YELL_WIDTH);
    let blank = " ".repeat(width + 4);
    let body = format!("  {:<width$}  ", text, width = width);
    vec![blank.clone(), body, blank]
}

/// Print a loud banner on stderr
pub fn yell(text: &str, color: Color) {
    eprintln!();
    for line in banner(text) {
        eprintln!("{}", line.white().bold().on_color(color));
    }
    eprintln!();
}

pub fn warn(message: &str) {
    eprintln!("{}", message.yellow());
}

pub fn error(message: &str) {
    eprintln!("{}", message.red());
}

pub fn success(message: &str) {
    println!("{}", message.green());
}

/// Format an uncaught fault as a single report
pub fn format_error_report(message: &str, location: Option<(&str, u32)>) -> String {
    match location {
        Some((file, line)) => format!("ERROR: {} \nin {}:{}\n", message, file, line),
        None => format!("ERROR: {}\n", message),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown error".to_string()
    }
}

/// Render any uncaught panic as a formatted error report instead of a raw dump
pub fn install_panic_hook() {
    panic::set_hook(Box::new(|info| {
        let location = info.location().map(|l| (l.file(), l.line()));
        let report = format_error_report(&panic_message(info.payload()), location);
        eprint!("{}", report.red());
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_minimum_width() {
        let lines = banner("hi");
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|l| l.chars().count() == YELL_WIDTH + 4));
        assert!(lines[1].starts_with("  hi"));
    }

    #[test]
    fn test_banner_grows_with_text() {
        let text = "x".repeat(60);
        let lines = banner(&text);
        assert_eq!(lines[1], format!("  {}  ", text));
        assert_eq!(lines[0].len(), 64);
    }

    #[test]
    fn test_error_report_with_location() {
        let report = format_error_report("boom", Some(("src/main.rs", 7)));
        assert_eq!(report, "ERROR: boom \nin src/main.rs:7\n");
    }

    #[test]
    fn test_panic_message_payloads() {
        assert_eq!(panic_message(&"static"), "static");
        assert_eq!(panic_message(&"owned".to_string()), "owned");
        assert_eq!(panic_message(&42u8), "unknown error");
    }

    #[test]
    fn test_error_report_without_location() {
        assert_eq!(format_error_report("boom", None), "ERROR: boom\n");
    }
}
