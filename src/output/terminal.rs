//! Terminal output utilities.
//!
//! Provides formatting helpers for terminal output.

use colored::Colorize;
use serde::Serialize;
use std::error::Error;

/// Format a value as a quoted, right-aligned field.
///
/// # Arguments
/// * `value` - The value to format
/// * `width` - The minimum width of the field
///
/// # Returns
/// A quoted, right-aligned string
pub fn format_field<T: ToString>(value: T, width: usize) -> String {
    let value_str = value.to_string();
    let quoted = format!("\"{value_str}\"");
    let quoted_len = quoted.len();

    if quoted_len >= width {
        quoted
    } else {
        format!("{quoted:>width$}")
    }
}

/// Format a `label: value` line with the label padded to `width`.
pub fn format_pair<T: ToString>(label: &str, value: T, width: usize) -> String {
    format!("{:<width$} {}", format!("{label}:"), value.to_string())
}

/// Print labelled values, labels highlighted.
pub fn print_pairs(pairs: &[(&str, String)]) {
    let width = pairs.iter().map(|(l, _)| l.len() + 1).max().unwrap_or(0);
    for (label, value) in pairs {
        let line = format_pair(label, value, width);
        let (head, tail) = line.split_at(width.min(line.len()));
        println!("{}{}", head.bold(), tail);
    }
}

/// Print a section heading.
pub fn print_heading(title: &str) {
    println!("{}", format!("# {title}").on_blue());
}

/// Pretty-print any serializable value as JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
