//! Shared utilities for CLI commands

use std::fmt::Display;

use tabled::{Table, settings::Style};

/// Truncate a string with ellipsis if it exceeds max length
pub fn truncate_with_ellipsis(s: &str, max: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max - 3).collect();
        format!("{}...", truncated)
    }
}

/// Format an optional value for display, `-` when absent
pub fn format_optional<T: Display>(value: Option<T>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "-".to_string(),
    }
}

/// Format an optional text field, truncated to `max` characters
pub fn format_text(value: Option<&str>, max: usize) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => truncate_with_ellipsis(v, max),
        _ => "-".to_string(),
    }
}

/// Format a monetary amount with two decimals
pub fn format_amount(value: Option<f64>) -> String {
    format_optional(value.map(|v| format!("{:.2}", v)))
}

/// Apply consistent table styling
pub fn apply_table_style(table: &mut Table) {
    table.with(Style::rounded());
}
