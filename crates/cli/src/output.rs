//! Terminal output utilities
//!
//! Provides consistent formatting for CLI output.

use owo_colors::OwoColorize;

/// Status message helpers
pub struct Status;

impl Status {
    /// Print a success message
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Print an error message
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Print a warning message
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print an info message
    pub fn info(message: &str) {
        println!("{} {}", "ℹ".blue(), message);
    }

    /// Print a header
    pub fn header(message: &str) {
        println!();
        println!("{}", message.bold());
        println!("{}", "─".repeat(message.chars().count()));
    }

    /// Print an aligned `label  value` row
    pub fn field(label: &str, value: impl std::fmt::Display) {
        println!("  {}  {}", format_label(label, LABEL_WIDTH).dimmed(), value);
    }
}

const LABEL_WIDTH: usize = 20;

/// Pad a label to a fixed width, leaving longer labels intact
pub fn format_label(label: &str, width: usize) -> String {
    format!("{:<width$}", label, width = width)
}

/// Format a count with singular/plural
pub fn format_count(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_label_pads() {
        assert_eq!(format_label("sdk", 6), "sdk   ");
    }

    #[test]
    fn test_format_label_keeps_long_labels() {
        assert_eq!(format_label("compile sdk", 4), "compile sdk");
    }

    #[test]
    fn test_format_count_singular() {
        assert_eq!(format_count(1, "entry", "entries"), "1 entry");
    }

    #[test]
    fn test_format_count_plural() {
        assert_eq!(format_count(4, "entry", "entries"), "4 entries");
    }
}
