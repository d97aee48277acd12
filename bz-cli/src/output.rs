//! # Output Formatting
//!
//! Colored helpers for user-facing messages and bug rendering.

use owo_colors::OwoColorize;

/// Enum representing different color modes for output
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
  /// Enable colored output
  Always,
  /// Automatically detect if colors should be used based on terminal
  /// capabilities
  Auto,
  /// Disable colored output
  Never,
}

impl ColorMode {
  /// Apply the mode as a global override for owo-colors
  pub fn apply(self) {
    match self {
      Self::Always => owo_colors::set_override(true),
      Self::Never => owo_colors::set_override(false),
      // Leave terminal detection to owo-colors
      Self::Auto => {}
    }
  }
}

const LINE_WIDTH: usize = 78;

/// Print a success message
pub fn print_success(message: &str) {
  println!("{} {}", "✓".green().bold(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
  eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
  println!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
  println!("{} {}", "ℹ".blue().bold(), message);
}

/// Print a title centered in a horizontal rule
pub fn print_banner(title: &str) {
  println!("\n{}", banner(title));
}

/// Print the closing horizontal rule of a banner section
pub fn print_rule() {
  println!("{}\n", "─".repeat(LINE_WIDTH));
}

/// Print a labelled field as a bullet
pub fn print_field(label: &str, value: &str) {
  println!("  {} {:<15} {}", "•".blue(), format!("{label}:").bold(), value);
}

/// Format a status, with the resolution appended when there is one
pub fn format_status(status: &str, resolution: &str) -> String {
  let text = if resolution.is_empty() {
    status.to_string()
  } else {
    format!("{status} ({resolution})")
  };

  match status {
    "CLOSED" | "VERIFIED" | "RELEASE_PENDING" => text.green().to_string(),
    "NEW" | "ASSIGNED" => text.yellow().to_string(),
    _ => text.cyan().to_string(),
  }
}

/// Format a command or command example
pub fn format_command(cmd: &str) -> String {
  cmd.purple().to_string()
}

fn banner(title: &str) -> String {
  let title = format!(" {title} ");
  let title_len = title.chars().count().min(LINE_WIDTH);
  let left_padding = (LINE_WIDTH - title_len) / 2;
  let right_padding = LINE_WIDTH - title_len - left_padding;

  format!(
    "{}{}{}",
    "─".repeat(left_padding),
    title.blue().bold(),
    "─".repeat(right_padding)
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_banner_width() {
    owo_colors::set_override(false);
    assert_eq!(banner("Bug 1").chars().count(), LINE_WIDTH);
    assert!(banner("Bug 1").contains(" Bug 1 "));
  }

  #[test]
  fn test_banner_long_title() {
    owo_colors::set_override(false);
    let title = "x".repeat(100);
    assert!(banner(&title).contains(&title));
  }

  #[test]
  fn test_format_status() {
    owo_colors::set_override(false);
    assert_eq!(format_status("NEW", ""), "NEW");
    assert_eq!(format_status("CLOSED", "ERRATA"), "CLOSED (ERRATA)");
  }
}
