//! CLI output formatting utilities.
//!
//! Provides consistent formatting for terminal output: colored status
//! messages, error diagnostics and Unicode symbols.

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const ARROW: &str = "→";
}

pub fn print_success(message: &str) {
  println!(
    "{} {}",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    message
  );
}

/// Print `error[<category>]: <message>` to stderr.
pub fn print_diagnostic(category: &str, message: &str) {
  let label = format!("error[{}]", category);
  eprintln!(
    "{}: {}",
    label.if_supports_color(Stream::Stderr, |s| s.red()),
    message
  );
}

pub fn print_stat(label: &str, value: &str) {
  println!(
    "  {}: {}",
    label.if_supports_color(Stream::Stdout, |s| s.dimmed()),
    value
  );
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{}", json);
  Ok(())
}

/// Render a dependency path as `A → B → C`.
pub fn format_path<S: AsRef<str>>(path: &[S]) -> String {
  let steps: Vec<&str> = path.iter().map(AsRef::as_ref).collect();
  steps.join(&format!(" {} ", symbols::ARROW))
}
