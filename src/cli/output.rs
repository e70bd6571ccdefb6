//! Output formatting for CLI commands

use serde::Serialize;

use crate::search::{CapacityScheme, Schedule};
pub use crate::storage::OutputFormat;

/// Output helper for consistent formatting
pub struct Output {
    format: OutputFormat,
    verbose: bool,
}

impl Output {
    pub fn new(format: OutputFormat, verbose: bool) -> Self {
        Self { format, verbose }
    }

    /// Prints structured data
    pub fn data<T: Serialize>(&self, data: &T) {
        match self.format {
            OutputFormat::Text => {
                // Callers print their own text; this is a readable fallback
                if let Ok(json) = serde_json::to_string_pretty(data) {
                    println!("{}", json);
                }
            }
            OutputFormat::Json => {
                if let Ok(json) = serde_json::to_string(data) {
                    println!("{}", json);
                }
            }
        }
    }

    /// Prints a schedule grouped by day (text only)
    pub fn schedule(&self, scheme: &CapacityScheme, schedule: &Schedule) {
        if self.format != OutputFormat::Text {
            return;
        }
        if schedule.is_empty() {
            println!("  (nothing to schedule)");
            return;
        }

        for (day, entries) in schedule.by_day() {
            println!("  Day {}:", day);
            for channel in 0..scheme.len() {
                let tasks: Vec<String> = entries
                    .iter()
                    .filter(|e| e.channel == channel)
                    .map(|e| e.task.to_string())
                    .collect();
                if !tasks.is_empty() {
                    println!("    {:<10} {}", channel_label(scheme, channel), tasks.join(", "));
                }
            }
        }
    }

    /// Prints a blank line (text only)
    pub fn blank(&self) {
        if self.format == OutputFormat::Text {
            println!();
        }
    }

    /// Returns true if using JSON format
    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Returns true if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Prints a verbose debug message with context (only when --verbose is set)
    pub fn verbose_ctx(&self, context: &str, message: &str) {
        if self.verbose {
            eprintln!("[verbose:{}] {}", context, message);
        }
    }
}

/// Channels dedicated to a class are named after it; open ones are numbered from 1
pub fn channel_label(scheme: &CapacityScheme, channel: usize) -> String {
    match scheme.channels()[channel].class {
        Some(class) => class.to_string(),
        None => format!("channel {}", channel + 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_follow_channel_kind() {
        let uniform = CapacityScheme::uniform(2, 3).unwrap();
        assert_eq!(channel_label(&uniform, 1), "channel 2");

        let per_class = CapacityScheme::per_class(3, 3);
        assert_eq!(channel_label(&per_class, 0), "even");
        assert_eq!(channel_label(&per_class, 1), "odd");
    }

    #[test]
    fn output_modes() {
        let output = Output::new(OutputFormat::Json, true);
        assert!(output.is_json());
        assert!(output.is_verbose());

        let output = Output::new(OutputFormat::Text, false);
        assert!(!output.is_json());
        assert!(!output.is_verbose());
    }
}
