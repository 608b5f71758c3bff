//! Output formatting and writing utilities
//!
//! This module provides utilities for formatting and writing output
//! in various formats (JSON, YAML, human-readable), with dedicated
//! support for per-path validation reports and progress indicators.

use crate::cli::OutputFormat;
use crate::error::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use schematic_core::SchemaError;
use serde::Serialize;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, trace};

/// Outcome of validating one path
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathReport {
    pub path: String,
    pub valid: bool,
    /// Manifest the path was harvested from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// `#key` suffix of a harvested placeholder
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
    /// Index of the constraint that rejected the path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraint: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl PathReport {
    /// Build a report from a validation result. `detailed` keeps the full
    /// constraint chain in the message instead of only the root cause.
    pub fn from_result(path: &str, result: &std::result::Result<(), SchemaError>, detailed: bool) -> Self {
        match result {
            Ok(()) => Self {
                path: path.to_string(),
                valid: true,
                file: None,
                key: None,
                error_kind: None,
                constraint: None,
                message: None,
            },
            Err(err) => Self {
                path: path.to_string(),
                valid: false,
                file: None,
                key: None,
                error_kind: Some(err.kind().to_string()),
                constraint: err.constraint_index(),
                message: Some(if detailed {
                    err.to_string()
                } else {
                    err.root_cause().to_string()
                }),
            },
        }
    }

    /// Attach the placeholder origin
    pub fn with_origin(mut self, file: PathBuf, key: Option<String>) -> Self {
        self.file = Some(file);
        self.key = key;
        self
    }
}

/// Trait for formatting output with specialized support for common types
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Format a batch of path reports
    fn format_reports(&self, reports: &[PathReport]) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
            OutputFormat::Human => {
                // For human format, use pretty JSON as fallback
                Ok(serde_json::to_string_pretty(value)?)
            }
        }
    }

    fn format_reports(&self, reports: &[PathReport]) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_reports_human(reports)),
            _ => self.format(&reports),
        }
    }
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    show_progress: bool,
    quiet: bool,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool) -> Self {
        Self {
            format,
            use_color,
            show_progress: !quiet && std::io::stderr().is_terminal(),
            quiet,
            writer: Box::new(io::stdout()),
        }
    }

    /// Create an output writer with a custom writer
    #[cfg(test)]
    pub fn with_writer(format: OutputFormat, use_color: bool, quiet: bool, writer: Box<dyn Write>) -> Self {
        Self {
            format,
            use_color,
            show_progress: false, // No progress bars with custom writers
            quiet,
            writer,
        }
    }

    /// Get the output format
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Write raw output
    pub fn write(&mut self, content: &str) -> Result<()> {
        write!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write a line of output
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write an info message
    pub fn info(&mut self, message: &str) -> Result<()> {
        debug!("Output info: {}", message);

        if self.quiet {
            return Ok(());
        }

        if self.format == OutputFormat::Human {
            if self.use_color {
                self.writeln(&format!("{} {}", "ℹ".blue(), message))
            } else {
                self.writeln(&format!("INFO: {}", message))
            }
        } else {
            Ok(())
        }
    }

    /// Write a success message
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        if self.format == OutputFormat::Human {
            if self.use_color {
                self.writeln(&message.green().to_string())
            } else {
                self.writeln(message)
            }
        } else {
            Ok(())
        }
    }

    /// Write a warning message
    pub fn warning(&mut self, message: &str) -> Result<()> {
        if self.format == OutputFormat::Human {
            if self.use_color {
                self.writeln(&message.yellow().to_string())
            } else {
                self.writeln(&format!("WARNING: {}", message))
            }
        } else {
            Ok(())
        }
    }

    /// Write an error message
    pub fn error(&mut self, message: &str) -> Result<()> {
        if self.format == OutputFormat::Human {
            if self.use_color {
                self.writeln(&message.red().to_string())
            } else {
                self.writeln(&format!("ERROR: {}", message))
            }
        } else {
            Ok(())
        }
    }

    /// Write a section header
    pub fn section(&mut self, title: &str) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        if self.format == OutputFormat::Human {
            self.writeln("")?;
            if self.use_color {
                self.writeln(&format!("═══ {} ═══", title).bright_blue().to_string())
            } else {
                self.writeln(&format!("=== {} ===", title))
            }
        } else {
            Ok(())
        }
    }

    /// Write data in the configured format
    pub fn data<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let formatted = self.format.format(value)?;
        trace!(bytes = formatted.len(), "Outputting data");

        if self.format == OutputFormat::Human {
            self.writeln(&formatted)
        } else {
            // For machine formats, write as-is
            self.write(&formatted)
        }
    }

    /// Write path reports. In human format each report gets its own line;
    /// failures go through [`OutputWriter::error`] and are shown even when quiet.
    pub fn reports(&mut self, reports: &[PathReport]) -> Result<()> {
        if self.format != OutputFormat::Human {
            let formatted = self.format.format_reports(reports)?;
            return self.writeln(&formatted);
        }

        for report in reports {
            if report.valid {
                if !self.quiet {
                    let line = format!("✓ {}", report_label(report));
                    self.success(&line)?;
                }
            } else {
                let line = format!(
                    "✗ {}: {}",
                    report_label(report),
                    report.message.as_deref().unwrap_or("invalid")
                );
                self.error(&line)?;
            }
        }
        Ok(())
    }

    /// Create a spinner for indeterminate progress
    pub fn spinner(&self, message: &str) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(default_spinner_style());
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    }
}

/// Helper function to create a spinner style
pub fn default_spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn report_label(report: &PathReport) -> String {
    match (&report.file, &report.key) {
        (Some(file), Some(key)) => format!("{} ({}#{})", report.path, file.display(), key),
        (Some(file), None) => format!("{} ({})", report.path, file.display()),
        _ => report.path.clone(),
    }
}

/// Format path reports for human reading
fn format_reports_human(reports: &[PathReport]) -> String {
    let mut output = String::new();
    let failed = reports.iter().filter(|r| !r.valid).count();

    for report in reports {
        if report.valid {
            output.push_str(&format!("✓ {}\n", report_label(report)));
        } else {
            output.push_str(&format!("✗ {}\n", report_label(report)));
            if let Some(kind) = &report.error_kind {
                output.push_str(&format!("    Kind: {}\n", kind));
            }
            if let Some(index) = report.constraint {
                output.push_str(&format!("    Constraint: #{}\n", index));
            }
            if let Some(message) = &report.message {
                output.push_str(&format!("    Message: {}\n", message));
            }
        }
    }

    output.push_str(&format!("{} of {} path(s) valid", reports.len() - failed, reports.len()));
    output
}
