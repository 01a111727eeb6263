//! Output formatting and writing utilities
//!
//! Results are written either as human-readable text or as JSON documents.
//!
//! Copyright (c) 2025 Draftcheck Team
//! Licensed under the Apache-2.0 license

use crate::cli::OutputFormat;
use crate::error::Result;
use colored::Colorize;
use draftcheck_schemas::{ValidationError, ValidationErrors};
use serde::Serialize;
use std::io::{self, Write};
use tracing::trace;

/// Serialize a value in the machine formats; human output pretty-prints
pub fn format_data<T: Serialize>(format: OutputFormat, value: &T) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string(value)?),
        OutputFormat::JsonPretty | OutputFormat::Human => Ok(serde_json::to_string_pretty(value)?),
    }
}

/// Render one validation error as a bullet line
pub fn format_validation_error_human(error: &ValidationError, use_color: bool) -> String {
    let kind = format!("[{}]", error.kind);
    let location = match &error.path {
        Some(path) => format!(" at {}", path),
        None => String::new(),
    };
    if use_color {
        format!(
            "  • {} {}{}",
            kind.dimmed(),
            error.message,
            location.cyan()
        )
    } else {
        format!("  - {} {}{}", kind, error.message, location)
    }
}

/// Render every error of a report, one per line
pub fn format_validation_errors_human(errors: &ValidationErrors, use_color: bool) -> String {
    errors
        .iter()
        .map(|error| format_validation_error_human(error, use_color))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    quiet: bool,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool) -> Self {
        Self::with_writer(format, use_color, quiet, Box::new(io::stdout()))
    }

    /// Create an output writer with a custom writer
    pub fn with_writer(
        format: OutputFormat,
        use_color: bool,
        quiet: bool,
        writer: Box<dyn Write>,
    ) -> Self {
        Self {
            format,
            use_color,
            quiet,
            writer,
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn is_human(&self) -> bool {
        self.format == OutputFormat::Human
    }

    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write an info message
    pub fn info(&mut self, message: &str) -> Result<()> {
        if self.quiet || !self.is_human() {
            return Ok(());
        }
        if self.use_color {
            self.writeln(&format!("{} {}", "ℹ".blue(), message))
        } else {
            self.writeln(&format!("INFO: {}", message))
        }
    }

    /// Write a success message
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet || !self.is_human() {
            return Ok(());
        }
        if self.use_color {
            self.writeln(&message.green().to_string())
        } else {
            self.writeln(message)
        }
    }

    /// Write a warning message
    pub fn warning(&mut self, message: &str) -> Result<()> {
        if !self.is_human() {
            return Ok(());
        }
        if self.use_color {
            self.writeln(&message.yellow().to_string())
        } else {
            self.writeln(&format!("WARNING: {}", message))
        }
    }

    /// Write an error message; shown even in quiet mode
    pub fn error(&mut self, message: &str) -> Result<()> {
        if !self.is_human() {
            return Ok(());
        }
        if self.use_color {
            self.writeln(&message.red().to_string())
        } else {
            self.writeln(&format!("ERROR: {}", message))
        }
    }

    /// Write a section header
    pub fn section(&mut self, title: &str) -> Result<()> {
        if self.quiet || !self.is_human() {
            return Ok(());
        }
        self.writeln("")?;
        if self.use_color {
            self.writeln(&format!("═══ {} ═══", title).bright_blue().to_string())
        } else {
            self.writeln(&format!("=== {} ===", title))
        }
    }

    /// Write validation errors as a bullet list (human format only)
    pub fn validation_errors(&mut self, errors: &ValidationErrors) -> Result<()> {
        if !self.is_human() || errors.is_empty() {
            return Ok(());
        }
        let formatted = format_validation_errors_human(errors, self.use_color);
        self.writeln(&formatted)
    }

    /// Write data in the configured machine format; human output skips it
    pub fn data<T: Serialize>(&mut self, value: &T) -> Result<()> {
        if self.is_human() {
            return Ok(());
        }
        let formatted = format_data(self.format, value)?;
        trace!(bytes = formatted.len(), "Writing structured output");
        self.writeln(&formatted)
    }
}
