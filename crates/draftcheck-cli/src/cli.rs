//! Command-line interface argument parsing and definitions
//!
//! Copyright (c) 2025 Draftcheck Team
//! Licensed under the Apache-2.0 license

use clap::{Parser, Subcommand, ValueEnum};
use draftcheck_schemas::DraftVersion;
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::path::PathBuf;

/// Draftcheck - validate JSON and YAML documents against JSON Schema
///
/// Supports draft-04, draft-06 and draft-07 schemas with local and
/// file-based `$ref` resolution.
#[derive(Parser, Debug)]
#[command(
    name = "draftcheck",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "DRAFTCHECK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for results [default: human]
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate one or more documents against a schema
    Validate(ValidateArgs),

    /// Show the draft a schema declares and any schema diagnostics
    Draft(DraftArgs),

    /// List the `$ref` strings a schema contains
    Refs(RefsArgs),
}

/// Arguments for the validate command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Schema document (JSON or YAML)
    #[arg(short, long, value_name = "SCHEMA")]
    pub schema: PathBuf,

    /// Documents to validate (JSON or YAML, chosen by extension)
    #[arg(value_name = "INSTANCE", required = true, num_args = 1..)]
    pub instances: Vec<PathBuf>,

    /// Draft assumed when the schema declares no `$schema` (4, 6 or 7)
    #[arg(long, value_name = "DRAFT", value_parser = parse_draft)]
    pub default_draft: Option<DraftVersion>,

    /// Treat `format` as an annotation only
    #[arg(long)]
    pub ignore_formats: bool,
}

/// Arguments for the draft command
#[derive(Parser, Debug)]
pub struct DraftArgs {
    /// Schema document (JSON or YAML)
    #[arg(value_name = "SCHEMA")]
    pub schema: PathBuf,
}

/// Arguments for the refs command
#[derive(Parser, Debug)]
pub struct RefsArgs {
    /// Schema document (JSON or YAML)
    #[arg(value_name = "SCHEMA")]
    pub schema: PathBuf,

    /// Only list references into other documents
    #[arg(long)]
    pub external: bool,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Human-readable formatted output
    Human,
    /// JSON output
    Json,
    /// Pretty-printed JSON output
    JsonPretty,
}

fn parse_draft(raw: &str) -> Result<DraftVersion, String> {
    let number: u8 = raw
        .trim_start_matches("draft-")
        .parse()
        .map_err(|_| format!("'{}' is not a draft number", raw))?;
    DraftVersion::try_from(number)
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Colored output needs the flag, the configured preference and a terminal
    pub fn use_color(&self, configured: bool) -> bool {
        !self.no_color && configured && std::io::stdout().is_terminal()
    }

    /// The output format flag wins over the configured one
    pub fn output_format(&self, configured: OutputFormat) -> OutputFormat {
        self.output.unwrap_or(configured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_validate_arguments() {
        let cli = Cli::parse_from([
            "draftcheck",
            "-vv",
            "validate",
            "--schema",
            "schema.json",
            "a.json",
            "b.yaml",
            "--default-draft",
            "4",
        ]);
        assert_eq!(cli.verbosity_level(), 2);
        match cli.command {
            Commands::Validate(args) => {
                assert_eq!(args.schema, PathBuf::from("schema.json"));
                assert_eq!(args.instances, vec![PathBuf::from("a.json"), PathBuf::from("b.yaml")]);
                assert_eq!(args.default_draft, Some(DraftVersion::Draft4));
                assert!(!args.ignore_formats);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_validate_requires_instances() {
        let parsed = Cli::try_parse_from(["draftcheck", "validate", "--schema", "schema.json"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_draft_parser() {
        assert_eq!(parse_draft("7"), Ok(DraftVersion::Draft7));
        assert_eq!(parse_draft("draft-06"), Ok(DraftVersion::Draft6));
        assert!(parse_draft("5").is_err());
        assert!(parse_draft("latest").is_err());
    }

    #[test]
    fn test_quiet_and_output_flags() {
        let cli = Cli::parse_from(["draftcheck", "--quiet", "-o", "json-pretty", "draft", "s.json"]);
        assert_eq!(cli.verbosity_level(), 0);
        assert_eq!(cli.output_format(OutputFormat::Human), OutputFormat::JsonPretty);

        let cli = Cli::parse_from(["draftcheck", "--no-color", "refs", "s.json"]);
        assert_eq!(cli.output_format(OutputFormat::Json), OutputFormat::Json);
        assert!(!cli.use_color(true));
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["draftcheck", "-v", "-q", "draft", "s.json"]).is_err());
    }
}
