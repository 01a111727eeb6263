//! Draftcheck CLI - validate documents against JSON Schema from the shell
//!
//! Copyright (c) 2025 Draftcheck Team
//! Licensed under the Apache-2.0 license

mod cli;
mod config;
mod error;
mod handlers;
mod logging;
mod output;

use cli::{Cli, Commands};
use colored::control;
use config::Config;
use error::Result;
use logging::{timing::Timer, LoggingConfig};
use output::OutputWriter;
use std::process;
use tracing::instrument;

fn main() {
    let cli = Cli::parse_args();

    // Configuration errors are reported once logging is up
    let config = Config::load_with_file(cli.config.as_deref());
    let configured_color = config.as_ref().map(|c| c.output.color).unwrap_or(true);
    let use_color = cli.use_color(configured_color);
    control::set_override(use_color);

    if let Err(e) = init_logging(&cli, config.as_ref().ok()) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let result = config.and_then(|config| run(cli, &config, use_color));

    match result {
        Ok(()) => process::exit(0),
        Err(e) => {
            eprintln!("{}", error::format_error(&e, use_color));
            process::exit(e.exit_code());
        }
    }
}

/// Main application logic
#[instrument(skip_all, fields(command = ?cli.command))]
fn run(cli: Cli, config: &Config, use_color: bool) -> Result<()> {
    let _timer = Timer::new("cli_execution");

    let mut output = OutputWriter::new(cli.output_format(config.output.format), use_color, cli.quiet);

    tracing::info!(
        verbosity = cli.verbosity_level(),
        format = ?output.format(),
        "Executing command"
    );

    match cli.command {
        Commands::Validate(args) => handlers::handle_validate(args, config, &mut output),
        Commands::Draft(args) => handlers::handle_draft(args, config, &mut output),
        Commands::Refs(args) => handlers::handle_refs(args, config, &mut output),
    }
}

/// Initialize the logging system from verbosity, configuration and environment
fn init_logging(cli: &Cli, config: Option<&Config>) -> Result<()> {
    let verbosity = cli.verbosity_level();
    let mut logging_config = LoggingConfig::from_verbosity(verbosity);

    if let Some(config) = config {
        logging_config.merge_with_file(&config.logging, verbosity);
    }
    logging_config.merge_with_env();

    if cli.quiet {
        logging_config.quiet();
    }

    logging::init_logging(logging_config)
}
