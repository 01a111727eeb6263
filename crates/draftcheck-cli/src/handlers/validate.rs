//! Validate command handler

use super::{load_engine, read_document};
use crate::cli::ValidateArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use draftcheck_schemas::ValidationErrors;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

/// Verdict for one validated document
#[derive(Debug, Serialize)]
struct DocumentReport {
    document: String,
    valid: bool,
    errors: ValidationErrors,
}

#[derive(Debug, Serialize)]
struct ValidateSummary {
    schema: String,
    valid: bool,
    documents: Vec<DocumentReport>,
}

/// Handle the validate command
#[instrument(skip_all, fields(schema = %args.schema.display(), documents = args.instances.len()))]
pub fn handle_validate(args: ValidateArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::with_details("validate_command", &args.schema.display().to_string());

    let mut engine_config = config.engine.clone();
    if let Some(draft) = args.default_draft {
        engine_config.default_draft = draft;
    }
    if args.ignore_formats {
        engine_config.assert_formats = false;
    }
    debug!(config = ?engine_config, "Engine configuration");

    let engine = load_engine(&args.schema, engine_config)?;
    output.info(&format!(
        "Validating {} document(s) against {}",
        args.instances.len(),
        args.schema.display()
    ))?;

    let mut documents = Vec::with_capacity(args.instances.len());
    for path in &args.instances {
        let _document_timer = Timer::with_details("validate_document", &path.display().to_string());
        let value = read_document(path)?;
        let report = engine.validate(&value);
        info!(document = %path.display(), valid = report.valid, errors = report.errors.len(), "Validated document");

        if report.valid {
            output.success(&format!("✓ {} is valid", path.display()))?;
        } else {
            output.error(&format!("✗ {} is invalid", path.display()))?;
        }
        output.validation_errors(&report.errors)?;

        documents.push(DocumentReport {
            document: path.display().to_string(),
            valid: report.valid,
            errors: report.errors,
        });
    }

    let invalid = documents.iter().filter(|d| !d.valid).count();
    let total = documents.len();
    output.data(&ValidateSummary {
        schema: args.schema.display().to_string(),
        valid: invalid == 0,
        documents,
    })?;

    if invalid > 0 {
        warn!(invalid, total, "Validation failed");
        return Err(Error::ValidationFailed { invalid, total });
    }
    output.success(&format!("All {} document(s) are valid", total))?;
    Ok(())
}
