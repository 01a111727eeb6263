//! Refs command handler

use super::load_engine;
use crate::cli::RefsArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use draftcheck_schemas::loader::resolver::split_reference;
use draftcheck_schemas::ReferenceValidator;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};

#[derive(Debug, Serialize, PartialEq)]
struct ReferenceEntry {
    reference: String,
    external: bool,
    /// Why the fragment is not a usable JSON Pointer
    pointer_error: Option<String>,
}

#[derive(Debug, Serialize)]
struct RefsListing {
    schema: String,
    references: Vec<ReferenceEntry>,
}

/// Every `$ref` string of a schema document, sorted, with its kind
fn collect_references(schema: &Value, external_only: bool) -> Vec<ReferenceEntry> {
    ReferenceValidator::extract_references(schema)
        .into_iter()
        .map(|reference| {
            let (locator, fragment) = split_reference(&reference);
            let pointer_error = fragment
                .and_then(|pointer| ReferenceValidator::validate_json_pointer(pointer).err())
                .map(|e| e.to_string());
            ReferenceEntry {
                external: !locator.is_empty(),
                pointer_error,
                reference,
            }
        })
        .filter(|entry| entry.external || !external_only)
        .collect()
}

/// Handle the refs command
#[instrument(skip_all, fields(schema = %args.schema.display()))]
pub fn handle_refs(args: RefsArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::new("refs_command");
    let engine = load_engine(&args.schema, config.engine.clone())?;
    let schema = engine
        .schema()
        .ok_or_else(|| Error::other("schema was not installed"))?;

    let references = collect_references(schema, args.external);
    debug!(count = references.len(), "Collected references");

    if output.is_human() {
        if references.is_empty() {
            output.info("No references found")?;
        }
        for entry in &references {
            let suffix = if entry.external { " (external)" } else { "" };
            output.success(&format!("{}{}", entry.reference, suffix))?;
            if let Some(reason) = &entry.pointer_error {
                output.warning(&format!("  {}", reason))?;
            }
        }
    }

    output.data(&RefsListing {
        schema: args.schema.display().to_string(),
        references,
    })
}
