//! Draft command handler

use super::load_engine;
use crate::cli::DraftArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use draftcheck_schemas::{DraftDetection, ValidationErrors};
use serde::Serialize;
use tracing::instrument;

#[derive(Debug, Serialize)]
struct DraftSummary {
    schema: String,
    /// `draft-04`, `draft-06`, `draft-07`, or `None` when unknown
    draft: Option<String>,
    /// How the draft was chosen: declared, default or unknown
    source: &'static str,
    declared_uri: Option<String>,
    base_uri: Option<String>,
    diagnostics: ValidationErrors,
}

/// Handle the draft command
#[instrument(skip_all, fields(schema = %args.schema.display()))]
pub fn handle_draft(args: DraftArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::new("draft_command");
    let engine = load_engine(&args.schema, config.engine.clone())?;
    let schema = engine
        .schema()
        .ok_or_else(|| Error::other("schema was not installed"))?;

    let detection = DraftDetection::detect(schema, engine.config().default_draft);
    let (source, declared_uri) = match &detection {
        DraftDetection::Declared(_) => ("declared", schema["$schema"].as_str().map(str::to_string)),
        DraftDetection::Defaulted(_) => ("default", None),
        DraftDetection::Unknown(uri) => ("unknown", Some(uri.clone())),
    };
    let summary = DraftSummary {
        schema: args.schema.display().to_string(),
        draft: detection.version().map(|v| v.to_string()),
        source,
        declared_uri,
        base_uri: engine.base_uri().map(|u| u.to_string()),
        diagnostics: engine.diagnostics().clone(),
    };

    if output.is_human() {
        match &summary.draft {
            Some(draft) => output.success(&format!("Draft: {} ({})", draft, summary.source))?,
            None => output.warning("Draft: unknown, version-specific keywords are disabled")?,
        }
        if let Some(uri) = &summary.declared_uri {
            output.info(&format!("$schema: {}", uri))?;
        }
        if let Some(base) = &summary.base_uri {
            output.info(&format!("Base URI: {}", base))?;
        }
        if !summary.diagnostics.is_empty() {
            output.section("Schema Diagnostics")?;
            output.validation_errors(&summary.diagnostics)?;
        }
    }
    output.data(&summary)
}
