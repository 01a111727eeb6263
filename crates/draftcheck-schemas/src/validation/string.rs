//! `string` validator: length, pattern, format and content keywords
//!
//! Copyright (c) 2025 Draftcheck Team
//! Licensed under the Apache-2.0 license

use crate::codec::compact_preview;
use crate::draft::DraftVersion;
use crate::validation::base::BaseValidator;
use crate::validation::context::{Session, ValidationContext};
use crate::validation::error::ErrorKind;
use crate::validation::format::StringFormat;
use crate::validation::scalar::{type_mismatch, TYPE_PREVIEW};
use crate::validation::Validatable;
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

static BASE64_REGEX: OnceLock<Regex> = OnceLock::new();

fn base64_regex() -> &'static Regex {
    BASE64_REGEX.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9+/\s]*={0,2}$").expect("base64 pattern must compile")
    })
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StringValidator;

impl Validatable for StringValidator {
    fn is_valid(&self, session: &mut Session<'_>, ctx: &ValidationContext<'_>, value: &Value) -> bool {
        let Some(text) = value.as_str() else {
            return type_mismatch(session, ctx, value, "a string");
        };

        let mut valid = self.check_length(session, ctx, text);
        if let Some(Value::String(pattern)) = ctx.get("pattern") {
            valid &= self.check_pattern(session, ctx, value, text, pattern);
        }
        if let Some(Value::String(format)) = ctx.get("format") {
            valid &= self.check_format(session, ctx, value, text, format);
        }
        // contentMediaType is an annotation only
        if session.supports(DraftVersion::Draft7) {
            if let Some(Value::String(encoding)) = ctx.get("contentEncoding") {
                valid &= self.check_content_encoding(session, ctx, text, encoding);
            }
        }

        BaseValidator.after_type_checks(session, ctx, value, valid)
    }
}

impl StringValidator {
    /// Lengths count Unicode code points
    fn check_length(&self, session: &mut Session<'_>, ctx: &ValidationContext<'_>, text: &str) -> bool {
        let min = ctx.count_limit("minLength");
        let max = ctx.count_limit("maxLength");
        if min.is_none() && max.is_none() {
            return true;
        }

        let length = text.chars().count() as u64;
        let mut valid = true;
        if let Some(min) = min.filter(|min| length < *min) {
            session.record(ErrorKind::KeywordViolation, ctx.label, || {
                format!("string min length must be {}, given: {}", min, length)
            });
            valid = false;
        }
        if let Some(max) = max.filter(|max| length > *max) {
            session.record(ErrorKind::KeywordViolation, ctx.label, || {
                format!("string max length must be {}, given: {}", max, length)
            });
            valid = false;
        }
        valid
    }

    fn check_pattern(
        &self,
        session: &mut Session<'_>,
        ctx: &ValidationContext<'_>,
        value: &Value,
        text: &str,
        pattern: &str,
    ) -> bool {
        match session.patterns().is_match(pattern, text) {
            Ok(true) => true,
            Ok(false) => {
                session.record(ErrorKind::KeywordViolation, ctx.label, || {
                    format!("value {} does not match pattern", compact_preview(value, TYPE_PREVIEW))
                });
                false
            }
            Err(e) => {
                log::debug!("rejecting schema pattern /{}/: {}", pattern, e);
                session.record(ErrorKind::SchemaStructure, ctx.label, || {
                    format!("pattern /{}/ is not a valid regular expression", pattern)
                });
                false
            }
        }
    }

    fn check_format(
        &self,
        session: &mut Session<'_>,
        ctx: &ValidationContext<'_>,
        value: &Value,
        text: &str,
        name: &str,
    ) -> bool {
        if !session.config().assert_formats {
            return true;
        }
        let Some(format) = StringFormat::from_name(name) else {
            return true;
        };
        if format.is_valid(text) {
            return true;
        }

        session.record(ErrorKind::KeywordViolation, ctx.label, || {
            if format == StringFormat::Regex {
                format!("\"{}\" format mismatch: empty string", name)
            } else {
                format!(
                    "\"{}\" format mismatch: {}",
                    name,
                    compact_preview(value, format.preview_len())
                )
            }
        });
        false
    }

    /// Only `base64` is checked; other encodings pass
    fn check_content_encoding(
        &self,
        session: &mut Session<'_>,
        ctx: &ValidationContext<'_>,
        text: &str,
        encoding: &str,
    ) -> bool {
        if !encoding.eq_ignore_ascii_case("base64") || base64_regex().is_match(text) {
            return true;
        }
        session.record(ErrorKind::KeywordViolation, ctx.label, || {
            "content is not base64-encoded string".to_string()
        });
        false
    }
}
