//! `null` and `boolean` validators
//!
//! Copyright (c) 2025 Draftcheck Team
//! Licensed under the Apache-2.0 license

use crate::codec::compact_preview;
use crate::validation::base::BaseValidator;
use crate::validation::context::{Session, ValidationContext};
use crate::validation::error::ErrorKind;
use crate::validation::Validatable;
use serde_json::Value;

/// Preview budget for values quoted in type mismatch messages
pub(crate) const TYPE_PREVIEW: usize = 64;

/// Record a type mismatch and fail
pub(crate) fn type_mismatch(
    session: &mut Session<'_>,
    ctx: &ValidationContext<'_>,
    value: &Value,
    expected: &str,
) -> bool {
    session.record(ErrorKind::TypeMismatch, ctx.label, || {
        format!("value {} must be {}", compact_preview(value, TYPE_PREVIEW), expected)
    });
    false
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NullValidator;

impl Validatable for NullValidator {
    fn is_valid(&self, session: &mut Session<'_>, ctx: &ValidationContext<'_>, value: &Value) -> bool {
        if !value.is_null() {
            return type_mismatch(session, ctx, value, "null");
        }
        BaseValidator.is_valid(session, ctx, value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanValidator;

impl Validatable for BooleanValidator {
    fn is_valid(&self, session: &mut Session<'_>, ctx: &ValidationContext<'_>, value: &Value) -> bool {
        if !value.is_boolean() {
            return type_mismatch(session, ctx, value, "a boolean");
        }
        BaseValidator.is_valid(session, ctx, value)
    }
}

#[cfg(test)]
mod tests {
    use crate::SchemaEngine;
    use serde_json::json;

    #[test]
    fn test_null() {
        let mut engine = SchemaEngine::new();
        engine.set_schema_value(json!({"type": "null"}));
        assert!(engine.validate(&json!(null)).valid);
        assert_eq!(
            engine.validate(&json!(0)).messages(),
            vec!["value 0 must be null at context path: #/"]
        );
    }

    #[test]
    fn test_boolean_with_enum() {
        let mut engine = SchemaEngine::new();
        engine.set_schema_value(json!({"type": "boolean", "enum": [true]}));
        assert!(engine.validate(&json!(true)).valid);
        assert!(!engine.validate(&json!(false)).valid);
        assert_eq!(
            engine.validate(&json!("true")).messages(),
            vec![r#"value "true" must be a boolean at context path: #/"#]
        );
    }
}
