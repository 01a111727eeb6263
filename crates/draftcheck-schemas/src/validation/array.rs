//! `array` validator: items, tuples, contains, size and uniqueness
//!
//! Copyright (c) 2025 Draftcheck Team
//! Licensed under the Apache-2.0 license

use crate::draft::DraftVersion;
use crate::validation::base::BaseValidator;
use crate::validation::context::{Session, ValidationContext};
use crate::validation::error::ErrorKind;
use crate::validation::scalar::type_mismatch;
use crate::validation::Validatable;
use serde_json::Value;

#[derive(Debug, Clone, Copy, Default)]
pub struct ArrayValidator;

impl Validatable for ArrayValidator {
    fn is_valid(&self, session: &mut Session<'_>, ctx: &ValidationContext<'_>, value: &Value) -> bool {
        let Some(elements) = value.as_array() else {
            return type_mismatch(session, ctx, value, "an array");
        };

        let mut valid = true;
        match ctx.get("items") {
            Some(Value::Array(tuple)) => valid &= self.check_tuple(session, ctx, tuple, elements),
            Some(schema) => valid &= self.check_items(session, ctx, schema, elements),
            None => {}
        }
        if session.supports(DraftVersion::Draft6) {
            if let Some(schema) = ctx.get("contains") {
                valid &= self.check_contains(session, ctx, schema, elements);
            }
        }
        valid &= self.check_size(session, ctx, elements);
        if ctx.get("uniqueItems") == Some(&Value::Bool(true)) {
            valid &= self.check_unique(session, ctx, elements);
        }

        BaseValidator.after_type_checks(session, ctx, value, valid)
    }
}

impl ArrayValidator {
    fn check_items(
        &self,
        session: &mut Session<'_>,
        ctx: &ValidationContext<'_>,
        schema: &Value,
        elements: &[Value],
    ) -> bool {
        let mut valid = true;
        for (index, element) in elements.iter().enumerate() {
            let label = ctx.child_index(index);
            valid &= session.validate_subschema(schema, element, label.as_deref());
        }
        valid
    }

    /// Positional `items`; elements past the tuple go to `additionalItems`
    fn check_tuple(
        &self,
        session: &mut Session<'_>,
        ctx: &ValidationContext<'_>,
        tuple: &[Value],
        elements: &[Value],
    ) -> bool {
        let additional = ctx.get("additionalItems");
        let mut valid = true;

        for (index, element) in elements.iter().enumerate() {
            let label = ctx.child_index(index);
            let schema = match (tuple.get(index), additional) {
                (Some(schema), _) => schema,
                (None, Some(Value::Bool(false))) => {
                    session.record(ErrorKind::KeywordViolation, label.as_deref(), || {
                        "additional items forbidden".to_string()
                    });
                    return false;
                }
                (None, None) | (None, Some(Value::Bool(true))) => continue,
                (None, Some(schema)) => schema,
            };
            valid &= session.validate_subschema(schema, element, label.as_deref());
        }
        valid
    }

    fn check_contains(
        &self,
        session: &mut Session<'_>,
        ctx: &ValidationContext<'_>,
        schema: &Value,
        elements: &[Value],
    ) -> bool {
        if elements
            .iter()
            .any(|element| session.validate_subschema(schema, element, None))
        {
            return true;
        }
        session.record(ErrorKind::KeywordViolation, ctx.label, || {
            "array does not contain required item".to_string()
        });
        false
    }

    fn check_size(&self, session: &mut Session<'_>, ctx: &ValidationContext<'_>, elements: &[Value]) -> bool {
        let count = elements.len() as u64;
        let mut valid = true;

        if let Some(min) = ctx.count_limit("minItems") {
            if count < min {
                session.record(ErrorKind::KeywordViolation, ctx.label, || {
                    format!("too few items (min {})", min)
                });
                valid = false;
            }
        }
        if let Some(max) = ctx.count_limit("maxItems") {
            if count > max {
                session.record(ErrorKind::KeywordViolation, ctx.label, || {
                    format!("too many items (max {})", max)
                });
                valid = false;
            }
        }
        valid
    }

    /// Structural equality: `1` and `1.0` are distinct, key order is not
    fn check_unique(&self, session: &mut Session<'_>, ctx: &ValidationContext<'_>, elements: &[Value]) -> bool {
        let duplicate = elements.iter().enumerate().find_map(|(index, element)| {
            elements[..index]
                .iter()
                .position(|earlier| earlier == element)
                .map(|first| (first, index))
        });

        match duplicate {
            None => true,
            Some((first, second)) => {
                session.record(ErrorKind::KeywordViolation, ctx.label, || {
                    format!("items must be unique, [{}] repeats [{}]", second, first)
                });
                false
            }
        }
    }
}
