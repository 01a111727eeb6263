//! Combinator keywords shared by every type validator
//!
//! Copyright (c) 2025 Draftcheck Team
//! Licensed under the Apache-2.0 license

use crate::codec::compact_preview;
use crate::draft::DraftVersion;
use crate::validation::context::{Session, ValidationContext};
use crate::validation::error::ErrorKind;
use crate::validation::Validatable;
use serde_json::Value;

/// Preview budget for values quoted in combinator messages
const COMBINATOR_PREVIEW: usize = 20;

/// Accept-all schema used when `then` or `else` is missing
const ACCEPT_ALL: Value = Value::Bool(true);

/// Applies `enum`, `const`, `anyOf`, `allOf`, `oneOf`, `not` and
/// `if`/`then`/`else`.
///
/// Used alone when a schema names no known type, and after the type
/// checks of every other validator.
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseValidator;

impl Validatable for BaseValidator {
    fn is_valid(&self, session: &mut Session<'_>, ctx: &ValidationContext<'_>, value: &Value) -> bool {
        let mut valid = true;

        if let Some(Value::Array(candidates)) = ctx.get("enum") {
            valid &= self.check_enum(session, ctx, candidates, value);
        }

        if session.supports(DraftVersion::Draft6) {
            if let Some(constant) = ctx.get("const") {
                valid &= self.check_const(session, ctx, constant, value);
            }
        }

        if let Some(Value::Array(branches)) = ctx.get("anyOf") {
            valid &= self.check_any_of(session, ctx, branches, value);
        }

        if let Some(Value::Array(branches)) = ctx.get("allOf") {
            valid &= self.check_all_of(session, ctx, branches, value);
        }

        if let Some(Value::Array(branches)) = ctx.get("oneOf") {
            valid &= self.check_one_of(session, ctx, branches, value);
        }

        if let Some(negated) = ctx.get("not") {
            valid &= self.check_not(session, ctx, negated, value);
        }

        if session.supports(DraftVersion::Draft7) {
            if let Some(condition) = ctx.get("if") {
                valid &= self.check_conditional(session, ctx, condition, value);
            }
        }

        valid
    }
}

impl BaseValidator {
    /// Run the combinators only when the type-specific checks passed
    pub fn after_type_checks(
        &self,
        session: &mut Session<'_>,
        ctx: &ValidationContext<'_>,
        value: &Value,
        type_checks_passed: bool,
    ) -> bool {
        type_checks_passed && self.is_valid(session, ctx, value)
    }

    fn check_enum(
        &self,
        session: &mut Session<'_>,
        ctx: &ValidationContext<'_>,
        candidates: &[Value],
        value: &Value,
    ) -> bool {
        if candidates.iter().any(|candidate| candidate == value) {
            return true;
        }
        session.record(ErrorKind::CombinatorViolation, ctx.label, || {
            format!("value {} is not one of a list", compact_preview(value, COMBINATOR_PREVIEW))
        });
        false
    }

    fn check_const(
        &self,
        session: &mut Session<'_>,
        ctx: &ValidationContext<'_>,
        constant: &Value,
        value: &Value,
    ) -> bool {
        if constant == value {
            return true;
        }
        session.record(ErrorKind::CombinatorViolation, ctx.label, || {
            format!(
                "value {} is not a defined constant",
                compact_preview(value, COMBINATOR_PREVIEW)
            )
        });
        false
    }

    fn check_any_of(
        &self,
        session: &mut Session<'_>,
        ctx: &ValidationContext<'_>,
        branches: &[Value],
        value: &Value,
    ) -> bool {
        if branches
            .iter()
            .any(|branch| session.validate_subschema(branch, value, None))
        {
            return true;
        }
        session.record(ErrorKind::CombinatorViolation, ctx.label, || {
            format!(
                "value {} does not match any subschema",
                compact_preview(value, COMBINATOR_PREVIEW)
            )
        });
        false
    }

    fn check_all_of(
        &self,
        session: &mut Session<'_>,
        ctx: &ValidationContext<'_>,
        branches: &[Value],
        value: &Value,
    ) -> bool {
        if branches
            .iter()
            .all(|branch| session.validate_subschema(branch, value, None))
        {
            return true;
        }
        session.record(ErrorKind::CombinatorViolation, ctx.label, || {
            format!(
                "value {} does not match all subschemas",
                compact_preview(value, COMBINATOR_PREVIEW)
            )
        });
        false
    }

    fn check_one_of(
        &self,
        session: &mut Session<'_>,
        ctx: &ValidationContext<'_>,
        branches: &[Value],
        value: &Value,
    ) -> bool {
        let mut matched = false;
        for branch in branches {
            if !session.validate_subschema(branch, value, None) {
                continue;
            }
            if matched {
                session.record(ErrorKind::CombinatorViolation, ctx.label, || {
                    "several matches found".to_string()
                });
                return false;
            }
            matched = true;
        }

        if !matched {
            session.record(ErrorKind::CombinatorViolation, ctx.label, || {
                "no match found".to_string()
            });
        }
        matched
    }

    fn check_not(
        &self,
        session: &mut Session<'_>,
        ctx: &ValidationContext<'_>,
        negated: &Value,
        value: &Value,
    ) -> bool {
        if !session.validate_subschema(negated, value, None) {
            return true;
        }
        session.record(ErrorKind::CombinatorViolation, ctx.label, || {
            format!("value {} matched", compact_preview(value, COMBINATOR_PREVIEW))
        });
        false
    }

    fn check_conditional(
        &self,
        session: &mut Session<'_>,
        ctx: &ValidationContext<'_>,
        condition: &Value,
        value: &Value,
    ) -> bool {
        let branch = if session.validate_subschema(condition, value, None) {
            ctx.get("then")
        } else {
            ctx.get("else")
        };
        session.validate_subschema(branch.unwrap_or(&ACCEPT_ALL), value, ctx.label)
    }
}
