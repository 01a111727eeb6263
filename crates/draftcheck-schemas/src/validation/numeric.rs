//! `integer` and `number` validators
//!
//! Integer-tagged values compare exactly; anything involving a float is
//! compared as `f64`.
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
use std::cmp::Ordering;

/// A JSON number keeping its integer or float tag
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numeric {
    Int(i128),
    Float(f64),
}

impl Numeric {
    pub fn from_value(value: &Value) -> Option<Self> {
        let Value::Number(number) = value else {
            return None;
        };
        if let Some(i) = number.as_i64() {
            Some(Numeric::Int(i128::from(i)))
        } else if let Some(u) = number.as_u64() {
            Some(Numeric::Int(i128::from(u)))
        } else {
            number.as_f64().map(Numeric::Float)
        }
    }

    pub fn as_f64(&self) -> f64 {
        match *self {
            Numeric::Int(i) => i as f64,
            Numeric::Float(f) => f,
        }
    }

    pub fn compare(&self, other: &Numeric) -> Ordering {
        match (self, other) {
            (Numeric::Int(a), Numeric::Int(b)) => a.cmp(b),
            _ => self
                .as_f64()
                .partial_cmp(&other.as_f64())
                .unwrap_or(Ordering::Equal),
        }
    }

    fn is_positive(&self) -> bool {
        match *self {
            Numeric::Int(i) => i > 0,
            Numeric::Float(f) => f > 0.0,
        }
    }

    /// Exact modulo for integers, otherwise the float remainder must be zero.
    /// A `tolerance` accepts remainders within that fraction of the divisor.
    fn is_multiple_of(&self, divisor: &Numeric, tolerance: Option<f64>) -> bool {
        match (self, divisor) {
            (Numeric::Int(v), Numeric::Int(d)) => v % d == 0,
            _ => {
                let divisor = divisor.as_f64();
                let remainder = (self.as_f64() % divisor).abs();
                match tolerance {
                    Some(relative) => {
                        let margin = relative * divisor;
                        remainder <= margin || divisor - remainder <= margin
                    }
                    None => remainder == 0.0,
                }
            }
        }
    }
}

/// A numeric keyword value with its source text for messages
#[derive(Debug, Clone, Copy)]
struct Threshold<'a> {
    raw: &'a Value,
    number: Numeric,
}

impl<'a> Threshold<'a> {
    fn read(ctx: &ValidationContext<'a>, keyword: &str) -> Option<Self> {
        let raw = ctx.get(keyword)?;
        Numeric::from_value(raw).map(|number| Threshold { raw, number })
    }
}

/// How `exclusiveMinimum`/`exclusiveMaximum` applies to a value
#[derive(Debug, Clone, Copy)]
enum Exclusivity<'a> {
    /// Makes `minimum`/`maximum` exclusive
    Modifier,
    /// An independent strict bound
    Bound(Threshold<'a>),
    Absent,
}

impl<'a> Exclusivity<'a> {
    /// Draft 4 reads a boolean flag, later drafts a number. With no known
    /// draft the keyword's shape decides.
    fn read(ctx: &ValidationContext<'a>, keyword: &str, draft: Option<DraftVersion>) -> Self {
        let Some(raw) = ctx.get(keyword) else {
            return Exclusivity::Absent;
        };
        let as_bound = || {
            Threshold::read(ctx, keyword)
                .map(Exclusivity::Bound)
                .unwrap_or(Exclusivity::Absent)
        };
        match (draft, raw) {
            (Some(DraftVersion::Draft4), Value::Bool(true)) => Exclusivity::Modifier,
            (Some(DraftVersion::Draft4), _) => Exclusivity::Absent,
            (Some(_), _) => as_bound(),
            (None, Value::Bool(true)) => Exclusivity::Modifier,
            (None, Value::Bool(false)) => Exclusivity::Absent,
            (None, _) => as_bound(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerValidator;

impl Validatable for IntegerValidator {
    fn is_valid(&self, session: &mut Session<'_>, ctx: &ValidationContext<'_>, value: &Value) -> bool {
        match Numeric::from_value(value) {
            Some(number @ Numeric::Int(_)) => check_numeric(session, ctx, value, number),
            _ => type_mismatch(session, ctx, value, "an integer"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NumberValidator;

impl Validatable for NumberValidator {
    fn is_valid(&self, session: &mut Session<'_>, ctx: &ValidationContext<'_>, value: &Value) -> bool {
        match Numeric::from_value(value) {
            Some(number) => check_numeric(session, ctx, value, number),
            None => type_mismatch(session, ctx, value, "a number"),
        }
    }
}

fn check_numeric(
    session: &mut Session<'_>,
    ctx: &ValidationContext<'_>,
    value: &Value,
    number: Numeric,
) -> bool {
    let mut valid = true;
    if let Some(divisor) = ctx.get("multipleOf") {
        valid &= check_multiple_of(session, ctx, value, number, divisor);
    }
    valid &= check_range(session, ctx, value, number);
    BaseValidator.after_type_checks(session, ctx, value, valid)
}

fn check_multiple_of(
    session: &mut Session<'_>,
    ctx: &ValidationContext<'_>,
    value: &Value,
    number: Numeric,
    divisor: &Value,
) -> bool {
    let Some(d) = Numeric::from_value(divisor).filter(Numeric::is_positive) else {
        session.record(ErrorKind::SchemaStructure, ctx.label, || {
            format!("multipleOf must be a positive number, given: {}", divisor)
        });
        return false;
    };

    if number.is_multiple_of(&d, session.config().multiple_of_tolerance) {
        return true;
    }
    session.record(ErrorKind::KeywordViolation, ctx.label, || {
        format!("value must be a multiple of {}, given: {}", divisor, value)
    });
    false
}

fn check_range(
    session: &mut Session<'_>,
    ctx: &ValidationContext<'_>,
    value: &Value,
    number: Numeric,
) -> bool {
    let draft = session.draft();
    let mut valid = true;

    let exclusive_min = Exclusivity::read(ctx, "exclusiveMinimum", draft);
    if let Some(min) = Threshold::read(ctx, "minimum") {
        match number.compare(&min.number) {
            Ordering::Less => {
                session.record(ErrorKind::KeywordViolation, ctx.label, || {
                    format!("value {} is less than minimum of {}", value, min.raw)
                });
                valid = false;
            }
            Ordering::Equal if matches!(exclusive_min, Exclusivity::Modifier) => {
                session.record(ErrorKind::KeywordViolation, ctx.label, || {
                    format!("value {} is less than or equal to exclusive minimum of {}", value, min.raw)
                });
                valid = false;
            }
            _ => {}
        }
    }
    if let Exclusivity::Bound(bound) = exclusive_min {
        if number.compare(&bound.number) != Ordering::Greater {
            session.record(ErrorKind::KeywordViolation, ctx.label, || {
                format!("value {} is less than or equal to exclusive minimum of {}", value, bound.raw)
            });
            valid = false;
        }
    }

    let exclusive_max = Exclusivity::read(ctx, "exclusiveMaximum", draft);
    if let Some(max) = Threshold::read(ctx, "maximum") {
        match number.compare(&max.number) {
            Ordering::Greater => {
                session.record(ErrorKind::KeywordViolation, ctx.label, || {
                    format!("value {} is greater than maximum of {}", value, max.raw)
                });
                valid = false;
            }
            Ordering::Equal if matches!(exclusive_max, Exclusivity::Modifier) => {
                session.record(ErrorKind::KeywordViolation, ctx.label, || {
                    format!("value {} is greater than or equal to exclusive maximum of {}", value, max.raw)
                });
                valid = false;
            }
            _ => {}
        }
    }
    if let Exclusivity::Bound(bound) = exclusive_max {
        if number.compare(&bound.number) != Ordering::Less {
            session.record(ErrorKind::KeywordViolation, ctx.label, || {
                format!("value {} is greater than or equal to exclusive maximum of {}", value, bound.raw)
            });
            valid = false;
        }
    }

    valid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EngineConfig, SchemaEngine};
    use serde_json::json;

    fn check(schema: Value, value: Value) -> bool {
        let mut engine = SchemaEngine::new();
        engine.set_schema_value(schema);
        engine.validate(&value).valid
    }

    #[test]
    fn test_integer_tag() {
        assert!(check(json!({"type": "integer"}), json!(42)));
        assert!(check(json!({"type": "integer"}), json!(-1)));
        assert!(!check(json!({"type": "integer"}), json!(3.1415926)));
        assert!(!check(json!({"type": "integer"}), json!(42.0)));
        assert!(!check(json!({"type": "integer"}), json!("42")));
    }

    #[test]
    fn test_multiple_of() {
        let ten = json!({"type": "number", "multipleOf": 10});
        for (value, expected) in [(0, true), (10, true), (20, true), (23, false)] {
            assert_eq!(check(ten.clone(), json!(value)), expected, "{}", value);
        }

        let one = json!({"type": "number", "multipleOf": 1.0});
        assert!(check(one.clone(), json!(42)));
        assert!(check(one.clone(), json!(42.0)));
        assert!(!check(one, json!(3.14156926)));

        assert!(check(json!({"multipleOf": 0.5}), json!(2.5)));
        assert!(check(json!({"multipleOf": 0.25}), json!(-0.75)));
    }

    #[test]
    fn test_multiple_of_rejects_near_multiples() {
        assert!(!check(json!({"multipleOf": 3}), json!(3.000000001)));
        assert!(!check(json!({"multipleOf": 0.5}), json!(1.0000000001)));
        assert!(!check(json!({"multipleOf": 0.1}), json!(0.3)));
    }

    #[test]
    fn test_multiple_of_with_tolerance() {
        let config = EngineConfig::default().with_multiple_of_tolerance(1e-9);
        let mut engine = SchemaEngine::with_config(config);
        engine.set_schema_value(json!({"multipleOf": 0.01}));
        assert!(engine.validate(&json!(19.99)).valid);
        assert!(!engine.validate(&json!(19.995)).valid);

        engine.set_schema_value(json!({"multipleOf": 0.1}));
        assert!(engine.validate(&json!(0.3)).valid);
    }

    #[test]
    fn test_multiple_of_message() {
        let mut engine = SchemaEngine::new();
        engine.set_schema_value(json!({"multipleOf": 10}));
        assert_eq!(
            engine.validate(&json!(23)).messages(),
            vec!["value must be a multiple of 10, given: 23 at context path: #/"]
        );
    }

    #[test]
    fn test_invalid_divisor_is_schema_error() {
        let mut engine = SchemaEngine::new();
        engine.set_schema_value(json!({"multipleOf": 0}));
        let report = engine.validate(&json!(4));
        assert!(!report.valid);
        assert_eq!(report.errors.count_of(ErrorKind::SchemaStructure), 1);

        engine.set_schema_value(json!({"multipleOf": "2"}));
        assert!(!engine.validate(&json!(4)).valid);
    }

    #[test]
    fn test_draft6_range() {
        let schema = json!({"type": "number", "minimum": 0, "exclusiveMaximum": 100});
        for (value, expected) in [(-1, false), (0, true), (10, true), (99, true), (100, false), (101, false)] {
            assert_eq!(check(schema.clone(), json!(value)), expected, "{}", value);
        }
    }

    #[test]
    fn test_draft4_range() {
        let schema = json!({
            "$schema": "http://json-schema.org/draft-04/schema#",
            "type": "number",
            "minimum": 0,
            "maximum": 100,
            "exclusiveMaximum": true
        });
        for (value, expected) in [(-1, false), (0, true), (10, true), (99, true), (100, false), (101, false)] {
            assert_eq!(check(schema.clone(), json!(value)), expected, "{}", value);
        }
    }

    #[test]
    fn test_draft4_ignores_numeric_exclusive_bound() {
        let schema = json!({
            "$schema": "http://json-schema.org/draft-04/schema#",
            "exclusiveMinimum": 5
        });
        assert!(check(schema, json!(1)));
    }

    #[test]
    fn test_range_messages() {
        let mut engine = SchemaEngine::new();
        engine.set_schema_value(json!({"exclusiveMinimum": 0, "maximum": 10}));
        assert_eq!(
            engine.validate(&json!(0)).messages(),
            vec!["value 0 is less than or equal to exclusive minimum of 0 at context path: #/"]
        );
        assert_eq!(
            engine.validate(&json!(10.5)).messages(),
            vec!["value 10.5 is greater than maximum of 10 at context path: #/"]
        );
    }

    #[test]
    fn test_undetermined_draft_follows_keyword_shape() {
        let flag = json!({"$schema": "urn:custom", "maximum": 10, "exclusiveMaximum": true});
        assert!(!check(flag, json!(10)));

        let bound = json!({"$schema": "urn:custom", "exclusiveMaximum": 10});
        assert!(!check(bound.clone(), json!(10)));
        assert!(check(bound, json!(9)));
    }

    #[test]
    fn test_large_integers_compare_exactly() {
        let schema = json!({"type": "integer", "maximum": 9007199254740993u64});
        assert!(check(schema.clone(), json!(9007199254740993u64)));
        assert!(!check(schema, json!(9007199254740994u64)));
    }

    #[test]
    fn test_numeric_ordering() {
        assert_eq!(Numeric::Int(2).compare(&Numeric::Float(2.5)), Ordering::Less);
        assert_eq!(Numeric::Float(3.0).compare(&Numeric::Int(3)), Ordering::Equal);
    }
}
