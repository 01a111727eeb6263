//! Keyword validators for JSON Schema drafts 4, 6 and 7
//!
//! Each JSON type has its own validator. All of them share the combinator
//! keywords through [`BaseValidator`] and recurse into nested schemas
//! through [`Session::validate_subschema`].
//!
//! Copyright (c) 2025 Draftcheck Team
//! Licensed under the Apache-2.0 license

pub mod array;
pub mod base;
pub mod context;
pub mod error;
pub mod format;
pub mod numeric;
pub mod object;
pub mod pattern;
pub mod scalar;
pub mod string;

pub use array::ArrayValidator;
pub use base::BaseValidator;
pub use context::{Session, ValidationContext, ROOT_LABEL};
pub use error::{ErrorKind, ValidationError, ValidationErrors};
pub use format::StringFormat;
pub use numeric::{IntegerValidator, NumberValidator};
pub use object::ObjectValidator;
pub use pattern::PatternCache;
pub use scalar::{BooleanValidator, NullValidator};
pub use string::StringValidator;

use serde_json::Value;

/// A validator applied to one value under one keyword map
pub trait Validatable {
    /// Check `value`, recording messages in `session` when `ctx` has a label
    fn is_valid(&self, session: &mut Session<'_>, ctx: &ValidationContext<'_>, value: &Value) -> bool;
}

/// The validator selected by a schema's `type`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeValidator {
    Null,
    Boolean,
    Integer,
    Number,
    String,
    Array,
    Object,
    /// Combinators only, for unknown or absent types
    Generic,
}

impl TypeValidator {
    pub fn from_type_name(name: &str) -> Self {
        match name {
            "null" => TypeValidator::Null,
            "boolean" => TypeValidator::Boolean,
            "integer" => TypeValidator::Integer,
            "number" => TypeValidator::Number,
            "string" => TypeValidator::String,
            "array" => TypeValidator::Array,
            "object" => TypeValidator::Object,
            _ => TypeValidator::Generic,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TypeValidator::Null => "null",
            TypeValidator::Boolean => "boolean",
            TypeValidator::Integer => "integer",
            TypeValidator::Number => "number",
            TypeValidator::String => "string",
            TypeValidator::Array => "array",
            TypeValidator::Object => "object",
            TypeValidator::Generic => "generic",
        }
    }
}

impl Validatable for TypeValidator {
    fn is_valid(&self, session: &mut Session<'_>, ctx: &ValidationContext<'_>, value: &Value) -> bool {
        match self {
            TypeValidator::Null => NullValidator.is_valid(session, ctx, value),
            TypeValidator::Boolean => BooleanValidator.is_valid(session, ctx, value),
            TypeValidator::Integer => IntegerValidator.is_valid(session, ctx, value),
            TypeValidator::Number => NumberValidator.is_valid(session, ctx, value),
            TypeValidator::String => StringValidator.is_valid(session, ctx, value),
            TypeValidator::Array => ArrayValidator.is_valid(session, ctx, value),
            TypeValidator::Object => ObjectValidator.is_valid(session, ctx, value),
            TypeValidator::Generic => BaseValidator.is_valid(session, ctx, value),
        }
    }
}
