//! `object` validator
//!
//! Members named in `properties` are checked against their schema. The
//! rest are "additional": `patternProperties` claims those whose name
//! matches, and `additionalProperties` applies to what remains.
//!
//! Copyright (c) 2025 Draftcheck Team
//! Licensed under the Apache-2.0 license

use crate::draft::DraftVersion;
use crate::validation::base::BaseValidator;
use crate::validation::context::{Session, ValidationContext};
use crate::validation::error::ErrorKind;
use crate::validation::scalar::type_mismatch;
use crate::validation::Validatable;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectValidator;

impl Validatable for ObjectValidator {
    fn is_valid(&self, session: &mut Session<'_>, ctx: &ValidationContext<'_>, value: &Value) -> bool {
        let Some(members) = value.as_object() else {
            return type_mismatch(session, ctx, value, "an object");
        };

        let mut valid = true;
        let mut additional: Vec<&str> = match ctx.get("properties") {
            Some(Value::Object(properties)) => {
                valid &= self.check_properties(session, ctx, properties, members);
                members
                    .keys()
                    .filter(|name| !properties.contains_key(*name))
                    .map(String::as_str)
                    .collect()
            }
            _ => members.keys().map(String::as_str).collect(),
        };

        if let Some(Value::Object(patterns)) = ctx.get("patternProperties") {
            valid &= self.check_pattern_properties(session, ctx, patterns, members, &mut additional);
        }
        if let Some(schema) = ctx.get("additionalProperties") {
            valid &= self.check_additional(session, ctx, schema, members, &additional);
        }
        if let Some(Value::Array(required)) = ctx.get("required") {
            valid &= self.check_required(session, ctx, required, members);
        }
        if session.supports(DraftVersion::Draft6) {
            if let Some(schema) = ctx.get("propertyNames") {
                valid &= self.check_property_names(session, ctx, schema, members);
            }
        }
        valid &= self.check_size(session, ctx, members);
        if let Some(Value::Object(dependencies)) = ctx.get("dependencies") {
            valid &= self.check_dependencies(session, ctx, dependencies, value, members);
        }

        BaseValidator.after_type_checks(session, ctx, value, valid)
    }
}

impl ObjectValidator {
    fn check_properties(
        &self,
        session: &mut Session<'_>,
        ctx: &ValidationContext<'_>,
        properties: &Map<String, Value>,
        members: &Map<String, Value>,
    ) -> bool {
        let mut valid = true;
        for (name, schema) in properties {
            if let Some(member) = members.get(name) {
                let label = ctx.child(name);
                valid &= session.validate_subschema(schema, member, label.as_deref());
            }
        }
        valid
    }

    /// Every matching pattern applies; matched names leave `additional`
    fn check_pattern_properties(
        &self,
        session: &mut Session<'_>,
        ctx: &ValidationContext<'_>,
        patterns: &Map<String, Value>,
        members: &Map<String, Value>,
        additional: &mut Vec<&str>,
    ) -> bool {
        let mut valid = true;
        let mut matched = vec![false; additional.len()];

        for (pattern, schema) in patterns {
            let regex = match session.patterns().get_or_compile(pattern) {
                Ok(regex) => regex,
                Err(e) => {
                    log::debug!("rejecting patternProperties key /{}/: {}", pattern, e);
                    session.record(ErrorKind::SchemaStructure, ctx.label, || {
                        format!("pattern /{}/ is not a valid regular expression", pattern)
                    });
                    valid = false;
                    continue;
                }
            };

            for (position, name) in additional.iter().enumerate() {
                if !regex.is_match(name) {
                    continue;
                }
                matched[position] = true;
                if let Some(member) = members.get(*name) {
                    let label = ctx.child(name);
                    valid &= session.validate_subschema(schema, member, label.as_deref());
                }
            }
        }

        let mut flags = matched.into_iter();
        additional.retain(|_| !flags.next().unwrap_or(false));
        valid
    }

    fn check_additional(
        &self,
        session: &mut Session<'_>,
        ctx: &ValidationContext<'_>,
        schema: &Value,
        members: &Map<String, Value>,
        additional: &[&str],
    ) -> bool {
        match schema {
            Value::Bool(true) => true,
            Value::Bool(false) => {
                for name in additional {
                    let label = ctx.child(name);
                    session.record(ErrorKind::KeywordViolation, label.as_deref(), || {
                        "additional property forbidden".to_string()
                    });
                }
                additional.is_empty()
            }
            _ => {
                let mut valid = true;
                for name in additional {
                    if let Some(member) = members.get(*name) {
                        let label = ctx.child(name);
                        valid &= session.validate_subschema(schema, member, label.as_deref());
                    }
                }
                valid
            }
        }
    }

    fn check_required(
        &self,
        session: &mut Session<'_>,
        ctx: &ValidationContext<'_>,
        required: &[Value],
        members: &Map<String, Value>,
    ) -> bool {
        if required.is_empty() && session.draft() == Some(DraftVersion::Draft4) {
            session.record(ErrorKind::SchemaStructure, ctx.label, || {
                "D4: \"required\" must contain at least one string".to_string()
            });
            return false;
        }

        let missing: Vec<&str> = required
            .iter()
            .filter_map(Value::as_str)
            .filter(|name| !members.contains_key(*name))
            .collect();
        if missing.is_empty() {
            return true;
        }
        session.record(ErrorKind::KeywordViolation, ctx.label, || {
            format!("missing properties: {}", missing.join(", "))
        });
        false
    }

    fn check_property_names(
        &self,
        session: &mut Session<'_>,
        ctx: &ValidationContext<'_>,
        schema: &Value,
        members: &Map<String, Value>,
    ) -> bool {
        let mut valid = true;
        for name in members.keys() {
            let key = Value::String(name.clone());
            let label = ctx.child_key(name);
            valid &= session.validate_subschema_as(schema, &key, label.as_deref(), "string");
        }
        valid
    }

    fn check_size(&self, session: &mut Session<'_>, ctx: &ValidationContext<'_>, members: &Map<String, Value>) -> bool {
        let count = members.len() as u64;
        let mut valid = true;

        if let Some(min) = ctx.count_limit("minProperties") {
            if count < min {
                session.record(ErrorKind::KeywordViolation, ctx.label, || {
                    format!("too few properties (min {})", min)
                });
                valid = false;
            }
        }
        if let Some(max) = ctx.count_limit("maxProperties") {
            if count > max {
                session.record(ErrorKind::KeywordViolation, ctx.label, || {
                    format!("too many properties (max {})", max)
                });
                valid = false;
            }
        }
        valid
    }

    /// A name list requires the listed members; anything else is a schema
    /// the whole object must satisfy
    fn check_dependencies(
        &self,
        session: &mut Session<'_>,
        ctx: &ValidationContext<'_>,
        dependencies: &Map<String, Value>,
        value: &Value,
        members: &Map<String, Value>,
    ) -> bool {
        let mut valid = true;
        for (trigger, dependency) in dependencies {
            if !members.contains_key(trigger) {
                continue;
            }
            match dependency {
                Value::Array(names) => {
                    let missing: Vec<&str> = names
                        .iter()
                        .filter_map(Value::as_str)
                        .filter(|name| !members.contains_key(*name))
                        .collect();
                    if !missing.is_empty() {
                        session.record(ErrorKind::KeywordViolation, ctx.label, || {
                            format!(
                                "missing dependant properties: \"{}\" (depending on \"{}\")",
                                missing.join("\", \""),
                                trigger
                            )
                        });
                        valid = false;
                    }
                }
                schema => {
                    valid &= session.validate_subschema_as(schema, value, ctx.label, "object");
                }
            }
        }
        valid
    }
}
