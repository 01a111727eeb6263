//! `$ref` resolution across local, external and YAML documents

use draftcheck_schemas::loader::RefResolver;
use draftcheck_schemas::{ErrorKind, LoaderError, ReferenceValidator, SchemaEngine};
use serde_json::json;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::tempdir;

fn write(dir: &Path, name: &str, content: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod local_references {
    use super::*;

    #[test]
    fn test_definitions_reference() {
        let mut engine = SchemaEngine::new();
        engine.set_schema_value(json!({
            "definitions": {
                "address": {
                    "type": "object",
                    "properties": {
                        "street_address": {"type": "string"},
                        "city": {"type": "string"},
                        "state": {"type": "string"}
                    },
                    "required": ["street_address", "city", "state"]
                }
            },
            "type": "object",
            "properties": {
                "billing_address": {"$ref": "#/definitions/address"},
                "shipping_address": {"$ref": "#/definitions/address"}
            }
        }));

        let valid = json!({
            "shipping_address": {
                "street_address": "1600 Pennsylvania Avenue NW",
                "city": "Washington",
                "state": "DC"
            },
            "billing_address": {
                "street_address": "1st Street SE",
                "city": "Washington",
                "state": "DC"
            }
        });
        assert!(engine.validate(&valid).valid);

        let report = engine.validate(&json!({"billing_address": {"city": "Washington"}}));
        assert!(!report.valid);
        assert_eq!(
            report.messages(),
            vec!["missing properties: street_address, state at context path: #/billing_address"]
        );
    }

    #[test]
    fn test_recursive_tree() {
        let mut engine = SchemaEngine::new();
        engine.set_schema_value(json!({
            "definitions": {
                "node": {
                    "type": "object",
                    "properties": {
                        "value": {"type": "integer"},
                        "children": {"type": "array", "items": {"$ref": "#/definitions/node"}}
                    },
                    "required": ["value"]
                }
            },
            "$ref": "#/definitions/node"
        }));

        let tree = json!({
            "value": 1,
            "children": [
                {"value": 2, "children": []},
                {"value": 3, "children": [{"value": 4}]}
            ]
        });
        assert!(engine.validate(&tree).valid);

        let broken = json!({"value": 1, "children": [{"value": 2, "children": [{"value": "x"}]}]});
        let report = engine.validate(&broken);
        assert!(!report.valid);
        assert_eq!(
            report.messages(),
            vec![r#"value "x" must be an integer at context path: #/children[0]/children[0]/value"#]
        );
    }

    #[test]
    fn test_mutual_cycle_is_reported() {
        let mut engine = SchemaEngine::new();
        engine.set_schema_value(json!({
            "definitions": {
                "a": {"$ref": "#/definitions/b"},
                "b": {"$ref": "#/definitions/a"}
            },
            "$ref": "#/definitions/a"
        }));

        let report = engine.validate(&json!(1));
        assert!(!report.valid);
        assert_eq!(report.errors.count_of(ErrorKind::ReferenceCycle), 1);
        let message = report.messages().join("\n");
        assert!(message.contains("circular reference detected"), "{}", message);
    }

    #[test]
    fn test_recursion_over_deeply_nested_data() {
        let run = || {
            let mut engine = SchemaEngine::new();
            engine.set_schema_value(json!({
                "anyOf": [{"type": "integer"}, {"items": {"$ref": "#"}}]
            }));

            let nest = |inner: serde_json::Value| {
                (0..120).fold(inner, |value, _| serde_json::Value::Array(vec![value]))
            };
            let report = engine.validate(&nest(json!(1)));
            assert!(report.valid, "{:?}", report.messages());
            assert!(!engine.validate(&nest(json!("x"))).valid);
        };

        std::thread::Builder::new()
            .stack_size(64 * 1024 * 1024)
            .spawn(run)
            .unwrap()
            .join()
            .unwrap();
    }

    #[test]
    fn test_repeated_validation_is_stable() {
        let mut engine = SchemaEngine::new();
        engine.set_schema_value(json!({
            "definitions": {"positive": {"type": "integer", "minimum": 1}},
            "items": {"$ref": "#/definitions/positive"}
        }));

        let value = json!([1, 0, 2]);
        let first = engine.validate(&value);
        let second = engine.validate(&value);
        assert_eq!(first, second);
        assert_eq!(engine.cache_stats().references, 1);
    }

    #[test]
    fn test_escaped_pointer_segments() {
        let mut engine = SchemaEngine::new();
        engine.set_schema_value(json!({
            "definitions": {"a/b": {"type": "string"}, "m~n": {"type": "null"}},
            "properties": {
                "slash": {"$ref": "#/definitions/a~1b"},
                "tilde": {"$ref": "#/definitions/m~0n"}
            }
        }));
        assert!(engine.validate(&json!({"slash": "x", "tilde": null})).valid);
        assert!(!engine.validate(&json!({"slash": 1})).valid);
    }
}

#[cfg(test)]
mod external_references {
    use super::*;

    #[test]
    fn test_load_schema_with_relative_references() {
        let dir = tempdir().unwrap();
        write(
            dir.path(),
            "definitions.json",
            r##"{
                "definitions": {
                    "name": {"type": "string", "minLength": 1},
                    "person": {
                        "type": "object",
                        "properties": {"name": {"$ref": "#/definitions/name"}},
                        "required": ["name"]
                    }
                }
            }"##,
        );
        let root = write(
            dir.path(),
            "root.json",
            r#"{
                "type": "object",
                "properties": {
                    "owner": {"$ref": "definitions.json#/definitions/person"},
                    "tags": {"type": "array", "items": {"$ref": "definitions.json#/definitions/name"}}
                }
            }"#,
        );

        let mut engine = SchemaEngine::new();
        engine.load_schema(&root).unwrap();
        assert!(engine.base_uri().is_some_and(|url| url.as_str().ends_with("root.json")));

        assert!(engine.validate(&json!({"owner": {"name": "Ada"}, "tags": ["x"]})).valid);

        let report = engine.validate(&json!({"owner": {"name": ""}, "tags": [""]}));
        assert!(!report.valid);
        assert_eq!(
            report.messages(),
            vec![
                "string min length must be 1, given: 0 at context path: #/owner/name",
                "string min length must be 1, given: 0 at context path: #/tags[0]",
            ]
        );
        assert_eq!(engine.cache_stats().documents, 1);
    }

    #[test]
    fn test_external_document_refers_back_to_root() {
        let dir = tempdir().unwrap();
        write(
            dir.path(),
            "item.json",
            r#"{"type": "object", "properties": {"id": {"$ref": "root.json#/definitions/id"}}}"#,
        );
        let root = write(
            dir.path(),
            "root.json",
            r#"{
                "definitions": {"id": {"type": "integer"}},
                "type": "array",
                "items": {"$ref": "item.json"}
            }"#,
        );

        let mut engine = SchemaEngine::new();
        engine.load_schema(&root).unwrap();
        assert!(engine.validate(&json!([{"id": 1}, {"id": 2}])).valid);
        assert!(!engine.validate(&json!([{"id": "1"}])).valid);
    }

    #[test]
    fn test_yaml_document() {
        let dir = tempdir().unwrap();
        write(
            dir.path(),
            "limits.yaml",
            "definitions:\n  percent:\n    type: number\n    minimum: 0\n    maximum: 100\n",
        );
        let root = write(
            dir.path(),
            "root.json",
            r#"{"properties": {"ratio": {"$ref": "limits.yaml#/definitions/percent"}}}"#,
        );

        let mut engine = SchemaEngine::new();
        engine.load_schema(&root).unwrap();
        assert!(engine.validate(&json!({"ratio": 42.5})).valid);
        assert_eq!(
            engine.validate(&json!({"ratio": 101})).messages(),
            vec!["value 101 is greater than maximum of 100 at context path: #/ratio"]
        );
    }

    #[test]
    fn test_missing_external_document() {
        let dir = tempdir().unwrap();
        let root = write(
            dir.path(),
            "root.json",
            r#"{"properties": {"a": {"$ref": "absent.json"}}}"#,
        );

        let mut engine = SchemaEngine::new();
        engine.load_schema(&root).unwrap();
        let report = engine.validate(&json!({"a": 1}));
        assert!(!report.valid);
        assert_eq!(report.errors.count_of(ErrorKind::ReferenceResolution), 1);
        assert!(report.messages()[0].starts_with(r#"unable to resolve $ref "absent.json""#));

        // Failures are not cached, so a late-arriving document is picked up
        write(dir.path(), "absent.json", r#"{"type": "integer"}"#);
        assert!(engine.validate(&json!({"a": 1})).valid);
    }

    #[test]
    fn test_load_schema_errors() {
        let dir = tempdir().unwrap();
        let mut engine = SchemaEngine::new();

        let missing = dir.path().join("nope.json");
        let err = engine.load_schema(&missing.to_string_lossy()).unwrap_err();
        assert!(matches!(err, LoaderError::Io { .. }));

        let broken = write(dir.path(), "broken.json", "{ not json");
        let err = engine.load_schema(&broken).unwrap_err();
        assert!(matches!(err, LoaderError::JsonParse { .. }));
        assert!(engine.schema().is_none());
        assert!(!engine.validate(&json!(1)).valid);
    }

    #[test]
    fn test_resolver_over_temp_documents() {
        let dir = tempdir().unwrap();
        let target = write(dir.path(), "shared.json", r#"{"definitions": {"flag": {"type": "boolean"}}}"#);

        let resolver = RefResolver::new();
        let root = Arc::new(json!({}));
        let node = resolver
            .resolve(&format!("{}#/definitions/flag", target), &root)
            .unwrap();
        assert_eq!(*node, json!({"type": "boolean"}));

        let err = resolver
            .resolve(&format!("{}#/definitions/other", target), &root)
            .unwrap_err();
        assert!(err.to_string().contains("other"));
    }
}

#[cfg(test)]
mod inspection {
    use super::*;

    #[test]
    fn test_extract_references() {
        let schema = json!({
            "properties": {
                "a": {"$ref": "#/definitions/a"},
                "b": {"items": [{"$ref": "other.json"}, {"$ref": "#/definitions/a"}]}
            },
            "definitions": {"a": {"type": "string"}}
        });
        let refs: Vec<String> = ReferenceValidator::extract_references(&schema).into_iter().collect();
        assert_eq!(refs, vec!["#/definitions/a".to_string(), "other.json".to_string()]);
    }

    #[test]
    fn test_validate_json_pointer() {
        assert!(ReferenceValidator::validate_json_pointer("").is_ok());
        assert!(ReferenceValidator::validate_json_pointer("/definitions/a~0b~1c").is_ok());
        assert!(ReferenceValidator::validate_json_pointer("definitions").is_err());
        assert!(ReferenceValidator::validate_json_pointer("/a~2").is_err());
    }
}
