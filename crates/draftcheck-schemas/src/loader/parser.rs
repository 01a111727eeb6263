//! Document decoding for JSON and YAML schema sources
//!
//! Copyright (c) 2025 Draftcheck Team
//! Licensed under the Apache-2.0 license

use crate::loader::error::{LoaderError, LoaderResult};
use serde_json::Value;

/// Encodings a schema document may arrive in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// YAML format (.yaml, .yml)
    Yaml,
    /// JSON format (.json and anything unrecognized)
    Json,
}

impl Format {
    /// Detect format from the extension of a path or URL.
    ///
    /// Query strings and fragments are ignored. Locations without a YAML
    /// extension are treated as JSON, since remote schemas are commonly
    /// served without one.
    pub fn from_location(location: &str) -> Self {
        let trimmed = location
            .split(['?', '#'])
            .next()
            .unwrap_or(location);
        let file_name = trimmed.rsplit(['/', '\\']).next().unwrap_or(trimmed);
        let is_yaml = file_name.rsplit_once('.').is_some_and(|(_, ext)| {
            Format::Yaml
                .extensions()
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        });
        if is_yaml {
            Format::Yaml
        } else {
            Format::Json
        }
    }

    /// Get file extensions for this format
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Format::Yaml => &["yaml", "yml"],
            Format::Json => &["json"],
        }
    }
}

/// Decodes raw document bytes into a JSON value
#[derive(Debug, Default, Clone, Copy)]
pub struct SchemaParser;

impl SchemaParser {
    pub fn new() -> Self {
        Self
    }

    /// Decode bytes loaded from `location`, picking the format from its extension
    pub fn parse_bytes(&self, bytes: &[u8], location: &str) -> LoaderResult<Value> {
        let content = Self::decode_utf8(bytes, location)?;
        self.parse_content(&content, Format::from_location(location), location)
    }

    /// Parse content with explicit format
    pub fn parse_content(&self, content: &str, format: Format, location: &str) -> LoaderResult<Value> {
        match format {
            Format::Yaml => self.parse_yaml(content, location),
            Format::Json => self.parse_json(content, location),
        }
    }

    pub fn parse_yaml(&self, content: &str, location: &str) -> LoaderResult<Value> {
        let yaml_value: serde_yaml::Value = serde_yaml::from_str(content)
            .map_err(|e| LoaderError::yaml_parse_error(location, e))?;

        // Mappings with non-string keys cannot become JSON objects
        serde_json::to_value(yaml_value).map_err(|e| LoaderError::json_parse_error(location, e))
    }

    pub fn parse_json(&self, content: &str, location: &str) -> LoaderResult<Value> {
        serde_json::from_str(content).map_err(|e| LoaderError::json_parse_error(location, e))
    }

    /// Strip a UTF-8 byte order mark and reject non UTF-8 input
    fn decode_utf8(bytes: &[u8], location: &str) -> LoaderResult<String> {
        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
        String::from_utf8(bytes.to_vec()).map_err(|e| {
            LoaderError::io_error(
                location,
                std::io::Error::new(std::io::ErrorKind::InvalidData, e),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_detection() {
        assert_eq!(Format::from_location("schema.yaml"), Format::Yaml);
        assert_eq!(Format::from_location("dir/schema.YML"), Format::Yaml);
        assert_eq!(Format::from_location("schema.json"), Format::Json);
        assert_eq!(Format::from_location("http://example.com/s.yaml?v=1#/a"), Format::Yaml);
        assert_eq!(Format::from_location("http://example.com/schema"), Format::Json);
        assert_eq!(Format::from_location("dir.yaml/schema"), Format::Json);
    }

    #[test]
    fn test_yaml_parsing() -> LoaderResult<()> {
        let parser = SchemaParser::new();
        let yaml = "type: object\nproperties:\n  name:\n    type: string\n";
        let value = parser.parse_bytes(yaml.as_bytes(), "person.yaml")?;
        assert_eq!(
            value,
            json!({"type": "object", "properties": {"name": {"type": "string"}}})
        );
        Ok(())
    }

    #[test]
    fn test_json_parsing_keeps_member_order() -> LoaderResult<()> {
        let parser = SchemaParser::new();
        let value = parser.parse_bytes(br#"{"z": 1, "a": 2}"#, "order.json")?;
        let keys: Vec<_> = value.as_object().map(|m| m.keys().cloned().collect()).unwrap_or_default();
        assert_eq!(keys, vec!["z".to_string(), "a".to_string()]);
        Ok(())
    }

    #[test]
    fn test_byte_order_mark_is_ignored() -> LoaderResult<()> {
        let parser = SchemaParser::new();
        let value = parser.parse_bytes(b"\xEF\xBB\xBF{\"type\": \"null\"}", "bom.json")?;
        assert_eq!(value, json!({"type": "null"}));
        Ok(())
    }

    #[test]
    fn test_decode_failures() {
        let parser = SchemaParser::new();
        assert!(matches!(
            parser.parse_bytes(b"{not json", "broken.json"),
            Err(LoaderError::JsonParse { .. })
        ));
        assert!(matches!(
            parser.parse_bytes(b"key: [unclosed", "broken.yaml"),
            Err(LoaderError::YamlParse { .. })
        ));
        assert!(matches!(
            parser.parse_bytes(&[0xff, 0xfe, 0x00], "binary.json"),
            Err(LoaderError::Io { .. })
        ));
    }
}
