// crates/serverlessrepo/src/template.rs
// ============================================================================
// Module: SAM Template Parser
// Description: JSON/YAML template parsing with CloudFormation intrinsic tags.
// Purpose: Produce an ordered document tree and re-emit it as block YAML.
// Dependencies: serde, serde_json, serde_yaml, thiserror
// ============================================================================

//! ## Overview
//! Templates are parsed as strict JSON first, since hand-written JSON is often
//! not valid YAML (tabs, for one). On failure the YAML parser takes over and
//! short-form intrinsic tags are expanded into their single-key mapping form:
//! `!Ref X` becomes `{"Ref": "X"}`, `!Sub s` becomes `{"Fn::Sub": "s"}`.
//! Key order is preserved at every level of the document.
//!
//! `!GetAtt Resource.Attribute` is normalized to the standard
//! `["Resource", "Attribute"]` form on parse. The shorthand is not restored
//! on [`dump_template`], so only the array form round-trips verbatim.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use serde_json::Map;
use serde_json::Number;
use serde_json::Value;
use serde_yaml::Value as YamlValue;
use serde_yaml::value::TaggedValue;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default maximum template size in bytes.
pub const DEFAULT_MAX_TEMPLATE_BYTES: usize = 1024 * 1024;
/// Prefix applied to intrinsic function keys.
const INTRINSIC_PREFIX: &str = "Fn::";
/// Intrinsic tags whose key carries no [`INTRINSIC_PREFIX`].
const UNPREFIXED_TAGS: [&str; 2] = ["Ref", "Condition"];
/// Tag whose dotted scalar shorthand splits into `[resource, attribute]`.
const GET_ATT_TAG: &str = "GetAtt";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors emitted while reading, parsing, or dumping templates.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Text is neither strict JSON nor YAML.
    #[error("template is neither valid json nor valid yaml: {0}")]
    Parse(String),
    /// Text is not strict JSON and YAML parsing is disabled.
    #[error("template is not valid json and yaml parsing is disabled: {0}")]
    YamlDisabled(String),
    /// A YAML mapping key cannot be represented as a string.
    #[error("unsupported template mapping key: {0}")]
    UnsupportedKey(&'static str),
    /// Template exceeded the configured byte limit.
    #[error("template exceeds size limit: {actual_bytes} bytes (max {max_bytes})")]
    TooLarge {
        /// Maximum allowed bytes.
        max_bytes: usize,
        /// Actual template size in bytes.
        actual_bytes: usize,
    },
    /// Template could not be serialized.
    #[error("template serialization failed: {0}")]
    Serialize(String),
    /// Template file could not be read.
    #[error("template io failure: {0}")]
    Io(String),
}

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Configuration for template parsing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TemplateConfig {
    /// Maximum template size allowed, in bytes.
    pub max_bytes: usize,
    /// Allow the YAML fallback when the text is not strict JSON.
    pub allow_yaml: bool,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_TEMPLATE_BYTES,
            allow_yaml: true,
        }
    }
}

// ============================================================================
// SECTION: Parser
// ============================================================================

/// JSON/YAML template parser with intrinsic tag support.
#[derive(Debug, Clone, Default)]
pub struct TemplateParser {
    /// Parser configuration, including limits.
    config: TemplateConfig,
}

impl TemplateParser {
    /// Creates a parser with the given configuration.
    #[must_use]
    pub const fn new(config: TemplateConfig) -> Self {
        Self {
            config,
        }
    }

    /// Parses template text into an ordered document.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError`] when the text exceeds the size limit or is
    /// neither strict JSON nor YAML.
    pub fn parse(&self, text: &str) -> Result<Value, TemplateError> {
        if text.len() > self.config.max_bytes {
            return Err(TemplateError::TooLarge {
                max_bytes: self.config.max_bytes,
                actual_bytes: text.len(),
            });
        }
        match serde_json::from_str::<Value>(text) {
            Ok(document) => Ok(document),
            Err(json_err) => {
                if !self.config.allow_yaml {
                    return Err(TemplateError::YamlDisabled(json_err.to_string()));
                }
                let document: YamlValue = serde_yaml::from_str(text)
                    .map_err(|err| TemplateError::Parse(err.to_string()))?;
                yaml_to_json(document)
            }
        }
    }
}

/// Parses template text with the default configuration.
///
/// # Errors
///
/// Returns [`TemplateError`] when the text is neither strict JSON nor YAML.
pub fn parse_template(text: &str) -> Result<Value, TemplateError> {
    TemplateParser::default().parse(text)
}

/// Serializes a document as block-style YAML.
///
/// # Errors
///
/// Returns [`TemplateError::Serialize`] when the document cannot be encoded.
pub fn dump_template(document: &Value) -> Result<String, TemplateError> {
    serde_yaml::to_string(document).map_err(|err| TemplateError::Serialize(err.to_string()))
}

/// Reads a packaged template from disk, enforcing a byte limit.
///
/// # Errors
///
/// Returns [`TemplateError`] when the file cannot be read, exceeds the limit,
/// or is not UTF-8.
pub fn read_template_file(path: &Path, max_bytes: usize) -> Result<String, TemplateError> {
    let file = File::open(path).map_err(|err| TemplateError::Io(err.to_string()))?;
    let limit = u64::try_from(max_bytes.saturating_add(1))
        .map_err(|_| TemplateError::Io("template size limit exceeds u64".to_string()))?;
    let mut buf = Vec::new();
    file.take(limit).read_to_end(&mut buf).map_err(|err| TemplateError::Io(err.to_string()))?;
    if buf.len() > max_bytes {
        return Err(TemplateError::TooLarge {
            max_bytes,
            actual_bytes: buf.len(),
        });
    }
    String::from_utf8(buf).map_err(|_| TemplateError::Io("template must be utf-8".to_string()))
}

// ============================================================================
// SECTION: Conversion
// ============================================================================

/// Converts a YAML value into an ordered JSON value, expanding tags.
fn yaml_to_json(value: YamlValue) -> Result<Value, TemplateError> {
    match value {
        YamlValue::Null => Ok(Value::Null),
        YamlValue::Bool(flag) => Ok(Value::Bool(flag)),
        YamlValue::Number(number) => Ok(yaml_number(&number)),
        YamlValue::String(text) => Ok(Value::String(text)),
        YamlValue::Sequence(items) => {
            items.into_iter().map(yaml_to_json).collect::<Result<Vec<_>, _>>().map(Value::Array)
        }
        YamlValue::Mapping(mapping) => {
            let mut map = Map::with_capacity(mapping.len());
            for (key, value) in mapping {
                map.insert(mapping_key(key)?, yaml_to_json(value)?);
            }
            Ok(Value::Object(map))
        }
        YamlValue::Tagged(tagged) => intrinsic_to_json(*tagged),
    }
}

/// Expands a tagged node into its `{key: value}` intrinsic form.
fn intrinsic_to_json(tagged: TaggedValue) -> Result<Value, TemplateError> {
    let TaggedValue {
        tag,
        value,
    } = tagged;
    let tag = tag.to_string();
    let name = tag.strip_prefix('!').unwrap_or(&tag);
    let key = if UNPREFIXED_TAGS.contains(&name) {
        name.to_string()
    } else {
        format!("{INTRINSIC_PREFIX}{name}")
    };
    // Tagged scalars become text. serde_yaml resolves the scalar before the
    // tag is seen, so the text is the resolved form: `0x10` reads as `16`
    // and `~` as the empty string.
    let text = match value {
        YamlValue::String(text) => text,
        YamlValue::Null => String::new(),
        YamlValue::Bool(flag) => flag.to_string(),
        YamlValue::Number(number) => number.to_string(),
        nested => {
            let mut map = Map::with_capacity(1);
            map.insert(key, yaml_to_json(nested)?);
            return Ok(Value::Object(map));
        }
    };
    let value = if name == GET_ATT_TAG { split_get_att(text) } else { Value::String(text) };
    let mut map = Map::with_capacity(1);
    map.insert(key, value);
    Ok(Value::Object(map))
}

/// Splits `Resource.Attribute` on the first dot only.
fn split_get_att(text: String) -> Value {
    if let Some((resource, attribute)) = text.split_once('.') {
        return Value::Array(vec![
            Value::String(resource.to_string()),
            Value::String(attribute.to_string()),
        ]);
    }
    Value::String(text)
}

/// Converts a YAML number, falling back to its text for non-finite floats.
fn yaml_number(number: &serde_yaml::Number) -> Value {
    if let Some(value) = number.as_u64() {
        return Value::Number(Number::from(value));
    }
    if let Some(value) = number.as_i64() {
        return Value::Number(Number::from(value));
    }
    number
        .as_f64()
        .and_then(Number::from_f64)
        .map_or_else(|| Value::String(number.to_string()), Value::Number)
}

/// Converts a YAML mapping key into a JSON object key.
fn mapping_key(key: YamlValue) -> Result<String, TemplateError> {
    match key {
        YamlValue::String(text) => Ok(text),
        YamlValue::Bool(flag) => Ok(flag.to_string()),
        YamlValue::Number(number) => Ok(number.to_string()),
        YamlValue::Null => Err(TemplateError::UnsupportedKey("null")),
        YamlValue::Sequence(_) => Err(TemplateError::UnsupportedKey("sequence")),
        YamlValue::Mapping(_) => Err(TemplateError::UnsupportedKey("mapping")),
        YamlValue::Tagged(_) => Err(TemplateError::UnsupportedKey("tagged value")),
    }
}
