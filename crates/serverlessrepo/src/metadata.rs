// crates/serverlessrepo/src/metadata.rs
// ============================================================================
// Module: Application Metadata
// Description: Extraction and validation of SAR application metadata.
// Purpose: Read the `AWS::ServerlessRepo::Application` block from a template.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Application metadata lives under `Metadata` →
//! `AWS::ServerlessRepo::Application` in a SAM template. Values are read
//! verbatim; which fields are required depends on the request being built,
//! so [`ApplicationMetadata::validate`] takes the required set per call.
//! Mappings, sequences, and intrinsic functions are not metadata values and
//! are rejected instead of being rendered to text.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Top-level template section holding application metadata.
pub const METADATA_SECTION: &str = "Metadata";
/// Metadata key holding the SAR application definition.
pub const APPLICATION_SECTION: &str = "AWS::ServerlessRepo::Application";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors emitted while extracting or validating application metadata.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetadataError {
    /// A section on the metadata path is absent.
    #[error("application metadata not found in the SAM template: 'missing {0} section'")]
    NotFound(&'static str),
    /// Required properties are empty or absent, sorted by name.
    #[error("required application metadata properties not provided: '{}'", .0.join(", "))]
    MissingProperties(Vec<&'static str>),
    /// A property holds a structured value instead of text.
    #[error("application metadata property '{0}' must be a scalar value")]
    InvalidValue(&'static str),
}

// ============================================================================
// SECTION: Fields
// ============================================================================

/// Application metadata fields recognized in the template.
///
/// # Invariants
/// - Variant order is the order used for publish details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum MetadataField {
    /// Application name.
    Name,
    /// Application description.
    Description,
    /// Publisher name.
    Author,
    /// SPDX license identifier.
    SpdxLicenseId,
    /// License file URL.
    LicenseUrl,
    /// Readme file URL.
    ReadmeUrl,
    /// Search labels.
    Labels,
    /// Project homepage URL.
    HomepageUrl,
    /// Semantic version of the published template.
    SemanticVersion,
    /// Source code URL for the version.
    SourceCodeUrl,
}

impl MetadataField {
    /// All fields in declaration order.
    pub const ALL: [Self; 10] = [
        Self::Name,
        Self::Description,
        Self::Author,
        Self::SpdxLicenseId,
        Self::LicenseUrl,
        Self::ReadmeUrl,
        Self::Labels,
        Self::HomepageUrl,
        Self::SemanticVersion,
        Self::SourceCodeUrl,
    ];

    /// Returns the key used inside the template metadata block.
    #[must_use]
    pub const fn template_key(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Description => "Description",
            Self::Author => "Author",
            Self::SpdxLicenseId => "SpdxLicenseId",
            Self::LicenseUrl => "LicenseUrl",
            Self::ReadmeUrl => "ReadmeUrl",
            Self::Labels => "Labels",
            Self::HomepageUrl => "HomepageUrl",
            Self::SemanticVersion => "SemanticVersion",
            Self::SourceCodeUrl => "SourceCodeUrl",
        }
    }

    /// Returns the field name used in outbound requests.
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::HomepageUrl => "HomePageUrl",
            other => other.template_key(),
        }
    }

    /// Returns the property name reported in validation errors.
    #[must_use]
    pub const fn property_name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Description => "description",
            Self::Author => "author",
            Self::SpdxLicenseId => "spdx_license_id",
            Self::LicenseUrl => "license_url",
            Self::ReadmeUrl => "readme_url",
            Self::Labels => "labels",
            Self::HomepageUrl => "home_page_url",
            Self::SemanticVersion => "semantic_version",
            Self::SourceCodeUrl => "source_code_url",
        }
    }
}

/// Non-empty value of a metadata field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Single text value.
    Text(String),
    /// Ordered list of labels.
    List(Vec<String>),
}

impl FieldValue {
    /// Returns true when the value carries no content.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.is_empty(),
            Self::List(items) => items.is_empty(),
        }
    }
}

// ============================================================================
// SECTION: Application Metadata
// ============================================================================

/// SAR application metadata as declared in a template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationMetadata {
    /// Application name.
    pub name: Option<String>,
    /// Application description.
    pub description: Option<String>,
    /// Publisher name.
    pub author: Option<String>,
    /// SPDX license identifier.
    pub spdx_license_id: Option<String>,
    /// License file URL.
    pub license_url: Option<String>,
    /// Readme file URL.
    pub readme_url: Option<String>,
    /// Search labels.
    pub labels: Option<Vec<String>>,
    /// Project homepage URL.
    pub home_page_url: Option<String>,
    /// Semantic version.
    pub semantic_version: Option<String>,
    /// Source code URL.
    pub source_code_url: Option<String>,
}

impl ApplicationMetadata {
    /// Builds metadata from the application section of a template.
    ///
    /// Non-mapping sections yield empty metadata.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::InvalidValue`] when a field holds a mapping or
    /// sequence, or a label is not a non-null scalar.
    pub fn from_section(section: &Value) -> Result<Self, MetadataError> {
        let Value::Object(map) = section else {
            return Ok(Self::default());
        };
        Ok(Self {
            name: text_field(map, MetadataField::Name)?,
            description: text_field(map, MetadataField::Description)?,
            author: text_field(map, MetadataField::Author)?,
            spdx_license_id: text_field(map, MetadataField::SpdxLicenseId)?,
            license_url: text_field(map, MetadataField::LicenseUrl)?,
            readme_url: text_field(map, MetadataField::ReadmeUrl)?,
            labels: labels_field(map)?,
            home_page_url: text_field(map, MetadataField::HomepageUrl)?,
            semantic_version: text_field(map, MetadataField::SemanticVersion)?,
            source_code_url: text_field(map, MetadataField::SourceCodeUrl)?,
        })
    }

    /// Returns a text field when it is present and non-empty.
    ///
    /// Always `None` for [`MetadataField::Labels`]; use [`Self::labels`].
    #[must_use]
    pub fn text(&self, field: MetadataField) -> Option<&str> {
        let value = match field {
            MetadataField::Name => self.name.as_deref(),
            MetadataField::Description => self.description.as_deref(),
            MetadataField::Author => self.author.as_deref(),
            MetadataField::SpdxLicenseId => self.spdx_license_id.as_deref(),
            MetadataField::LicenseUrl => self.license_url.as_deref(),
            MetadataField::ReadmeUrl => self.readme_url.as_deref(),
            MetadataField::HomepageUrl => self.home_page_url.as_deref(),
            MetadataField::SemanticVersion => self.semantic_version.as_deref(),
            MetadataField::SourceCodeUrl => self.source_code_url.as_deref(),
            MetadataField::Labels => None,
        };
        value.filter(|text| !text.is_empty())
    }

    /// Returns the labels when present and non-empty.
    #[must_use]
    pub fn labels(&self) -> Option<&[String]> {
        self.labels.as_deref().filter(|labels| !labels.is_empty())
    }

    /// Returns the non-empty value of a field.
    #[must_use]
    pub fn value(&self, field: MetadataField) -> Option<FieldValue> {
        match field {
            MetadataField::Labels => self.labels().map(|labels| FieldValue::List(labels.to_vec())),
            other => self.text(other).map(|text| FieldValue::Text(text.to_string())),
        }
    }

    /// Returns true when a field holds a non-empty value.
    #[must_use]
    pub fn is_present(&self, field: MetadataField) -> bool {
        match field {
            MetadataField::Labels => self.labels().is_some(),
            other => self.text(other).is_some(),
        }
    }

    /// Iterates non-empty fields in declaration order.
    pub fn present_fields(&self) -> impl Iterator<Item = (MetadataField, FieldValue)> + '_ {
        MetadataField::ALL.into_iter().filter_map(|field| self.value(field).map(|v| (field, v)))
    }

    /// Checks that every required field holds a non-empty value.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::MissingProperties`] listing the missing
    /// property names in sorted order.
    pub fn validate(&self, required: &[MetadataField]) -> Result<(), MetadataError> {
        let mut missing: Vec<&'static str> = required
            .iter()
            .copied()
            .filter(|field| !self.is_present(*field))
            .map(MetadataField::property_name)
            .collect();
        if missing.is_empty() {
            return Ok(());
        }
        missing.sort_unstable();
        missing.dedup();
        Err(MetadataError::MissingProperties(missing))
    }
}

// ============================================================================
// SECTION: Extraction
// ============================================================================

/// Extracts application metadata from a parsed template.
///
/// # Errors
///
/// Returns [`MetadataError::NotFound`] naming the first absent section, or
/// [`MetadataError::InvalidValue`] for a structured field value.
pub fn extract_app_metadata(document: &Value) -> Result<ApplicationMetadata, MetadataError> {
    let metadata =
        document.get(METADATA_SECTION).ok_or(MetadataError::NotFound(METADATA_SECTION))?;
    let section =
        metadata.get(APPLICATION_SECTION).ok_or(MetadataError::NotFound(APPLICATION_SECTION))?;
    ApplicationMetadata::from_section(section)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads a text field, coercing scalars to their text.
fn text_field(
    map: &Map<String, Value>,
    field: MetadataField,
) -> Result<Option<String>, MetadataError> {
    match map.get(field.template_key()) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => scalar_text(value)
            .map(Some)
            .ok_or(MetadataError::InvalidValue(field.property_name())),
    }
}

/// Reads the labels field; a lone scalar becomes a single label.
fn labels_field(map: &Map<String, Value>) -> Result<Option<Vec<String>>, MetadataError> {
    let invalid = MetadataError::InvalidValue(MetadataField::Labels.property_name());
    match map.get(MetadataField::Labels.template_key()) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| scalar_text(item).ok_or_else(|| invalid.clone()))
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        Some(other) => scalar_text(other).map(|label| Some(vec![label])).ok_or(invalid),
    }
}

/// Returns the text of a non-null scalar.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
