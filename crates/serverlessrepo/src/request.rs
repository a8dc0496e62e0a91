// crates/serverlessrepo/src/request.rs
// ============================================================================
// Module: Repository Requests
// Description: Wire payloads for SAR create/update/version/policy calls.
// Purpose: Map validated application metadata onto request bodies.
// Dependencies: serde, crate::{metadata, policy}
// ============================================================================

//! ## Overview
//! Request types serialize with the exact SAR wire names (PascalCase,
//! `HomePageUrl`) and omit empty optional fields. Builders validate the
//! fields each operation requires before a request exists.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::metadata::ApplicationMetadata;
use crate::metadata::MetadataError;
use crate::metadata::MetadataField;
use crate::policy::PolicyStatement;

// ============================================================================
// SECTION: Field Sets
// ============================================================================

/// Fields required to create an application.
pub const CREATE_APPLICATION_REQUIRED: [MetadataField; 3] =
    [MetadataField::Author, MetadataField::Description, MetadataField::Name];

/// Fields required to create an application version.
pub const CREATE_APPLICATION_VERSION_REQUIRED: [MetadataField; 1] =
    [MetadataField::SemanticVersion];

/// Fields an update request can change.
pub const UPDATE_APPLICATION_FIELDS: [MetadataField; 5] = [
    MetadataField::Author,
    MetadataField::Description,
    MetadataField::HomepageUrl,
    MetadataField::Labels,
    MetadataField::ReadmeUrl,
];

/// Fields only a new version can change.
pub const CREATE_APPLICATION_VERSION_FIELDS: [MetadataField; 2] =
    [MetadataField::SemanticVersion, MetadataField::SourceCodeUrl];

// ============================================================================
// SECTION: Create Application
// ============================================================================

/// `CreateApplication` request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateApplicationRequest {
    /// Publisher name.
    pub author: String,
    /// Application description.
    pub description: String,
    /// Project homepage URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_page_url: Option<String>,
    /// Search labels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    /// License file URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_url: Option<String>,
    /// Application name.
    pub name: String,
    /// Readme file URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readme_url: Option<String>,
    /// Semantic version of the initial version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semantic_version: Option<String>,
    /// Source code URL of the initial version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_code_url: Option<String>,
    /// SPDX license identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spdx_license_id: Option<String>,
    /// Raw template text.
    pub template_body: String,
}

impl CreateApplicationRequest {
    /// Builds a create request from metadata and the raw template.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::MissingProperties`] when author, description,
    /// or name is missing.
    pub fn from_metadata(
        metadata: &ApplicationMetadata,
        template: &str,
    ) -> Result<Self, MetadataError> {
        metadata.validate(&CREATE_APPLICATION_REQUIRED)?;
        Ok(Self {
            author: required_text(metadata, MetadataField::Author)?,
            description: required_text(metadata, MetadataField::Description)?,
            home_page_url: optional_text(metadata, MetadataField::HomepageUrl),
            labels: metadata.labels().map(<[String]>::to_vec),
            license_url: optional_text(metadata, MetadataField::LicenseUrl),
            name: required_text(metadata, MetadataField::Name)?,
            readme_url: optional_text(metadata, MetadataField::ReadmeUrl),
            semantic_version: optional_text(metadata, MetadataField::SemanticVersion),
            source_code_url: optional_text(metadata, MetadataField::SourceCodeUrl),
            spdx_license_id: optional_text(metadata, MetadataField::SpdxLicenseId),
            template_body: template.to_string(),
        })
    }
}

/// `CreateApplication` response body.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateApplicationResponse {
    /// ARN of the created application.
    pub application_id: String,
}

// ============================================================================
// SECTION: Update Application
// ============================================================================

/// `UpdateApplication` request body.
///
/// Name and semantic version are not updatable and never appear here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateApplicationRequest {
    /// ARN of the application to update.
    pub application_id: String,
    /// Publisher name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Application description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Project homepage URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_page_url: Option<String>,
    /// Search labels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    /// Readme file URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readme_url: Option<String>,
}

impl UpdateApplicationRequest {
    /// Builds an update request from metadata.
    #[must_use]
    pub fn from_metadata(metadata: &ApplicationMetadata, application_id: &str) -> Self {
        Self {
            application_id: application_id.to_string(),
            author: optional_text(metadata, MetadataField::Author),
            description: optional_text(metadata, MetadataField::Description),
            home_page_url: optional_text(metadata, MetadataField::HomepageUrl),
            labels: metadata.labels().map(<[String]>::to_vec),
            readme_url: optional_text(metadata, MetadataField::ReadmeUrl),
        }
    }
}

// ============================================================================
// SECTION: Create Application Version
// ============================================================================

/// `CreateApplicationVersion` request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateApplicationVersionRequest {
    /// ARN of the application.
    pub application_id: String,
    /// Semantic version to create.
    pub semantic_version: String,
    /// Source code URL for the version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_code_url: Option<String>,
    /// Raw template text.
    pub template_body: String,
}

impl CreateApplicationVersionRequest {
    /// Builds a create-version request from metadata and the raw template.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::MissingProperties`] when the semantic version
    /// is missing.
    pub fn from_metadata(
        metadata: &ApplicationMetadata,
        application_id: &str,
        template: &str,
    ) -> Result<Self, MetadataError> {
        metadata.validate(&CREATE_APPLICATION_VERSION_REQUIRED)?;
        Ok(Self {
            application_id: application_id.to_string(),
            semantic_version: required_text(metadata, MetadataField::SemanticVersion)?,
            source_code_url: optional_text(metadata, MetadataField::SourceCodeUrl),
            template_body: template.to_string(),
        })
    }
}

// ============================================================================
// SECTION: Put Application Policy
// ============================================================================

/// `PutApplicationPolicy` request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutApplicationPolicyRequest {
    /// ARN of the application.
    pub application_id: String,
    /// Policy statements; empty makes the application private.
    pub statements: Vec<PolicyStatement>,
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns an owned non-empty text field.
fn optional_text(metadata: &ApplicationMetadata, field: MetadataField) -> Option<String> {
    metadata.text(field).map(str::to_string)
}

/// Returns an owned text field that validation already required.
fn required_text(
    metadata: &ApplicationMetadata,
    field: MetadataField,
) -> Result<String, MetadataError> {
    optional_text(metadata, field)
        .ok_or_else(|| MetadataError::MissingProperties(vec![field.property_name()]))
}
