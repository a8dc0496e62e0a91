// crates/serverlessrepo/src/publish.rs
// ============================================================================
// Module: Application Publisher
// Description: Create/update/version workflow for SAR applications.
// Purpose: Publish a SAM template through an injected repository client.
// Dependencies: serde, tracing, crate::{client, metadata, request, template}
// ============================================================================

//! ## Overview
//! Publishing first attempts to create the application. A conflict means it
//! already exists: the publisher then updates its metadata and, when the
//! template declares a semantic version, creates that version. A conflict on
//! the version is treated as already published and skipped. Steps run
//! strictly in sequence, each gated on the previous outcome.
//!
//! [`PublishOutcome::actions`] lists exactly the calls that committed, and
//! [`PublishOutcome::details`] the metadata those calls persisted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;
use tracing::info;

use crate::client::RepositoryClient;
use crate::config::ServerlessRepoConfig;
use crate::error::ServerlessRepoError;
use crate::metadata::ApplicationMetadata;
use crate::metadata::FieldValue;
use crate::metadata::MetadataField;
use crate::metadata::extract_app_metadata;
use crate::request::CREATE_APPLICATION_VERSION_FIELDS;
use crate::request::CreateApplicationRequest;
use crate::request::CreateApplicationVersionRequest;
use crate::request::UPDATE_APPLICATION_FIELDS;
use crate::request::UpdateApplicationRequest;
use crate::template::TemplateParser;

// ============================================================================
// SECTION: Outcome
// ============================================================================

/// Remote action committed during publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PublishAction {
    /// `CreateApplication` succeeded.
    CreateApplication,
    /// `UpdateApplication` succeeded.
    UpdateApplication,
    /// `CreateApplicationVersion` succeeded.
    CreateApplicationVersion,
}

impl PublishAction {
    /// Returns a stable label for the action.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreateApplication => "CreateApplication",
            Self::UpdateApplication => "UpdateApplication",
            Self::CreateApplicationVersion => "CreateApplicationVersion",
        }
    }
}

/// Result of a publish call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishOutcome {
    /// ARN of the created or updated application.
    pub application_id: String,
    /// Actions performed, in order.
    pub actions: Vec<PublishAction>,
    /// Metadata persisted by those actions.
    pub details: BTreeMap<MetadataField, FieldValue>,
}

// ============================================================================
// SECTION: Publisher
// ============================================================================

/// Publishes SAM templates to the Serverless Application Repository.
pub struct Publisher<C> {
    /// Client used for remote calls.
    client: C,
    /// Template parser, including limits.
    parser: TemplateParser,
}

impl<C: RepositoryClient> Publisher<C> {
    /// Creates a publisher with the default template configuration.
    pub fn new(client: C) -> Self {
        Self {
            client,
            parser: TemplateParser::default(),
        }
    }

    /// Creates a publisher using loaded configuration.
    pub fn with_config(client: C, config: &ServerlessRepoConfig) -> Self {
        Self {
            client,
            parser: TemplateParser::new(config.template.clone()),
        }
    }

    /// Creates the application, or updates it and creates a version when it
    /// already exists.
    ///
    /// `application_id` is used as the existing application when the create
    /// conflict does not name one.
    ///
    /// # Errors
    ///
    /// Returns [`ServerlessRepoError`] when the template is empty or invalid,
    /// metadata is missing, or a remote call fails with anything other than
    /// the handled conflicts.
    pub fn publish(
        &self,
        template: &str,
        application_id: Option<&str>,
    ) -> Result<PublishOutcome, ServerlessRepoError> {
        if template.is_empty() {
            return Err(ServerlessRepoError::precondition(
                "Require SAM template to publish the application",
            ));
        }
        let metadata = self.load_metadata(template)?;
        let request = CreateApplicationRequest::from_metadata(&metadata, template)?;
        debug!(name = %request.name, "creating application");
        let (application_id, actions) = match self.client.create_application(&request) {
            Ok(response) => {
                info!(application_id = %response.application_id, "created application");
                (response.application_id, vec![PublishAction::CreateApplication])
            }
            Err(err) if err.is_conflict() => {
                let Some(existing) =
                    err.application_id().or_else(|| application_id.map(str::to_string))
                else {
                    return Err(err.into());
                };
                debug!(application_id = %existing, "application exists, updating");
                let actions = self.update_existing(&metadata, &existing, template)?;
                (existing, actions)
            }
            Err(err) => return Err(err.into()),
        };
        let details = publish_details(&actions, &metadata);
        let performed: Vec<&str> = actions.iter().map(|action| action.as_str()).collect();
        info!(
            application_id = %application_id,
            actions = %performed.join(","),
            "publish finished"
        );
        Ok(PublishOutcome {
            application_id,
            actions,
            details,
        })
    }

    /// Updates metadata of an existing application from a template.
    ///
    /// # Errors
    ///
    /// Returns [`ServerlessRepoError`] when either argument is empty, the
    /// template is invalid, metadata is missing, or the update fails.
    pub fn update_application_metadata(
        &self,
        template: &str,
        application_id: &str,
    ) -> Result<(), ServerlessRepoError> {
        if template.is_empty() || application_id.is_empty() {
            return Err(ServerlessRepoError::precondition(
                "Require SAM template and application ID to update application metadata",
            ));
        }
        let metadata = self.load_metadata(template)?;
        let request = UpdateApplicationRequest::from_metadata(&metadata, application_id);
        self.client.update_application(&request)?;
        info!(application_id, "updated application metadata");
        Ok(())
    }

    /// Parses the template and extracts its application metadata.
    fn load_metadata(&self, template: &str) -> Result<ApplicationMetadata, ServerlessRepoError> {
        let document = self.parser.parse(template)?;
        Ok(extract_app_metadata(&document)?)
    }

    /// Updates an existing application, then creates the declared version.
    fn update_existing(
        &self,
        metadata: &ApplicationMetadata,
        application_id: &str,
        template: &str,
    ) -> Result<Vec<PublishAction>, ServerlessRepoError> {
        let request = UpdateApplicationRequest::from_metadata(metadata, application_id);
        self.client.update_application(&request)?;
        info!(application_id, "updated application");
        let mut actions = vec![PublishAction::UpdateApplication];

        if !metadata.is_present(MetadataField::SemanticVersion) {
            return Ok(actions);
        }
        let request =
            CreateApplicationVersionRequest::from_metadata(metadata, application_id, template)?;
        match self.client.create_application_version(&request) {
            Ok(()) => {
                info!(
                    application_id,
                    semantic_version = %request.semantic_version,
                    "created application version"
                );
                actions.push(PublishAction::CreateApplicationVersion);
            }
            Err(err) if err.is_conflict() => {
                debug!(
                    application_id,
                    semantic_version = %request.semantic_version,
                    "application version already exists"
                );
            }
            Err(err) => return Err(err.into()),
        }
        Ok(actions)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the metadata persisted by the given action sequence.
fn publish_details(
    actions: &[PublishAction],
    metadata: &ApplicationMetadata,
) -> BTreeMap<MetadataField, FieldValue> {
    let created = matches!(actions, [PublishAction::CreateApplication]);
    let versioned = actions.contains(&PublishAction::CreateApplicationVersion);
    metadata
        .present_fields()
        .filter(|(field, _)| {
            created
                || UPDATE_APPLICATION_FIELDS.contains(field)
                || (versioned && CREATE_APPLICATION_VERSION_FIELDS.contains(field))
        })
        .collect()
}
