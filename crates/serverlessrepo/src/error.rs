// crates/serverlessrepo/src/error.rs
// ============================================================================
// Module: Serverless Repo Errors
// Description: Crate-level error taxonomy for publish and permission calls.
// Purpose: Surface every failure to the caller unchanged in kind.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! [`ServerlessRepoError`] wraps the module errors so callers can match on
//! the failure kind. Nothing here is retried; the only suppressed failure is
//! a version conflict during publish, which never reaches this type.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::client::RemoteError;
use crate::metadata::MetadataError;
use crate::policy::PolicyError;
use crate::template::TemplateError;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors returned by publish and permission operations.
#[derive(Debug, Error)]
pub enum ServerlessRepoError {
    /// A required call argument was missing or empty.
    #[error("{0}")]
    Precondition(String),
    /// The template could not be parsed.
    #[error(transparent)]
    Template(#[from] TemplateError),
    /// Application metadata was missing or incomplete.
    #[error(transparent)]
    Metadata(#[from] MetadataError),
    /// The sharing policy was malformed or unsupported.
    #[error("invalid application policy: '{0}'")]
    Policy(#[from] PolicyError),
    /// The repository client reported a failure.
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

impl ServerlessRepoError {
    /// Builds a precondition failure from a message.
    pub(crate) fn precondition(message: &str) -> Self {
        Self::Precondition(message.to_string())
    }
}
