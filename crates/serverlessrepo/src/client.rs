// crates/serverlessrepo/src/client.rs
// ============================================================================
// Module: Repository Client Interface
// Description: Remote collaborator contract for the Serverless Application
// Repository API.
// Purpose: Decouple publish and permission logic from any transport.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! [`RepositoryClient`] is the four-operation surface the publisher and
//! permission manager call. Implementations own transport, signing, retries,
//! and timeouts; failures come back as [`RemoteError`] carrying the service
//! error code and message. A `ConflictException` on create carries the ARN
//! of the existing application in its message, recovered by
//! [`parse_application_id`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use thiserror::Error;

use crate::request::CreateApplicationRequest;
use crate::request::CreateApplicationResponse;
use crate::request::CreateApplicationVersionRequest;
use crate::request::PutApplicationPolicyRequest;
use crate::request::UpdateApplicationRequest;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Error code returned when the target resource already exists.
pub const CONFLICT_EXCEPTION: &str = "ConflictException";
/// Characters trimmed from message tokens before ARN matching.
const TOKEN_PUNCTUATION: [char; 8] = ['\'', '"', '.', ',', ';', ':', '(', ')'];

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Failure reported by the remote repository service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct RemoteError {
    /// Service error code, e.g. `ConflictException`.
    pub code: String,
    /// Service error message.
    pub message: String,
}

impl RemoteError {
    /// Creates a remote error from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Creates a conflict error with the given message.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(CONFLICT_EXCEPTION, message)
    }

    /// Returns true when the error signals an existing resource.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        self.code == CONFLICT_EXCEPTION
    }

    /// Returns the application ARN mentioned in the message, if any.
    #[must_use]
    pub fn application_id(&self) -> Option<String> {
        parse_application_id(&self.message)
    }
}

// ============================================================================
// SECTION: Client Trait
// ============================================================================

/// Synchronous client for the Serverless Application Repository API.
pub trait RepositoryClient {
    /// Creates a new application.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError`]; a conflict means the application exists.
    fn create_application(
        &self,
        request: &CreateApplicationRequest,
    ) -> Result<CreateApplicationResponse, RemoteError>;

    /// Updates metadata of an existing application.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError`] when the service rejects the request.
    fn update_application(&self, request: &UpdateApplicationRequest) -> Result<(), RemoteError>;

    /// Creates a new version of an existing application.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError`]; a conflict means the version exists.
    fn create_application_version(
        &self,
        request: &CreateApplicationVersionRequest,
    ) -> Result<(), RemoteError>;

    /// Replaces the sharing policy of an application.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError`] when the service rejects the request.
    fn put_application_policy(
        &self,
        request: &PutApplicationPolicyRequest,
    ) -> Result<(), RemoteError>;
}

impl<T: RepositoryClient + ?Sized> RepositoryClient for &T {
    fn create_application(
        &self,
        request: &CreateApplicationRequest,
    ) -> Result<CreateApplicationResponse, RemoteError> {
        (**self).create_application(request)
    }

    fn update_application(&self, request: &UpdateApplicationRequest) -> Result<(), RemoteError> {
        (**self).update_application(request)
    }

    fn create_application_version(
        &self,
        request: &CreateApplicationVersionRequest,
    ) -> Result<(), RemoteError> {
        (**self).create_application_version(request)
    }

    fn put_application_policy(
        &self,
        request: &PutApplicationPolicyRequest,
    ) -> Result<(), RemoteError> {
        (**self).put_application_policy(request)
    }
}

impl<T: RepositoryClient + ?Sized> RepositoryClient for Arc<T> {
    fn create_application(
        &self,
        request: &CreateApplicationRequest,
    ) -> Result<CreateApplicationResponse, RemoteError> {
        (**self).create_application(request)
    }

    fn update_application(&self, request: &UpdateApplicationRequest) -> Result<(), RemoteError> {
        (**self).update_application(request)
    }

    fn create_application_version(
        &self,
        request: &CreateApplicationVersionRequest,
    ) -> Result<(), RemoteError> {
        (**self).create_application_version(request)
    }

    fn put_application_policy(
        &self,
        request: &PutApplicationPolicyRequest,
    ) -> Result<(), RemoteError> {
        (**self).put_application_policy(request)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Extracts the first SAR application ARN from a service message.
///
/// Matches `arn:<partition>:serverlessrepo:<region>:<account>:applications/<name>`.
#[must_use]
pub fn parse_application_id(message: &str) -> Option<String> {
    message
        .split_whitespace()
        .map(|token| token.trim_matches(TOKEN_PUNCTUATION.as_slice()))
        .find(|token| is_application_arn(token))
        .map(str::to_string)
}

/// Returns true when the token is a SAR application ARN.
fn is_application_arn(token: &str) -> bool {
    let mut parts = token.splitn(6, ':');
    parts.next() == Some("arn")
        && parts.next().is_some_and(|partition| !partition.is_empty())
        && parts.next() == Some("serverlessrepo")
        && parts.next().is_some_and(|region| !region.is_empty())
        && parts
            .next()
            .is_some_and(|account| !account.is_empty() && account.bytes().all(|b| b.is_ascii_digit()))
        && parts
            .next()
            .and_then(|resource| resource.strip_prefix("applications/"))
            .is_some_and(|name| !name.is_empty())
}
