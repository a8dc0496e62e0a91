// crates/serverlessrepo/tests/common/mod.rs
// ============================================================================
// Module: Common Test Fixtures
// Description: Scripted repository client and template fixtures.
// Purpose: Drive publish and permission flows without a live service.
// Dependencies: serverlessrepo
// ============================================================================

//! ## Overview
//! [`ScriptedClient`] returns preset results for each remote operation and
//! records every request it receives, in order.

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::cell::RefCell;

use serverlessrepo::CreateApplicationRequest;
use serverlessrepo::CreateApplicationResponse;
use serverlessrepo::CreateApplicationVersionRequest;
use serverlessrepo::PutApplicationPolicyRequest;
use serverlessrepo::RemoteError;
use serverlessrepo::RepositoryClient;
use serverlessrepo::UpdateApplicationRequest;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// ARN used for the test application.
pub const APPLICATION_ID: &str =
    "arn:aws:serverlessrepo:us-east-1:123456789012:applications/test-app";

/// JSON-like template with name, description, author, and version.
pub const VERSIONED_TEMPLATE: &str = r#"
{
    "Metadata": {
        'AWS::ServerlessRepo::Application': {
            'Name': 'test-app',
            'Description': 'hello world',
            'Author': 'abc',
            'SemanticVersion': '1.0.0'
        }
    }
}
"#;

/// Template with only name, description, and author.
pub const UNVERSIONED_TEMPLATE: &str = r#"{
    "Metadata": {
        "AWS::ServerlessRepo::Application": {
            "Name": "test-app",
            "Description": "hello world",
            "Author": "abc"
        }
    }
}"#;

/// Conflict returned by create when the application exists.
#[must_use]
pub fn application_exists() -> RemoteError {
    RemoteError::conflict(format!("Application with id {APPLICATION_ID} already exists"))
}

/// Conflict returned by create-version when the version exists.
#[must_use]
pub fn version_exists() -> RemoteError {
    RemoteError::conflict(format!(
        "Cannot publish version 1.0.0 for application {APPLICATION_ID} because it already exists"
    ))
}

/// Non-conflict service failure.
#[must_use]
pub fn bad_request() -> RemoteError {
    RemoteError::new("BadRequestException", "invalid request")
}

// ============================================================================
// SECTION: Scripted Client
// ============================================================================

/// Request recorded by [`ScriptedClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    /// `CreateApplication` request.
    Create(CreateApplicationRequest),
    /// `UpdateApplication` request.
    Update(UpdateApplicationRequest),
    /// `CreateApplicationVersion` request.
    CreateVersion(CreateApplicationVersionRequest),
    /// `PutApplicationPolicy` request.
    PutPolicy(PutApplicationPolicyRequest),
}

/// Repository client returning preset results.
pub struct ScriptedClient {
    /// Result of `CreateApplication`.
    pub create: Result<CreateApplicationResponse, RemoteError>,
    /// Result of `UpdateApplication`.
    pub update: Result<(), RemoteError>,
    /// Result of `CreateApplicationVersion`.
    pub create_version: Result<(), RemoteError>,
    /// Result of `PutApplicationPolicy`.
    pub put_policy: Result<(), RemoteError>,
    /// Requests received, in order.
    pub calls: RefCell<Vec<Call>>,
}

impl Default for ScriptedClient {
    fn default() -> Self {
        Self {
            create: Ok(CreateApplicationResponse {
                application_id: APPLICATION_ID.to_string(),
            }),
            update: Ok(()),
            create_version: Ok(()),
            put_policy: Ok(()),
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl ScriptedClient {
    /// Client whose create call reports an existing application.
    #[must_use]
    pub fn existing_application() -> Self {
        Self {
            create: Err(application_exists()),
            ..Self::default()
        }
    }

    /// Returns the recorded requests.
    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// Returns recorded update requests.
    #[must_use]
    pub fn updates(&self) -> Vec<UpdateApplicationRequest> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Update(request) => Some(request),
                _ => None,
            })
            .collect()
    }

    /// Returns recorded create-version requests.
    #[must_use]
    pub fn versions(&self) -> Vec<CreateApplicationVersionRequest> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::CreateVersion(request) => Some(request),
                _ => None,
            })
            .collect()
    }

    /// Returns recorded policy requests.
    #[must_use]
    pub fn policies(&self) -> Vec<PutApplicationPolicyRequest> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::PutPolicy(request) => Some(request),
                _ => None,
            })
            .collect()
    }

    /// Records a request.
    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

impl RepositoryClient for ScriptedClient {
    fn create_application(
        &self,
        request: &CreateApplicationRequest,
    ) -> Result<CreateApplicationResponse, RemoteError> {
        self.record(Call::Create(request.clone()));
        self.create.clone()
    }

    fn update_application(&self, request: &UpdateApplicationRequest) -> Result<(), RemoteError> {
        self.record(Call::Update(request.clone()));
        self.update.clone()
    }

    fn create_application_version(
        &self,
        request: &CreateApplicationVersionRequest,
    ) -> Result<(), RemoteError> {
        self.record(Call::CreateVersion(request.clone()));
        self.create_version.clone()
    }

    fn put_application_policy(
        &self,
        request: &PutApplicationPolicyRequest,
    ) -> Result<(), RemoteError> {
        self.record(Call::PutPolicy(request.clone()));
        self.put_policy.clone()
    }
}
