// crates/serverlessrepo/src/permissions.rs
// ============================================================================
// Module: Application Permissions
// Description: Public, private, and account-scoped sharing for applications.
// Purpose: Build sharing policies and submit them through the client.
// Dependencies: tracing, crate::{client, policy, request}
// ============================================================================

//! ## Overview
//! Each operation replaces the application's whole policy: public grants
//! `Deploy` to `*`, private submits no statements, and sharing grants
//! `Deploy` to the given account ids. Success means the client call
//! returned without error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use tracing::info;

use crate::client::RepositoryClient;
use crate::error::ServerlessRepoError;
use crate::policy::ApplicationPolicy;
use crate::policy::PRINCIPAL_WILDCARD;
use crate::policy::PolicyAction;
use crate::policy::PolicyStatement;
use crate::request::PutApplicationPolicyRequest;

// ============================================================================
// SECTION: Permission Manager
// ============================================================================

/// Manages sharing policies of SAR applications.
pub struct PermissionManager<C> {
    /// Client used for remote calls.
    client: C,
}

impl<C: RepositoryClient> PermissionManager<C> {
    /// Creates a permission manager around a client.
    pub const fn new(client: C) -> Self {
        Self {
            client,
        }
    }

    /// Makes the application deployable by every account.
    ///
    /// # Errors
    ///
    /// Returns [`ServerlessRepoError`] when the id is empty or the policy
    /// call fails.
    pub fn make_application_public(&self, application_id: &str) -> Result<(), ServerlessRepoError> {
        if application_id.is_empty() {
            return Err(ServerlessRepoError::precondition(
                "Require application id to make the app public",
            ));
        }
        let policy = ApplicationPolicy::from_lists(&[PRINCIPAL_WILDCARD], &[PolicyAction::Deploy]);
        self.put_policy(application_id, vec![policy.to_statement()?])?;
        info!(application_id, "application made public");
        Ok(())
    }

    /// Removes every sharing statement from the application.
    ///
    /// # Errors
    ///
    /// Returns [`ServerlessRepoError`] when the id is empty or the policy
    /// call fails.
    pub fn make_application_private(
        &self,
        application_id: &str,
    ) -> Result<(), ServerlessRepoError> {
        if application_id.is_empty() {
            return Err(ServerlessRepoError::precondition(
                "Require application id to make the app private",
            ));
        }
        self.put_policy(application_id, Vec::new())?;
        info!(application_id, "application made private");
        Ok(())
    }

    /// Makes the application deployable by the given accounts.
    ///
    /// # Errors
    ///
    /// Returns [`ServerlessRepoError`] when an argument is empty, an account
    /// id is malformed, or the policy call fails.
    pub fn share_application_with_accounts<S: AsRef<str>>(
        &self,
        application_id: &str,
        account_ids: &[S],
    ) -> Result<(), ServerlessRepoError> {
        if application_id.is_empty() || account_ids.is_empty() {
            return Err(ServerlessRepoError::precondition(
                "Require application id and list of AWS account IDs to share the app",
            ));
        }
        let policy = ApplicationPolicy::from_lists(account_ids, &[PolicyAction::Deploy]);
        let statement = policy.to_statement()?;
        let accounts = statement.principals.len();
        self.put_policy(application_id, vec![statement])?;
        info!(application_id, accounts, "application shared with accounts");
        Ok(())
    }

    /// Submits the policy statements for an application.
    fn put_policy(
        &self,
        application_id: &str,
        statements: Vec<PolicyStatement>,
    ) -> Result<(), ServerlessRepoError> {
        let request = PutApplicationPolicyRequest {
            application_id: application_id.to_string(),
            statements,
        };
        self.client.put_application_policy(&request)?;
        Ok(())
    }
}
