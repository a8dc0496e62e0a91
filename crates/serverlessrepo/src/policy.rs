// crates/serverlessrepo/src/policy.rs
// ============================================================================
// Module: Application Policy
// Description: Principal/action sharing rules for SAR applications.
// Purpose: Validate sharing rules and render policy statements.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! An [`ApplicationPolicy`] pairs comma-separated principals (12-digit AWS
//! account ids or `*`) with comma-separated actions drawn from
//! [`PolicyAction`]. Whitespace is stripped on construction and validation
//! reports the first failing check.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Principal granting access to every account.
pub const PRINCIPAL_WILDCARD: &str = "*";
/// Length of an AWS account id.
const ACCOUNT_ID_LENGTH: usize = 12;
/// Separator between principals and between actions.
const LIST_SEPARATOR: char = ',';

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors emitted by policy validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    /// No principals were given.
    #[error("principals not provided")]
    MissingPrincipals,
    /// No actions were given.
    #[error("actions not provided")]
    MissingActions,
    /// Principals are not comma-separated account ids.
    #[error("principals should be comma separated 12-digit numbers")]
    InvalidPrincipals,
    /// Actions are not comma-separated words.
    #[error("actions should be comma separated")]
    InvalidActions,
    /// Actions outside the supported set, sorted.
    #[error("{} not supported", .0.join(", "))]
    UnsupportedActions(Vec<String>),
}

// ============================================================================
// SECTION: Actions
// ============================================================================

/// Actions that can be granted on a SAR application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PolicyAction {
    /// View the application.
    GetApplication,
    /// Create a CloudFormation change set from the application.
    CreateCloudFormationChangeSet,
    /// Create a CloudFormation template from the application.
    CreateCloudFormationTemplate,
    /// List application versions.
    ListApplicationVersions,
    /// Find the application in search.
    SearchApplications,
    /// Deploy the application.
    Deploy,
}

impl PolicyAction {
    /// All supported actions.
    pub const ALL: [Self; 6] = [
        Self::GetApplication,
        Self::CreateCloudFormationChangeSet,
        Self::CreateCloudFormationTemplate,
        Self::ListApplicationVersions,
        Self::SearchApplications,
        Self::Deploy,
    ];

    /// Returns the action name used on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GetApplication => "GetApplication",
            Self::CreateCloudFormationChangeSet => "CreateCloudFormationChangeSet",
            Self::CreateCloudFormationTemplate => "CreateCloudFormationTemplate",
            Self::ListApplicationVersions => "ListApplicationVersions",
            Self::SearchApplications => "SearchApplications",
            Self::Deploy => "Deploy",
        }
    }
}

impl fmt::Display for PolicyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyAction {
    type Err = PolicyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == value)
            .ok_or_else(|| PolicyError::UnsupportedActions(vec![value.to_string()]))
    }
}

// ============================================================================
// SECTION: Policy
// ============================================================================

/// Statement sent in a put-application-policy request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyStatement {
    /// Account ids or `*`, in the order given.
    pub principals: Vec<String>,
    /// Granted actions, in the order given.
    pub actions: Vec<PolicyAction>,
}

/// Sharing rule for a SAR application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationPolicy {
    /// Comma-separated principals with whitespace removed.
    principals: String,
    /// Comma-separated actions with whitespace removed.
    actions: String,
}

impl ApplicationPolicy {
    /// Creates a policy from comma-separated principals and actions.
    #[must_use]
    pub fn new(principals: &str, actions: &str) -> Self {
        Self {
            principals: strip_whitespace(principals),
            actions: strip_whitespace(actions),
        }
    }

    /// Creates a policy from principal and action lists.
    #[must_use]
    pub fn from_lists<P: AsRef<str>>(principals: &[P], actions: &[PolicyAction]) -> Self {
        let principals: Vec<&str> = principals.iter().map(AsRef::as_ref).collect();
        let actions: Vec<&str> = actions.iter().map(|action| action.as_str()).collect();
        Self::new(&principals.join(","), &actions.join(","))
    }

    /// Returns the normalized principals.
    #[must_use]
    pub fn principals(&self) -> &str {
        &self.principals
    }

    /// Returns the normalized actions.
    #[must_use]
    pub fn actions(&self) -> &str {
        &self.actions
    }

    /// Validates principals and actions.
    ///
    /// # Errors
    ///
    /// Returns the first failing [`PolicyError`] in this order: missing
    /// principals, missing actions, malformed principals, malformed actions,
    /// unsupported actions.
    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.principals.is_empty() {
            return Err(PolicyError::MissingPrincipals);
        }
        if self.actions.is_empty() {
            return Err(PolicyError::MissingActions);
        }
        if !self.principals.split(LIST_SEPARATOR).all(is_valid_principal) {
            return Err(PolicyError::InvalidPrincipals);
        }
        if !self.actions.split(LIST_SEPARATOR).all(is_action_word) {
            return Err(PolicyError::InvalidActions);
        }
        let unsupported: BTreeSet<&str> = self
            .actions
            .split(LIST_SEPARATOR)
            .filter(|action| action.parse::<PolicyAction>().is_err())
            .collect();
        if !unsupported.is_empty() {
            return Err(PolicyError::UnsupportedActions(
                unsupported.into_iter().map(str::to_string).collect(),
            ));
        }
        Ok(())
    }

    /// Validates the policy and renders it as a statement.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError`] when validation fails.
    pub fn to_statement(&self) -> Result<PolicyStatement, PolicyError> {
        self.validate()?;
        let principals = self.principals.split(LIST_SEPARATOR).map(str::to_string).collect();
        let actions = self
            .actions
            .split(LIST_SEPARATOR)
            .map(str::parse::<PolicyAction>)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PolicyStatement {
            principals,
            actions,
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Removes every whitespace character.
fn strip_whitespace(value: &str) -> String {
    value.chars().filter(|ch| !ch.is_whitespace()).collect()
}

/// Returns true for `*` or a 12-digit account id.
fn is_valid_principal(principal: &str) -> bool {
    principal == PRINCIPAL_WILDCARD
        || (principal.len() == ACCOUNT_ID_LENGTH && principal.bytes().all(|b| b.is_ascii_digit()))
}

/// Returns true for a non-empty alphabetic word.
fn is_action_word(action: &str) -> bool {
    !action.is_empty() && action.bytes().all(|b| b.is_ascii_alphabetic())
}
