// crates/serverlessrepo/src/lib.rs
// ============================================================================
// Module: Serverless Repo
// Description: SAM template parsing and Serverless Application Repository
// publishing helpers.
// Purpose: Turn a packaged template into create/update/version and policy
// requests against an injected repository client.
// Dependencies: serde, serde_json, serde_yaml, thiserror, toml, tracing
// ============================================================================

//! ## Overview
//! This crate parses JSON or YAML SAM templates (including CloudFormation
//! short-form intrinsic tags), extracts the `AWS::ServerlessRepo::Application`
//! metadata block, and drives the publish workflow against a
//! [`RepositoryClient`]. Publishing creates the application, falls back to an
//! update when it already exists, and then creates a new version when a
//! semantic version is declared.
//! Invariants:
//! - Template key order is preserved from parse through re-serialization.
//! - Remote failures other than the handled conflicts surface unchanged.
//! - No client is resolved from ambient state; callers inject it.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod client;
pub mod config;
pub mod error;
pub mod metadata;
pub mod permissions;
pub mod policy;
pub mod publish;
pub mod request;
pub mod template;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use client::RemoteError;
pub use client::RepositoryClient;
pub use client::parse_application_id;
pub use config::ConfigError;
pub use config::ServerlessRepoConfig;
pub use error::ServerlessRepoError;
pub use metadata::ApplicationMetadata;
pub use metadata::FieldValue;
pub use metadata::MetadataError;
pub use metadata::MetadataField;
pub use metadata::extract_app_metadata;
pub use permissions::PermissionManager;
pub use policy::ApplicationPolicy;
pub use policy::PolicyAction;
pub use policy::PolicyError;
pub use policy::PolicyStatement;
pub use publish::PublishAction;
pub use publish::PublishOutcome;
pub use publish::Publisher;
pub use request::CreateApplicationRequest;
pub use request::CreateApplicationResponse;
pub use request::CreateApplicationVersionRequest;
pub use request::PutApplicationPolicyRequest;
pub use request::UpdateApplicationRequest;
pub use template::TemplateConfig;
pub use template::TemplateError;
pub use template::TemplateParser;
pub use template::dump_template;
pub use template::parse_template;
pub use template::read_template_file;
