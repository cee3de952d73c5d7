//! Error types for Storegen Core
//!
//! Provides error handling for:
//! - External service calls (generation, hosting)
//! - Store profile validation
//! - Generation and refinement input
//! - Deployment assembly
//! - Session transitions
//! - Configuration loading

use crate::session::Step;
use std::path::PathBuf;
use storegen_files::FileSetError;

/// Failure talking to an external service
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// Credential setting is not configured
    #[error("{0} is not configured")]
    MissingCredentials(&'static str),

    /// Request never produced a response (connect, timeout, TLS)
    #[error("transport error: {0}")]
    Transport(String),

    /// Service answered with a non-success status
    #[error("service returned {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// Response body could not be understood
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl ServiceError {
    /// Create status error
    #[inline]
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    /// Create malformed response error
    #[inline]
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedResponse(reason.into())
    }

    /// Check if error is a local configuration problem
    #[inline]
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::MissingCredentials(_))
    }

    /// Check if error is retryable
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::MissingCredentials(_) | Self::MalformedResponse(_) => false,
        }
    }
}

/// Store profile validation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileError {
    /// Required field is blank
    #[error("{0} is required")]
    MissingField(&'static str),

    /// Brand color is not a hex color
    #[error("{field} must be a #RGB or #RRGGBB color, got {value:?}")]
    InvalidColor {
        /// Color field name
        field: &'static str,
        /// Rejected value
        value: String,
    },
}

/// Generation and refinement errors
///
/// Service failures never appear here: the fallback chain absorbs them into
/// a mock result. Only caller input and local configuration fail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    /// Prompt is empty or whitespace
    #[error("prompt must not be blank")]
    BlankPrompt,

    /// Refinement without a conversation id
    #[error("conversation id must not be blank")]
    BlankConversationId,

    /// Refinement without feedback
    #[error("feedback must not be blank")]
    BlankFeedback,

    /// Generation service is not configured
    #[error("generation service unavailable: {0}")]
    Config(ServiceError),
}

impl GenerationError {
    /// Check if error was caused by caller input
    #[inline]
    #[must_use]
    pub fn is_caller_error(&self) -> bool {
        !matches!(self, Self::Config(_))
    }
}

/// Deployment errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeployError {
    /// Project name is empty or whitespace
    #[error("project name must not be blank")]
    BlankProjectName,

    /// Hosting service is not configured
    #[error("hosting service unavailable: {0}")]
    Config(ServiceError),

    /// Hosting service rejected or failed the deployment
    #[error("deployment failed: {0}")]
    Service(ServiceError),
}

impl DeployError {
    /// Check if error was caused by caller input
    #[inline]
    #[must_use]
    pub fn is_caller_error(&self) -> bool {
        matches!(self, Self::BlankProjectName)
    }

    /// Check if error is a local configuration problem
    #[inline]
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

impl From<ServiceError> for DeployError {
    fn from(error: ServiceError) -> Self {
        if error.is_config_error() {
            Self::Config(error)
        } else {
            Self::Service(error)
        }
    }
}

/// Session errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// Action is not allowed in the current step
    #[error("cannot {action} while in {from} step")]
    IllegalTransition {
        /// Step the session was in
        from: Step,
        /// Rejected action
        action: &'static str,
    },

    /// Submitted profile failed validation
    #[error("invalid profile: {0}")]
    Profile(#[from] ProfileError),

    /// Generation or refinement failed
    #[error("generation failed: {0}")]
    Generation(#[from] GenerationError),

    /// Deployment failed
    #[error("deployment failed: {0}")]
    Deploy(#[from] DeployError),
}

impl SessionError {
    /// Create illegal transition error
    #[inline]
    pub fn illegal(from: Step, action: &'static str) -> Self {
        Self::IllegalTransition { from, action }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config {path}: {source}")]
    Read {
        /// Config file path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Setting has an unusable value
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue {
        /// Setting name
        key: &'static str,
        /// Rejected value
        value: String,
    },

    /// Configured skeleton cannot be used
    #[error("unusable skeleton: {0}")]
    Skeleton(#[from] FileSetError),
}
