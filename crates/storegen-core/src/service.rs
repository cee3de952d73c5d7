//! External service boundaries
//!
//! The generation service (prompt in, conversation with source files out)
//! and the hosting service (file set in, live deployment out) are traits so
//! the fallback chain and the deployer can run against HTTP clients, test
//! fakes or mocks alike. Both return raw JSON; normalization lives in
//! [`crate::normalize`].

use crate::error::ServiceError;
use crate::types::{DeploymentPayload, GenerationRequest};
use async_trait::async_trait;
use serde_json::{json, Value};

/// Request-shape variant for forking a template conversation
///
/// The service has accepted the fork target in several shapes over time.
/// The chain tries them in [`ForkShape::variants`] order, first success
/// wins. This can collapse to a single shape once the service settles.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ForkShape {
    /// `{"chatId": "<id>"}`
    ChatIdField(String),
    /// `{"id": "<id>"}`
    IdField(String),
    /// `"<id>"`
    BareString(String),
}

impl ForkShape {
    /// All shapes for `template_id`, in attempt order
    #[must_use]
    pub fn variants(template_id: &str) -> [Self; 3] {
        [
            Self::ChatIdField(template_id.to_string()),
            Self::IdField(template_id.to_string()),
            Self::BareString(template_id.to_string()),
        ]
    }

    /// Template conversation id
    #[must_use]
    pub fn template_id(&self) -> &str {
        match self {
            Self::ChatIdField(id) | Self::IdField(id) | Self::BareString(id) => id,
        }
    }

    /// Request body for this shape
    #[must_use]
    pub fn body(&self) -> Value {
        match self {
            Self::ChatIdField(id) => json!({ "chatId": id }),
            Self::IdField(id) => json!({ "id": id }),
            Self::BareString(id) => Value::String(id.clone()),
        }
    }

    /// Shape name (for logging)
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::ChatIdField(_) => "chat-id-field",
            Self::IdField(_) => "id-field",
            Self::BareString(_) => "bare-string",
        }
    }
}

/// Generative design service
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Check credentials are present before any call
    ///
    /// # Errors
    /// `ServiceError::MissingCredentials` naming the missing setting
    fn ensure_configured(&self) -> Result<(), ServiceError> {
        Ok(())
    }

    /// Start a new conversation
    async fn create(&self, request: &GenerationRequest) -> Result<Value, ServiceError>;

    /// Branch a new conversation from a template conversation
    async fn fork(&self, shape: &ForkShape) -> Result<Value, ServiceError>;

    /// Send a follow-up message to a conversation
    async fn send_message(&self, conversation_id: &str, message: &str)
        -> Result<Value, ServiceError>;

    /// Fetch a conversation
    async fn get_conversation(&self, conversation_id: &str) -> Result<Value, ServiceError>;
}

/// Hosting platform
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeploymentService: Send + Sync {
    /// Check credentials are present before any call
    ///
    /// # Errors
    /// `ServiceError::MissingCredentials` naming the missing setting
    fn ensure_configured(&self) -> Result<(), ServiceError> {
        Ok(())
    }

    /// Submit a deployment
    async fn deploy(&self, payload: &DeploymentPayload) -> Result<Value, ServiceError>;
}
