//! Generation service over the v0 platform API
//!
//! | operation          | request                          |
//! |--------------------|----------------------------------|
//! | create             | `POST {base}/chats`              |
//! | fork               | `POST {base}/chats/fork`         |
//! | send message       | `POST {base}/chats/{id}/messages`|
//! | get conversation   | `GET {base}/chats/{id}`          |

use crate::http::{authorize, build_client, send_json, trim_base};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::{json, Value};
use std::time::Duration;
use storegen_core::{
    ForkShape, GenerationConfig, GenerationRequest, GenerationService, Secret, ServiceError,
};

/// Setting that holds the API key
pub const API_KEY_SETTING: &str = "V0_API_KEY";

/// HTTP generation client
#[derive(Clone)]
pub struct HttpGenerationClient {
    http: Client,
    base_url: String,
    api_key: Option<Secret>,
}

impl std::fmt::Debug for HttpGenerationClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpGenerationClient")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key)
            .finish_non_exhaustive()
    }
}

impl HttpGenerationClient {
    /// Create client for `base_url`
    ///
    /// A missing key is not an error here; calls fail with
    /// `ServiceError::MissingCredentials` instead.
    ///
    /// # Errors
    /// `ServiceError::Transport` if the HTTP client cannot be built
    pub fn new(
        base_url: &str,
        api_key: Option<Secret>,
        timeout: Duration,
    ) -> Result<Self, ServiceError> {
        Ok(Self {
            http: build_client(timeout)?,
            base_url: trim_base(base_url),
            api_key,
        })
    }

    /// Create client from configuration
    ///
    /// # Errors
    /// `ServiceError::Transport` if the HTTP client cannot be built
    pub fn from_config(config: &GenerationConfig, timeout: Duration) -> Result<Self, ServiceError> {
        Self::new(&config.api_url, config.api_key.clone(), timeout)
    }

    /// API base URL
    #[inline]
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn post(&self, path: &str) -> Result<RequestBuilder, ServiceError> {
        let url = format!("{}{path}", self.base_url);
        tracing::debug!(%url, "POST");
        authorize(self.http.post(url), self.api_key.as_ref(), API_KEY_SETTING)
    }

    fn conversation_path(conversation_id: &str) -> String {
        format!("/chats/{}", urlencoding::encode(conversation_id.trim()))
    }
}

#[async_trait]
impl GenerationService for HttpGenerationClient {
    fn ensure_configured(&self) -> Result<(), ServiceError> {
        match self.api_key {
            Some(ref key) if !key.expose().trim().is_empty() => Ok(()),
            _ => Err(ServiceError::MissingCredentials(API_KEY_SETTING)),
        }
    }

    async fn create(&self, request: &GenerationRequest) -> Result<Value, ServiceError> {
        let body = json!({
            "message": request.prompt,
            "modelConfiguration": request.model_options,
            "chatPrivacy": request.privacy,
        });
        send_json(self.post("/chats")?.json(&body)).await
    }

    async fn fork(&self, shape: &ForkShape) -> Result<Value, ServiceError> {
        send_json(self.post("/chats/fork")?.json(&shape.body())).await
    }

    async fn send_message(
        &self,
        conversation_id: &str,
        message: &str,
    ) -> Result<Value, ServiceError> {
        let path = format!("{}/messages", Self::conversation_path(conversation_id));
        send_json(self.post(&path)?.json(&json!({ "message": message }))).await
    }

    async fn get_conversation(&self, conversation_id: &str) -> Result<Value, ServiceError> {
        let url = format!("{}{}", self.base_url, Self::conversation_path(conversation_id));
        tracing::debug!(%url, "GET");
        let builder = authorize(self.http.get(url), self.api_key.as_ref(), API_KEY_SETTING)?;
        send_json(builder).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use storegen_core::Privacy;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> HttpGenerationClient {
        HttpGenerationClient::new(
            &format!("{}/", server.uri()),
            Some(Secret::new("test-key")),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn create_sends_message_and_options() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chats"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_json(json!({
                "message": "Build a store",
                "modelConfiguration": { "modelId": "v0-1.5-lg", "imageGenerations": true, "thinking": false },
                "chatPrivacy": "team-edit",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "chat_1", "demo": "https://demo" })))
            .expect(1)
            .mount(&server)
            .await;

        let request = GenerationRequest::new("Build a store").with_privacy(Privacy::TeamEdit);
        let raw = client(&server).create(&request).await.unwrap();
        assert_eq!(raw["id"], "chat_1");
    }

    #[tokio::test]
    async fn fork_posts_shape_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chats/fork"))
            .and(body_json(json!("tmpl_1")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "chat_2" })))
            .expect(1)
            .mount(&server)
            .await;

        let raw = client(&server)
            .fork(&ForkShape::BareString("tmpl_1".into()))
            .await
            .unwrap();
        assert_eq!(raw["id"], "chat_2");
    }

    #[tokio::test]
    async fn send_message_targets_conversation() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chats/chat_1/messages"))
            .and(body_json(json!({ "message": "bigger logo" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "msg_1", "text": "done" })))
            .expect(1)
            .mount(&server)
            .await;

        let raw = client(&server).send_message("chat_1", "bigger logo").await.unwrap();
        assert_eq!(raw["text"], "done");
    }

    #[tokio::test]
    async fn get_conversation_uses_get() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/chats/chat_9"))
            .and(header("authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "chat_9" })))
            .expect(1)
            .mount(&server)
            .await;

        let raw = client(&server).get_conversation("chat_9").await.unwrap();
        assert_eq!(raw["id"], "chat_9");
    }

    #[tokio::test]
    async fn error_status_keeps_body_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chats"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .mount(&server)
            .await;

        let err = client(&server)
            .create(&GenerationRequest::new("x"))
            .await
            .unwrap_err();
        assert_eq!(err, ServiceError::status(429, "slow down"));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn non_json_success_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/chats/chat_1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = client(&server).get_conversation("chat_1").await.unwrap_err();
        assert!(matches!(err, ServiceError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn missing_key_fails_before_sending() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = HttpGenerationClient::new(&server.uri(), None, Duration::from_secs(5)).unwrap();
        assert_eq!(
            client.ensure_configured().unwrap_err(),
            ServiceError::MissingCredentials("V0_API_KEY")
        );
        let err = client.create(&GenerationRequest::new("x")).await.unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn debug_redacts_key() {
        let client = HttpGenerationClient::new(
            "https://api.v0.dev/v1",
            Some(Secret::new("sk-live")),
            Duration::from_secs(1),
        )
        .unwrap();
        assert!(!format!("{client:?}").contains("sk-live"));
    }
}
