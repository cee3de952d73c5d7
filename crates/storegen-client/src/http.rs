//! Shared request plumbing

use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use std::time::Duration;
use storegen_core::{Secret, ServiceError};

/// Build a client with the configured timeout
pub(crate) fn build_client(timeout: Duration) -> Result<Client, ServiceError> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("storegen/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(transport)
}

/// Base URL without trailing slashes
pub(crate) fn trim_base(base: &str) -> String {
    base.trim().trim_end_matches('/').to_string()
}

/// Attach bearer auth, or fail naming the missing setting
pub(crate) fn authorize(
    builder: RequestBuilder,
    credential: Option<&Secret>,
    setting: &'static str,
) -> Result<RequestBuilder, ServiceError> {
    let credential = credential.ok_or(ServiceError::MissingCredentials(setting))?;
    Ok(builder.header("Authorization", format!("Bearer {}", credential.expose())))
}

/// Send and decode a JSON response
///
/// Non-success statuses keep the service's raw body text.
pub(crate) async fn send_json(builder: RequestBuilder) -> Result<Value, ServiceError> {
    let response = builder.send().await.map_err(transport)?;
    read_json(response).await
}

async fn read_json(response: Response) -> Result<Value, ServiceError> {
    let status = response.status();
    if status.is_success() {
        let text = response.text().await.map_err(transport)?;
        serde_json::from_str(&text)
            .map_err(|e| ServiceError::malformed(format!("invalid JSON body: {e}")))
    } else {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        tracing::debug!(status = status.as_u16(), body = %error_text, "service error response");
        Err(ServiceError::status(status.as_u16(), error_text))
    }
}

fn transport(error: reqwest::Error) -> ServiceError {
    ServiceError::Transport(error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_trailing_slashes() {
        assert_eq!(trim_base(" https://api.example.com/v1// "), "https://api.example.com/v1");
    }

    #[test]
    fn missing_credential_names_setting() {
        let builder = Client::new().get("http://localhost");
        let err = authorize(builder, None, "V0_API_KEY").unwrap_err();
        assert_eq!(err, ServiceError::MissingCredentials("V0_API_KEY"));
    }
}
