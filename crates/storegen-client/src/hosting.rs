//! Hosting service over the Vercel deployments API

use crate::http::{authorize, build_client, send_json, trim_base};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use storegen_core::{DeploymentPayload, DeploymentService, HostingConfig, Secret, ServiceError};

/// Setting that holds the API token
pub const TOKEN_SETTING: &str = "V_TOKEN";

/// HTTP deployment client
#[derive(Clone)]
pub struct HttpDeploymentClient {
    http: Client,
    base_url: String,
    token: Option<Secret>,
    team_id: Option<String>,
}

impl std::fmt::Debug for HttpDeploymentClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpDeploymentClient")
            .field("base_url", &self.base_url)
            .field("token", &self.token)
            .field("team_id", &self.team_id)
            .finish_non_exhaustive()
    }
}

impl HttpDeploymentClient {
    /// Create client for `base_url`
    ///
    /// # Errors
    /// `ServiceError::Transport` if the HTTP client cannot be built
    pub fn new(
        base_url: &str,
        token: Option<Secret>,
        timeout: Duration,
    ) -> Result<Self, ServiceError> {
        Ok(Self {
            http: build_client(timeout)?,
            base_url: trim_base(base_url),
            token,
            team_id: None,
        })
    }

    /// Create client from configuration
    ///
    /// # Errors
    /// `ServiceError::Transport` if the HTTP client cannot be built
    pub fn from_config(config: &HostingConfig, timeout: Duration) -> Result<Self, ServiceError> {
        Ok(Self::new(&config.api_url, config.token.clone(), timeout)?
            .with_team_id(config.team_id.clone()))
    }

    /// With team the deployments belong to
    #[inline]
    #[must_use]
    pub fn with_team_id(mut self, team_id: Option<String>) -> Self {
        self.team_id = team_id.filter(|t| !t.trim().is_empty());
        self
    }
}

#[async_trait]
impl DeploymentService for HttpDeploymentClient {
    fn ensure_configured(&self) -> Result<(), ServiceError> {
        match self.token {
            Some(ref token) if !token.expose().trim().is_empty() => Ok(()),
            _ => Err(ServiceError::MissingCredentials(TOKEN_SETTING)),
        }
    }

    async fn deploy(&self, payload: &DeploymentPayload) -> Result<Value, ServiceError> {
        let url = format!("{}/v13/deployments", self.base_url);
        tracing::debug!(%url, name = %payload.name, files = payload.files.len(), "POST");

        let mut builder = self.http.post(url);
        if let Some(team_id) = &self.team_id {
            builder = builder.query(&[("teamId", team_id)]);
        }
        let builder = authorize(builder, self.token.as_ref(), TOKEN_SETTING)?;
        send_json(builder.json(&payload.to_body())).await
    }
}
