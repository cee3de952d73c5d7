//! Shared application state

use std::sync::Arc;
use storegen_core::{
    AppConfig, ConfigError, Deployer, DeploymentService, FallbackChain, GenerationService,
    ModelOptions, Privacy, Studio,
};

/// Immutable state shared by every request
///
/// Only configuration and `Arc`'d service clients live here; no request
/// state crosses requests.
pub struct AppState {
    chain: FallbackChain,
    deployer: Arc<Deployer>,
    hosting: Arc<dyn DeploymentService>,
    template_id: Option<String>,
    model_options: ModelOptions,
    privacy: Privacy,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("deployer", &self.deployer)
            .field("template_id", &self.template_id)
            .field("privacy", &self.privacy)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Wire services and configuration together
    ///
    /// # Errors
    /// `ConfigError::Skeleton` when the configured skeleton is unusable
    pub fn new(
        generation: Arc<dyn GenerationService>,
        hosting: Arc<dyn DeploymentService>,
        config: &AppConfig,
    ) -> Result<Self, ConfigError> {
        let deployer = Deployer::new(generation.clone(), hosting.clone())
            .with_skeleton(config.skeleton()?)
            .with_team_id(config.hosting.team_id.clone());

        Ok(Self {
            chain: FallbackChain::new(generation),
            deployer: Arc::new(deployer),
            hosting,
            template_id: config
                .generation
                .template_id
                .clone()
                .filter(|t| !t.trim().is_empty()),
            model_options: config.generation.model.clone(),
            privacy: config.generation.privacy,
        })
    }

    #[inline]
    #[must_use]
    pub fn chain(&self) -> &FallbackChain {
        &self.chain
    }

    #[inline]
    #[must_use]
    pub fn deployer(&self) -> &Deployer {
        &self.deployer
    }

    /// Default template to fork from
    #[inline]
    #[must_use]
    pub fn template_id(&self) -> Option<&str> {
        self.template_id.as_deref()
    }

    /// Default model options
    #[inline]
    #[must_use]
    pub fn model_options(&self) -> &ModelOptions {
        &self.model_options
    }

    /// Default conversation privacy
    #[inline]
    #[must_use]
    pub fn privacy(&self) -> Privacy {
        self.privacy
    }

    /// Settings missing for either service
    #[must_use]
    pub fn missing_credentials(&self) -> Vec<String> {
        [
            self.chain.service().ensure_configured(),
            self.hosting.ensure_configured(),
        ]
        .into_iter()
        .filter_map(Result::err)
        .map(|e| e.to_string())
        .collect()
    }

    /// Fresh session driver with the configured defaults
    #[must_use]
    pub fn studio(&self) -> Studio {
        Studio::new(self.chain.clone(), self.deployer.clone())
            .with_template_id(self.template_id.clone())
            .with_model_options(self.model_options.clone())
            .with_privacy(self.privacy)
    }
}
