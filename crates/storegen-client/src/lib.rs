//! Storegen Client
//!
//! reqwest implementations of the generation and hosting service boundaries.

#![warn(unreachable_pub)]

mod http;

pub mod generation;
pub mod hosting;

pub use generation::HttpGenerationClient;
pub use hosting::HttpDeploymentClient;

use std::sync::Arc;
use storegen_core::{AppConfig, DeploymentService, GenerationService, ServiceError};

/// Service clients built from configuration
#[derive(Clone)]
pub struct Services {
    /// Generation service
    pub generation: Arc<dyn GenerationService>,
    /// Hosting service
    pub hosting: Arc<dyn DeploymentService>,
}

impl Services {
    /// Build both HTTP clients from `config`
    ///
    /// # Errors
    /// `ServiceError::Transport` if an HTTP client cannot be built
    pub fn from_config(config: &AppConfig) -> Result<Self, ServiceError> {
        let timeout = config.request_timeout();
        Ok(Self {
            generation: Arc::new(HttpGenerationClient::from_config(&config.generation, timeout)?),
            hosting: Arc::new(HttpDeploymentClient::from_config(&config.hosting, timeout)?),
        })
    }
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services").finish_non_exhaustive()
    }
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
