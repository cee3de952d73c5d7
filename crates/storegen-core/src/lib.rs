//! Storegen Core
//!
//! The generation and deployment pipeline behind the storefront builder:
//! - Renders questionnaire answers into a generation prompt
//! - Runs the generation fallback chain (fork, template, plain, mock)
//! - Normalizes every service response shape into one result type
//! - Merges generated files onto the project skeleton and deploys them
//! - Tracks one questionnaire-to-deployment session
//!
//! # Example
//!
//! ```rust,ignore
//! use storegen_core::{Deployer, FallbackChain, StoreProfile, Studio};
//! use std::sync::Arc;
//!
//! # async fn example(generation: Arc<dyn storegen_core::GenerationService>,
//! #                  hosting: Arc<dyn storegen_core::DeploymentService>) -> Result<(), Box<dyn std::error::Error>> {
//! let deployer = Arc::new(Deployer::new(generation.clone(), hosting));
//! let mut studio = Studio::new(FallbackChain::new(generation), deployer);
//!
//! let profile = StoreProfile::new("Acme Co", "Makers", "Tools for makers");
//! let generated = studio.generate(profile).await?;
//! println!("Preview: {:?}", generated.result.preview_url);
//!
//! let deployed = studio.deploy(None).await?;
//! println!("Live at {}", deployed.deployment.deployment_url);
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod chain;
pub mod config;
pub mod deploy;
pub mod error;
pub mod mock;
pub mod normalize;
pub mod profile;
pub mod service;
pub mod session;
pub mod studio;
pub mod types;

// Re-exports for convenience
pub use chain::{Attempt, FallbackChain, GenerationOutcome, Rung};
pub use config::{AppConfig, GenerationConfig, HostingConfig, Secret, ServerConfig};
pub use deploy::{Deployer, DeploymentOutcome};
pub use error::{
    ConfigError, DeployError, GenerationError, ProfileError, ServiceError, SessionError,
};
pub use normalize::{normalize_deployment, normalize_files, normalize_response, NormalizedResponse};
pub use profile::{BrandColors, StoreProfile};
pub use service::{DeploymentService, ForkShape, GenerationService};
pub use session::{Action, Session, Step};
pub use studio::Studio;
pub use types::{
    DeploymentPayload, DeploymentResult, GenerationOrigin, GenerationRequest, GenerationResult,
    ModelOptions, Privacy, ProjectSettings, RefinementRecord,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with Storegen Core
    pub use crate::{
        AppConfig, Deployer, DeploymentService, FallbackChain, GenerationRequest,
        GenerationResult, GenerationService, StoreProfile, Studio,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
