//! Storegen Server
//!
//! Internal HTTP surface over the generation chain and the deployer, plus
//! the `storegen` command line.
//!
//! # Example
//!
//! ```rust,ignore
//! use storegen_client::Services;
//! use storegen_core::AppConfig;
//! use storegen_server::{routes, AppState};
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = AppConfig::load(None)?;
//! let services = Services::from_config(&config)?;
//! let state = Arc::new(AppState::new(services.generation, services.hosting, &config)?);
//! warp::serve(routes(state)).run(config.server.bind).await;
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod cli;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use cli::{Cli, Invocation};
pub use error::{handle_rejection, ApiError};
pub use routes::routes;
pub use state::AppState;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
