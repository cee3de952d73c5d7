use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use storegen_client::Services;
use storegen_core::{AppConfig, StoreProfile};
use storegen_server::{cli, routes, AppState, Cli, Invocation};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "storegen=info";

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

fn build_state(config: &AppConfig) -> Result<Arc<AppState>> {
    let services = Services::from_config(config).context("building service clients")?;
    let state = AppState::new(services.generation, services.hosting, config)
        .context("preparing project skeleton")?;
    Ok(Arc::new(state))
}

async fn serve(config: AppConfig) -> Result<()> {
    let state = build_state(&config)?;
    for missing in state.missing_credentials() {
        tracing::warn!(%missing, "credentials missing, affected requests will fail");
    }

    let (addr, server) = warp::serve(routes(state))
        .try_bind_with_graceful_shutdown(config.server.bind, async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("shutting down");
        })
        .with_context(|| format!("binding {}", config.server.bind))?;

    tracing::info!(%addr, version = storegen_server::VERSION, "listening");
    server.await;
    Ok(())
}

async fn generate(
    config: &AppConfig,
    profile_path: &Path,
    refinements: &[String],
    deploy: Option<&str>,
) -> Result<()> {
    let content = std::fs::read_to_string(profile_path)
        .with_context(|| format!("reading {}", profile_path.display()))?;
    let profile: StoreProfile = serde_json::from_str(&content)
        .with_context(|| format!("parsing {}", profile_path.display()))?;

    let mut studio = build_state(config)?.studio();

    let outcome = studio.generate(profile).await?;
    for attempt in &outcome.attempts {
        tracing::info!(rung = ?attempt.rung, variant = ?attempt.variant, error = ?attempt.error, "attempt");
    }
    for feedback in refinements {
        studio.refine(feedback).await?;
    }
    if let Some(project) = deploy {
        studio.deploy(Some(project)).await?;
    }

    println!("{}", serde_json::to_string_pretty(studio.session())?);
    Ok(())
}

fn skeleton(config: &AppConfig) -> Result<()> {
    let skeleton = config.skeleton().context("loading skeleton")?;
    for (path, content) in skeleton.files().iter() {
        println!("{path}\t{} bytes", content.len());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli::command().get_matches();
    let cli = Cli::from_matches(&matches)?;
    init_tracing(cli.log_json);

    let mut config = AppConfig::load(cli.config.as_deref()).context("loading configuration")?;

    match cli.invocation {
        Invocation::Serve { bind } => {
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            serve(config).await
        }
        Invocation::Generate {
            profile,
            refinements,
            deploy,
        } => generate(&config, &profile, &refinements, deploy.as_deref()).await,
        Invocation::Skeleton => skeleton(&config),
    }
}
