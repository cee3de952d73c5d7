//! Session driver
//!
//! A [`Studio`] runs one [`Session`] end to end against the fallback chain
//! and the deployer. Actions take `&mut self`, so a session handles one
//! action at a time.

use crate::chain::{FallbackChain, GenerationOutcome};
use crate::deploy::{DeploymentOutcome, Deployer};
use crate::error::SessionError;
use crate::profile::StoreProfile;
use crate::session::{Action, Session, Step};
use crate::types::{GenerationRequest, ModelOptions, Privacy};
use std::sync::Arc;

/// Drives a session through generation, refinement and deployment
#[derive(Debug)]
pub struct Studio {
    chain: FallbackChain,
    deployer: Arc<Deployer>,
    template_id: Option<String>,
    model_options: ModelOptions,
    privacy: Privacy,
    session: Session,
}

impl Studio {
    /// Create studio with a fresh session
    #[must_use]
    pub fn new(chain: FallbackChain, deployer: Arc<Deployer>) -> Self {
        Self {
            chain,
            deployer,
            template_id: None,
            model_options: ModelOptions::default(),
            privacy: Privacy::default(),
            session: Session::new(),
        }
    }

    /// With template to fork from
    #[inline]
    #[must_use]
    pub fn with_template_id(mut self, template_id: Option<String>) -> Self {
        self.template_id = template_id;
        self
    }

    /// With model options
    #[inline]
    #[must_use]
    pub fn with_model_options(mut self, options: ModelOptions) -> Self {
        self.model_options = options;
        self
    }

    /// With conversation privacy
    #[inline]
    #[must_use]
    pub fn with_privacy(mut self, privacy: Privacy) -> Self {
        self.privacy = privacy;
        self
    }

    /// Current session
    #[inline]
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Submit the questionnaire and generate the store
    ///
    /// On error the session stays in the questionnaire step.
    ///
    /// # Errors
    /// - `SessionError::IllegalTransition` outside the questionnaire step
    /// - `SessionError::Profile` for an invalid profile
    /// - `SessionError::Generation` for configuration errors
    pub async fn generate(&mut self, profile: StoreProfile) -> Result<GenerationOutcome, SessionError> {
        let store = profile.store_name.clone();
        let prompt = self.session.submit_profile(profile)?;

        let request = GenerationRequest::new(prompt)
            .with_model_options(self.model_options.clone())
            .with_privacy(self.privacy);
        let outcome = self
            .chain
            .generate(&request, self.template_id.as_deref())
            .await?;

        tracing::info!(
            session = %self.session.id(),
            store = %store,
            conversation_id = %outcome.result.conversation_id,
            mock = outcome.result.is_mock,
            "store generated"
        );
        self.session.record_result(outcome.result.clone())?;
        Ok(outcome)
    }

    /// Refine the current store with feedback
    ///
    /// # Errors
    /// - `SessionError::IllegalTransition` outside the preview step
    /// - `SessionError::Generation` for blank feedback or configuration errors
    pub async fn refine(&mut self, feedback: &str) -> Result<GenerationOutcome, SessionError> {
        self.session.ensure(Action::RecordRefinement)?;
        let conversation_id = self
            .session
            .conversation_id()
            .ok_or_else(|| SessionError::illegal(self.session.step(), Action::RecordRefinement.as_str()))?
            .to_string();

        let outcome = self.chain.refine(&conversation_id, feedback).await?;
        let refinement_id = self
            .session
            .record_refinement(feedback.trim(), outcome.result.clone())?
            .id;
        tracing::info!(
            session = %self.session.id(),
            refinement = %refinement_id,
            mock = outcome.result.is_mock,
            "store refined"
        );
        Ok(outcome)
    }

    /// Deploy the current store
    ///
    /// `project_name` defaults to the profile's store name.
    ///
    /// # Errors
    /// - `SessionError::IllegalTransition` outside the preview step
    /// - `SessionError::Deploy` for deployment failures
    pub async fn deploy(&mut self, project_name: Option<&str>) -> Result<DeploymentOutcome, SessionError> {
        self.session.ensure(Action::RecordDeployment)?;
        let (name, conversation_id, overlay) = match (self.session.profile(), self.session.result()) {
            (Some(profile), Some(result)) => (
                project_name.unwrap_or(profile.store_name.as_str()).to_string(),
                result.conversation_id.clone(),
                result.files_or_empty(),
            ),
            _ => return Err(SessionError::illegal(Step::Preview, Action::RecordDeployment.as_str())),
        };

        let outcome = self
            .deployer
            .deploy(&name, Some(&conversation_id), overlay)
            .await?;
        self.session.record_deployment(outcome.deployment.clone())?;
        Ok(outcome)
    }

    /// Clear the session and return to the questionnaire
    pub fn start_over(&mut self) {
        self.session.start_over();
    }
}
