//! Session state
//!
//! One questionnaire-to-deployment flow. The session owns the submitted
//! profile, the current generation result, the refinement log and the
//! deployment; every mutation is checked against the current [`Step`].
//!
//! ```text
//! Questionnaire --record_result--> Preview --record_deployment--> Deployed
//!       ^                            |  ^                            |
//!       |                            +--+ record_refinement          |
//!       +----------------------- start_over -------------------------+
//! ```

use crate::error::SessionError;
use crate::profile::StoreProfile;
use crate::types::{DeploymentResult, GenerationResult, RefinementRecord};
use serde::Serialize;
use ulid::Ulid;

/// Flow step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    /// Collecting store details
    Questionnaire,
    /// Reviewing and refining generated store
    Preview,
    /// Store deployed
    Deployed,
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Questionnaire => "questionnaire",
            Self::Preview => "preview",
            Self::Deployed => "deployed",
        })
    }
}

/// Session action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Submit questionnaire answers
    SubmitProfile,
    /// Store the first generation result
    RecordResult,
    /// Append a refinement
    RecordRefinement,
    /// Store the deployment
    RecordDeployment,
    /// Reset everything
    StartOver,
}

impl Action {
    /// Human readable name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SubmitProfile => "submit profile",
            Self::RecordResult => "record result",
            Self::RecordRefinement => "refine",
            Self::RecordDeployment => "deploy",
            Self::StartOver => "start over",
        }
    }
}

/// Actions permitted in `step`
#[must_use]
pub fn allowed_actions(step: Step) -> Vec<Action> {
    use Action::*;
    match step {
        Step::Questionnaire => vec![SubmitProfile, RecordResult, StartOver],
        Step::Preview => vec![RecordRefinement, RecordDeployment, StartOver],
        Step::Deployed => vec![StartOver],
    }
}

/// Questionnaire-to-deployment session
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    id: Ulid,
    step: Step,
    profile: Option<StoreProfile>,
    result: Option<GenerationResult>,
    refinements: Vec<RefinementRecord>,
    deployment: Option<DeploymentResult>,
}

impl Session {
    /// Create empty session
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: Ulid::new(),
            step: Step::Questionnaire,
            profile: None,
            result: None,
            refinements: Vec::new(),
            deployment: None,
        }
    }

    /// Session id
    #[inline]
    #[must_use]
    pub fn id(&self) -> Ulid {
        self.id
    }

    /// Current step
    #[inline]
    #[must_use]
    pub fn step(&self) -> Step {
        self.step
    }

    /// Submitted profile
    #[inline]
    #[must_use]
    pub fn profile(&self) -> Option<&StoreProfile> {
        self.profile.as_ref()
    }

    /// Current generation result
    #[inline]
    #[must_use]
    pub fn result(&self) -> Option<&GenerationResult> {
        self.result.as_ref()
    }

    /// Refinement log, oldest first
    #[inline]
    #[must_use]
    pub fn refinements(&self) -> &[RefinementRecord] {
        &self.refinements
    }

    /// Deployment, once deployed
    #[inline]
    #[must_use]
    pub fn deployment(&self) -> Option<&DeploymentResult> {
        self.deployment.as_ref()
    }

    /// Conversation of the current result
    #[must_use]
    pub fn conversation_id(&self) -> Option<&str> {
        self.result.as_ref().map(|r| r.conversation_id.as_str())
    }

    /// Check `action` is permitted in the current step
    ///
    /// # Errors
    /// `SessionError::IllegalTransition` when it is not
    pub fn ensure(&self, action: Action) -> Result<(), SessionError> {
        if allowed_actions(self.step).contains(&action) {
            Ok(())
        } else {
            Err(SessionError::illegal(self.step, action.as_str()))
        }
    }

    /// Validate and store questionnaire answers, returning the prompt
    ///
    /// May be repeated while still in the questionnaire step.
    ///
    /// # Errors
    /// - `SessionError::IllegalTransition` outside the questionnaire step
    /// - `SessionError::Profile` when validation fails
    pub fn submit_profile(&mut self, profile: StoreProfile) -> Result<String, SessionError> {
        self.ensure(Action::SubmitProfile)?;
        profile.validate()?;
        let prompt = profile.to_prompt();
        self.profile = Some(profile);
        Ok(prompt)
    }

    /// Store the generation result and move to preview
    ///
    /// # Errors
    /// `SessionError::IllegalTransition` outside the questionnaire step or
    /// before a profile was submitted
    pub fn record_result(&mut self, result: GenerationResult) -> Result<(), SessionError> {
        self.ensure(Action::RecordResult)?;
        if self.profile.is_none() {
            return Err(SessionError::illegal(self.step, Action::RecordResult.as_str()));
        }
        tracing::debug!(session = %self.id, conversation_id = %result.conversation_id, "result recorded");
        self.result = Some(result);
        self.step = Step::Preview;
        Ok(())
    }

    /// Log feedback and replace the current result
    ///
    /// # Errors
    /// `SessionError::IllegalTransition` outside the preview step
    pub fn record_refinement(
        &mut self,
        feedback: impl Into<String>,
        result: GenerationResult,
    ) -> Result<&RefinementRecord, SessionError> {
        self.ensure(Action::RecordRefinement)?;
        self.result = Some(result);
        self.refinements.push(RefinementRecord::new(feedback));
        Ok(&self.refinements[self.refinements.len() - 1])
    }

    /// Store the deployment and move to deployed
    ///
    /// # Errors
    /// `SessionError::IllegalTransition` outside the preview step
    pub fn record_deployment(&mut self, deployment: DeploymentResult) -> Result<(), SessionError> {
        self.ensure(Action::RecordDeployment)?;
        self.deployment = Some(deployment);
        self.step = Step::Deployed;
        Ok(())
    }

    /// Clear everything and return to the questionnaire
    pub fn start_over(&mut self) {
        tracing::debug!(session = %self.id, from = %self.step, "starting over");
        self.step = Step::Questionnaire;
        self.profile = None;
        self.result = None;
        self.refinements.clear();
        self.deployment = None;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
