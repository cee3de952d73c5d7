//! Generation fallback chain
//!
//! Sequential, short-circuiting attempt ladder against the generation
//! service. Each rung runs only if the previous one failed:
//!
//! 1. Fork the template conversation, trying each [`ForkShape`]
//! 2. Customize the fork with the prompt as a follow-up message
//! 3. Create a new conversation imitating the template
//! 4. Create a new conversation from the raw prompt
//! 5. Synthesize a mock locally
//!
//! Without a template id the chain starts at rung 4. Service failures never
//! escape: the caller always receives a well-formed result.

use crate::error::{GenerationError, ServiceError};
use crate::mock::{mock_generation, mock_refinement};
use crate::normalize::{normalize_response, NormalizedResponse};
use crate::profile::{refinement_message, template_prompt};
use crate::service::{ForkShape, GenerationService};
use crate::types::{GenerationOrigin, GenerationRequest, GenerationResult};
use serde::Serialize;
use std::sync::Arc;

/// Ladder rung
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rung {
    /// Fork the template conversation
    Fork,
    /// Follow-up message to the fork
    Customize,
    /// Template-inspired creation
    Template,
    /// Plain creation
    Plain,
    /// Message to an existing conversation
    Refine,
    /// Local synthesis
    Mock,
}

/// One recorded attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attempt {
    /// Rung attempted
    pub rung: Rung,
    /// Request-shape variant, for forks
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<&'static str>,
    /// Error text when the attempt failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Attempt {
    fn succeeded(rung: Rung) -> Self {
        Self {
            rung,
            variant: None,
            error: None,
        }
    }

    fn failed(rung: Rung, error: &ServiceError) -> Self {
        Self {
            rung,
            variant: None,
            error: Some(error.to_string()),
        }
    }

    fn with_variant(mut self, variant: &'static str) -> Self {
        self.variant = Some(variant);
        self
    }

    /// Whether the attempt succeeded
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Result plus the attempt trail that produced it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationOutcome {
    /// Normalized result
    pub result: GenerationResult,
    /// Attempts in order
    pub attempts: Vec<Attempt>,
}

impl GenerationOutcome {
    /// Rungs that ran, in order
    pub fn rungs(&self) -> impl Iterator<Item = Rung> + '_ {
        self.attempts.iter().map(|a| a.rung)
    }
}

/// Fallback chain over a generation service
#[derive(Clone)]
pub struct FallbackChain {
    service: Arc<dyn GenerationService>,
}

impl std::fmt::Debug for FallbackChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackChain").finish_non_exhaustive()
    }
}

impl FallbackChain {
    /// Create chain over `service`
    #[inline]
    #[must_use]
    pub fn new(service: Arc<dyn GenerationService>) -> Self {
        Self { service }
    }

    /// Underlying service
    #[inline]
    #[must_use]
    pub fn service(&self) -> &Arc<dyn GenerationService> {
        &self.service
    }

    /// Generate a storefront for `request`
    ///
    /// # Errors
    /// - `GenerationError::BlankPrompt` for an empty prompt
    /// - `GenerationError::Config` when the service lacks credentials
    pub async fn generate(
        &self,
        request: &GenerationRequest,
        template_id: Option<&str>,
    ) -> Result<GenerationOutcome, GenerationError> {
        if request.prompt.trim().is_empty() {
            return Err(GenerationError::BlankPrompt);
        }
        self.service
            .ensure_configured()
            .map_err(GenerationError::Config)?;

        let mut attempts = Vec::new();
        let template_id = template_id.map(str::trim).filter(|t| !t.is_empty());

        if let Some(template_id) = template_id {
            if let Some(result) = self.try_fork(template_id, &request.prompt, &mut attempts).await {
                return Ok(GenerationOutcome { result, attempts });
            }

            let inspired = request.with_prompt(template_prompt(template_id, &request.prompt));
            if let Some(result) = self
                .try_create(&inspired, Rung::Template, GenerationOrigin::Template, &mut attempts)
                .await
            {
                return Ok(GenerationOutcome { result, attempts });
            }
        }

        if let Some(result) = self
            .try_create(request, Rung::Plain, GenerationOrigin::Plain, &mut attempts)
            .await
        {
            return Ok(GenerationOutcome { result, attempts });
        }

        tracing::warn!(
            failed_attempts = attempts.len(),
            "all generation attempts failed, using mock"
        );
        attempts.push(Attempt::succeeded(Rung::Mock));
        Ok(GenerationOutcome {
            result: mock_generation(&request.prompt),
            attempts,
        })
    }

    /// Refine an existing conversation with user feedback
    ///
    /// A failed message degrades to a mock reply quoting the feedback.
    ///
    /// # Errors
    /// - `GenerationError::BlankConversationId` / `BlankFeedback` for blank input
    /// - `GenerationError::Config` when the service lacks credentials
    pub async fn refine(
        &self,
        conversation_id: &str,
        feedback: &str,
    ) -> Result<GenerationOutcome, GenerationError> {
        let conversation_id = conversation_id.trim();
        if conversation_id.is_empty() {
            return Err(GenerationError::BlankConversationId);
        }
        if feedback.trim().is_empty() {
            return Err(GenerationError::BlankFeedback);
        }
        self.service
            .ensure_configured()
            .map_err(GenerationError::Config)?;

        let message = refinement_message(feedback);
        let reply = self
            .service
            .send_message(conversation_id, &message)
            .await
            .and_then(|raw| normalize_response(&raw));

        match reply {
            Ok(reply) => {
                tracing::info!(
                    conversation_id,
                    files = reply.files.as_ref().map_or(0, storegen_files::FileSet::len),
                    "refinement applied"
                );
                let mut result = reply.into_result(GenerationOrigin::Refinement);
                // message replies carry the message id, not the conversation id
                result.conversation_id = conversation_id.to_string();
                Ok(GenerationOutcome {
                    result,
                    attempts: vec![Attempt::succeeded(Rung::Refine)],
                })
            }
            Err(e) => {
                tracing::warn!(conversation_id, error = %e, "refinement failed, using mock");
                Ok(GenerationOutcome {
                    result: mock_refinement(conversation_id, feedback),
                    attempts: vec![
                        Attempt::failed(Rung::Refine, &e),
                        Attempt::succeeded(Rung::Mock),
                    ],
                })
            }
        }
    }

    /// Fetch and normalize an existing conversation
    ///
    /// Unlike generation, failures are returned to the caller.
    ///
    /// # Errors
    /// Any [`ServiceError`] from the service or normalization
    pub async fn lookup(&self, conversation_id: &str) -> Result<GenerationResult, ServiceError> {
        self.service.ensure_configured()?;
        let raw = self.service.get_conversation(conversation_id).await?;
        let result = normalize_response(&raw)?.into_result(GenerationOrigin::Lookup);
        tracing::info!(conversation_id, files = result.file_count(), "conversation fetched");
        Ok(result)
    }

    async fn try_fork(
        &self,
        template_id: &str,
        prompt: &str,
        attempts: &mut Vec<Attempt>,
    ) -> Option<GenerationResult> {
        let mut forked = None;
        for shape in ForkShape::variants(template_id) {
            let outcome = self
                .service
                .fork(&shape)
                .await
                .and_then(|raw| normalize_response(&raw));
            match outcome {
                Ok(fork) => {
                    tracing::info!(
                        template_id,
                        variant = shape.name(),
                        conversation_id = %fork.conversation_id,
                        "template forked"
                    );
                    attempts.push(Attempt::succeeded(Rung::Fork).with_variant(shape.name()));
                    forked = Some(fork);
                    break;
                }
                Err(e) => {
                    tracing::warn!(template_id, variant = shape.name(), error = %e, "fork variant failed");
                    attempts.push(Attempt::failed(Rung::Fork, &e).with_variant(shape.name()));
                }
            }
        }
        let fork = forked?;

        let follow_up = self
            .service
            .send_message(&fork.conversation_id, prompt)
            .await
            .and_then(|raw| normalize_response(&raw));

        let merged = match follow_up {
            Ok(reply) => {
                tracing::info!(
                    conversation_id = %fork.conversation_id,
                    files = reply.files.as_ref().map_or(0, storegen_files::FileSet::len),
                    "fork customized"
                );
                attempts.push(Attempt::succeeded(Rung::Customize));
                prefer_reply(fork, reply)
            }
            Err(e) => {
                tracing::warn!(
                    conversation_id = %fork.conversation_id,
                    error = %e,
                    "customization message failed, keeping fork result"
                );
                attempts.push(Attempt::failed(Rung::Customize, &e));
                fork
            }
        };

        Some(merged.into_result(GenerationOrigin::Fork))
    }

    async fn try_create(
        &self,
        request: &GenerationRequest,
        rung: Rung,
        origin: GenerationOrigin,
        attempts: &mut Vec<Attempt>,
    ) -> Option<GenerationResult> {
        let created = self
            .service
            .create(request)
            .await
            .and_then(|raw| normalize_response(&raw));

        match created {
            Ok(created) => {
                tracing::info!(
                    rung = ?rung,
                    conversation_id = %created.conversation_id,
                    files = created.files.as_ref().map_or(0, storegen_files::FileSet::len),
                    "conversation created"
                );
                attempts.push(Attempt::succeeded(rung));
                Some(created.into_result(origin))
            }
            Err(e) => {
                tracing::warn!(rung = ?rung, error = %e, "creation failed");
                attempts.push(Attempt::failed(rung, &e));
                None
            }
        }
    }
}

/// Fork result overlaid with the follow-up reply
///
/// The conversation stays the fork's; preview, files and text come from the
/// reply when it has them. A reply preview that is only its conversation link
/// does not replace a fork demo.
fn prefer_reply(fork: NormalizedResponse, reply: NormalizedResponse) -> NormalizedResponse {
    let (reply_demo, reply_link) = match reply.preview_url {
        Some(preview) if preview != reply.external_url => (Some(preview), None),
        other => (None, other),
    };
    NormalizedResponse {
        conversation_id: fork.conversation_id,
        external_url: if reply.external_url.is_empty() {
            fork.external_url
        } else {
            reply.external_url
        },
        preview_url: reply_demo.or(fork.preview_url).or(reply_link),
        files: reply.files.or(fork.files),
        text: if reply.text.is_empty() { fork.text } else { reply.text },
        is_mock: fork.is_mock && reply.is_mock,
    }
}
