//! Deployment assembly
//!
//! Resolves the generated files for a conversation, merges them onto the
//! project skeleton and submits the result to the hosting service. Unlike
//! generation there is no mock: hosting failures are hard errors carrying
//! the service's own error text.

use crate::error::DeployError;
use crate::normalize::{normalize_deployment, normalize_response};
use crate::service::{DeploymentService, GenerationService};
use crate::types::{DeploymentPayload, DeploymentResult};
use serde::Serialize;
use std::sync::Arc;
use storegen_files::{slugify, FileSet, MergeReport, MergeResolver, Skeleton};

/// Deployment plus the merge that produced its files
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentOutcome {
    /// Normalized hosting response
    pub deployment: DeploymentResult,
    /// What the merge did
    pub merge: MergeReport,
    /// Number of files submitted
    pub file_count: usize,
}

/// Assembles and submits deployments
pub struct Deployer {
    generation: Arc<dyn GenerationService>,
    hosting: Arc<dyn DeploymentService>,
    skeleton: Skeleton,
    resolver: MergeResolver,
    team_id: Option<String>,
}

impl std::fmt::Debug for Deployer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Deployer")
            .field("skeleton_files", &self.skeleton.files().len())
            .field("team_id", &self.team_id)
            .finish_non_exhaustive()
    }
}

impl Deployer {
    /// Create deployer with the embedded skeleton
    #[must_use]
    pub fn new(generation: Arc<dyn GenerationService>, hosting: Arc<dyn DeploymentService>) -> Self {
        Self {
            generation,
            hosting,
            skeleton: Skeleton::embedded(),
            resolver: MergeResolver::new(),
            team_id: None,
        }
    }

    /// With skeleton
    #[inline]
    #[must_use]
    pub fn with_skeleton(mut self, skeleton: Skeleton) -> Self {
        self.skeleton = skeleton;
        self
    }

    /// With hosting team, used for inspector links
    #[inline]
    #[must_use]
    pub fn with_team_id(mut self, team_id: Option<String>) -> Self {
        self.team_id = team_id.filter(|t| !t.trim().is_empty());
        self
    }

    /// Skeleton in use
    #[inline]
    #[must_use]
    pub fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    /// Deploy `overlay` (or the conversation's files) as `project_name`
    ///
    /// # Workflow
    /// 1. Reject a blank project name
    /// 2. With an empty overlay and a conversation id, fetch the
    ///    conversation's files; a failed fetch continues skeleton-only
    /// 3. Merge skeleton and overlay
    /// 4. Submit to the hosting service
    ///
    /// # Errors
    /// - `DeployError::BlankProjectName`
    /// - `DeployError::Config` when hosting credentials are missing
    /// - `DeployError::Service` with the hosting error text
    pub async fn deploy(
        &self,
        project_name: &str,
        conversation_id: Option<&str>,
        overlay: FileSet,
    ) -> Result<DeploymentOutcome, DeployError> {
        let project_name = project_name.trim();
        if project_name.is_empty() {
            return Err(DeployError::BlankProjectName);
        }
        self.hosting.ensure_configured().map_err(DeployError::Config)?;

        let overlay = match conversation_id.map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) if overlay.is_empty() => self.conversation_files(id).await,
            _ => overlay,
        };

        let merged = self
            .resolver
            .merge(self.skeleton.files(), &overlay, project_name);
        let file_count = merged.files.len();

        let name = slugify(project_name);
        tracing::info!(
            project = project_name,
            name = %name,
            files = file_count,
            bytes = merged.files.total_bytes(),
            skeleton_only = merged.report.skeleton_only,
            "submitting deployment"
        );

        let payload = DeploymentPayload::production(name.clone(), merged.files);
        let raw = self.hosting.deploy(&payload).await.map_err(|e| {
            tracing::error!(project = project_name, error = %e, "deployment failed");
            DeployError::from(e)
        })?;

        let deployment = normalize_deployment(raw, &name, self.team_id.as_deref());
        tracing::info!(
            id = %deployment.id,
            url = %deployment.deployment_url,
            "deployment submitted"
        );

        Ok(DeploymentOutcome {
            deployment,
            merge: merged.report,
            file_count,
        })
    }

    async fn conversation_files(&self, conversation_id: &str) -> FileSet {
        let fetched = self
            .generation
            .get_conversation(conversation_id)
            .await
            .and_then(|raw| normalize_response(&raw));

        match fetched {
            Ok(conversation) => {
                let files = conversation.files.unwrap_or_default();
                tracing::info!(conversation_id, files = files.len(), "fetched conversation files");
                files
            }
            Err(e) => {
                tracing::warn!(
                    conversation_id,
                    error = %e,
                    "could not fetch conversation files, deploying skeleton only"
                );
                FileSet::new()
            }
        }
    }
}
