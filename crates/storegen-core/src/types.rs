//! Core domain types
//!
//! Request and result shapes shared by the fallback chain, the deployer, the
//! session and the HTTP surface. JSON field names are camelCase.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use storegen_files::FileSet;
use ulid::Ulid;

/// Default generation model
pub const DEFAULT_MODEL_ID: &str = "v0-1.5-lg";

/// Conversation visibility on the generation service
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Privacy {
    /// Only the owner
    #[default]
    Private,
    /// Anyone
    Public,
    /// Owner's team, read only
    Team,
    /// Owner's team, editable
    TeamEdit,
    /// Anyone with the link
    Unlisted,
}

impl Privacy {
    /// Wire spelling
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::Public => "public",
            Self::Team => "team",
            Self::TeamEdit => "team-edit",
            Self::Unlisted => "unlisted",
        }
    }
}

impl std::fmt::Display for Privacy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generation model configuration
///
/// Serialized as the service's `modelConfiguration` object. Keys this type
/// does not know are kept in `extra` and passed through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelOptions {
    /// Model identifier
    #[serde(default = "default_model_id")]
    pub model_id: String,
    /// Allow the model to generate images
    #[serde(default = "default_true")]
    pub image_generations: bool,
    /// Extended reasoning
    #[serde(default)]
    pub thinking: bool,
    /// Unrecognized keys
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_model_id() -> String {
    DEFAULT_MODEL_ID.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self {
            model_id: default_model_id(),
            image_generations: true,
            thinking: false,
            extra: Map::new(),
        }
    }
}

/// One generation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    /// Prompt sent as the first message
    pub prompt: String,
    /// Model configuration
    #[serde(default)]
    pub model_options: ModelOptions,
    /// Conversation visibility
    #[serde(default)]
    pub privacy: Privacy,
}

impl GenerationRequest {
    /// Create request with default options
    #[inline]
    #[must_use]
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model_options: ModelOptions::default(),
            privacy: Privacy::default(),
        }
    }

    /// With model options
    #[inline]
    #[must_use]
    pub fn with_model_options(mut self, options: ModelOptions) -> Self {
        self.model_options = options;
        self
    }

    /// With privacy
    #[inline]
    #[must_use]
    pub fn with_privacy(mut self, privacy: Privacy) -> Self {
        self.privacy = privacy;
        self
    }

    /// Same options, different prompt
    #[must_use]
    pub fn with_prompt(&self, prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..self.clone()
        }
    }
}

/// Which path produced a generation result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationOrigin {
    /// Forked from a template, possibly customized by a follow-up message
    Fork,
    /// New conversation imitating a template
    Template,
    /// New conversation from the raw prompt
    Plain,
    /// Follow-up message in an existing conversation
    Refinement,
    /// Existing conversation fetched as-is
    Lookup,
    /// Synthesized locally
    Mock,
}

/// Normalized generation result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    /// Conversation on the generation service
    pub conversation_id: String,
    /// Link to the conversation
    pub external_url: String,
    /// Embeddable preview
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
    /// Generated source files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<FileSet>,
    /// Assistant text
    #[serde(default)]
    pub raw_text: String,
    /// Synthesized locally instead of by the service
    #[serde(default)]
    pub is_mock: bool,
    /// Producing path
    pub origin: GenerationOrigin,
    /// When the result was produced
    pub generated_at: DateTime<Utc>,
}

impl GenerationResult {
    /// Number of generated files
    #[inline]
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.as_ref().map_or(0, FileSet::len)
    }

    /// Generated files, empty when none
    #[must_use]
    pub fn files_or_empty(&self) -> FileSet {
        self.files.clone().unwrap_or_default()
    }
}

/// One refinement request in a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefinementRecord {
    /// Record id
    pub id: Ulid,
    /// Feedback text as entered
    pub message: String,
    /// When the refinement was requested
    pub timestamp: DateTime<Utc>,
}

impl RefinementRecord {
    /// Create record stamped now
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            id: Ulid::new(),
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Build settings sent with a deployment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSettings {
    /// Framework preset
    pub framework: String,
    /// Node.js version
    pub node_version: String,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            framework: "nextjs".to_string(),
            node_version: "20.x".to_string(),
        }
    }
}

/// Deployment submitted to the hosting service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentPayload {
    /// Deployment/project name (slug)
    pub name: String,
    /// Merged project files
    pub files: FileSet,
    /// Deployment target
    pub target: String,
    /// Build settings
    pub project_settings: ProjectSettings,
}

impl DeploymentPayload {
    /// Production deployment with default build settings
    #[must_use]
    pub fn production(name: impl Into<String>, files: FileSet) -> Self {
        Self {
            name: name.into(),
            files,
            target: "production".to_string(),
            project_settings: ProjectSettings::default(),
        }
    }

    /// Hosting API request body
    ///
    /// Files are sent inline as `{file, data}` entries.
    #[must_use]
    pub fn to_body(&self) -> Value {
        let files: Vec<Value> = self
            .files
            .iter()
            .map(|(path, content)| json!({ "file": path, "data": content }))
            .collect();
        json!({
            "name": self.name,
            "files": files,
            "target": self.target,
            "projectSettings": self.project_settings,
        })
    }
}

/// Normalized deployment response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentResult {
    /// Deployment id
    pub id: String,
    /// Primary host name
    pub url: String,
    /// `https://` URL of the primary host
    pub deployment_url: String,
    /// Build state reported by the host
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ready_state: Option<String>,
    /// Dashboard link
    pub inspector_url: String,
    /// Hosting response body, unmodified
    pub raw: Value,
}
