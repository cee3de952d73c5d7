//! Request handlers
//!
//! Bodies are deserialized leniently (every field optional) so that a
//! missing identifier produces a descriptive 400 instead of a generic
//! deserialization error.

use crate::error::ApiError;
use crate::state::AppState;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use storegen_core::{normalize_files, GenerationRequest, ModelOptions, Privacy};
use warp::http::StatusCode;
use warp::reply::Response;
use warp::{Rejection, Reply};

/// `POST /api/v0/chats`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChatBody {
    /// Prompt for the new conversation
    pub message: Option<String>,
    /// Model options, configured defaults when absent
    pub model_configuration: Option<ModelOptions>,
    /// Conversation visibility, configured default when absent
    pub chat_privacy: Option<Privacy>,
    /// Template to fork before falling back to creation
    pub template_id: Option<String>,
}

/// `POST /api/v0/message`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageBody {
    /// Conversation to continue
    pub chat_id: Option<String>,
    /// Follow-up text
    pub message: Option<String>,
}

/// `POST /api/v0/chat`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetChatBody {
    /// Conversation to fetch
    pub chat_id: Option<String>,
}

/// `POST /api/deploy`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployBody {
    /// Conversation whose files are fetched when none are passed
    pub chat_id: Option<String>,
    /// Hosting project name, slugified before submission
    pub project_name: Option<String>,
    /// Raw file entries as the generation service returned them
    #[serde(default)]
    pub generated_files: Vec<Value>,
}

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Run the fallback chain for a new conversation
pub async fn create_chat(state: Arc<AppState>, body: CreateChatBody) -> Result<impl Reply, Rejection> {
    let message = present(body.message).ok_or_else(|| ApiError::bad_request("Message is required"))?;

    let request = GenerationRequest::new(message)
        .with_model_options(
            body.model_configuration
                .unwrap_or_else(|| state.model_options().clone()),
        )
        .with_privacy(body.chat_privacy.unwrap_or(state.privacy()));
    let template_id = present(body.template_id).or_else(|| state.template_id().map(str::to_string));

    let outcome = state
        .chain()
        .generate(&request, template_id.as_deref())
        .await
        .map_err(ApiError::from)?;

    tracing::info!(
        conversation_id = %outcome.result.conversation_id,
        origin = ?outcome.result.origin,
        attempts = outcome.attempts.len(),
        "chat created"
    );
    Ok(warp::reply::json(&outcome.result))
}

/// Send refinement feedback to a conversation
pub async fn send_message(state: Arc<AppState>, body: SendMessageBody) -> Result<impl Reply, Rejection> {
    let (Some(chat_id), Some(message)) = (present(body.chat_id), present(body.message)) else {
        return Err(ApiError::bad_request("Chat ID and message are required").into());
    };

    let outcome = state
        .chain()
        .refine(&chat_id, &message)
        .await
        .map_err(ApiError::from)?;
    Ok(warp::reply::json(&outcome.result))
}

/// Fetch a conversation
pub async fn get_chat(state: Arc<AppState>, body: GetChatBody) -> Result<impl Reply, Rejection> {
    let chat_id = present(body.chat_id).ok_or_else(|| ApiError::bad_request("Chat ID is required"))?;

    let result = state.chain().lookup(&chat_id).await.map_err(|e| {
        tracing::warn!(chat_id = %chat_id, error = %e, "conversation lookup failed");
        ApiError::from(e)
    })?;
    Ok(warp::reply::json(&result))
}

fn deploy_failure(status: StatusCode, error: &str) -> Response {
    warp::reply::with_status(
        warp::reply::json(&json!({ "success": false, "error": error })),
        status,
    )
    .into_response()
}

/// Merge generated files onto the skeleton and deploy
///
/// Failures answer `{success: false, error}` rather than the generic
/// error body.
pub async fn deploy(state: Arc<AppState>, body: DeployBody) -> Result<Response, Rejection> {
    let (Some(chat_id), Some(project_name)) = (present(body.chat_id), present(body.project_name)) else {
        return Ok(deploy_failure(
            StatusCode::BAD_REQUEST,
            "Chat ID and project name are required",
        ));
    };

    let overlay = normalize_files(&body.generated_files);
    tracing::info!(
        chat_id = %chat_id,
        project = %project_name,
        submitted = body.generated_files.len(),
        usable = overlay.len(),
        "deploy requested"
    );

    match state.deployer().deploy(&project_name, Some(&chat_id), overlay).await {
        Ok(outcome) => Ok(warp::reply::json(&json!({
            "success": true,
            "deployment": outcome.deployment,
            "merge": outcome.merge,
            "fileCount": outcome.file_count,
        }))
        .into_response()),
        Err(e) => {
            let status = if e.is_caller_error() {
                StatusCode::BAD_REQUEST
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            Ok(deploy_failure(status, &e.to_string()))
        }
    }
}

/// Liveness probe
pub fn healthz() -> impl Reply {
    warp::reply::json(&json!({ "status": "ok", "version": crate::VERSION }))
}
