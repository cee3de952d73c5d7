//! Testing utilities for Storegen workspace
//!
//! Scripted service fakes and fixtures shared by tests.

#![allow(missing_docs)]

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::VecDeque;
use storegen_core::{
    DeploymentPayload, DeploymentService, ForkShape, GenerationRequest, GenerationService,
    ServiceError, StoreProfile,
};
use storegen_files::{FileSet, NamedFile};

type Script = Mutex<VecDeque<Result<Value, ServiceError>>>;

/// Call received by [`ScriptedGeneration`]
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationCall {
    Create(GenerationRequest),
    Fork(ForkShape),
    SendMessage { conversation_id: String, message: String },
    GetConversation(String),
}

fn next(script: &Script, operation: &str) -> Result<Value, ServiceError> {
    script
        .lock()
        .pop_front()
        .unwrap_or_else(|| Err(ServiceError::Transport(format!("no scripted {operation} response"))))
}

/// Generation service answering from per-operation queues
///
/// An exhausted queue answers with a transport error, so a fresh fake
/// behaves like an unreachable service.
#[derive(Debug)]
pub struct ScriptedGeneration {
    configured: bool,
    create: Script,
    fork: Script,
    message: Script,
    get: Script,
    calls: Mutex<Vec<GenerationCall>>,
}

impl Default for ScriptedGeneration {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedGeneration {
    pub fn new() -> Self {
        Self {
            configured: true,
            create: Mutex::default(),
            fork: Mutex::default(),
            message: Mutex::default(),
            get: Mutex::default(),
            calls: Mutex::default(),
        }
    }

    /// Fake reporting a missing `V0_API_KEY`
    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::new()
        }
    }

    pub fn on_create(self, response: Result<Value, ServiceError>) -> Self {
        self.create.lock().push_back(response);
        self
    }

    pub fn on_fork(self, response: Result<Value, ServiceError>) -> Self {
        self.fork.lock().push_back(response);
        self
    }

    pub fn on_message(self, response: Result<Value, ServiceError>) -> Self {
        self.message.lock().push_back(response);
        self
    }

    pub fn on_get(self, response: Result<Value, ServiceError>) -> Self {
        self.get.lock().push_back(response);
        self
    }

    /// Calls received so far, oldest first
    pub fn calls(&self) -> Vec<GenerationCall> {
        self.calls.lock().clone()
    }

    fn record(&self, call: GenerationCall) {
        self.calls.lock().push(call);
    }
}

#[async_trait]
impl GenerationService for ScriptedGeneration {
    fn ensure_configured(&self) -> Result<(), ServiceError> {
        if self.configured {
            Ok(())
        } else {
            Err(ServiceError::MissingCredentials("V0_API_KEY"))
        }
    }

    async fn create(&self, request: &GenerationRequest) -> Result<Value, ServiceError> {
        self.record(GenerationCall::Create(request.clone()));
        next(&self.create, "create")
    }

    async fn fork(&self, shape: &ForkShape) -> Result<Value, ServiceError> {
        self.record(GenerationCall::Fork(shape.clone()));
        next(&self.fork, "fork")
    }

    async fn send_message(&self, conversation_id: &str, message: &str) -> Result<Value, ServiceError> {
        self.record(GenerationCall::SendMessage {
            conversation_id: conversation_id.to_string(),
            message: message.to_string(),
        });
        next(&self.message, "message")
    }

    async fn get_conversation(&self, conversation_id: &str) -> Result<Value, ServiceError> {
        self.record(GenerationCall::GetConversation(conversation_id.to_string()));
        next(&self.get, "get")
    }
}

/// Hosting service answering from a queue and recording payloads
#[derive(Debug)]
pub struct ScriptedHosting {
    configured: bool,
    deploy: Script,
    payloads: Mutex<Vec<DeploymentPayload>>,
}

impl Default for ScriptedHosting {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedHosting {
    pub fn new() -> Self {
        Self {
            configured: true,
            deploy: Mutex::default(),
            payloads: Mutex::default(),
        }
    }

    /// Fake reporting a missing `V_TOKEN`
    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::new()
        }
    }

    pub fn on_deploy(self, response: Result<Value, ServiceError>) -> Self {
        self.deploy.lock().push_back(response);
        self
    }

    /// Payloads submitted so far
    pub fn payloads(&self) -> Vec<DeploymentPayload> {
        self.payloads.lock().clone()
    }
}

#[async_trait]
impl DeploymentService for ScriptedHosting {
    fn ensure_configured(&self) -> Result<(), ServiceError> {
        if self.configured {
            Ok(())
        } else {
            Err(ServiceError::MissingCredentials("V_TOKEN"))
        }
    }

    async fn deploy(&self, payload: &DeploymentPayload) -> Result<Value, ServiceError> {
        self.payloads.lock().push(payload.clone());
        next(&self.deploy, "deploy")
    }
}

/// Valid questionnaire answers
pub fn sample_profile() -> StoreProfile {
    StoreProfile::new("Acme Co", "Makers and tinkerers", "Hand tools for small workshops")
        .with_call_to_action("Buy Now")
}

/// Conversation response carrying `files` as `(path, source)` pairs
pub fn conversation_response(id: &str, files: &[(&str, &str)]) -> Value {
    let files: Vec<Value> = files
        .iter()
        .map(|(path, source)| json!({ "meta": { "file": path }, "source": source }))
        .collect();
    json!({
        "id": id,
        "url": format!("https://v0.dev/chat/{id}"),
        "demo": format!("https://demo.vusercontent.net/{id}"),
        "text": "Here is your store",
        "files": files,
    })
}

/// Hosting response for a queued deployment
pub fn deployment_response(id: &str, host: &str) -> Value {
    json!({ "id": id, "url": host, "readyState": "QUEUED" })
}

/// File set from `(path, content)` pairs
pub fn file_set(files: &[(&str, &str)]) -> FileSet {
    files
        .iter()
        .map(|(path, content)| NamedFile::new(*path, *content))
        .collect()
}
