//! Route table
//!
//! | method | path              | handler                     |
//! |--------|-------------------|-----------------------------|
//! | POST   | `/api/v0/chats`   | [`handlers::create_chat`]   |
//! | POST   | `/api/v0/message` | [`handlers::send_message`]  |
//! | POST   | `/api/v0/chat`    | [`handlers::get_chat`]      |
//! | POST   | `/api/deploy`     | [`handlers::deploy`]        |
//! | GET    | `/healthz`        | [`handlers::healthz`]       |

use crate::error::handle_rejection;
use crate::handlers;
use crate::state::AppState;
use serde::de::DeserializeOwned;
use std::convert::Infallible;
use std::sync::Arc;
use warp::{Filter, Rejection, Reply};

/// Largest accepted request body
pub const MAX_BODY_BYTES: u64 = 8 * 1024 * 1024;

/// Every route, with JSON error replies and request tracing
pub fn routes(
    state: Arc<AppState>,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    api(state)
        .or(healthz())
        .recover(handle_rejection)
        .with(warp::trace::request())
}

fn api(state: Arc<AppState>) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    create_chat(state.clone())
        .or(send_message(state.clone()))
        .or(get_chat(state.clone()))
        .or(deploy(state))
}

fn with_state(
    state: Arc<AppState>,
) -> impl Filter<Extract = (Arc<AppState>,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

fn json_body<T: DeserializeOwned + Send>() -> impl Filter<Extract = (T,), Error = Rejection> + Clone {
    warp::body::content_length_limit(MAX_BODY_BYTES).and(warp::body::json())
}

fn create_chat(state: Arc<AppState>) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path!("api" / "v0" / "chats")
        .and(warp::post())
        .and(with_state(state))
        .and(json_body())
        .and_then(handlers::create_chat)
}

fn send_message(state: Arc<AppState>) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path!("api" / "v0" / "message")
        .and(warp::post())
        .and(with_state(state))
        .and(json_body())
        .and_then(handlers::send_message)
}

fn get_chat(state: Arc<AppState>) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path!("api" / "v0" / "chat")
        .and(warp::post())
        .and(with_state(state))
        .and(json_body())
        .and_then(handlers::get_chat)
}

fn deploy(state: Arc<AppState>) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path!("api" / "deploy")
        .and(warp::post())
        .and(with_state(state))
        .and(json_body())
        .and_then(handlers::deploy)
}

fn healthz() -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path!("healthz").and(warp::get()).map(handlers::healthz)
}
