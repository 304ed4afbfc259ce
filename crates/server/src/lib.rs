//! HTTP front end for the 311 intake agent
//!
//! One REST surface over the dialogue controller: create a session, post
//! utterances, read/export the ticket log. Each live session is wrapped in
//! its own async mutex so one utterance (including any outbound geocoding
//! call) is fully handled before the next is accepted; distinct sessions
//! never contend.

pub mod http;
pub mod session;
pub mod state;

pub use http::create_router;
pub use session::SessionRegistry;
pub use state::AppState;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Persistence error: {0}")]
    Persistence(#[from] intake_persistence::PersistenceError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServerError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, self.to_string()).into_response()
    }
}
