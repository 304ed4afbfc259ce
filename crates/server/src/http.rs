//! HTTP endpoints
//!
//! REST API over the dialogue controller and ticket store.

use axum::{
    extract::{Json, Path, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use intake_persistence::export_csv;

use crate::state::AppState;
use crate::ServerError;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let cors_layer = build_cors_layer(
        &state.settings.server.cors_origins,
        state.settings.server.cors_enabled,
    );

    Router::new()
        // Session endpoints
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/:id", get(get_session))
        .route("/api/sessions/:id", delete(delete_session))
        .route("/api/sessions/:id/profile", get(get_profile))
        // Chat endpoint
        .route("/api/chat/:session_id", post(chat))
        // Ticket log
        .route("/api/tickets", get(list_tickets))
        .route("/api/tickets/export", get(export_tickets))
        // Health check
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
}

/// Build the CORS layer from configured origins
fn build_cors_layer(origins: &[String], enabled: bool) -> CorsLayer {
    if !enabled {
        return CorsLayer::permissive();
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!(origin = %origin, "invalid CORS origin ignored");
                None
            })
        })
        .collect();

    if parsed.is_empty() {
        tracing::info!("no valid CORS origins configured, defaulting to localhost:3000");
        return CorsLayer::new()
            .allow_origin("http://localhost:3000".parse::<HeaderValue>().unwrap())
            .allow_methods([Method::GET, Method::POST, Method::DELETE])
            .allow_headers(Any);
    }

    CorsLayer::new()
        .allow_origin(parsed)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any)
}

#[derive(Serialize)]
struct CreateSessionResponse {
    session_id: String,
    greeting: String,
}

/// Open a new conversation on the default city profile
async fn create_session(State(state): State<AppState>) -> impl IntoResponse {
    let profile = intake_config::adapt(&state.settings.default_city, &state.settings.default_state);
    let (session_id, session) = state.sessions.create(profile);

    let greeting = state.controller.greeting();
    session.lock().await.record_assistant(&greeting);

    (
        StatusCode::CREATED,
        Json(CreateSessionResponse { session_id, greeting }),
    )
}

/// Session metadata
async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ServerError> {
    let session = state
        .sessions
        .get(&id)
        .ok_or_else(|| ServerError::SessionNotFound(id.clone()))?;
    let session = session.lock().await;

    Ok(Json(serde_json::json!({
        "session_id": session.id,
        "city": session.city_profile.city,
        "state": session.city_profile.state,
        "collecting": session.is_collecting(),
        "active_intent": session.active_intent,
        "pending_fields": session.pending_fields,
        "turns": session.transcript.len(),
        "tickets": session.ticket_log.len(),
    })))
}

/// Discard a session
async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    if state.sessions.remove(&id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ServerError::SessionNotFound(id))
    }
}

/// Active city profile, services and FAQ included
async fn get_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ServerError> {
    let session = state
        .sessions
        .get(&id)
        .ok_or_else(|| ServerError::SessionNotFound(id.clone()))?;
    let session = session.lock().await;

    Ok(Json(serde_json::json!({
        "city": session.city_profile.city,
        "state": session.city_profile.state,
        "services": session.city_profile.services,
        "faq": session.city_profile.faq,
    })))
}

#[derive(Deserialize)]
struct ChatRequest {
    message: String,
}

#[derive(Serialize)]
struct ChatResponse {
    replies: Vec<String>,
}

/// Process one utterance and return the ordered reply sequence
///
/// The per-session mutex is held across the whole turn, geocoding included,
/// so a second utterance for the same session waits its turn.
async fn chat(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ServerError> {
    let session = state
        .sessions
        .get(&session_id)
        .ok_or_else(|| ServerError::SessionNotFound(session_id.clone()))?;

    let mut session = session.lock().await;
    let replies = state.controller.process(&mut session, &request.message).await;

    Ok(Json(ChatResponse { replies }))
}

/// All tickets, newest first
async fn list_tickets(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ServerError> {
    let mut tickets = state.store.list().await?;
    tickets.reverse();
    Ok(Json(serde_json::json!({
        "count": tickets.len(),
        "tickets": tickets,
    })))
}

/// Ticket log as CSV
async fn export_tickets(State(state): State<AppState>) -> Result<impl IntoResponse, ServerError> {
    let tickets = state.store.list().await?;
    let csv = export_csv(&tickets)?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"tickets.csv\"",
            ),
        ],
        csv,
    ))
}

/// Liveness probe
async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "sessions": state.sessions.count(),
    }))
}
