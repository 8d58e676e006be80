//! Chat HTTP handlers.
//!
//! Endpoints (mounted under `/api/chat`, and `/chat` with dev routes on):
//! - POST /message              - Send a customer message, get the agent's reply
//! - GET  /history/{session_id} - Full message history of a conversation

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};

use spur_types::chat::{ChatReply, Message};

use crate::http::error::AppError;
use crate::state::AppState;

/// Body of `POST /message`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub message: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Body of `GET /history/{session_id}`.
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub messages: Vec<Message>,
}

/// POST /message - Process one customer message.
pub async fn send_message(
    State(state): State<AppState>,
    payload: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Result<Json<ChatReply>, AppError> {
    let Json(request) =
        payload.map_err(|rejection| AppError::BadRequest(format!("Invalid request. {}", rejection.body_text())))?;

    let reply = state
        .conversations
        .process_message(&request.message, request.session_id.as_deref())
        .await?;

    Ok(Json(reply))
}

/// GET /history/{session_id} - Messages of a conversation, oldest first.
///
/// Unknown ids return an empty list.
pub async fn get_history(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<HistoryResponse>, AppError> {
    let messages = state
        .conversations
        .get_history(&session_id)
        .await
        .map_err(|err| {
            tracing::error!(%session_id, error = %err, "Failed to load history");
            AppError::Internal("Failed to fetch conversation history")
        })?;

    Ok(Json(HistoryResponse { messages }))
}
