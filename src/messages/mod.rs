//! Flat staff message board, newest first.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{delete, get},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::{ColonyError, ColonyResult};
use crate::core::shared::state::{acting_permissions, AppState};
use crate::core::urls::ApiUrls;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub id: Uuid,
    pub author: String,
    pub body: String,
    pub posted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostMessageRequest {
    pub author: String,
    pub body: String,
}

impl PostMessageRequest {
    pub fn into_message(self, now: DateTime<Utc>) -> ColonyResult<Message> {
        if self.body.trim().is_empty() {
            return Err(ColonyError::InvalidInput("message body is empty".to_string()));
        }
        Ok(Message {
            id: Uuid::new_v4(),
            author: self.author,
            body: self.body.trim().to_string(),
            posted_at: now,
        })
    }
}

pub async fn list_messages(State(state): State<Arc<AppState>>) -> Json<Vec<Message>> {
    let store = state.store.read().await;
    Json(store.messages.list().to_vec())
}

pub async fn post_message(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<PostMessageRequest>,
) -> Result<(StatusCode, Json<Message>), ColonyError> {
    if !acting_permissions(&headers).can_post_messages {
        return Err(ColonyError::Forbidden("posting is not allowed".to_string()));
    }
    let message = req.into_message(Utc::now())?;
    let mut store = state.store.write().await;
    let message = store.post_message(message)?;
    Ok((StatusCode::CREATED, Json(message)))
}

pub async fn delete_message(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ColonyError> {
    if !acting_permissions(&headers).can_moderate_messages {
        return Err(ColonyError::Forbidden("only managers moderate messages".to_string()));
    }
    let mut store = state.store.write().await;
    store.delete_message(id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn configure_messages_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(ApiUrls::MESSAGES, get(list_messages).post(post_message))
        .route(ApiUrls::MESSAGE_BY_ID, delete(delete_message))
}
