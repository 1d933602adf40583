//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    common::time::now_unix_millis,
    domain::{RoomId, Timestamp, UserId},
    infrastructure::dto::http::{
        PendingInvitationDto, PendingInvitationsResponse, RoomDetailDto, RoomListResponse,
        RoomSummaryDto,
    },
    ui::state::AppState,
    usecase::SessionError,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get list of active rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<RoomListResponse> {
    let rooms = state.get_rooms_usecase.execute().await;

    // Domain Model から DTO への変換
    let summaries: Vec<RoomSummaryDto> = rooms.iter().map(RoomSummaryDto::from).collect();
    Json(RoomListResponse { rooms: summaries })
}

/// Get room detail by ID, with playback position projected to "now"
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    let room_id = RoomId::new(room_id).map_err(|_| StatusCode::BAD_REQUEST)?;
    match state.get_room_detail_usecase.execute(&room_id).await {
        Ok(room) => {
            let now = Timestamp::new(now_unix_millis());
            Ok(Json(RoomDetailDto::from_room(&room, now)))
        }
        Err(SessionError::RoomNotFound(_)) => Err(StatusCode::NOT_FOUND),
        Err(_) => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// Pending invitations for a user (offline discovery)
pub async fn get_user_invitations(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<PendingInvitationsResponse>, StatusCode> {
    let user_id = UserId::new(user_id).map_err(|_| StatusCode::BAD_REQUEST)?;
    let invitations = state
        .get_pending_invitations_usecase
        .execute(&user_id)
        .await;

    let dtos: Vec<PendingInvitationDto> =
        invitations.iter().map(PendingInvitationDto::from).collect();
    Ok(Json(PendingInvitationsResponse { invitations: dtos }))
}
