//! Availability HTTP handlers

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;

use crate::application::{AvailabilityService, ReconcileOutcome};
use crate::domain::{DomainError, DomainResult, ReconcileAction};
use crate::interfaces::http::common::{error_response, ApiError, ApiResponse, ValidatedJson};
use crate::shared::retry::{retry_with_backoff, RetryConfig};

use super::dto::*;

/// Application state for availability handlers.
#[derive(Clone)]
pub struct AvailabilityAppState {
    pub service: Arc<AvailabilityService>,
    /// Applied to transient (internal) reconciliation failures
    pub retry: RetryConfig,
}

async fn reconcile_with_retry(
    state: &AvailabilityAppState,
    action: ReconcileAction,
    room_id: i32,
    request: &DateRangeRequest,
) -> DomainResult<ReconcileOutcome> {
    let service: &AvailabilityService = &state.service;
    let (start, end) = (request.start_date, request.end_date);

    retry_with_backoff(
        state.retry.clone(),
        move || async move {
            match action {
                ReconcileAction::Block => service.reconcile_block(room_id, start, end).await,
                ReconcileAction::Unblock => service.reconcile_unblock(room_id, start, end).await,
            }
        },
        DomainError::is_transient,
        action.as_str(),
    )
    .await
}

#[utoipa::path(
    post,
    path = "/api/v1/rooms/{room_id}/availability/block",
    tag = "Availability",
    params(("room_id" = i32, Path, description = "Room ID")),
    request_body = DateRangeRequest,
    responses(
        (status = 200, description = "Dates blocked", body = ApiResponse<ReconcileResponse>),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Room or its rate plans not found"),
        (status = 422, description = "start_date after end_date")
    )
)]
pub async fn block_dates(
    State(state): State<AvailabilityAppState>,
    Path(room_id): Path<i32>,
    ValidatedJson(request): ValidatedJson<DateRangeRequest>,
) -> Result<Json<ApiResponse<ReconcileResponse>>, ApiError<ReconcileResponse>> {
    let outcome = reconcile_with_retry(&state, ReconcileAction::Block, room_id, &request)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(outcome.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/rooms/{room_id}/availability/unblock",
    tag = "Availability",
    params(("room_id" = i32, Path, description = "Room ID")),
    request_body = DateRangeRequest,
    responses(
        (status = 200, description = "Dates released", body = ApiResponse<ReconcileResponse>),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Room or its rate plans not found"),
        (status = 422, description = "start_date after end_date")
    )
)]
pub async fn unblock_dates(
    State(state): State<AvailabilityAppState>,
    Path(room_id): Path<i32>,
    ValidatedJson(request): ValidatedJson<DateRangeRequest>,
) -> Result<Json<ApiResponse<ReconcileResponse>>, ApiError<ReconcileResponse>> {
    let outcome = reconcile_with_retry(&state, ReconcileAction::Unblock, room_id, &request)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(outcome.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/rooms/{room_id}/availability/blocked",
    tag = "Availability",
    params(("room_id" = i32, Path, description = "Room ID")),
    responses(
        (
            status = 200,
            description = "Blocked ranges sorted by start date",
            body = ApiResponse<Vec<BlockedRangeDto>>
        ),
        (status = 404, description = "Room not found")
    )
)]
pub async fn list_blocked_ranges(
    State(state): State<AvailabilityAppState>,
    Path(room_id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<BlockedRangeDto>>>, ApiError<Vec<BlockedRangeDto>>> {
    let ranges = state
        .service
        .blocked_ranges(room_id)
        .await
        .map_err(error_response)?;

    Ok(Json(ApiResponse::success(
        ranges.into_iter().map(Into::into).collect(),
    )))
}

// ── Tests ──────────────────────────────────────────────────────
