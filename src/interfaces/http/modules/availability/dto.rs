//! Availability DTOs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::application::ReconcileOutcome;
use crate::domain::BlockedRange;

/// Dates to block or unblock, both ends inclusive (`YYYY-MM-DD`)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_date_order"))]
pub struct DateRangeRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

fn validate_date_order(request: &DateRangeRequest) -> Result<(), ValidationError> {
    if request.start_date > request.end_date {
        let mut err = ValidationError::new("date_order");
        err.message = Some("start_date must not be after end_date".into());
        return Err(err);
    }
    Ok(())
}

/// Stored blocked range
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BlockedRangeDto {
    pub id: i32,
    pub room_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Number of blocked days, both ends included
    pub days: i64,
    pub created_at: String,
}

impl From<BlockedRange> for BlockedRangeDto {
    fn from(b: BlockedRange) -> Self {
        Self {
            id: b.id,
            room_id: b.room_id,
            start_date: b.range.start(),
            end_date: b.range.end(),
            days: b.range.days(),
            created_at: b.created_at.to_rfc3339(),
        }
    }
}

/// Result of a block or unblock request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReconcileResponse {
    pub room_id: i32,
    /// "block" or "unblock"
    pub action: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// `false` when the stored ranges already matched the request
    pub changed: bool,
    pub deleted: Vec<BlockedRangeDto>,
    pub inserted: Vec<BlockedRangeDto>,
    /// Whether the inventory system accepted the change
    pub synced: bool,
}

impl From<ReconcileOutcome> for ReconcileResponse {
    fn from(o: ReconcileOutcome) -> Self {
        Self {
            room_id: o.room_id,
            action: o.action.as_str().to_string(),
            start_date: o.requested.start(),
            end_date: o.requested.end(),
            changed: !o.is_noop(),
            deleted: o.deleted.into_iter().map(Into::into).collect(),
            inserted: o.inserted.into_iter().map(Into::into).collect(),
            synced: o.synced,
        }
    }
}
