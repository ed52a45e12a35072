// src/domain/care_point.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::location::Location;

text_enum! {
    /// What a care point offers.
    CarePointType { Food, Water, Shelter }
}

text_enum! {
    CarePointStatus { Ok, NeedsRefill, Broken }
}

/// The mutable head record. `status` / `last_updated_at` summarize the
/// history; everything else is free-form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarePoint {
    pub id: i64,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: CarePointType,
    #[serde(flatten)]
    pub location: Location,
    pub status: CarePointStatus,
    pub last_updated_at: DateTime<Utc>,
}

/// One immutable status-change event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarePointUpdate {
    pub id: i64,
    pub care_point_id: i64,
    pub note: String,
    pub status_after_update: CarePointStatus,
    pub updated_at: DateTime<Utc>,
}

/// Head plus history, history newest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarePointWithHistory {
    #[serde(flatten)]
    pub care_point: CarePoint,
    pub updates: Vec<CarePointUpdate>,
}

/// Body of both create and edit requests.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CarePointInput {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: CarePointType,
    #[serde(flatten)]
    pub location: Location,
    pub status: CarePointStatus,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdateInput {
    #[serde(default)]
    pub note: String,
    pub status_after_update: CarePointStatus,
}

/// A head record that has not been given an id yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCarePoint {
    pub title: String,
    pub kind: CarePointType,
    pub location: Location,
    pub status: CarePointStatus,
    pub last_updated_at: DateTime<Utc>,
}

impl NewCarePoint {
    pub fn with_id(self, id: i64) -> CarePoint {
        CarePoint {
            id,
            title: self.title,
            kind: self.kind,
            location: self.location,
            status: self.status,
            last_updated_at: self.last_updated_at,
        }
    }
}

/// A history record that has not been given an id yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCarePointUpdate {
    pub care_point_id: i64,
    pub note: String,
    pub status_after_update: CarePointStatus,
    pub updated_at: DateTime<Utc>,
}

impl NewCarePointUpdate {
    pub fn with_id(self, id: i64) -> CarePointUpdate {
        CarePointUpdate {
            id,
            care_point_id: self.care_point_id,
            note: self.note,
            status_after_update: self.status_after_update,
            updated_at: self.updated_at,
        }
    }
}

/// Most recently touched first; ties go to the higher id.
pub fn sort_care_points_newest_first(points: &mut [CarePoint]) {
    points.sort_by(|a, b| (b.last_updated_at, b.id).cmp(&(a.last_updated_at, a.id)));
}

/// Newest event first; ties go to the higher id.
pub fn sort_updates_newest_first(updates: &mut [CarePointUpdate]) {
    updates.sort_by(|a, b| (b.updated_at, b.id).cmp(&(a.updated_at, a.id)));
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvariantViolation {
    #[error("update {update_id} belongs to care point {owner}, not {care_point_id}")]
    ForeignUpdate {
        care_point_id: i64,
        update_id: i64,
        owner: i64,
    },
    #[error("head status {head} disagrees with update {update_id} ({latest})")]
    StatusMismatch {
        update_id: i64,
        head: CarePointStatus,
        latest: CarePointStatus,
    },
    #[error("head timestamp {head} disagrees with update {update_id} ({latest})")]
    TimestampMismatch {
        update_id: i64,
        head: DateTime<Utc>,
        latest: DateTime<Utc>,
    },
}

/// Head state must equal the latest event by `(updated_at, id)`.
/// An empty history is always consistent: creation is the implicit first event.
#[cfg_attr(not(test), allow(dead_code))]
pub fn check_invariant(
    head: &CarePoint,
    history: &[CarePointUpdate],
) -> Result<(), InvariantViolation> {
    if let Some(stray) = history.iter().find(|u| u.care_point_id != head.id) {
        return Err(InvariantViolation::ForeignUpdate {
            care_point_id: head.id,
            update_id: stray.id,
            owner: stray.care_point_id,
        });
    }

    let Some(latest) = history.iter().max_by_key(|u| (u.updated_at, u.id)) else {
        return Ok(());
    };

    if head.status != latest.status_after_update {
        return Err(InvariantViolation::StatusMismatch {
            update_id: latest.id,
            head: head.status,
            latest: latest.status_after_update,
        });
    }
    if head.last_updated_at != latest.updated_at {
        return Err(InvariantViolation::TimestampMismatch {
            update_id: latest.id,
            head: head.last_updated_at,
            latest: latest.updated_at,
        });
    }
    Ok(())
}
