// src/domain/lifecycle.rs
//
// Head/history bookkeeping for care points. Every status change goes through
// `record_status_update`, which hands the store one atomic unit: append the
// event and advance the head. `update_fields` is the one path that may move
// the head status without an event (kept as-is, see the tests below).

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::db::store::CarePointStore;
use crate::domain::care_point::{
    CarePoint, CarePointInput, CarePointUpdate, CarePointWithHistory, NewCarePoint,
    NewCarePointUpdate, StatusUpdateInput,
};
use crate::domain::clock::{now_micros, Clock};
use crate::domain::validation::{limit_text, require_text};
use crate::errors::{ServiceError, StoreError, ValidationError};

pub const TITLE_MAX: usize = 200;
pub const NOTE_MAX: usize = 500;

pub struct CarePointService<S> {
    store: S,
    clock: Arc<dyn Clock>,
}

impl<S: CarePointStore> CarePointService<S> {
    pub fn new(store: S, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn now(&self) -> DateTime<Utc> {
        now_micros(self.clock.as_ref())
    }

    fn validate(input: &CarePointInput) -> Result<(), ValidationError> {
        require_text("title", &input.title, TITLE_MAX)?;
        input.location.validate()
    }

    /// Creation is the implicit first event: no history row is written.
    pub fn create(&self, input: CarePointInput) -> Result<CarePoint, ServiceError> {
        Self::validate(&input)?;

        let created = self.store.insert_care_point(NewCarePoint {
            title: input.title,
            kind: input.kind,
            location: input.location,
            status: input.status,
            last_updated_at: self.now(),
        })?;

        info!(care_point_id = created.id, status = %created.status, "care point created");
        Ok(created)
    }

    /// Overwrites every editable field, status included, and stamps
    /// `last_updated_at`. Appends nothing to the history.
    pub fn update_fields(
        &self,
        id: i64,
        input: CarePointInput,
    ) -> Result<Option<CarePoint>, ServiceError> {
        Self::validate(&input)?;

        let updated = CarePoint {
            id,
            title: input.title,
            kind: input.kind,
            location: input.location,
            status: input.status,
            last_updated_at: self.now(),
        };

        match self.store.replace_care_point(&updated) {
            Ok(()) => {
                info!(care_point_id = id, status = %updated.status, "care point edited");
                Ok(Some(updated))
            }
            Err(StoreError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Appends a status-change event and advances the head in one commit.
    /// `Ok(None)` when the care point does not exist; nothing is written then.
    pub fn record_status_update(
        &self,
        care_point_id: i64,
        input: StatusUpdateInput,
    ) -> Result<Option<CarePointUpdate>, ServiceError> {
        limit_text("note", &input.note, NOTE_MAX)?;

        let committed = self.store.commit_status_update(NewCarePointUpdate {
            care_point_id,
            note: input.note,
            status_after_update: input.status_after_update,
            updated_at: self.now(),
        })?;

        match &committed {
            Some(update) => info!(
                care_point_id,
                update_id = update.id,
                status = %update.status_after_update,
                "status update recorded"
            ),
            None => debug!(care_point_id, "status update for unknown care point"),
        }
        Ok(committed)
    }

    /// `false` when there was nothing to delete.
    pub fn delete(&self, id: i64) -> Result<bool, ServiceError> {
        let removed = self.store.delete_care_point(id)?;
        if removed {
            info!(care_point_id = id, "care point deleted");
        }
        Ok(removed)
    }

    pub fn get_with_history(&self, id: i64) -> Result<Option<CarePointWithHistory>, ServiceError> {
        Ok(self.store.get_care_point_with_history(id)?)
    }

    pub fn list_all(&self) -> Result<Vec<CarePoint>, ServiceError> {
        Ok(self.store.list_care_points()?)
    }
}
