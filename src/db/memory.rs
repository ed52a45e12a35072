// src/db/memory.rs
use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::db::store::CarePointStore;
use crate::domain::care_point::{
    sort_care_points_newest_first, sort_updates_newest_first, CarePoint, CarePointUpdate,
    CarePointWithHistory, NewCarePoint, NewCarePointUpdate,
};
use crate::errors::StoreError;

#[derive(Default)]
struct MemoryState {
    last_care_point_id: i64,
    last_update_id: i64,
    care_points: BTreeMap<i64, CarePoint>,
    // History keyed by owning care point, in insertion order.
    updates: HashMap<i64, Vec<CarePointUpdate>>,
}

impl MemoryState {
    fn next_care_point_id(&mut self) -> i64 {
        self.last_care_point_id += 1;
        self.last_care_point_id
    }

    fn append_update(&mut self, record: NewCarePointUpdate) -> CarePointUpdate {
        self.last_update_id += 1;
        let update = record.with_id(self.last_update_id);
        self.updates
            .entry(update.care_point_id)
            .or_default()
            .push(update.clone());
        update
    }
}

/// In-process [`CarePointStore`]. One lock guards heads and history together,
/// so every write is a single critical section and readers never see half of one.
/// Ids are never reused, even after deletes.
#[derive(Default)]
pub struct MemoryCarePointStore {
    state: RwLock<MemoryState>,
}

impl MemoryCarePointStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryState>, StoreError> {
        self.state
            .read()
            .map_err(|_| StoreError::Storage("memory store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryState>, StoreError> {
        self.state
            .write()
            .map_err(|_| StoreError::Storage("memory store lock poisoned".into()))
    }
}

impl CarePointStore for MemoryCarePointStore {
    fn list_care_points(&self) -> Result<Vec<CarePoint>, StoreError> {
        let mut points: Vec<CarePoint> = self.read()?.care_points.values().cloned().collect();
        sort_care_points_newest_first(&mut points);
        Ok(points)
    }

    fn get_care_point(&self, id: i64) -> Result<Option<CarePoint>, StoreError> {
        Ok(self.read()?.care_points.get(&id).cloned())
    }

    fn get_care_point_with_history(
        &self,
        id: i64,
    ) -> Result<Option<CarePointWithHistory>, StoreError> {
        let state = self.read()?;
        let Some(care_point) = state.care_points.get(&id).cloned() else {
            return Ok(None);
        };
        let mut updates = state.updates.get(&id).cloned().unwrap_or_default();
        drop(state);

        sort_updates_newest_first(&mut updates);
        Ok(Some(CarePointWithHistory {
            care_point,
            updates,
        }))
    }

    fn insert_care_point(&self, record: NewCarePoint) -> Result<CarePoint, StoreError> {
        let mut state = self.write()?;
        let id = state.next_care_point_id();
        let created = record.with_id(id);
        state.care_points.insert(id, created.clone());
        Ok(created)
    }

    fn replace_care_point(&self, record: &CarePoint) -> Result<(), StoreError> {
        let mut state = self.write()?;
        match state.care_points.get_mut(&record.id) {
            Some(slot) => {
                *slot = record.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound {
                entity: "care point",
                id: record.id,
            }),
        }
    }

    fn delete_care_point(&self, id: i64) -> Result<bool, StoreError> {
        let mut state = self.write()?;
        state.updates.remove(&id);
        Ok(state.care_points.remove(&id).is_some())
    }

    fn insert_care_point_update(
        &self,
        record: NewCarePointUpdate,
    ) -> Result<CarePointUpdate, StoreError> {
        let mut state = self.write()?;
        if !state.care_points.contains_key(&record.care_point_id) {
            return Err(StoreError::NotFound {
                entity: "care point",
                id: record.care_point_id,
            });
        }
        Ok(state.append_update(record))
    }

    fn commit_status_update(
        &self,
        record: NewCarePointUpdate,
    ) -> Result<Option<CarePointUpdate>, StoreError> {
        let mut state = self.write()?;
        let Some(head_at) = state
            .care_points
            .get(&record.care_point_id)
            .map(|p| p.last_updated_at)
        else {
            return Ok(None);
        };
        let floor = state
            .updates
            .get(&record.care_point_id)
            .and_then(|history| history.iter().map(|u| u.updated_at).max())
            .map_or(head_at, |at| at.max(head_at));

        let update = state.append_update(NewCarePointUpdate {
            updated_at: record.updated_at.max(floor),
            ..record
        });

        if let Some(head) = state.care_points.get_mut(&update.care_point_id) {
            head.status = update.status_after_update;
            head.last_updated_at = update.updated_at;
        }
        Ok(Some(update))
    }

    fn count_care_point_updates(&self, care_point_id: i64) -> Result<usize, StoreError> {
        Ok(self
            .read()?
            .updates
            .get(&care_point_id)
            .map_or(0, Vec::len))
    }
}
