// src/db/store.rs
use crate::domain::care_point::{
    CarePoint, CarePointUpdate, CarePointWithHistory, NewCarePoint, NewCarePointUpdate,
};
use crate::errors::StoreError;

/// Persistence contract for care points and their status history.
///
/// Lookups report absence as `Ok(None)` / `Ok(false)`. Only `replace_care_point`
/// and `insert_care_point_update` fail with [`StoreError::NotFound`].
pub trait CarePointStore: Send + Sync {
    /// Most recently touched first, ties by id descending.
    fn list_care_points(&self) -> Result<Vec<CarePoint>, StoreError>;

    fn get_care_point(&self, id: i64) -> Result<Option<CarePoint>, StoreError>;

    /// Head and history from one consistent snapshot, history newest first.
    fn get_care_point_with_history(
        &self,
        id: i64,
    ) -> Result<Option<CarePointWithHistory>, StoreError>;

    fn insert_care_point(&self, record: NewCarePoint) -> Result<CarePoint, StoreError>;

    /// Full overwrite by id.
    fn replace_care_point(&self, record: &CarePoint) -> Result<(), StoreError>;

    /// Removes the head and all of its history in one step.
    fn delete_care_point(&self, id: i64) -> Result<bool, StoreError>;

    /// Raw history append. Leaves the head alone.
    #[cfg_attr(not(test), allow(dead_code))]
    fn insert_care_point_update(
        &self,
        record: NewCarePointUpdate,
    ) -> Result<CarePointUpdate, StoreError>;

    /// Appends `record` and advances the head to match, as one atomic unit.
    /// The stored `updated_at` is never earlier than the head's `last_updated_at`
    /// or any existing event for the same care point.
    fn commit_status_update(
        &self,
        record: NewCarePointUpdate,
    ) -> Result<Option<CarePointUpdate>, StoreError>;

    #[cfg_attr(not(test), allow(dead_code))]
    fn count_care_point_updates(&self, care_point_id: i64) -> Result<usize, StoreError>;
}
