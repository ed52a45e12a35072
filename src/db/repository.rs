// src/db/repository.rs
//
// The CRUD shape shared by every entity. Care points get it for free from
// any `CarePointStore`; their lifecycle lives on top of that.

use crate::db::store::CarePointStore;
use crate::domain::care_point::{CarePoint, NewCarePoint};
use crate::domain::pet_report::{NewPetReport, PetReport};
use crate::domain::shelter::{Shelter, ShelterInput};
use crate::errors::StoreError;

pub trait Entity: Clone + Send + Sync + 'static {
    /// The record before the store has assigned it an id.
    type Draft;

    const NAME: &'static str;

    #[cfg_attr(not(test), allow(dead_code))]
    fn id(&self) -> i64;
}

impl Entity for CarePoint {
    type Draft = NewCarePoint;
    const NAME: &'static str = "care point";

    fn id(&self) -> i64 {
        self.id
    }
}

impl Entity for PetReport {
    type Draft = NewPetReport;
    const NAME: &'static str = "pet report";

    fn id(&self) -> i64 {
        self.id
    }
}

impl Entity for Shelter {
    type Draft = ShelterInput;
    const NAME: &'static str = "shelter";

    fn id(&self) -> i64 {
        self.id
    }
}

pub trait Repository<E: Entity>: Send + Sync {
    /// In the entity's natural listing order.
    fn list(&self) -> Result<Vec<E>, StoreError>;

    fn get(&self, id: i64) -> Result<Option<E>, StoreError>;

    fn create(&self, draft: E::Draft) -> Result<E, StoreError>;

    /// Full overwrite by id. `false` when there is no such record.
    fn update(&self, record: &E) -> Result<bool, StoreError>;

    /// `false` when there is no such record.
    fn delete(&self, id: i64) -> Result<bool, StoreError>;
}

impl<S: CarePointStore> Repository<CarePoint> for S {
    fn list(&self) -> Result<Vec<CarePoint>, StoreError> {
        self.list_care_points()
    }

    fn get(&self, id: i64) -> Result<Option<CarePoint>, StoreError> {
        self.get_care_point(id)
    }

    fn create(&self, draft: NewCarePoint) -> Result<CarePoint, StoreError> {
        self.insert_care_point(draft)
    }

    fn update(&self, record: &CarePoint) -> Result<bool, StoreError> {
        match self.replace_care_point(record) {
            Ok(()) => Ok(true),
            Err(StoreError::NotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn delete(&self, id: i64) -> Result<bool, StoreError> {
        self.delete_care_point(id)
    }
}
