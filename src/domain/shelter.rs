// src/domain/shelter.rs
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::db::repository::Repository;
use crate::domain::location::Location;
use crate::domain::validation::require_text;
use crate::errors::{ServiceError, ValidationError};

pub const NAME_MAX: usize = 200;
pub const PHONE_MAX: usize = 50;
pub const ADDRESS_MAX: usize = 300;

/// A directory entry for an adoption or rescue organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shelter {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub address: String,
    #[serde(flatten)]
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ShelterInput {
    pub name: String,
    pub phone: String,
    pub address: String,
    #[serde(flatten)]
    pub location: Location,
}

impl ShelterInput {
    pub fn with_id(self, id: i64) -> Shelter {
        Shelter {
            id,
            name: self.name,
            phone: self.phone,
            address: self.address,
            location: self.location,
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name, NAME_MAX)?;
        require_text("phone", &self.phone, PHONE_MAX)?;
        require_text("address", &self.address, ADDRESS_MAX)?;
        self.location.validate()
    }
}

pub struct ShelterService<R> {
    repo: R,
}

impl<R: Repository<Shelter>> ShelterService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Alphabetical by name.
    pub fn list(&self) -> Result<Vec<Shelter>, ServiceError> {
        Ok(self.repo.list()?)
    }

    pub fn get(&self, id: i64) -> Result<Option<Shelter>, ServiceError> {
        Ok(self.repo.get(id)?)
    }

    pub fn create(&self, input: ShelterInput) -> Result<Shelter, ServiceError> {
        input.validate()?;
        let created = self.repo.create(input)?;
        info!(shelter_id = created.id, "shelter created");
        Ok(created)
    }

    pub fn update(&self, id: i64, input: ShelterInput) -> Result<Option<Shelter>, ServiceError> {
        input.validate()?;
        let updated = input.with_id(id);
        if !self.repo.update(&updated)? {
            return Ok(None);
        }
        Ok(Some(updated))
    }

    pub fn delete(&self, id: i64) -> Result<bool, ServiceError> {
        Ok(self.repo.delete(id)?)
    }
}
