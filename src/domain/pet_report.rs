// src/domain/pet_report.rs
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::db::repository::Repository;
use crate::domain::clock::{now_micros, Clock};
use crate::domain::location::Location;
use crate::domain::validation::{limit_text, require_text};
use crate::errors::{ServiceError, ValidationError};

pub const DESCRIPTION_MAX: usize = 1000;
pub const PHOTO_URL_MAX: usize = 500;

text_enum! {
    PetReportType { Lost, Found, Spotted }
}

text_enum! {
    PetType { Dog, Cat, Other }
}

text_enum! {
    PetReportStatus { Active, Resolved }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetReport {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: PetReportType,
    pub pet_type: PetType,
    pub description: String,
    pub photo_url: Option<String>,
    #[serde(flatten)]
    pub location: Location,
    pub status: PetReportStatus,
    pub created_at: DateTime<Utc>,
}

/// Body of a new report. Reports always open as `Active`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetReportInput {
    #[serde(rename = "type")]
    pub kind: PetReportType,
    pub pet_type: PetType,
    pub description: String,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(flatten)]
    pub location: Location,
}

/// Body of an edit: everything a reporter can change, status included.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetReportEdit {
    #[serde(flatten)]
    pub fields: PetReportInput,
    pub status: PetReportStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPetReport {
    pub fields: PetReportInput,
    pub status: PetReportStatus,
    pub created_at: DateTime<Utc>,
}

impl NewPetReport {
    pub fn with_id(self, id: i64) -> PetReport {
        PetReport {
            id,
            kind: self.fields.kind,
            pet_type: self.fields.pet_type,
            description: self.fields.description,
            photo_url: self.fields.photo_url,
            location: self.fields.location,
            status: self.status,
            created_at: self.created_at,
        }
    }
}

fn validate(input: &PetReportInput) -> Result<(), ValidationError> {
    require_text("description", &input.description, DESCRIPTION_MAX)?;
    if let Some(url) = &input.photo_url {
        limit_text("photoUrl", url, PHOTO_URL_MAX)?;
    }
    input.location.validate()
}

/// Lost / found / spotted reports: plain CRUD.
pub struct PetReportService<R> {
    repo: R,
    clock: Arc<dyn Clock>,
}

impl<R: Repository<PetReport>> PetReportService<R> {
    pub fn new(repo: R, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    /// Newest first.
    pub fn list(&self) -> Result<Vec<PetReport>, ServiceError> {
        Ok(self.repo.list()?)
    }

    pub fn get(&self, id: i64) -> Result<Option<PetReport>, ServiceError> {
        Ok(self.repo.get(id)?)
    }

    pub fn create(&self, input: PetReportInput) -> Result<PetReport, ServiceError> {
        validate(&input)?;
        let created = self.repo.create(NewPetReport {
            fields: input,
            status: PetReportStatus::Active,
            created_at: now_micros(self.clock.as_ref()),
        })?;
        info!(pet_report_id = created.id, kind = %created.kind, "pet report created");
        Ok(created)
    }

    /// `created_at` is kept from the stored report.
    pub fn update(&self, id: i64, edit: PetReportEdit) -> Result<Option<PetReport>, ServiceError> {
        validate(&edit.fields)?;
        let Some(existing) = self.repo.get(id)? else {
            return Ok(None);
        };

        let updated = NewPetReport {
            fields: edit.fields,
            status: edit.status,
            created_at: existing.created_at,
        }
        .with_id(id);

        if !self.repo.update(&updated)? {
            return Ok(None);
        }
        info!(pet_report_id = id, status = %updated.status, "pet report edited");
        Ok(Some(updated))
    }

    pub fn delete(&self, id: i64) -> Result<bool, ServiceError> {
        Ok(self.repo.delete(id)?)
    }
}
