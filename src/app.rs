// src/app.rs
use std::sync::Arc;

use crate::db::care_points::SqliteCarePointStore;
use crate::db::pet_reports::SqlitePetReportRepository;
use crate::db::seed::{seed_demo_data, SeedSummary};
use crate::db::shelters::SqliteShelterRepository;
use crate::db::Database;
use crate::domain::clock::{now_micros, Clock};
use crate::domain::lifecycle::CarePointService;
use crate::domain::pet_report::PetReportService;
use crate::domain::shelter::ShelterService;
use crate::errors::StoreError;

/// Everything a request handler needs, shared by all worker threads.
pub struct App {
    pub care_points: CarePointService<SqliteCarePointStore>,
    pub pet_reports: PetReportService<SqlitePetReportRepository>,
    pub shelters: ShelterService<SqliteShelterRepository>,
    /// Browser origins allowed to call the API.
    pub cors_origins: Vec<String>,
}

impl App {
    pub fn new(db: Database, clock: Arc<dyn Clock>, cors_origins: Vec<String>) -> Self {
        Self {
            care_points: CarePointService::new(SqliteCarePointStore::new(db.clone()), clock.clone()),
            pet_reports: PetReportService::new(SqlitePetReportRepository::new(db.clone()), clock),
            shelters: ShelterService::new(SqliteShelterRepository::new(db)),
            cors_origins,
        }
    }
}

/// Fill empty tables with the demo records.
pub fn seed(db: &Database, clock: &dyn Clock) -> Result<SeedSummary, StoreError> {
    seed_demo_data(
        &SqliteCarePointStore::new(db.clone()),
        &SqlitePetReportRepository::new(db.clone()),
        &SqliteShelterRepository::new(db.clone()),
        now_micros(clock),
    )
}
