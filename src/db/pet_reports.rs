// src/db/pet_reports.rs
use rusqlite::{params, OptionalExtension, Row};

use crate::db::connection::Database;
use crate::db::repository::Repository;
use crate::db::{timestamp_at, to_micros};
use crate::domain::location::Location;
use crate::domain::pet_report::{NewPetReport, PetReport};
use crate::errors::StoreError;

const SELECT_PET_REPORT: &str = r#"
    select id, type, pet_type, description, photo_url, latitude, longitude, status, created_at
    from pet_reports
"#;

fn pet_report_from_row(row: &Row<'_>) -> rusqlite::Result<PetReport> {
    Ok(PetReport {
        id: row.get(0)?,
        kind: row.get(1)?,
        pet_type: row.get(2)?,
        description: row.get(3)?,
        photo_url: row.get(4)?,
        location: Location::new(row.get(5)?, row.get(6)?),
        status: row.get(7)?,
        created_at: timestamp_at(row, 8)?,
    })
}

#[derive(Clone)]
pub struct SqlitePetReportRepository {
    db: Database,
}

impl SqlitePetReportRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl Repository<PetReport> for SqlitePetReportRepository {
    fn list(&self) -> Result<Vec<PetReport>, StoreError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn
                .prepare(&format!("{SELECT_PET_REPORT} order by created_at desc, id desc"))
                .map_err(|e| StoreError::storage("prepare pet report list failed", e))?;

            let rows = stmt
                .query_map([], pet_report_from_row)
                .map_err(|e| StoreError::storage("list pet reports failed", e))?;

            let mut out = Vec::new();
            for r in rows {
                out.push(r.map_err(|e| StoreError::storage("read pet report row failed", e))?);
            }
            Ok(out)
        })
    }

    fn get(&self, id: i64) -> Result<Option<PetReport>, StoreError> {
        self.db.with_conn(|conn| {
            conn.query_row(
                &format!("{SELECT_PET_REPORT} where id = ?"),
                params![id],
                pet_report_from_row,
            )
            .optional()
            .map_err(|e| StoreError::storage("select pet report failed", e))
        })
    }

    fn create(&self, draft: NewPetReport) -> Result<PetReport, StoreError> {
        self.db.with_conn(|conn| {
            conn.execute(
                r#"
                insert into pet_reports
                    (type, pet_type, description, photo_url, latitude, longitude, status, created_at)
                values (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
                params![
                    draft.fields.kind,
                    draft.fields.pet_type,
                    draft.fields.description,
                    draft.fields.photo_url,
                    draft.fields.location.latitude,
                    draft.fields.location.longitude,
                    draft.status,
                    to_micros(draft.created_at)
                ],
            )
            .map_err(|e| StoreError::storage("insert pet report failed", e))?;

            Ok(draft.with_id(conn.last_insert_rowid()))
        })
    }

    fn update(&self, record: &PetReport) -> Result<bool, StoreError> {
        self.db.with_conn(|conn| {
            let changed = conn
                .execute(
                    r#"
                    update pet_reports
                    set type = ?1, pet_type = ?2, description = ?3, photo_url = ?4,
                        latitude = ?5, longitude = ?6, status = ?7, created_at = ?8
                    where id = ?9
                    "#,
                    params![
                        record.kind,
                        record.pet_type,
                        record.description,
                        record.photo_url,
                        record.location.latitude,
                        record.location.longitude,
                        record.status,
                        to_micros(record.created_at),
                        record.id
                    ],
                )
                .map_err(|e| StoreError::storage("update pet report failed", e))?;
            Ok(changed > 0)
        })
    }

    fn delete(&self, id: i64) -> Result<bool, StoreError> {
        self.db.with_conn(|conn| {
            let removed = conn
                .execute("delete from pet_reports where id = ?", params![id])
                .map_err(|e| StoreError::storage("delete pet report failed", e))?;
            Ok(removed > 0)
        })
    }
}
