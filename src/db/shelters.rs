// src/db/shelters.rs
use rusqlite::{params, OptionalExtension, Row};

use crate::db::connection::Database;
use crate::db::repository::Repository;
use crate::domain::location::Location;
use crate::domain::shelter::{Shelter, ShelterInput};
use crate::errors::StoreError;

const SELECT_SHELTER: &str = "select id, name, phone, address, latitude, longitude from shelters";

fn shelter_from_row(row: &Row<'_>) -> rusqlite::Result<Shelter> {
    Ok(Shelter {
        id: row.get(0)?,
        name: row.get(1)?,
        phone: row.get(2)?,
        address: row.get(3)?,
        location: Location::new(row.get(4)?, row.get(5)?),
    })
}

#[derive(Clone)]
pub struct SqliteShelterRepository {
    db: Database,
}

impl SqliteShelterRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl Repository<Shelter> for SqliteShelterRepository {
    fn list(&self) -> Result<Vec<Shelter>, StoreError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn
                .prepare(&format!("{SELECT_SHELTER} order by name asc, id asc"))
                .map_err(|e| StoreError::storage("prepare shelter list failed", e))?;

            let rows = stmt
                .query_map([], shelter_from_row)
                .map_err(|e| StoreError::storage("list shelters failed", e))?;

            let mut out = Vec::new();
            for r in rows {
                out.push(r.map_err(|e| StoreError::storage("read shelter row failed", e))?);
            }
            Ok(out)
        })
    }

    fn get(&self, id: i64) -> Result<Option<Shelter>, StoreError> {
        self.db.with_conn(|conn| {
            conn.query_row(
                &format!("{SELECT_SHELTER} where id = ?"),
                params![id],
                shelter_from_row,
            )
            .optional()
            .map_err(|e| StoreError::storage("select shelter failed", e))
        })
    }

    fn create(&self, draft: ShelterInput) -> Result<Shelter, StoreError> {
        self.db.with_conn(|conn| {
            conn.execute(
                r#"
                insert into shelters (name, phone, address, latitude, longitude)
                values (?1, ?2, ?3, ?4, ?5)
                "#,
                params![
                    draft.name,
                    draft.phone,
                    draft.address,
                    draft.location.latitude,
                    draft.location.longitude
                ],
            )
            .map_err(|e| StoreError::storage("insert shelter failed", e))?;

            Ok(draft.with_id(conn.last_insert_rowid()))
        })
    }

    fn update(&self, record: &Shelter) -> Result<bool, StoreError> {
        self.db.with_conn(|conn| {
            let changed = conn
                .execute(
                    r#"
                    update shelters
                    set name = ?1, phone = ?2, address = ?3, latitude = ?4, longitude = ?5
                    where id = ?6
                    "#,
                    params![
                        record.name,
                        record.phone,
                        record.address,
                        record.location.latitude,
                        record.location.longitude,
                        record.id
                    ],
                )
                .map_err(|e| StoreError::storage("update shelter failed", e))?;
            Ok(changed > 0)
        })
    }

    fn delete(&self, id: i64) -> Result<bool, StoreError> {
        self.db.with_conn(|conn| {
            let removed = conn
                .execute("delete from shelters where id = ?", params![id])
                .map_err(|e| StoreError::storage("delete shelter failed", e))?;
            Ok(removed > 0)
        })
    }
}
