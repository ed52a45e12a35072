// src/db/care_points.rs
use chrono::DateTime;
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};

use crate::db::connection::Database;
use crate::db::store::CarePointStore;
use crate::db::{timestamp_at, to_micros};
use crate::domain::care_point::{
    CarePoint, CarePointUpdate, CarePointWithHistory, NewCarePoint, NewCarePointUpdate,
};
use crate::domain::location::Location;
use crate::errors::StoreError;

const SELECT_CARE_POINT: &str = r#"
    select id, title, type, latitude, longitude, status, last_updated_at
    from care_points
"#;

const SELECT_UPDATE: &str = r#"
    select id, care_point_id, note, status_after_update, updated_at
    from care_point_updates
"#;

fn care_point_from_row(row: &Row<'_>) -> rusqlite::Result<CarePoint> {
    Ok(CarePoint {
        id: row.get(0)?,
        title: row.get(1)?,
        kind: row.get(2)?,
        location: Location::new(row.get(3)?, row.get(4)?),
        status: row.get(5)?,
        last_updated_at: timestamp_at(row, 6)?,
    })
}

fn update_from_row(row: &Row<'_>) -> rusqlite::Result<CarePointUpdate> {
    Ok(CarePointUpdate {
        id: row.get(0)?,
        care_point_id: row.get(1)?,
        note: row.get(2)?,
        status_after_update: row.get(3)?,
        updated_at: timestamp_at(row, 4)?,
    })
}

fn select_care_point(conn: &Connection, id: i64) -> Result<Option<CarePoint>, StoreError> {
    conn.query_row(
        &format!("{SELECT_CARE_POINT} where id = ?"),
        params![id],
        care_point_from_row,
    )
    .optional()
    .map_err(|e| StoreError::storage("select care point failed", e))
}

fn select_updates(conn: &Connection, care_point_id: i64) -> Result<Vec<CarePointUpdate>, StoreError> {
    let mut stmt = conn
        .prepare(&format!(
            "{SELECT_UPDATE} where care_point_id = ? order by updated_at desc, id desc"
        ))
        .map_err(|e| StoreError::storage("prepare history query failed", e))?;

    let rows = stmt
        .query_map(params![care_point_id], update_from_row)
        .map_err(|e| StoreError::storage("query history failed", e))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r.map_err(|e| StoreError::storage("read history row failed", e))?);
    }
    Ok(out)
}

fn insert_update_row(
    conn: &Connection,
    record: NewCarePointUpdate,
) -> Result<CarePointUpdate, StoreError> {
    conn.execute(
        r#"
        insert into care_point_updates (care_point_id, note, status_after_update, updated_at)
        values (?1, ?2, ?3, ?4)
        "#,
        params![
            record.care_point_id,
            record.note,
            record.status_after_update,
            to_micros(record.updated_at)
        ],
    )
    .map_err(|e| StoreError::storage("insert care point update failed", e))?;

    Ok(record.with_id(conn.last_insert_rowid()))
}

/// SQLite-backed [`CarePointStore`]. Multi-statement operations run in a
/// single transaction; writers take the lock up front (`BEGIN IMMEDIATE`).
#[derive(Clone)]
pub struct SqliteCarePointStore {
    db: Database,
}

impl SqliteCarePointStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl CarePointStore for SqliteCarePointStore {
    fn list_care_points(&self) -> Result<Vec<CarePoint>, StoreError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn
                .prepare(&format!(
                    "{SELECT_CARE_POINT} order by last_updated_at desc, id desc"
                ))
                .map_err(|e| StoreError::storage("prepare care point list failed", e))?;

            let rows = stmt
                .query_map([], care_point_from_row)
                .map_err(|e| StoreError::storage("list care points failed", e))?;

            let mut out = Vec::new();
            for r in rows {
                out.push(r.map_err(|e| StoreError::storage("read care point row failed", e))?);
            }
            Ok(out)
        })
    }

    fn get_care_point(&self, id: i64) -> Result<Option<CarePoint>, StoreError> {
        self.db.with_conn(|conn| select_care_point(conn, id))
    }

    fn get_care_point_with_history(
        &self,
        id: i64,
    ) -> Result<Option<CarePointWithHistory>, StoreError> {
        self.db.with_conn(|conn| {
            // Read transaction: head and history come from the same snapshot.
            let tx = conn
                .transaction()
                .map_err(|e| StoreError::storage("begin tx failed", e))?;

            let Some(care_point) = select_care_point(&tx, id)? else {
                tx.rollback().ok();
                return Ok(None);
            };
            let updates = select_updates(&tx, id)?;

            tx.commit()
                .map_err(|e| StoreError::storage("commit tx failed", e))?;

            Ok(Some(CarePointWithHistory {
                care_point,
                updates,
            }))
        })
    }

    fn insert_care_point(&self, record: NewCarePoint) -> Result<CarePoint, StoreError> {
        self.db.with_conn(|conn| {
            conn.execute(
                r#"
                insert into care_points (title, type, latitude, longitude, status, last_updated_at)
                values (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
                params![
                    record.title,
                    record.kind,
                    record.location.latitude,
                    record.location.longitude,
                    record.status,
                    to_micros(record.last_updated_at)
                ],
            )
            .map_err(|e| StoreError::storage("insert care point failed", e))?;

            Ok(record.with_id(conn.last_insert_rowid()))
        })
    }

    fn replace_care_point(&self, record: &CarePoint) -> Result<(), StoreError> {
        self.db.with_conn(|conn| {
            let changed = conn
                .execute(
                    r#"
                    update care_points
                    set title = ?1, type = ?2, latitude = ?3, longitude = ?4,
                        status = ?5, last_updated_at = ?6
                    where id = ?7
                    "#,
                    params![
                        record.title,
                        record.kind,
                        record.location.latitude,
                        record.location.longitude,
                        record.status,
                        to_micros(record.last_updated_at),
                        record.id
                    ],
                )
                .map_err(|e| StoreError::storage("replace care point failed", e))?;

            if changed == 0 {
                return Err(StoreError::NotFound {
                    entity: "care point",
                    id: record.id,
                });
            }
            Ok(())
        })
    }

    fn delete_care_point(&self, id: i64) -> Result<bool, StoreError> {
        self.db.with_conn(|conn| {
            let tx = conn
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .map_err(|e| StoreError::storage("begin tx failed", e))?;

            // Explicit: do not depend on the foreign key pragma being on.
            tx.execute(
                "delete from care_point_updates where care_point_id = ?",
                params![id],
            )
            .map_err(|e| StoreError::storage("delete care point history failed", e))?;

            let removed = tx
                .execute("delete from care_points where id = ?", params![id])
                .map_err(|e| StoreError::storage("delete care point failed", e))?;

            tx.commit()
                .map_err(|e| StoreError::storage("commit tx failed", e))?;

            Ok(removed > 0)
        })
    }

    fn insert_care_point_update(
        &self,
        record: NewCarePointUpdate,
    ) -> Result<CarePointUpdate, StoreError> {
        self.db.with_conn(|conn| {
            let tx = conn
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .map_err(|e| StoreError::storage("begin tx failed", e))?;

            if select_care_point(&tx, record.care_point_id)?.is_none() {
                tx.rollback().ok();
                return Err(StoreError::NotFound {
                    entity: "care point",
                    id: record.care_point_id,
                });
            }
            let update = insert_update_row(&tx, record)?;

            tx.commit()
                .map_err(|e| StoreError::storage("commit tx failed", e))?;
            Ok(update)
        })
    }

    fn commit_status_update(
        &self,
        record: NewCarePointUpdate,
    ) -> Result<Option<CarePointUpdate>, StoreError> {
        self.db.with_conn(|conn| {
            let tx = conn
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .map_err(|e| StoreError::storage("begin tx failed", e))?;

            let Some(head) = select_care_point(&tx, record.care_point_id)? else {
                tx.rollback().ok();
                return Ok(None);
            };

            let newest_event: Option<i64> = tx
                .query_row(
                    "select max(updated_at) from care_point_updates where care_point_id = ?",
                    params![record.care_point_id],
                    |r| r.get(0),
                )
                .map_err(|e| StoreError::storage("read newest status update failed", e))?;
            let floor = newest_event
                .and_then(DateTime::from_timestamp_micros)
                .map_or(head.last_updated_at, |at| at.max(head.last_updated_at));

            let record = NewCarePointUpdate {
                updated_at: record.updated_at.max(floor),
                ..record
            };
            let update = insert_update_row(&tx, record)?;

            tx.execute(
                "update care_points set status = ?1, last_updated_at = ?2 where id = ?3",
                params![
                    update.status_after_update,
                    to_micros(update.updated_at),
                    update.care_point_id
                ],
            )
            .map_err(|e| StoreError::storage("advance care point head failed", e))?;

            tx.commit()
                .map_err(|e| StoreError::storage("commit tx failed", e))?;

            Ok(Some(update))
        })
    }

    fn count_care_point_updates(&self, care_point_id: i64) -> Result<usize, StoreError> {
        self.db.with_conn(|conn| {
            let n: i64 = conn
                .query_row(
                    "select count(*) from care_point_updates where care_point_id = ?",
                    params![care_point_id],
                    |r| r.get(0),
                )
                .map_err(|e| StoreError::storage("count care point updates failed", e))?;
            Ok(n as usize)
        })
    }
}
