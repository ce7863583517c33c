use rusqlite::{OptionalExtension, Row, params, params_from_iter};
use tracing::{debug, instrument};

use super::types::{NewObservation, Observation, ObservationDetails, ObservationFilter};
use crate::storage::{Database, Schema, StoreError, now_timestamp};

const OBSERVATION_COLUMNS: &str = "o.id, o.student, o.class_name, o.discipline, o.situation, \
     o.observation, o.dimension, o.process, o.level, o.descriptor_id, o.created_at";

/// Observation persistence over the catalogue database.
#[derive(Debug, Clone)]
pub struct ObservationStore {
    db: Database,
}

impl ObservationStore {
    pub fn new(db: Database) -> Self {
        debug_assert_eq!(db.schema(), Schema::Catalogue);
        Self { db }
    }

    /// Stores `new` with the current timestamp and returns its id.
    #[instrument(skip(self, new))]
    pub async fn save(&self, new: NewObservation) -> Result<i64, StoreError> {
        let created_at = now_timestamp();
        let id = self
            .db
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO observations (
                         student, class_name, discipline, situation, observation,
                         dimension, process, level, descriptor_id, created_at
                     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                    params![
                        new.student,
                        new.class_name,
                        new.discipline,
                        new.situation,
                        new.observation,
                        new.dimension,
                        new.process,
                        new.level,
                        new.descriptor_id,
                        created_at,
                    ],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await?;
        debug!(id, "Observation saved");
        Ok(id)
    }

    /// Observations matching `filter`, newest first.
    pub async fn search(&self, filter: &ObservationFilter) -> Result<Vec<Observation>, StoreError> {
        let mut sql = format!("SELECT {OBSERVATION_COLUMNS} FROM observations o WHERE 1=1");
        let mut args: Vec<String> = Vec::new();

        if !filter.student.is_empty() {
            sql.push_str(" AND o.student LIKE ?");
            args.push(format!("%{}%", filter.student));
        }
        if !filter.class_name.is_empty() {
            sql.push_str(" AND o.class_name LIKE ?");
            args.push(format!("%{}%", filter.class_name));
        }
        if !filter.discipline.is_empty() {
            sql.push_str(" AND o.discipline = ?");
            args.push(filter.discipline.clone());
        }
        if !filter.dimension.is_empty() {
            sql.push_str(" AND o.dimension = ?");
            args.push(filter.dimension.clone());
        }
        sql.push_str(" ORDER BY o.created_at DESC, o.id DESC");

        self.db
            .call(move |conn| {
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt
                    .query_map(params_from_iter(args.iter()), observation_from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await
    }

    /// Observation `id` with its descriptor text, or `None` if it does not exist.
    pub async fn details(&self, id: i64) -> Result<Option<ObservationDetails>, StoreError> {
        self.db
            .call(move |conn| {
                let sql = format!(
                    "SELECT {OBSERVATION_COLUMNS}, d.text
                     FROM observations o
                     LEFT JOIN descriptors d ON o.descriptor_id = d.id
                     WHERE o.id = ?1"
                );
                let details = conn
                    .query_row(&sql, params![id], |row| {
                        Ok(ObservationDetails {
                            observation: observation_from_row(row)?,
                            descriptor_text: row.get(11)?,
                        })
                    })
                    .optional()?;
                Ok(details)
            })
            .await
    }
}

fn observation_from_row(row: &Row<'_>) -> rusqlite::Result<Observation> {
    Ok(Observation {
        id: row.get(0)?,
        student: row.get(1)?,
        class_name: row.get(2)?,
        discipline: row.get(3)?,
        situation: row.get(4)?,
        observation: row.get(5)?,
        dimension: row.get(6)?,
        process: row.get(7)?,
        level: row.get(8)?,
        descriptor_id: row.get(9)?,
        created_at: row.get(10)?,
    })
}
