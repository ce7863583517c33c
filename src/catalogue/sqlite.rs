use async_trait::async_trait;
use rusqlite::{OptionalExtension, params};
use tracing::debug;

use super::DescriptorCatalogue;
use super::types::Descriptor;
use crate::storage::{Database, Schema, StoreError};

/// Catalogue backed by the `disciplines` and `descriptors` tables.
#[derive(Debug, Clone)]
pub struct SqliteCatalogue {
    db: Database,
}

impl SqliteCatalogue {
    pub fn new(db: Database) -> Self {
        debug_assert_eq!(db.schema(), Schema::Catalogue);
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Returns the id of `name`, creating the discipline if needed.
    pub async fn ensure_discipline(&self, name: &str) -> Result<i64, StoreError> {
        let name = name.to_string();
        self.db
            .call(move |conn| {
                let existing: Option<i64> = conn
                    .query_row(
                        "SELECT id FROM disciplines WHERE name = ?1",
                        params![name],
                        |row| row.get(0),
                    )
                    .optional()?;
                if let Some(id) = existing {
                    return Ok(id);
                }
                conn.execute("INSERT INTO disciplines (name) VALUES (?1)", params![name])?;
                Ok(conn.last_insert_rowid())
            })
            .await
    }

    /// Inserts a descriptor row (seeding and tests; the matcher never writes).
    pub async fn insert_descriptor(
        &self,
        discipline: &str,
        dimension: &str,
        process_verb: &str,
        level: &str,
        text: &str,
    ) -> Result<i64, StoreError> {
        let discipline_id = self.ensure_discipline(discipline).await?;
        let (dimension, process_verb, level, text) = (
            dimension.to_string(),
            process_verb.to_string(),
            level.to_string(),
            text.to_string(),
        );
        self.db
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO descriptors (discipline_id, dimension, process_verb, level, text)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![discipline_id, dimension, process_verb, level, text],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await
    }
}

#[async_trait]
impl DescriptorCatalogue for SqliteCatalogue {
    async fn descriptors_for(&self, discipline: &str) -> Result<Vec<Descriptor>, StoreError> {
        let discipline = discipline.to_string();
        let rows = self
            .db
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT d.id, a.name, d.dimension, d.process_verb, d.level, d.text
                     FROM descriptors d
                     JOIN disciplines a ON d.discipline_id = a.id
                     WHERE a.name = ?1",
                )?;
                let rows = stmt
                    .query_map(params![discipline], |row| {
                        Ok(Descriptor {
                            id: row.get(0)?,
                            discipline: row.get(1)?,
                            dimension: row.get(2)?,
                            process_verb: row.get(3)?,
                            level: row.get(4)?,
                            text: row.get(5)?,
                        })
                    })?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await?;

        debug!(count = rows.len(), "Loaded descriptors");
        Ok(rows)
    }

    async fn disciplines(&self) -> Result<Vec<String>, StoreError> {
        self.db
            .call(|conn| {
                let mut stmt = conn.prepare("SELECT DISTINCT name FROM disciplines ORDER BY name")?;
                let names = stmt
                    .query_map([], |row| row.get(0))?
                    .collect::<Result<Vec<String>, _>>()?;
                Ok(names)
            })
            .await
    }

    async fn dimensions(&self) -> Result<Vec<String>, StoreError> {
        self.db
            .call(|conn| {
                let mut stmt =
                    conn.prepare("SELECT DISTINCT dimension FROM descriptors ORDER BY dimension")?;
                let names = stmt
                    .query_map([], |row| row.get(0))?
                    .collect::<Result<Vec<String>, _>>()?;
                Ok(names)
            })
            .await
    }
}
