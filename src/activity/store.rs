use rusqlite::{Connection, Row, params};
use serde_json::Value;
use tracing::{instrument, warn};

use super::types::{Activity, ActivityDashboard, ActivityKind, DailyCount, TypeCount};
use crate::constants::{CONVERSATION_LIMIT, DAILY_ACTIVITY_DAYS, RECENT_ACTIVITY_LIMIT};
use crate::storage::{Database, Schema, StoreError, now_timestamp};

const ACTIVITY_COLUMNS: &str = "id, user_id, user_name, activity_type, details, timestamp";

#[derive(Debug, Clone)]
pub struct ActivityLog {
    db: Database,
}

impl ActivityLog {
    pub fn new(db: Database) -> Self {
        debug_assert_eq!(db.schema(), Schema::Admin);
        Self { db }
    }

    /// Appends an entry. Failures are logged and never reach the caller.
    #[instrument(skip(self, details), fields(kind = %kind))]
    pub async fn record(
        &self,
        user_id: Option<i64>,
        user_name: &str,
        kind: ActivityKind,
        details: Option<Value>,
    ) {
        if let Err(e) = self.try_record(user_id, user_name, kind, details).await {
            warn!(error = %e, "Failed to record activity");
        }
    }

    async fn try_record(
        &self,
        user_id: Option<i64>,
        user_name: &str,
        kind: ActivityKind,
        details: Option<Value>,
    ) -> Result<(), StoreError> {
        let details = details
            .filter(|d| !d.is_null())
            .map(|d| serde_json::to_string(&d))
            .transpose()?;
        let user_name = user_name.to_string();
        let timestamp = now_timestamp();
        self.db
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO activities (user_id, user_name, activity_type, details, timestamp)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![user_id, user_name, kind.as_str(), details, timestamp],
                )?;
                Ok(())
            })
            .await
    }

    pub async fn dashboard(&self) -> Result<ActivityDashboard, StoreError> {
        self.db
            .call(|conn| {
                let conversation_stats = type_counts(
                    conn,
                    "SELECT activity_type, COUNT(*) FROM activities
                     WHERE activity_type IN ('chatbot_query', 'get_suggestions')
                     GROUP BY activity_type ORDER BY activity_type",
                )?;
                let activity_stats = type_counts(
                    conn,
                    "SELECT activity_type, COUNT(*) FROM activities
                     GROUP BY activity_type ORDER BY activity_type",
                )?;

                let mut stmt = conn.prepare(&format!(
                    "SELECT {ACTIVITY_COLUMNS} FROM activities
                     ORDER BY timestamp DESC, id DESC LIMIT ?1"
                ))?;
                let recent_activities = stmt
                    .query_map(params![RECENT_ACTIVITY_LIMIT], activity_from_row)?
                    .collect::<Result<Vec<_>, _>>()?;

                let mut stmt = conn.prepare(
                    "SELECT strftime('%Y-%m-%d', timestamp) AS day, COUNT(*) FROM activities
                     GROUP BY day ORDER BY day DESC LIMIT ?1",
                )?;
                let daily_activities = stmt
                    .query_map(params![DAILY_ACTIVITY_DAYS], |r| {
                        Ok(DailyCount {
                            day: r.get(0)?,
                            count: r.get(1)?,
                        })
                    })?
                    .collect::<Result<Vec<_>, _>>()?;

                Ok(ActivityDashboard {
                    conversation_stats,
                    activity_stats,
                    recent_activities,
                    daily_activities,
                })
            })
            .await
    }

    /// Most recent chatbot queries.
    pub async fn conversations(&self) -> Result<Vec<Activity>, StoreError> {
        self.db
            .call(|conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {ACTIVITY_COLUMNS} FROM activities
                     WHERE activity_type = ?1
                     ORDER BY timestamp DESC, id DESC LIMIT ?2"
                ))?;
                let rows = stmt
                    .query_map(
                        params![ActivityKind::ChatbotQuery.as_str(), CONVERSATION_LIMIT],
                        activity_from_row,
                    )?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await
    }
}

fn type_counts(conn: &Connection, sql: &str) -> Result<Vec<TypeCount>, StoreError> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([], |r| {
            Ok(TypeCount {
                activity_type: r.get(0)?,
                count: r.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn activity_from_row(row: &Row<'_>) -> rusqlite::Result<Activity> {
    let details: Option<String> = row.get(4)?;
    Ok(Activity {
        id: row.get(0)?,
        user_id: row.get(1)?,
        user_name: row.get(2)?,
        activity_type: row.get(3)?,
        details: details.map(|raw| serde_json::from_str(&raw).unwrap_or(Value::String(raw))),
        timestamp: row.get(5)?,
    })
}
