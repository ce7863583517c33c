use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, Row, params, params_from_iter};
use tracing::{debug, info, instrument};

use super::error::AccountError;
use super::types::{NewUser, Role, RoleCounts, Status, User, UserUpdate};
use crate::hashing::{hash_password, new_salt, verify_password};
use crate::storage::{Database, Schema, StoreError, now_timestamp};

const USER_COLUMNS: &str = "id, name, email, role, status, created_at";

/// User management over the admin database.
#[derive(Debug, Clone)]
pub struct UserStore {
    db: Database,
}

impl UserStore {
    pub fn new(db: Database) -> Self {
        debug_assert_eq!(db.schema(), Schema::Admin);
        Self { db }
    }

    /// Returns the user for valid credentials. Unknown emails, wrong passwords
    /// and inactive accounts all yield `None`.
    #[instrument(skip(self, password))]
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Option<User>, AccountError> {
        let email = email.to_string();
        let password = password.to_string();
        let user = self
            .db
            .call(move |conn| {
                let row = conn
                    .query_row(
                        &format!(
                            "SELECT {USER_COLUMNS}, password_salt, password_hash
                             FROM users WHERE email = ?1"
                        ),
                        params![email],
                        |row| {
                            Ok((
                                user_from_row(row)?,
                                row.get::<_, String>(6)?,
                                row.get::<_, String>(7)?,
                            ))
                        },
                    )
                    .optional()?;
                Ok(row.and_then(|(user, salt, hash)| {
                    (user.status == Status::Active && verify_password(&salt, &password, &hash))
                        .then_some(user)
                }))
            })
            .await?;

        debug!(accepted = user.is_some(), "Authentication attempt");
        Ok(user)
    }

    pub async fn find(&self, id: i64) -> Result<Option<User>, AccountError> {
        Ok(self
            .db
            .call(move |conn| {
                Ok(conn
                    .query_row(
                        &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
                        params![id],
                        user_from_row,
                    )
                    .optional()?)
            })
            .await?)
    }

    /// Creates a user and returns its id. Role defaults to teacher and status to
    /// active.
    #[instrument(skip(self, new), fields(email = %new.email))]
    pub async fn create(&self, new: NewUser) -> Result<i64, AccountError> {
        if new.name.trim().is_empty() {
            return Err(AccountError::MissingField("name"));
        }
        if new.email.trim().is_empty() {
            return Err(AccountError::MissingField("email"));
        }
        if new.password.is_empty() {
            return Err(AccountError::MissingField("password"));
        }

        let salt = new_salt();
        let hash = hash_password(&salt, &new.password);
        let role = new.role.unwrap_or_default();
        let status = new.status.unwrap_or_default();
        let created_at = now_timestamp();

        let id = self
            .db
            .call(move |conn| {
                if email_taken(conn, &new.email, None)? {
                    return Ok(None);
                }
                conn.execute(
                    "INSERT INTO users (name, email, password_salt, password_hash, role, status, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                    params![new.name, new.email, salt, hash, role, status, created_at],
                )?;
                Ok(Some(conn.last_insert_rowid()))
            })
            .await
            .map_err(AccountError::from_store)?
            .ok_or(AccountError::DuplicateEmail)?;

        info!(id, role = role.as_str(), "User created");
        Ok(id)
    }

    /// Applies a partial update and returns the names of the changed fields.
    /// The last active administrator cannot be demoted or deactivated.
    #[instrument(skip(self, update), fields(id = ?update.id))]
    pub async fn update(&self, update: UserUpdate) -> Result<Vec<&'static str>, AccountError> {
        let id = update.id.ok_or(AccountError::MissingId)?;
        let fields = update.fields();
        if fields.is_empty() {
            return Err(AccountError::NothingToUpdate);
        }

        let mut assignments: Vec<&str> = Vec::new();
        let mut values: Vec<Value> = Vec::new();
        if let Some(name) = update.name {
            assignments.push("name = ?");
            values.push(Value::Text(name));
        }
        if let Some(email) = &update.email {
            assignments.push("email = ?");
            values.push(Value::Text(email.clone()));
        }
        if let Some(password) = update.password.filter(|p| !p.is_empty()) {
            let salt = new_salt();
            let hash = hash_password(&salt, &password);
            assignments.push("password_salt = ?");
            values.push(Value::Text(salt));
            assignments.push("password_hash = ?");
            values.push(Value::Text(hash));
        }
        if let Some(role) = update.role {
            assignments.push("role = ?");
            values.push(Value::Text(role.as_str().to_string()));
        }
        if let Some(status) = update.status {
            assignments.push("status = ?");
            values.push(Value::Text(status.as_str().to_string()));
        }
        values.push(Value::Integer(id));

        enum Outcome {
            Updated,
            Missing,
            DuplicateEmail,
            LastAdmin,
        }

        let sql = format!("UPDATE users SET {} WHERE id = ?", assignments.join(", "));
        let email = update.email;
        let demotes = update.role.is_some_and(|r| r != Role::Admin)
            || update.status == Some(Status::Inactive);
        let outcome = self
            .db
            .call(move |conn| {
                let tx = conn.transaction()?;
                let current: Option<(Role, Status)> = tx
                    .query_row(
                        "SELECT role, status FROM users WHERE id = ?1",
                        params![id],
                        |r| Ok((r.get(0)?, r.get(1)?)),
                    )
                    .optional()?;
                let Some((role, status)) = current else {
                    return Ok(Outcome::Missing);
                };
                if let Some(email) = &email
                    && email_taken(&tx, email, Some(id))?
                {
                    return Ok(Outcome::DuplicateEmail);
                }
                if demotes && role == Role::Admin && status == Status::Active {
                    let active_admins: i64 = tx.query_row(
                        "SELECT COUNT(*) FROM users WHERE role = 'admin' AND status = 'active'",
                        [],
                        |r| r.get(0),
                    )?;
                    if active_admins <= 1 {
                        return Ok(Outcome::LastAdmin);
                    }
                }
                tx.execute(&sql, params_from_iter(values.iter()))?;
                tx.commit()?;
                Ok(Outcome::Updated)
            })
            .await
            .map_err(AccountError::from_store)?;

        match outcome {
            Outcome::Updated => {}
            Outcome::Missing => return Err(AccountError::NotFound(id)),
            Outcome::DuplicateEmail => return Err(AccountError::DuplicateEmail),
            Outcome::LastAdmin => return Err(AccountError::LastAdmin),
        }
        info!(id, ?fields, "User updated");
        Ok(fields)
    }

    /// Deletes user `id`. The last remaining administrator cannot be deleted.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), AccountError> {
        enum Outcome {
            Deleted,
            Missing,
            LastAdmin,
        }

        let outcome = self
            .db
            .call(move |conn| {
                let tx = conn.transaction()?;
                let role: Option<Role> = tx
                    .query_row("SELECT role FROM users WHERE id = ?1", params![id], |r| {
                        r.get(0)
                    })
                    .optional()?;
                let Some(role) = role else {
                    return Ok(Outcome::Missing);
                };
                if role == Role::Admin {
                    let admins: i64 = tx.query_row(
                        "SELECT COUNT(*) FROM users WHERE role = 'admin'",
                        [],
                        |r| r.get(0),
                    )?;
                    if admins <= 1 {
                        return Ok(Outcome::LastAdmin);
                    }
                }
                tx.execute("DELETE FROM users WHERE id = ?1", params![id])?;
                tx.commit()?;
                Ok(Outcome::Deleted)
            })
            .await?;

        match outcome {
            Outcome::Deleted => {
                info!(id, "User deleted");
                Ok(())
            }
            Outcome::Missing => Err(AccountError::NotFound(id)),
            Outcome::LastAdmin => Err(AccountError::LastAdmin),
        }
    }

    /// All users ordered by id.
    pub async fn list(&self) -> Result<Vec<User>, AccountError> {
        Ok(self
            .db
            .call(|conn| {
                let mut stmt =
                    conn.prepare(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"))?;
                let users = stmt
                    .query_map([], user_from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(users)
            })
            .await?)
    }

    pub async fn role_counts(&self) -> Result<RoleCounts, AccountError> {
        Ok(self
            .db
            .call(|conn| {
                Ok(conn.query_row(
                    "SELECT COUNT(*),
                            COALESCE(SUM(role = 'teacher'), 0),
                            COALESCE(SUM(role = 'coordinator'), 0),
                            COALESCE(SUM(role = 'admin'), 0)
                     FROM users",
                    [],
                    |r| {
                        Ok(RoleCounts {
                            total_users: r.get(0)?,
                            teachers: r.get(1)?,
                            coordinators: r.get(2)?,
                            admins: r.get(3)?,
                        })
                    },
                )?)
            })
            .await?)
    }

    /// Creates an administrator when the users table is empty. Returns whether
    /// an account was created.
    pub async fn ensure_admin(&self, email: &str, password: &str) -> Result<bool, AccountError> {
        let empty = self
            .db
            .call(|conn| {
                let n: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |r| r.get(0))?;
                Ok(n == 0)
            })
            .await?;
        if !empty {
            return Ok(false);
        }

        self.create(NewUser {
            name: "Administrator".to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role: Some(Role::Admin),
            status: Some(Status::Active),
        })
        .await?;
        Ok(true)
    }
}

fn email_taken(conn: &Connection, email: &str, except: Option<i64>) -> Result<bool, StoreError> {
    let n: i64 = conn.query_row(
        "SELECT COUNT(*) FROM users WHERE email = ?1 AND id != ?2",
        params![email, except.unwrap_or(-1)],
        |r| r.get(0),
    )?;
    Ok(n > 0)
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        role: row.get(3)?,
        status: row.get(4)?,
        created_at: row.get(5)?,
    })
}
