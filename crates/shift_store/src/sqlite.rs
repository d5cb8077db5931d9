//! SQLite-backed shift store.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use entities::{Department, Shift, User};
use sqlx::{sqlite::SqlitePoolOptions, FromRow, Pool, Sqlite};
use uuid::Uuid;

use crate::{ShiftStore, StoreError, StoreResult};

/// SQL schema definition.
const SCHEMA_SQL: &str = r#"
-- Users table
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    color TEXT NOT NULL,
    department TEXT,
    employee_id TEXT,
    rank INTEGER
);

-- Departments table (name is the primary key; rank is the list position)
CREATE TABLE IF NOT EXISTS departments (
    name TEXT PRIMARY KEY NOT NULL,
    rank INTEGER NOT NULL
);

-- Shifts table (end_time IS NULL while a shift is open)
CREATE TABLE IF NOT EXISTS shifts (
    id TEXT PRIMARY KEY NOT NULL,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    start_time TEXT NOT NULL,
    end_time TEXT,
    note TEXT
);

-- Indexes for performance
CREATE INDEX IF NOT EXISTS idx_shifts_user ON shifts(user_id);
CREATE INDEX IF NOT EXISTS idx_shifts_start ON shifts(start_time);
"#;

/// Database row for a user.
#[derive(FromRow)]
struct UserRow {
    id: String,
    name: String,
    color: String,
    department: Option<String>,
    employee_id: Option<String>,
    rank: Option<i64>,
}

/// Database row for a shift.
#[derive(FromRow)]
struct ShiftRow {
    id: String,
    user_id: String,
    start_time: String,
    end_time: Option<String>,
    note: Option<String>,
}

fn parse_uuid(value: &str, entity: &'static str) -> StoreResult<Uuid> {
    value
        .parse()
        .map_err(|_| StoreError::Other(format!("invalid {entity} id: {value}")))
}

fn parse_timestamp(value: &str) -> StoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| StoreError::Other(format!("invalid timestamp {value}: {e}")))
}

impl UserRow {
    fn into_user(self) -> StoreResult<User> {
        Ok(User {
            id: parse_uuid(&self.id, "user")?,
            name: self.name,
            color: self.color,
            department: self.department,
            employee_id: self.employee_id,
            rank: self.rank,
        })
    }
}

impl ShiftRow {
    fn into_shift(self) -> StoreResult<Shift> {
        Ok(Shift {
            id: parse_uuid(&self.id, "shift")?,
            user_id: parse_uuid(&self.user_id, "user")?,
            start_time: parse_timestamp(&self.start_time)?,
            end_time: self.end_time.as_deref().map(parse_timestamp).transpose()?,
            note: self.note,
        })
    }
}

/// Relational shift store backed by SQLite.
pub struct SqliteStore {
    pool: Pool<Sqlite>,
}

impl SqliteStore {
    /// Opens (or creates) a database file and runs migrations.
    pub async fn new(db_path: &Path) -> StoreResult<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let db_url = format!("sqlite:{}?mode=rwc", db_path.display());
        Self::connect(&db_url).await
    }

    /// Connects to the given database URL and runs migrations.
    pub async fn connect(db_url: &str) -> StoreResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(db_url)
            .await?;

        sqlx::query(SCHEMA_SQL).execute(&pool).await?;
        tracing::info!(db_url = %db_url, "SQLite store ready");

        Ok(Self { pool })
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }
}

#[async_trait]
impl ShiftStore for SqliteStore {
    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let rows: Vec<UserRow> = sqlx::query_as(
            "SELECT id, name, color, department, employee_id, rank
             FROM users
             ORDER BY rank",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(UserRow::into_user).collect()
    }

    async fn save_user(&self, user: &User) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO users (id, name, color, department, employee_id, rank)
             VALUES (?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                 name = excluded.name,
                 color = excluded.color,
                 department = excluded.department,
                 employee_id = excluded.employee_id,
                 rank = excluded.rank",
        )
        .bind(user.id.to_string())
        .bind(&user.name)
        .bind(&user.color)
        .bind(&user.department)
        .bind(&user.employee_id)
        .bind(user.rank)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_user(&self, user_id: Uuid) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        // Explicit cascade: FK enforcement is off by default in SQLite.
        sqlx::query("DELETE FROM shifts WHERE user_id = ?")
            .bind(user_id.to_string())
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(user_id.to_string())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn list_departments(&self) -> StoreResult<Vec<String>> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT name FROM departments ORDER BY rank ASC")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(|(name,)| name).collect())
    }

    async fn save_departments(&self, departments: &[String]) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        for (position, name) in departments.iter().enumerate() {
            let row = Department::new(name.clone(), position as i64);
            sqlx::query(
                "INSERT INTO departments (name, rank) VALUES (?, ?)
                 ON CONFLICT(name) DO UPDATE SET rank = excluded.rank",
            )
            .bind(&row.name)
            .bind(row.rank)
            .execute(&mut *tx)
            .await?;
        }

        // Replace semantics: prune rows absent from the new list.
        if departments.is_empty() {
            sqlx::query("DELETE FROM departments").execute(&mut *tx).await?;
        } else {
            let placeholders = vec!["?"; departments.len()].join(", ");
            let sql = format!("DELETE FROM departments WHERE name NOT IN ({placeholders})");
            let mut query = sqlx::query(&sql);
            for name in departments {
                query = query.bind(name);
            }
            query.execute(&mut *tx).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn delete_department(&self, name: &str) -> StoreResult<()> {
        sqlx::query("DELETE FROM departments WHERE name = ?")
            .bind(name)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_shifts(&self, user_id: Uuid) -> StoreResult<Vec<Shift>> {
        let rows: Vec<ShiftRow> = sqlx::query_as(
            "SELECT id, user_id, start_time, end_time, note
             FROM shifts
             WHERE user_id = ?
             ORDER BY start_time DESC",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ShiftRow::into_shift).collect()
    }

    async fn list_active_shifts(&self) -> StoreResult<HashMap<Uuid, Shift>> {
        let rows: Vec<ShiftRow> = sqlx::query_as(
            "SELECT id, user_id, start_time, end_time, note
             FROM shifts
             WHERE end_time IS NULL",
        )
        .fetch_all(&self.pool)
        .await?;

        let now = Utc::now();
        let mut map = HashMap::new();
        for row in rows {
            let shift = row.into_shift()?;
            // Stale open shifts (a forgotten clock-out from a previous day)
            // stay out of the active view.
            if shift.started_same_day(now) {
                map.insert(shift.user_id, shift);
            }
        }
        Ok(map)
    }

    async fn start_shift(&self, shift: &Shift) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO shifts (id, user_id, start_time, end_time, note)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET end_time = excluded.end_time, note = excluded.note",
        )
        .bind(shift.id.to_string())
        .bind(shift.user_id.to_string())
        .bind(shift.start_time.to_rfc3339())
        .bind(shift.end_time.map(|t| t.to_rfc3339()))
        .bind(&shift.note)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn resume_shift(&self, _user_id: Uuid, shift_id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("UPDATE shifts SET end_time = NULL WHERE id = ?")
            .bind(shift_id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Shift", shift_id.to_string()));
        }
        Ok(())
    }

    async fn end_shift(&self, shift: &Shift) -> StoreResult<()> {
        let result = sqlx::query("UPDATE shifts SET end_time = ?, note = ? WHERE id = ?")
            .bind(shift.end_time.map(|t| t.to_rfc3339()))
            .bind(&shift.note)
            .bind(shift.id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Shift", shift.id.to_string()));
        }
        Ok(())
    }

    async fn delete_shift(&self, _user_id: Uuid, shift_id: Uuid) -> StoreResult<()> {
        sqlx::query("DELETE FROM shifts WHERE id = ?")
            .bind(shift_id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_store() -> SqliteStore {
        // A single connection keeps the in-memory database alive across
        // queries.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::query(SCHEMA_SQL).execute(&pool).await.unwrap();
        SqliteStore { pool }
    }

    #[tokio::test]
    async fn test_user_roundtrip() {
        let store = memory_store().await;

        let user = User::new("Alice").with_department("Radiology").with_rank(1);
        store.save_user(&user).await.unwrap();

        let users = store.list_users().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].id, user.id);
        assert_eq!(users[0].department.as_deref(), Some("Radiology"));
        assert_eq!(users[0].rank, Some(1));
    }

    #[tokio::test]
    async fn test_save_user_is_upsert() {
        let store = memory_store().await;

        let mut user = User::new("Alice");
        store.save_user(&user).await.unwrap();
        user.name = "Alice B".to_string();
        store.save_user(&user).await.unwrap();

        let users = store.list_users().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].name, "Alice B");
    }

    #[tokio::test]
    async fn test_delete_user_cascades_shifts() {
        let store = memory_store().await;

        let user = User::new("Alice");
        store.save_user(&user).await.unwrap();
        store
            .start_shift(&Shift::new(user.id, Utc::now()))
            .await
            .unwrap();

        store.delete_user(user.id).await.unwrap();
        assert!(store.list_users().await.unwrap().is_empty());
        assert!(store.list_shifts(user.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_departments_replaces() {
        let store = memory_store().await;

        let initial = vec!["Radiology".to_string(), "Cardiology".to_string()];
        store.save_departments(&initial).await.unwrap();

        let reordered = vec!["Cardiology".to_string(), "Radiology".to_string()];
        store.save_departments(&reordered).await.unwrap();
        assert_eq!(store.list_departments().await.unwrap(), reordered);

        // Dropping a name from the list prunes its row.
        let pruned = vec!["Cardiology".to_string()];
        store.save_departments(&pruned).await.unwrap();
        assert_eq!(store.list_departments().await.unwrap(), pruned);
    }

    #[tokio::test]
    async fn test_shift_lifecycle_roundtrip() {
        let store = memory_store().await;
        let user = User::new("Alice");
        store.save_user(&user).await.unwrap();

        let now = Utc::now();
        let mut shift = Shift::new(user.id, now);
        store.start_shift(&shift).await.unwrap();

        let active = store.list_active_shifts().await.unwrap();
        assert_eq!(active.get(&user.id).map(|s| s.id), Some(shift.id));

        shift.end_time = Some(now);
        store.end_shift(&shift).await.unwrap();
        assert!(store.list_active_shifts().await.unwrap().is_empty());

        store.resume_shift(user.id, shift.id).await.unwrap();
        let shifts = store.list_shifts(user.id).await.unwrap();
        assert_eq!(shifts.len(), 1);
        assert!(shifts[0].is_open());
    }

    #[tokio::test]
    async fn test_start_shift_twice_is_idempotent() {
        let store = memory_store().await;
        let user = User::new("Alice");
        store.save_user(&user).await.unwrap();

        let shift = Shift::new(user.id, Utc::now());
        store.start_shift(&shift).await.unwrap();
        store.start_shift(&shift).await.unwrap();

        assert_eq!(store.list_shifts(user.id).await.unwrap().len(), 1);
    }
}
