//! Database layer for tasks and task log entries using `SQLite` via `SQLx`.
//!
//! Every mutation that touches a log entry adjusts the owning task's
//! `secs_spent` inside the same transaction, so a task's total always equals
//! the sum of its closed entries. At most one entry may be open at a time;
//! the schema enforces this with a trigger and a partial unique index.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqliteConnection, SqlitePool};
use time::OffsetDateTime;
use tracing::debug;

use crate::domain::clock::Clock;
use crate::domain::task::{ActiveTaskDetails, Task, TaskLogEntry, TaskReportEntry, TaskStatus};
use crate::domain::timestamp::secs_between;
use crate::infra::migration;

/// Default database filename, created in the user's home directory.
pub const DB_FILE: &str = "hours.db";

/// All commands share one connection; `SQLite` serializes writers anyway.
pub const DB_POOL_MAX_CONNECTIONS: u32 = 1;

/// Message raised by the trigger guarding against a second open entry.
const ACTIVE_ENTRY_GUARD_MESSAGE: &str = "Only one active task log entry is allowed";

/// Kind of row a [`DbError::NotFound`] refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Entity {
    Task,
    TaskLogEntry,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Task => f.write_str("task"),
            Self::TaskLogEntry => f.write_str("task log entry"),
        }
    }
}

/// Errors returned by [`Database`] operations.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("{entity} not found")]
    NotFound { entity: Entity },
    #[error("a task is already being tracked")]
    AlreadyTracking,
    #[error("no task is being actively tracked")]
    NoTaskActive,
    #[error("task log entry changed since it was loaded; reload and try again")]
    StaleEntry,
    #[error(
        "database schema version {found} is newer than version {supported} supported by this \
         build of hours"
    )]
    SchemaTooNew { found: i64, supported: i64 },
    #[error("failed to create database directory: {0}")]
    CreateDir(#[source] std::io::Error),
    #[error("failed to {action}: {source}")]
    Query {
        action: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

impl DbError {
    /// Builds a mapper that wraps a `sqlx` error with the attempted action.
    pub fn query(action: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| Self::Query { action, source }
    }

    /// Returns whether the error reports a missing row.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns whether the caller acted on an outdated copy of a row and
    /// should reload before retrying.
    pub fn is_stale(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::StaleEntry)
    }

    /// Returns whether the error comes from the storage engine itself rather
    /// than from an expected domain condition.
    pub fn is_storage_failure(&self) -> bool {
        matches!(
            self,
            Self::Query { .. } | Self::CreateDir(_) | Self::SchemaTooNew { .. }
        )
    }

    fn not_found(entity: Entity) -> Self {
        Self::NotFound { entity }
    }
}

/// Outcome of closing the open entry and opening another one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwitchOutcome {
    pub finished_entry_id: i64,
    pub new_entry_id: i64,
    pub previous_task_id: i64,
    pub secs_spent: i64,
}

/// Outcome of finishing the open entry at a given instant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FinishedEntry {
    pub entry_id: i64,
    pub secs_spent: i64,
    pub task_id: i64,
    pub task_summary: String,
}

/// Thin wrapper around a `SQLite` connection pool providing query methods.
#[derive(Clone)]
pub struct Database {
    clock: Arc<dyn Clock>,
    pool: SqlitePool,
}

impl Database {
    /// Opens the `SQLite` database and runs embedded migrations.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created, the database cannot
    /// be opened, or migrations fail.
    pub async fn open(db_path: &Path, clock: Arc<dyn Clock>) -> Result<Self, DbError> {
        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(DbError::CreateDir)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true);

        Self::connect(options, clock).await
    }

    /// Opens a private in-memory database with the schema applied.
    #[cfg(test)]
    pub(crate) async fn open_in_memory(clock: Arc<dyn Clock>) -> Result<Self, DbError> {
        let options = SqliteConnectOptions::new()
            .filename(":memory:")
            .foreign_keys(true);

        Self::connect(options, clock).await
    }

    async fn connect(options: SqliteConnectOptions, clock: Arc<dyn Clock>) -> Result<Self, DbError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(DB_POOL_MAX_CONNECTIONS)
            .connect_with(options)
            .await
            .map_err(DbError::query("connect to database"))?;

        migration::run(&pool, clock.now().unix_timestamp()).await?;

        Ok(Self { clock, pool })
    }

    /// Creates an active task with no time logged.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub async fn create_task(&self, summary: &str) -> Result<Task, DbError> {
        let now = self.now();
        let id = sqlx::query(
            r"
INSERT INTO task (summary, secs_spent, active, created_at, updated_at)
VALUES (?, 0, 1, ?, ?)
            ",
        )
        .bind(summary)
        .bind(now.unix_timestamp())
        .bind(now.unix_timestamp())
        .execute(&self.pool)
        .await
        .map_err(DbError::query("insert task"))?
        .last_insert_rowid();

        debug!(task_id = id, "created task");

        Ok(Task {
            active: true,
            created_at: now,
            id,
            secs_spent: 0,
            summary: summary.to_string(),
            updated_at: now,
        })
    }

    /// Replaces a task's summary.
    ///
    /// # Errors
    /// Returns [`DbError::NotFound`] if the task does not exist.
    pub async fn update_task_summary(&self, task_id: i64, summary: &str) -> Result<(), DbError> {
        let result = sqlx::query(
            r"
UPDATE task
SET summary = ?, updated_at = ?
WHERE id = ?
            ",
        )
        .bind(summary)
        .bind(self.now().unix_timestamp())
        .bind(task_id)
        .execute(&self.pool)
        .await
        .map_err(DbError::query("update task summary"))?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(Entity::Task));
        }

        Ok(())
    }

    /// Marks a task active or inactive.
    ///
    /// # Errors
    /// Returns [`DbError::NotFound`] if the task does not exist.
    pub async fn set_task_active(&self, task_id: i64, active: bool) -> Result<(), DbError> {
        let result = sqlx::query(
            r"
UPDATE task
SET active = ?, updated_at = ?
WHERE id = ?
            ",
        )
        .bind(i64::from(active))
        .bind(self.now().unix_timestamp())
        .bind(task_id)
        .execute(&self.pool)
        .await
        .map_err(DbError::query("update task status"))?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(Entity::Task));
        }

        Ok(())
    }

    /// Deactivates every active task without activity since `cutoff`.
    ///
    /// A task is kept when it owns the open entry or any entry that began or
    /// ended at or after `cutoff`. Returns the number of tasks deactivated.
    ///
    /// # Errors
    /// Returns an error if the update fails.
    pub async fn archive_stale_tasks(&self, cutoff: OffsetDateTime) -> Result<u64, DbError> {
        let mut transaction = self.begin().await?;
        let cutoff = cutoff.unix_timestamp();

        let archived = sqlx::query(
            r"
UPDATE task
SET active = 0, updated_at = ?
WHERE active = 1
  AND id NOT IN (
      SELECT task_id
      FROM task_log
      WHERE active = 1
         OR begin_ts >= ?
         OR end_ts >= ?
  )
            ",
        )
        .bind(self.now().unix_timestamp())
        .bind(cutoff)
        .bind(cutoff)
        .execute(&mut *transaction)
        .await
        .map_err(DbError::query("archive stale tasks"))?
        .rows_affected();

        transaction
            .commit()
            .await
            .map_err(DbError::query("commit archive"))?;

        debug!(archived, "archived stale tasks");

        Ok(archived)
    }

    /// Opens a new entry for `task_id` beginning at `begin`.
    ///
    /// Returns the new entry's identifier.
    ///
    /// # Errors
    /// Returns [`DbError::AlreadyTracking`] if an entry is already open and
    /// [`DbError::NotFound`] if the task does not exist.
    pub async fn start_tracking(&self, task_id: i64, begin: OffsetDateTime) -> Result<i64, DbError> {
        let mut transaction = self.begin().await?;

        ensure_task_exists(&mut transaction, task_id).await?;
        if fetch_open_entry(&mut transaction).await?.is_some() {
            return Err(DbError::AlreadyTracking);
        }
        let entry_id = insert_open_entry(&mut transaction, task_id, begin).await?;

        transaction
            .commit()
            .await
            .map_err(DbError::query("commit start tracking"))?;

        debug!(task_id, entry_id, "started tracking");

        Ok(entry_id)
    }

    /// Closes the open entry `entry_id` owned by `task_id`.
    ///
    /// Returns the seconds added to the task's total.
    ///
    /// # Errors
    /// Returns [`DbError::NotFound`] if the open entry or the task is missing.
    pub async fn finish_tracking(
        &self,
        entry_id: i64,
        task_id: i64,
        begin: OffsetDateTime,
        end: OffsetDateTime,
        comment: Option<&str>,
    ) -> Result<i64, DbError> {
        let mut transaction = self.begin().await?;
        let secs_spent = close_open_entry(
            &mut transaction,
            entry_id,
            task_id,
            begin,
            end,
            comment,
            self.now(),
        )
        .await?;

        transaction
            .commit()
            .await
            .map_err(DbError::query("commit finish tracking"))?;

        debug!(task_id, entry_id, secs_spent, "finished tracking");

        Ok(secs_spent)
    }

    /// Closes whatever entry is open at `end`, keeping its begin and comment.
    ///
    /// # Errors
    /// Returns [`DbError::NoTaskActive`] if nothing is open.
    pub async fn stop_tracking(&self, end: OffsetDateTime) -> Result<FinishedEntry, DbError> {
        let mut transaction = self.begin().await?;
        let open_entry = fetch_open_entry(&mut transaction)
            .await?
            .ok_or(DbError::NoTaskActive)?;
        let secs_spent = close_open_entry(
            &mut transaction,
            open_entry.entry_id,
            open_entry.task_id,
            self.to_local(open_entry.begin_ts),
            end,
            open_entry.comment.as_deref(),
            self.now(),
        )
        .await?;
        let task_summary = fetch_task_summary(&mut transaction, open_entry.task_id).await?;

        transaction
            .commit()
            .await
            .map_err(DbError::query("commit stop tracking"))?;

        Ok(FinishedEntry {
            entry_id: open_entry.entry_id,
            secs_spent,
            task_id: open_entry.task_id,
            task_summary,
        })
    }

    /// Updates the begin timestamp and comment of the open entry.
    ///
    /// # Errors
    /// Returns [`DbError::NoTaskActive`] if nothing is open.
    pub async fn edit_open_entry(
        &self,
        begin: OffsetDateTime,
        comment: Option<&str>,
    ) -> Result<(), DbError> {
        let result = sqlx::query(
            r"
UPDATE task_log
SET begin_ts = ?, comment = ?
WHERE active = 1
            ",
        )
        .bind(begin.unix_timestamp())
        .bind(comment)
        .execute(&self.pool)
        .await
        .map_err(DbError::query("update open entry"))?;

        if result.rows_affected() == 0 {
            return Err(DbError::NoTaskActive);
        }

        Ok(())
    }

    /// Closes the open entry at `switch_at` and opens one on `task_id` at the
    /// same instant.
    ///
    /// # Errors
    /// Returns [`DbError::NoTaskActive`] if nothing is open and
    /// [`DbError::NotFound`] if `task_id` does not exist.
    pub async fn quick_switch(
        &self,
        task_id: i64,
        switch_at: OffsetDateTime,
    ) -> Result<SwitchOutcome, DbError> {
        let mut transaction = self.begin().await?;
        let open_entry = fetch_open_entry(&mut transaction)
            .await?
            .ok_or(DbError::NoTaskActive)?;
        ensure_task_exists(&mut transaction, task_id).await?;

        let secs_spent = close_open_entry(
            &mut transaction,
            open_entry.entry_id,
            open_entry.task_id,
            self.to_local(open_entry.begin_ts),
            switch_at,
            open_entry.comment.as_deref(),
            self.now(),
        )
        .await?;
        let new_entry_id = insert_open_entry(&mut transaction, task_id, switch_at).await?;

        transaction
            .commit()
            .await
            .map_err(DbError::query("commit quick switch"))?;

        debug!(
            from_task_id = open_entry.task_id,
            to_task_id = task_id,
            "switched tracking"
        );

        Ok(SwitchOutcome {
            finished_entry_id: open_entry.entry_id,
            new_entry_id,
            previous_task_id: open_entry.task_id,
            secs_spent,
        })
    }

    /// Inserts an already-closed entry and adds its duration to the task.
    ///
    /// Returns the new entry's identifier.
    ///
    /// # Errors
    /// Returns [`DbError::NotFound`] if the task does not exist.
    pub async fn insert_manual_entry(
        &self,
        task_id: i64,
        begin: OffsetDateTime,
        end: OffsetDateTime,
        comment: Option<&str>,
    ) -> Result<i64, DbError> {
        let secs_spent = secs_between(begin, end);
        let mut transaction = self.begin().await?;

        adjust_task_secs(&mut transaction, task_id, secs_spent, self.now()).await?;
        let entry_id = sqlx::query(
            r"
INSERT INTO task_log (task_id, begin_ts, end_ts, secs_spent, comment, active)
VALUES (?, ?, ?, ?, ?, 0)
            ",
        )
        .bind(task_id)
        .bind(begin.unix_timestamp())
        .bind(end.unix_timestamp())
        .bind(secs_spent)
        .bind(comment)
        .execute(&mut *transaction)
        .await
        .map_err(DbError::query("insert task log entry"))?
        .last_insert_rowid();

        transaction
            .commit()
            .await
            .map_err(DbError::query("commit manual entry"))?;

        debug!(task_id, entry_id, secs_spent, "inserted manual entry");

        Ok(entry_id)
    }

    /// Rewrites a closed entry and moves the owning task's total by the
    /// change in duration.
    ///
    /// Returns the owning task's identifier.
    ///
    /// # Errors
    /// Returns [`DbError::NotFound`] if no closed entry has `entry_id`.
    pub async fn edit_closed_entry(
        &self,
        entry_id: i64,
        begin: OffsetDateTime,
        end: OffsetDateTime,
        comment: Option<&str>,
    ) -> Result<i64, DbError> {
        let secs_spent = secs_between(begin, end);
        let mut transaction = self.begin().await?;
        let (task_id, previous_secs) = fetch_closed_entry_secs(&mut transaction, entry_id).await?;

        sqlx::query(
            r"
UPDATE task_log
SET begin_ts = ?, end_ts = ?, secs_spent = ?, comment = ?
WHERE id = ?
            ",
        )
        .bind(begin.unix_timestamp())
        .bind(end.unix_timestamp())
        .bind(secs_spent)
        .bind(comment)
        .bind(entry_id)
        .execute(&mut *transaction)
        .await
        .map_err(DbError::query("update task log entry"))?;
        adjust_task_secs(
            &mut transaction,
            task_id,
            secs_spent - previous_secs,
            self.now(),
        )
        .await?;

        transaction
            .commit()
            .await
            .map_err(DbError::query("commit entry edit"))?;

        Ok(task_id)
    }

    /// Removes a closed entry and subtracts its stored duration from the task.
    ///
    /// Returns the owning task's identifier.
    ///
    /// # Errors
    /// Returns [`DbError::NotFound`] if no closed entry has `entry_id`.
    pub async fn delete_closed_entry(&self, entry_id: i64) -> Result<i64, DbError> {
        let mut transaction = self.begin().await?;
        let (task_id, secs_spent) = fetch_closed_entry_secs(&mut transaction, entry_id).await?;

        sqlx::query(
            r"
DELETE FROM task_log
WHERE id = ?
            ",
        )
        .bind(entry_id)
        .execute(&mut *transaction)
        .await
        .map_err(DbError::query("delete task log entry"))?;
        adjust_task_secs(&mut transaction, task_id, -secs_spent, self.now()).await?;

        transaction
            .commit()
            .await
            .map_err(DbError::query("commit entry delete"))?;

        Ok(task_id)
    }

    /// Discards the open entry, if any. Returns whether one existed.
    ///
    /// # Errors
    /// Returns an error if the delete fails.
    pub async fn delete_open_entry(&self) -> Result<bool, DbError> {
        let result = sqlx::query(
            r"
DELETE FROM task_log
WHERE active = 1
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(DbError::query("delete open entry"))?;

        Ok(result.rows_affected() > 0)
    }

    /// Reassigns a closed entry from `old_task_id` to `new_task_id`, moving
    /// `secs_to_move` between their totals.
    ///
    /// The entry is re-read inside the transaction. If its stored task or
    /// duration no longer match `old_task_id` and `secs_to_move`, nothing is
    /// changed.
    ///
    /// # Errors
    /// Returns [`DbError::NotFound`] if the entry or the target task is
    /// missing, and [`DbError::StaleEntry`] if the entry changed since the
    /// caller loaded it.
    pub async fn move_entry(
        &self,
        entry_id: i64,
        old_task_id: i64,
        new_task_id: i64,
        secs_to_move: i64,
    ) -> Result<(), DbError> {
        let mut transaction = self.begin().await?;
        ensure_task_exists(&mut transaction, new_task_id).await?;

        let (stored_task_id, stored_secs) =
            fetch_closed_entry_secs(&mut transaction, entry_id).await?;
        if stored_task_id != old_task_id || stored_secs != secs_to_move {
            return Err(DbError::StaleEntry);
        }

        sqlx::query(
            r"
UPDATE task_log
SET task_id = ?
WHERE id = ?
            ",
        )
        .bind(new_task_id)
        .bind(entry_id)
        .execute(&mut *transaction)
        .await
        .map_err(DbError::query("move task log entry"))?;

        if old_task_id != new_task_id {
            let now = self.now();
            adjust_task_secs(&mut transaction, old_task_id, -secs_to_move, now).await?;
            adjust_task_secs(&mut transaction, new_task_id, secs_to_move, now).await?;
        }

        transaction
            .commit()
            .await
            .map_err(DbError::query("commit entry move"))?;

        debug!(entry_id, old_task_id, new_task_id, "moved task log entry");

        Ok(())
    }

    /// Returns the open entry with its task, or `None` when nothing is
    /// tracked.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn fetch_active_task_details(&self) -> Result<Option<ActiveTaskDetails>, DbError> {
        let row = sqlx::query(
            r"
SELECT tl.id AS entry_id, tl.task_id, t.summary, tl.begin_ts, tl.comment
FROM task_log tl
JOIN task t ON tl.task_id = t.id
WHERE tl.active = 1
            ",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(DbError::query("load active task"))?;

        Ok(row.map(|row| ActiveTaskDetails {
            begin: self.to_local(row.get("begin_ts")),
            comment: row.get("comment"),
            entry_id: row.get("entry_id"),
            task_id: row.get("task_id"),
            task_summary: row.get("summary"),
        }))
    }

    /// Loads one task.
    ///
    /// # Errors
    /// Returns [`DbError::NotFound`] if the task does not exist.
    pub async fn fetch_task(&self, task_id: i64) -> Result<Task, DbError> {
        let row = sqlx::query(
            r"
SELECT id, summary, secs_spent, active, created_at, updated_at
FROM task
WHERE id = ?
            ",
        )
        .bind(task_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DbError::query("load task"))?
        .ok_or(DbError::not_found(Entity::Task))?;

        Ok(self.task_from_row(&row))
    }

    /// Loads tasks with the given active flag, most recently updated first.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn fetch_tasks(&self, active: bool, limit: i64) -> Result<Vec<Task>, DbError> {
        let rows = sqlx::query(
            r"
SELECT id, summary, secs_spent, active, created_at, updated_at
FROM task
WHERE active = ?
ORDER BY updated_at DESC, id DESC
LIMIT ?
            ",
        )
        .bind(i64::from(active))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::query("load tasks"))?;

        Ok(rows.iter().map(|row| self.task_from_row(row)).collect())
    }

    /// Loads one closed entry.
    #[cfg(test)]
    async fn fetch_log_entry(&self, entry_id: i64) -> Result<TaskLogEntry, DbError> {
        let row = sqlx::query(
            r"
SELECT tl.id, tl.task_id, t.summary, tl.begin_ts, tl.end_ts, tl.secs_spent, tl.comment
FROM task_log tl
JOIN task t ON tl.task_id = t.id
WHERE tl.id = ?
  AND tl.active = 0
            ",
        )
        .bind(entry_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DbError::query("load task log entry"))?
        .ok_or(DbError::not_found(Entity::TaskLogEntry))?;

        Ok(self.log_entry_from_row(&row))
    }

    /// Loads the most recent closed entries, ordered by end timestamp.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn fetch_log_entries(
        &self,
        ascending: bool,
        limit: i64,
    ) -> Result<Vec<TaskLogEntry>, DbError> {
        let order = if ascending { "ASC" } else { "DESC" };
        let sql = format!(
            r"
SELECT tl.id, tl.task_id, t.summary, tl.begin_ts, tl.end_ts, tl.secs_spent, tl.comment
FROM task_log tl
JOIN task t ON tl.task_id = t.id
WHERE tl.active = 0
ORDER BY tl.end_ts {order}, tl.id {order}
LIMIT ?
            "
        );

        let rows = sqlx::query(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(DbError::query("load task log entries"))?;

        Ok(rows.iter().map(|row| self.log_entry_from_row(row)).collect())
    }

    /// Loads closed entries that ended inside `[start, end)`, oldest first.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn fetch_log_entries_between(
        &self,
        start: OffsetDateTime,
        end: OffsetDateTime,
        task_status: TaskStatus,
        limit: i64,
    ) -> Result<Vec<TaskLogEntry>, DbError> {
        let status_clause = task_status_clause(task_status);
        let sql = format!(
            r"
SELECT tl.id, tl.task_id, t.summary, tl.begin_ts, tl.end_ts, tl.secs_spent, tl.comment
FROM task_log tl
JOIN task t ON tl.task_id = t.id
WHERE tl.active = 0
  AND tl.end_ts >= ?
  AND tl.end_ts < ?
  {status_clause}
ORDER BY tl.end_ts ASC, tl.id ASC
LIMIT ?
            "
        );

        let rows = sqlx::query(&sql)
            .bind(start.unix_timestamp())
            .bind(end.unix_timestamp())
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(DbError::query("load task log entries in range"))?;

        Ok(rows.iter().map(|row| self.log_entry_from_row(row)).collect())
    }

    /// Aggregates closed entries that ended inside `[start, end)` per task, in
    /// the order tasks were last updated.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn fetch_report_between(
        &self,
        start: OffsetDateTime,
        end: OffsetDateTime,
        task_status: TaskStatus,
        limit: i64,
    ) -> Result<Vec<TaskReportEntry>, DbError> {
        self.fetch_aggregate(
            Some((start, end)),
            task_status,
            "t.updated_at ASC, tl.task_id ASC",
            limit,
        )
        .await
    }

    /// Aggregates closed entries that ended inside `[start, end)` per task,
    /// largest total first.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn fetch_stats_between(
        &self,
        start: OffsetDateTime,
        end: OffsetDateTime,
        task_status: TaskStatus,
        limit: i64,
    ) -> Result<Vec<TaskReportEntry>, DbError> {
        self.fetch_aggregate(
            Some((start, end)),
            task_status,
            "secs_spent DESC, tl.task_id ASC",
            limit,
        )
        .await
    }

    /// Aggregates every closed entry per task, largest total first.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn fetch_stats(
        &self,
        task_status: TaskStatus,
        limit: i64,
    ) -> Result<Vec<TaskReportEntry>, DbError> {
        self.fetch_aggregate(None, task_status, "secs_spent DESC, tl.task_id ASC", limit)
            .await
    }

    async fn fetch_aggregate(
        &self,
        window: Option<(OffsetDateTime, OffsetDateTime)>,
        task_status: TaskStatus,
        order_by: &str,
        limit: i64,
    ) -> Result<Vec<TaskReportEntry>, DbError> {
        let status_clause = task_status_clause(task_status);
        let window_clause = if window.is_some() {
            "AND tl.end_ts >= ? AND tl.end_ts < ?"
        } else {
            ""
        };
        let sql = format!(
            r"
SELECT tl.task_id, t.summary, COUNT(tl.id) AS num_entries, SUM(tl.secs_spent) AS secs_spent
FROM task_log tl
JOIN task t ON tl.task_id = t.id
WHERE tl.active = 0
  {window_clause}
  {status_clause}
GROUP BY tl.task_id
ORDER BY {order_by}
LIMIT ?
            "
        );

        let mut query = sqlx::query(&sql);
        if let Some((start, end)) = window {
            query = query.bind(start.unix_timestamp()).bind(end.unix_timestamp());
        }
        let rows = query
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(DbError::query("aggregate task log entries"))?;

        Ok(rows
            .iter()
            .map(|row| TaskReportEntry {
                num_entries: row.get("num_entries"),
                secs_spent: row.get("secs_spent"),
                task_id: row.get("task_id"),
                task_summary: row.get("summary"),
            })
            .collect())
    }

    async fn begin(&self) -> Result<sqlx::Transaction<'static, sqlx::Sqlite>, DbError> {
        self.pool
            .begin()
            .await
            .map_err(DbError::query("begin transaction"))
    }

    fn now(&self) -> OffsetDateTime {
        self.clock.now()
    }

    fn to_local(&self, unix_timestamp: i64) -> OffsetDateTime {
        OffsetDateTime::from_unix_timestamp(unix_timestamp)
            .unwrap_or(OffsetDateTime::UNIX_EPOCH)
            .to_offset(self.now().offset())
    }

    fn task_from_row(&self, row: &SqliteRow) -> Task {
        Task {
            active: row.get::<i64, _>("active") != 0,
            created_at: self.to_local(row.get("created_at")),
            id: row.get("id"),
            secs_spent: row.get("secs_spent"),
            summary: row.get("summary"),
            updated_at: self.to_local(row.get("updated_at")),
        }
    }

    fn log_entry_from_row(&self, row: &SqliteRow) -> TaskLogEntry {
        TaskLogEntry {
            begin: self.to_local(row.get("begin_ts")),
            comment: row.get("comment"),
            end: self.to_local(row.get::<Option<i64>, _>("end_ts").unwrap_or_default()),
            id: row.get("id"),
            secs_spent: row.get("secs_spent"),
            task_id: row.get("task_id"),
            task_summary: row.get("summary"),
        }
    }
}

/// The open entry as stored, before conversion to local time.
struct OpenEntryRow {
    begin_ts: i64,
    comment: Option<String>,
    entry_id: i64,
    task_id: i64,
}

async fn fetch_open_entry(
    connection: &mut SqliteConnection,
) -> Result<Option<OpenEntryRow>, DbError> {
    let row = sqlx::query(
        r"
SELECT id, task_id, begin_ts, comment
FROM task_log
WHERE active = 1
        ",
    )
    .fetch_optional(&mut *connection)
    .await
    .map_err(DbError::query("load open entry"))?;

    Ok(row.map(|row| OpenEntryRow {
        begin_ts: row.get("begin_ts"),
        comment: row.get("comment"),
        entry_id: row.get("id"),
        task_id: row.get("task_id"),
    }))
}

async fn ensure_task_exists(connection: &mut SqliteConnection, task_id: i64) -> Result<(), DbError> {
    let exists = sqlx::query(
        r"
SELECT 1
FROM task
WHERE id = ?
        ",
    )
    .bind(task_id)
    .fetch_optional(&mut *connection)
    .await
    .map_err(DbError::query("look up task"))?
    .is_some();

    if !exists {
        return Err(DbError::not_found(Entity::Task));
    }

    Ok(())
}

async fn fetch_task_summary(
    connection: &mut SqliteConnection,
    task_id: i64,
) -> Result<String, DbError> {
    let row = sqlx::query(
        r"
SELECT summary
FROM task
WHERE id = ?
        ",
    )
    .bind(task_id)
    .fetch_optional(&mut *connection)
    .await
    .map_err(DbError::query("load task summary"))?
    .ok_or(DbError::not_found(Entity::Task))?;

    Ok(row.get("summary"))
}

async fn insert_open_entry(
    connection: &mut SqliteConnection,
    task_id: i64,
    begin: OffsetDateTime,
) -> Result<i64, DbError> {
    let result = sqlx::query(
        r"
INSERT INTO task_log (task_id, begin_ts, end_ts, secs_spent, comment, active)
VALUES (?, ?, NULL, 0, NULL, 1)
        ",
    )
    .bind(task_id)
    .bind(begin.unix_timestamp())
    .execute(&mut *connection)
    .await
    .map_err(|source| {
        if is_open_entry_violation(&source) {
            DbError::AlreadyTracking
        } else {
            DbError::Query {
                action: "insert open entry",
                source,
            }
        }
    })?;

    Ok(result.last_insert_rowid())
}

/// Closes the open entry and credits its duration to the owning task.
async fn close_open_entry(
    connection: &mut SqliteConnection,
    entry_id: i64,
    task_id: i64,
    begin: OffsetDateTime,
    end: OffsetDateTime,
    comment: Option<&str>,
    now: OffsetDateTime,
) -> Result<i64, DbError> {
    let secs_spent = secs_between(begin, end);
    let result = sqlx::query(
        r"
UPDATE task_log
SET active = 0, begin_ts = ?, end_ts = ?, secs_spent = ?, comment = ?
WHERE id = ?
  AND task_id = ?
  AND active = 1
        ",
    )
    .bind(begin.unix_timestamp())
    .bind(end.unix_timestamp())
    .bind(secs_spent)
    .bind(comment)
    .bind(entry_id)
    .bind(task_id)
    .execute(&mut *connection)
    .await
    .map_err(DbError::query("close open entry"))?;

    if result.rows_affected() == 0 {
        return Err(DbError::not_found(Entity::TaskLogEntry));
    }

    adjust_task_secs(connection, task_id, secs_spent, now).await?;

    Ok(secs_spent)
}

async fn fetch_closed_entry_secs(
    connection: &mut SqliteConnection,
    entry_id: i64,
) -> Result<(i64, i64), DbError> {
    let row = sqlx::query(
        r"
SELECT task_id, secs_spent
FROM task_log
WHERE id = ?
  AND active = 0
        ",
    )
    .bind(entry_id)
    .fetch_optional(&mut *connection)
    .await
    .map_err(DbError::query("load task log entry"))?
    .ok_or(DbError::not_found(Entity::TaskLogEntry))?;

    Ok((row.get("task_id"), row.get("secs_spent")))
}

async fn adjust_task_secs(
    connection: &mut SqliteConnection,
    task_id: i64,
    delta_secs: i64,
    now: OffsetDateTime,
) -> Result<(), DbError> {
    let result = sqlx::query(
        r"
UPDATE task
SET secs_spent = secs_spent + ?, updated_at = ?
WHERE id = ?
        ",
    )
    .bind(delta_secs)
    .bind(now.unix_timestamp())
    .bind(task_id)
    .execute(&mut *connection)
    .await
    .map_err(DbError::query("update task time spent"))?;

    if result.rows_affected() == 0 {
        return Err(DbError::not_found(Entity::Task));
    }

    Ok(())
}

fn task_status_clause(task_status: TaskStatus) -> &'static str {
    match task_status {
        TaskStatus::Any => "",
        TaskStatus::Active => "AND t.active = 1",
        TaskStatus::Inactive => "AND t.active = 0",
    }
}

fn is_open_entry_violation(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Database(database_error) => {
            database_error.is_unique_violation()
                || database_error.message().contains(ACTIVE_ENTRY_GUARD_MESSAGE)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;
    use time::Duration;
    use time::macros::datetime;

    use super::*;
    use crate::domain::clock::FixedClock;

    const NOW: OffsetDateTime = datetime!(2024-06-12 18:00 UTC);

    async fn test_database() -> Database {
        Database::open_in_memory(Arc::new(FixedClock::new(NOW)))
            .await
            .expect("failed to open in-memory db")
    }

    async fn closed_entries_sum(database: &Database, task_id: i64) -> i64 {
        sqlx::query(
            r"
SELECT COALESCE(SUM(secs_spent), 0) AS total
FROM task_log
WHERE task_id = ?
  AND active = 0
            ",
        )
        .bind(task_id)
        .fetch_one(&database.pool)
        .await
        .expect("failed to sum entries")
        .get("total")
    }

    async fn open_entry_count(database: &Database) -> i64 {
        sqlx::query("SELECT COUNT(*) AS count FROM task_log WHERE active = 1")
            .fetch_one(&database.pool)
            .await
            .expect("failed to count open entries")
            .get("count")
    }

    async fn assert_total_matches_entries(database: &Database, task_id: i64) {
        let task = database
            .fetch_task(task_id)
            .await
            .expect("failed to load task");

        assert_eq!(task.secs_spent, closed_entries_sum(database, task_id).await);
    }

    #[tokio::test]
    async fn test_open_records_applied_migrations() {
        // Arrange
        let database = test_database().await;

        // Act
        let version = migration::current_version(&database.pool)
            .await
            .expect("failed to read version");

        // Assert
        assert_eq!(version, migration::LATEST_SCHEMA_VERSION);
    }

    #[tokio::test]
    async fn test_open_on_disk_is_idempotent() {
        // Arrange
        let directory = tempdir().expect("failed to create temp dir");
        let db_path = directory.path().join("nested").join(DB_FILE);
        let clock: Arc<dyn Clock> = Arc::new(FixedClock::new(NOW));
        let first = Database::open(&db_path, Arc::clone(&clock))
            .await
            .expect("failed to open db");
        first
            .create_task("Write report")
            .await
            .expect("failed to create task");
        first.pool.close().await;

        // Act
        let reopened = Database::open(&db_path, clock)
            .await
            .expect("failed to reopen db");
        let tasks = reopened
            .fetch_tasks(true, 10)
            .await
            .expect("failed to load tasks");
        let migration_rows: i64 = sqlx::query("SELECT COUNT(*) AS count FROM migration_log")
            .fetch_one(&reopened.pool)
            .await
            .expect("failed to count migrations")
            .get("count");

        // Assert
        assert_eq!(tasks.len(), 1);
        assert_eq!(migration_rows, migration::LATEST_SCHEMA_VERSION);
    }

    #[tokio::test]
    async fn test_open_rejects_newer_schema() {
        // Arrange
        let directory = tempdir().expect("failed to create temp dir");
        let db_path = directory.path().join(DB_FILE);
        let clock: Arc<dyn Clock> = Arc::new(FixedClock::new(NOW));
        let database = Database::open(&db_path, Arc::clone(&clock))
            .await
            .expect("failed to open db");
        sqlx::query("INSERT INTO migration_log (version, created_at) VALUES (99, 0)")
            .execute(&database.pool)
            .await
            .expect("failed to fake newer version");
        database.pool.close().await;

        // Act
        let result = Database::open(&db_path, clock).await;

        // Assert
        assert!(matches!(
            result,
            Err(DbError::SchemaTooNew {
                found: 99,
                supported: migration::LATEST_SCHEMA_VERSION,
            })
        ));
    }

    #[tokio::test]
    async fn test_create_task_starts_active_with_no_time() {
        // Arrange
        let database = test_database().await;

        // Act
        let task = database
            .create_task("Write report")
            .await
            .expect("failed to create task");
        let stored = database
            .fetch_task(task.id)
            .await
            .expect("failed to load task");

        // Assert
        assert_eq!(stored, task);
        assert!(stored.active);
        assert_eq!(stored.secs_spent, 0);
        assert_eq!(stored.created_at, NOW);
    }

    #[tokio::test]
    async fn test_update_task_summary_missing_task_is_not_found() {
        // Arrange
        let database = test_database().await;

        // Act
        let result = database.update_task_summary(42, "Nope").await;

        // Assert
        assert!(matches!(
            result,
            Err(DbError::NotFound {
                entity: Entity::Task,
            })
        ));
    }

    #[tokio::test]
    async fn test_set_task_active_moves_task_between_lists() {
        // Arrange
        let database = test_database().await;
        let task = database
            .create_task("Write report")
            .await
            .expect("failed to create task");

        // Act
        database
            .set_task_active(task.id, false)
            .await
            .expect("failed to deactivate task");
        let active = database
            .fetch_tasks(true, 10)
            .await
            .expect("failed to load active tasks");
        let inactive = database
            .fetch_tasks(false, 10)
            .await
            .expect("failed to load inactive tasks");

        // Assert
        assert!(active.is_empty());
        assert_eq!(inactive.len(), 1);
        assert!(!inactive[0].active);
    }

    #[tokio::test]
    async fn test_start_then_finish_tracking_logs_duration() {
        // Arrange
        let database = test_database().await;
        let task = database
            .create_task("Write report")
            .await
            .expect("failed to create task");
        let begin = NOW - Duration::hours(3);
        let end = begin + Duration::seconds(7200);

        // Act
        let entry_id = database
            .start_tracking(task.id, begin)
            .await
            .expect("failed to start tracking");
        let secs_spent = database
            .finish_tracking(entry_id, task.id, begin, end, Some("draft done"))
            .await
            .expect("failed to finish tracking");
        let entries = database
            .fetch_log_entries(false, 50)
            .await
            .expect("failed to load entries");
        let task = database
            .fetch_task(task.id)
            .await
            .expect("failed to load task");

        // Assert
        assert_eq!(secs_spent, 7200);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].secs_spent, 7200);
        assert_eq!(entries[0].comment.as_deref(), Some("draft done"));
        assert_eq!(task.secs_spent, 7200);
        assert_eq!(open_entry_count(&database).await, 0);
    }

    #[tokio::test]
    async fn test_start_tracking_while_tracking_fails_and_keeps_open_entry() {
        // Arrange
        let database = test_database().await;
        let first = database
            .create_task("Task A")
            .await
            .expect("failed to create task");
        let second = database
            .create_task("Task B")
            .await
            .expect("failed to create task");
        let begin = NOW - Duration::hours(1);
        database
            .start_tracking(first.id, begin)
            .await
            .expect("failed to start tracking");

        // Act
        let result = database.start_tracking(second.id, NOW).await;
        let active = database
            .fetch_active_task_details()
            .await
            .expect("failed to load active task")
            .expect("task should still be tracked");

        // Assert
        assert!(matches!(result, Err(DbError::AlreadyTracking)));
        assert_eq!(active.task_id, first.id);
        assert_eq!(active.begin, begin);
        assert_eq!(open_entry_count(&database).await, 1);
    }

    #[tokio::test]
    async fn test_storage_rejects_second_open_entry_insert() {
        // Arrange
        let database = test_database().await;
        let task = database
            .create_task("Task A")
            .await
            .expect("failed to create task");
        database
            .start_tracking(task.id, NOW)
            .await
            .expect("failed to start tracking");
        let mut connection = database
            .pool
            .acquire()
            .await
            .expect("failed to acquire connection");

        // Act
        let result = insert_open_entry(&mut connection, task.id, NOW).await;

        // Assert
        assert!(matches!(result, Err(DbError::AlreadyTracking)));
    }

    #[tokio::test]
    async fn test_storage_rejects_reopening_closed_entry_while_tracking() {
        // Arrange
        let database = test_database().await;
        let task = database
            .create_task("Task A")
            .await
            .expect("failed to create task");
        let closed_id = database
            .insert_manual_entry(task.id, NOW - Duration::hours(2), NOW - Duration::hours(1), None)
            .await
            .expect("failed to insert entry");
        database
            .start_tracking(task.id, NOW)
            .await
            .expect("failed to start tracking");

        // Act
        let result = sqlx::query("UPDATE task_log SET active = 1 WHERE id = ?")
            .bind(closed_id)
            .execute(&database.pool)
            .await;

        // Assert
        assert!(result.is_err());
        assert_eq!(open_entry_count(&database).await, 1);
    }

    #[tokio::test]
    async fn test_start_tracking_missing_task_is_not_found() {
        // Arrange
        let database = test_database().await;

        // Act
        let result = database.start_tracking(42, NOW).await;

        // Assert
        assert!(matches!(
            result,
            Err(DbError::NotFound {
                entity: Entity::Task,
            })
        ));
        assert_eq!(open_entry_count(&database).await, 0);
    }

    #[tokio::test]
    async fn test_finish_tracking_missing_entry_leaves_total_untouched() {
        // Arrange
        let database = test_database().await;
        let task = database
            .create_task("Task A")
            .await
            .expect("failed to create task");

        // Act
        let result = database
            .finish_tracking(99, task.id, NOW - Duration::hours(1), NOW, None)
            .await;

        // Assert
        assert!(result.is_err_and(|error| error.is_not_found()));
        assert_total_matches_entries(&database, task.id).await;
    }

    #[tokio::test]
    async fn test_stop_tracking_keeps_stored_begin_and_comment() {
        // Arrange
        let database = test_database().await;
        let task = database
            .create_task("Task A")
            .await
            .expect("failed to create task");
        let begin = NOW - Duration::minutes(90);
        let entry_id = database
            .start_tracking(task.id, begin)
            .await
            .expect("failed to start tracking");
        database
            .edit_open_entry(begin, Some("focus"))
            .await
            .expect("failed to edit open entry");

        // Act
        let finished = database
            .stop_tracking(NOW)
            .await
            .expect("failed to stop tracking");
        let entry = database
            .fetch_log_entry(entry_id)
            .await
            .expect("failed to load entry");

        // Assert
        assert_eq!(
            finished,
            FinishedEntry {
                entry_id,
                secs_spent: 5400,
                task_id: task.id,
                task_summary: "Task A".to_string(),
            }
        );
        assert_eq!(entry.comment.as_deref(), Some("focus"));
        assert_eq!(entry.begin, begin);
    }

    #[tokio::test]
    async fn test_stop_tracking_without_open_entry_fails() {
        // Arrange
        let database = test_database().await;

        // Act
        let result = database.stop_tracking(NOW).await;

        // Assert
        assert!(matches!(result, Err(DbError::NoTaskActive)));
    }

    #[tokio::test]
    async fn test_edit_open_entry_without_open_entry_fails() {
        // Arrange
        let database = test_database().await;

        // Act
        let result = database.edit_open_entry(NOW, Some("nothing")).await;

        // Assert
        assert!(matches!(result, Err(DbError::NoTaskActive)));
    }

    #[tokio::test]
    async fn test_edit_open_entry_updates_begin_and_comment() {
        // Arrange
        let database = test_database().await;
        let task = database
            .create_task("Task A")
            .await
            .expect("failed to create task");
        database
            .start_tracking(task.id, NOW)
            .await
            .expect("failed to start tracking");
        let new_begin = NOW - Duration::minutes(15);

        // Act
        database
            .edit_open_entry(new_begin, Some("started earlier"))
            .await
            .expect("failed to edit open entry");
        let active = database
            .fetch_active_task_details()
            .await
            .expect("failed to load active task")
            .expect("task should be tracked");

        // Assert
        assert_eq!(active.begin, new_begin);
        assert_eq!(active.comment.as_deref(), Some("started earlier"));
        assert_eq!(active.task_summary, "Task A");
    }

    #[tokio::test]
    async fn test_quick_switch_closes_and_opens_at_same_instant() {
        // Arrange
        let database = test_database().await;
        let first = database
            .create_task("Task A")
            .await
            .expect("failed to create task");
        let second = database
            .create_task("Task B")
            .await
            .expect("failed to create task");
        let begin = NOW - Duration::hours(2);
        let switch_at = NOW - Duration::minutes(30);
        database
            .start_tracking(first.id, begin)
            .await
            .expect("failed to start tracking");

        // Act
        let outcome = database
            .quick_switch(second.id, switch_at)
            .await
            .expect("failed to switch");
        let active = database
            .fetch_active_task_details()
            .await
            .expect("failed to load active task")
            .expect("task should be tracked");
        let first = database
            .fetch_task(first.id)
            .await
            .expect("failed to load task");

        // Assert
        assert_eq!(outcome.previous_task_id, first.id);
        assert_eq!(outcome.secs_spent, 5400);
        assert_eq!(outcome.new_entry_id, active.entry_id);
        assert_eq!(active.task_id, second.id);
        assert_eq!(active.begin, switch_at);
        assert!(active.comment.is_none());
        assert_eq!(first.secs_spent, 5400);
        assert_eq!(open_entry_count(&database).await, 1);
    }

    #[tokio::test]
    async fn test_quick_switch_without_open_entry_fails() {
        // Arrange
        let database = test_database().await;
        let task = database
            .create_task("Task A")
            .await
            .expect("failed to create task");

        // Act
        let result = database.quick_switch(task.id, NOW).await;

        // Assert
        assert!(matches!(result, Err(DbError::NoTaskActive)));
        assert_eq!(open_entry_count(&database).await, 0);
    }

    #[tokio::test]
    async fn test_quick_switch_to_missing_task_rolls_back() {
        // Arrange
        let database = test_database().await;
        let task = database
            .create_task("Task A")
            .await
            .expect("failed to create task");
        database
            .start_tracking(task.id, NOW - Duration::hours(1))
            .await
            .expect("failed to start tracking");

        // Act
        let result = database.quick_switch(42, NOW).await;
        let active = database
            .fetch_active_task_details()
            .await
            .expect("failed to load active task");

        // Assert
        assert!(result.is_err_and(|error| error.is_not_found()));
        assert_eq!(active.map(|details| details.task_id), Some(task.id));
        assert_total_matches_entries(&database, task.id).await;
    }

    #[tokio::test]
    async fn test_insert_manual_entry_round_trips_duration() {
        // Arrange
        let database = test_database().await;
        let task = database
            .create_task("Task A")
            .await
            .expect("failed to create task");
        let begin = datetime!(2024-06-12 09:00:00 UTC);
        let end = datetime!(2024-06-12 10:15:30 UTC);

        // Act
        let entry_id = database
            .insert_manual_entry(task.id, begin, end, Some("pairing"))
            .await
            .expect("failed to insert entry");
        let entry = database
            .fetch_log_entry(entry_id)
            .await
            .expect("failed to load entry");
        let task = database
            .fetch_task(task.id)
            .await
            .expect("failed to load task");

        // Assert
        assert_eq!(entry.secs_spent, 4530);
        assert_eq!(entry.begin, begin);
        assert_eq!(entry.end, end);
        assert_eq!(entry.task_summary, "Task A");
        assert_eq!(task.secs_spent, 4530);
    }

    #[tokio::test]
    async fn test_insert_manual_entry_missing_task_inserts_nothing() {
        // Arrange
        let database = test_database().await;

        // Act
        let result = database
            .insert_manual_entry(42, NOW - Duration::hours(1), NOW, None)
            .await;
        let entries = database
            .fetch_log_entries(false, 50)
            .await
            .expect("failed to load entries");

        // Assert
        assert!(result.is_err_and(|error| error.is_not_found()));
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn test_edit_closed_entry_adjusts_total_by_delta() {
        // Arrange
        let database = test_database().await;
        let task = database
            .create_task("Task A")
            .await
            .expect("failed to create task");
        let begin = NOW - Duration::hours(1);
        let entry_id = database
            .insert_manual_entry(task.id, begin, begin + Duration::seconds(60), None)
            .await
            .expect("failed to insert entry");

        // Act
        let owner = database
            .edit_closed_entry(
                entry_id,
                begin - Duration::seconds(60),
                begin + Duration::seconds(60),
                Some("longer"),
            )
            .await
            .expect("failed to edit entry");
        let task = database
            .fetch_task(task.id)
            .await
            .expect("failed to load task");

        // Assert
        assert_eq!(owner, task.id);
        assert_eq!(task.secs_spent, 120);
        assert_total_matches_entries(&database, task.id).await;
    }

    #[tokio::test]
    async fn test_edit_closed_entry_rejects_open_entry() {
        // Arrange
        let database = test_database().await;
        let task = database
            .create_task("Task A")
            .await
            .expect("failed to create task");
        let entry_id = database
            .start_tracking(task.id, NOW)
            .await
            .expect("failed to start tracking");

        // Act
        let result = database
            .edit_closed_entry(entry_id, NOW - Duration::hours(1), NOW, None)
            .await;

        // Assert
        assert!(result.is_err_and(|error| error.is_not_found()));
        assert_eq!(open_entry_count(&database).await, 1);
    }

    #[tokio::test]
    async fn test_delete_closed_entry_subtracts_stored_secs() {
        // Arrange
        let database = test_database().await;
        let task = database
            .create_task("Task A")
            .await
            .expect("failed to create task");
        let begin = NOW - Duration::hours(5);
        database
            .insert_manual_entry(task.id, begin, begin + Duration::seconds(3200), None)
            .await
            .expect("failed to insert entry");
        let doomed = database
            .insert_manual_entry(
                task.id,
                begin + Duration::hours(2),
                begin + Duration::hours(2) + Duration::seconds(1800),
                None,
            )
            .await
            .expect("failed to insert entry");

        // Act
        database
            .delete_closed_entry(doomed)
            .await
            .expect("failed to delete entry");
        let task = database
            .fetch_task(task.id)
            .await
            .expect("failed to load task");
        let entries = database
            .fetch_log_entries(false, 50)
            .await
            .expect("failed to load entries");

        // Assert
        assert_eq!(task.secs_spent, 3200);
        assert!(entries.iter().all(|entry| entry.id != doomed));
        assert!(
            database
                .fetch_log_entry(doomed)
                .await
                .is_err_and(|error| error.is_not_found())
        );
    }

    #[tokio::test]
    async fn test_delete_open_entry_leaves_totals_untouched() {
        // Arrange
        let database = test_database().await;
        let task = database
            .create_task("Task A")
            .await
            .expect("failed to create task");
        database
            .start_tracking(task.id, NOW - Duration::hours(1))
            .await
            .expect("failed to start tracking");

        // Act
        let deleted = database
            .delete_open_entry()
            .await
            .expect("failed to delete open entry");
        let deleted_again = database
            .delete_open_entry()
            .await
            .expect("failed to delete open entry");
        let task = database
            .fetch_task(task.id)
            .await
            .expect("failed to load task");

        // Assert
        assert!(deleted);
        assert!(!deleted_again);
        assert_eq!(task.secs_spent, 0);
        assert_eq!(open_entry_count(&database).await, 0);
    }

    #[tokio::test]
    async fn test_move_entry_transfers_secs_between_tasks() {
        // Arrange
        let database = test_database().await;
        let source = database
            .create_task("Task A")
            .await
            .expect("failed to create task");
        let target = database
            .create_task("Task B")
            .await
            .expect("failed to create task");
        let begin = NOW - Duration::hours(2);
        let entry_id = database
            .insert_manual_entry(source.id, begin, begin + Duration::seconds(3600), None)
            .await
            .expect("failed to insert entry");

        // Act
        database
            .move_entry(entry_id, source.id, target.id, 3600)
            .await
            .expect("failed to move entry");
        let source = database
            .fetch_task(source.id)
            .await
            .expect("failed to load task");
        let target = database
            .fetch_task(target.id)
            .await
            .expect("failed to load task");
        let entry = database
            .fetch_log_entry(entry_id)
            .await
            .expect("failed to load entry");

        // Assert
        assert_eq!(source.secs_spent, 0);
        assert_eq!(target.secs_spent, 3600);
        assert_eq!(entry.task_id, target.id);
    }

    #[tokio::test]
    async fn test_move_entry_to_same_task_keeps_total() {
        // Arrange
        let database = test_database().await;
        let task = database
            .create_task("Task A")
            .await
            .expect("failed to create task");
        let begin = NOW - Duration::hours(2);
        let entry_id = database
            .insert_manual_entry(task.id, begin, begin + Duration::seconds(3600), None)
            .await
            .expect("failed to insert entry");

        // Act
        database
            .move_entry(entry_id, task.id, task.id, 3600)
            .await
            .expect("failed to move entry");
        let task = database
            .fetch_task(task.id)
            .await
            .expect("failed to load task");

        // Assert
        assert_eq!(task.secs_spent, 3600);
    }

    #[tokio::test]
    async fn test_move_entry_missing_entry_is_not_found() {
        // Arrange
        let database = test_database().await;
        let source = database
            .create_task("Task A")
            .await
            .expect("failed to create task");
        let target = database
            .create_task("Task B")
            .await
            .expect("failed to create task");

        // Act
        let result = database.move_entry(42, source.id, target.id, 60).await;

        // Assert
        assert!(matches!(
            result,
            Err(DbError::NotFound {
                entity: Entity::TaskLogEntry,
            })
        ));
    }

    #[tokio::test]
    async fn test_move_entry_with_stale_secs_is_rejected() {
        // Arrange
        let database = test_database().await;
        let source = database
            .create_task("Task A")
            .await
            .expect("failed to create task");
        let target = database
            .create_task("Task B")
            .await
            .expect("failed to create task");
        let begin = NOW - Duration::hours(2);
        let entry_id = database
            .insert_manual_entry(source.id, begin, begin + Duration::seconds(3600), None)
            .await
            .expect("failed to insert entry");

        // Act
        let result = database
            .move_entry(entry_id, source.id, target.id, 1800)
            .await;

        // Assert
        assert!(matches!(result, Err(DbError::StaleEntry)));
        assert_total_matches_entries(&database, source.id).await;
        assert_total_matches_entries(&database, target.id).await;
        let entry = database
            .fetch_log_entry(entry_id)
            .await
            .expect("failed to load entry");
        assert_eq!(entry.task_id, source.id);
    }

    #[tokio::test]
    async fn test_totals_match_entries_across_mutation_sequence() {
        // Arrange
        let database = test_database().await;
        let first = database
            .create_task("Task A")
            .await
            .expect("failed to create task");
        let second = database
            .create_task("Task B")
            .await
            .expect("failed to create task");
        let base = NOW - Duration::days(1);

        // Act
        let manual = database
            .insert_manual_entry(first.id, base, base + Duration::minutes(45), None)
            .await
            .expect("failed to insert entry");
        let tracked = database
            .start_tracking(first.id, base + Duration::hours(1))
            .await
            .expect("failed to start tracking");
        database
            .finish_tracking(
                tracked,
                first.id,
                base + Duration::hours(1),
                base + Duration::hours(3),
                None,
            )
            .await
            .expect("failed to finish tracking");
        database
            .edit_closed_entry(manual, base, base + Duration::minutes(50), None)
            .await
            .expect("failed to edit entry");
        database
            .move_entry(tracked, first.id, second.id, 7200)
            .await
            .expect("failed to move entry");
        let extra = database
            .insert_manual_entry(second.id, base + Duration::hours(4), base + Duration::hours(5), None)
            .await
            .expect("failed to insert entry");
        database
            .delete_closed_entry(extra)
            .await
            .expect("failed to delete entry");

        // Assert
        assert_total_matches_entries(&database, first.id).await;
        assert_total_matches_entries(&database, second.id).await;
        let first = database
            .fetch_task(first.id)
            .await
            .expect("failed to load task");
        let second = database
            .fetch_task(second.id)
            .await
            .expect("failed to load task");
        assert_eq!(first.secs_spent, 3000);
        assert_eq!(second.secs_spent, 7200);
    }

    #[tokio::test]
    async fn test_archive_stale_tasks_keeps_recent_and_tracked_tasks() {
        // Arrange
        let database = test_database().await;
        let cutoff = NOW - Duration::days(14);
        let stale = database
            .create_task("Stale")
            .await
            .expect("failed to create task");
        let recent = database
            .create_task("Recent")
            .await
            .expect("failed to create task");
        let tracked = database
            .create_task("Tracked long ago")
            .await
            .expect("failed to create task");
        let empty = database
            .create_task("Never worked on")
            .await
            .expect("failed to create task");
        let old = NOW - Duration::days(30);
        database
            .insert_manual_entry(stale.id, old, old + Duration::hours(1), None)
            .await
            .expect("failed to insert entry");
        database
            .insert_manual_entry(
                recent.id,
                NOW - Duration::days(2),
                NOW - Duration::days(2) + Duration::hours(1),
                None,
            )
            .await
            .expect("failed to insert entry");
        database
            .start_tracking(tracked.id, NOW - Duration::days(60))
            .await
            .expect("failed to start tracking");

        // Act
        let archived = database
            .archive_stale_tasks(cutoff)
            .await
            .expect("failed to archive tasks");
        let active_ids: Vec<i64> = database
            .fetch_tasks(true, 10)
            .await
            .expect("failed to load tasks")
            .iter()
            .map(|task| task.id)
            .collect();

        // Assert
        assert_eq!(archived, 2);
        assert!(active_ids.contains(&recent.id));
        assert!(active_ids.contains(&tracked.id));
        assert!(!active_ids.contains(&stale.id));
        assert!(!active_ids.contains(&empty.id));
    }

    #[tokio::test]
    async fn test_fetch_log_entries_between_buckets_by_end_timestamp() {
        // Arrange
        let database = test_database().await;
        let task = database
            .create_task("Task A")
            .await
            .expect("failed to create task");
        let day_start = datetime!(2024-06-12 00:00 UTC);
        let day_end = datetime!(2024-06-13 00:00 UTC);
        let overnight = database
            .insert_manual_entry(
                task.id,
                datetime!(2024-06-11 23:00 UTC),
                datetime!(2024-06-12 01:00 UTC),
                None,
            )
            .await
            .expect("failed to insert entry");
        database
            .insert_manual_entry(
                task.id,
                datetime!(2024-06-11 09:00 UTC),
                datetime!(2024-06-11 10:00 UTC),
                None,
            )
            .await
            .expect("failed to insert entry");

        // Act
        let entries = database
            .fetch_log_entries_between(day_start, day_end, TaskStatus::Any, 100)
            .await
            .expect("failed to load entries");

        // Assert
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, overnight);
    }

    #[tokio::test]
    async fn test_fetch_log_entries_between_filters_task_status() {
        // Arrange
        let database = test_database().await;
        let active = database
            .create_task("Active")
            .await
            .expect("failed to create task");
        let inactive = database
            .create_task("Inactive")
            .await
            .expect("failed to create task");
        let begin = NOW - Duration::hours(3);
        database
            .insert_manual_entry(active.id, begin, begin + Duration::hours(1), None)
            .await
            .expect("failed to insert entry");
        database
            .insert_manual_entry(inactive.id, begin, begin + Duration::hours(2), None)
            .await
            .expect("failed to insert entry");
        database
            .set_task_active(inactive.id, false)
            .await
            .expect("failed to deactivate task");

        // Act
        let only_inactive = database
            .fetch_log_entries_between(NOW - Duration::days(1), NOW, TaskStatus::Inactive, 100)
            .await
            .expect("failed to load entries");
        let any = database
            .fetch_log_entries_between(NOW - Duration::days(1), NOW, TaskStatus::Any, 100)
            .await
            .expect("failed to load entries");

        // Assert
        assert_eq!(only_inactive.len(), 1);
        assert_eq!(only_inactive[0].task_id, inactive.id);
        assert_eq!(any.len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_stats_orders_by_time_spent() {
        // Arrange
        let database = test_database().await;
        let small = database
            .create_task("Small")
            .await
            .expect("failed to create task");
        let large = database
            .create_task("Large")
            .await
            .expect("failed to create task");
        let begin = NOW - Duration::hours(6);
        database
            .insert_manual_entry(small.id, begin, begin + Duration::hours(1), None)
            .await
            .expect("failed to insert entry");
        database
            .insert_manual_entry(large.id, begin, begin + Duration::hours(2), None)
            .await
            .expect("failed to insert entry");
        database
            .insert_manual_entry(
                large.id,
                begin + Duration::hours(3),
                begin + Duration::hours(4),
                None,
            )
            .await
            .expect("failed to insert entry");
        database
            .start_tracking(small.id, NOW)
            .await
            .expect("failed to start tracking");

        // Act
        let stats = database
            .fetch_stats(TaskStatus::Any, 10)
            .await
            .expect("failed to load stats");
        let windowed = database
            .fetch_stats_between(begin + Duration::hours(3), NOW, TaskStatus::Any, 10)
            .await
            .expect("failed to load stats");

        // Assert
        assert_eq!(
            stats,
            vec![
                TaskReportEntry {
                    num_entries: 2,
                    secs_spent: 10_800,
                    task_id: large.id,
                    task_summary: "Large".to_string(),
                },
                TaskReportEntry {
                    num_entries: 1,
                    secs_spent: 3600,
                    task_id: small.id,
                    task_summary: "Small".to_string(),
                },
            ]
        );
        assert_eq!(windowed.len(), 1);
        assert_eq!(windowed[0].task_id, large.id);
        assert_eq!(windowed[0].num_entries, 1);
    }

    #[tokio::test]
    async fn test_fetch_report_between_aggregates_per_task() {
        // Arrange
        let database = test_database().await;
        let task = database
            .create_task("Task A")
            .await
            .expect("failed to create task");
        let begin = NOW - Duration::hours(6);
        database
            .insert_manual_entry(task.id, begin, begin + Duration::minutes(30), None)
            .await
            .expect("failed to insert entry");
        database
            .insert_manual_entry(
                task.id,
                begin + Duration::hours(1),
                begin + Duration::hours(2),
                None,
            )
            .await
            .expect("failed to insert entry");

        // Act
        let report = database
            .fetch_report_between(NOW - Duration::days(1), NOW, TaskStatus::Active, 10)
            .await
            .expect("failed to load report");

        // Assert
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].num_entries, 2);
        assert_eq!(report[0].secs_spent, 5400);
    }
}
