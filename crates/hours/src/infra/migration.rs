//! Embedded schema migrations recorded in the `migration_log` table.

use sqlx::{Row, SqlitePool};
use tracing::info;

use crate::infra::db::DbError;

/// Newest schema version this build knows how to produce.
pub const LATEST_SCHEMA_VERSION: i64 = 2;

struct Migration {
    sql: &'static str,
    version: i64,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        sql: include_str!("../../migrations/001_create_task_and_task_log.sql"),
        version: 1,
    },
    Migration {
        sql: include_str!("../../migrations/002_index_task_log.sql"),
        version: 2,
    },
];

/// Applies every migration newer than the recorded schema version.
///
/// Each migration runs in its own transaction together with its
/// `migration_log` row, so a failed upgrade leaves the previous version intact.
///
/// # Errors
/// Returns [`DbError::SchemaTooNew`] when the file was written by a newer
/// build, or [`DbError::Query`] when any statement fails.
pub async fn run(pool: &SqlitePool, applied_at: i64) -> Result<(), DbError> {
    sqlx::raw_sql(
        r"
CREATE TABLE IF NOT EXISTS migration_log (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    version    INTEGER NOT NULL,
    created_at INTEGER NOT NULL
)
        ",
    )
    .execute(pool)
    .await
    .map_err(DbError::query("create migration log"))?;

    let current_version = current_version(pool).await?;
    if current_version > LATEST_SCHEMA_VERSION {
        return Err(DbError::SchemaTooNew {
            found: current_version,
            supported: LATEST_SCHEMA_VERSION,
        });
    }

    for migration in MIGRATIONS
        .iter()
        .filter(|migration| migration.version > current_version)
    {
        let mut transaction = pool
            .begin()
            .await
            .map_err(DbError::query("begin migration"))?;

        sqlx::raw_sql(migration.sql)
            .execute(&mut *transaction)
            .await
            .map_err(DbError::query("apply migration"))?;

        sqlx::query(
            r"
INSERT INTO migration_log (version, created_at)
VALUES (?, ?)
            ",
        )
        .bind(migration.version)
        .bind(applied_at)
        .execute(&mut *transaction)
        .await
        .map_err(DbError::query("record migration"))?;

        transaction
            .commit()
            .await
            .map_err(DbError::query("commit migration"))?;

        info!(version = migration.version, "applied schema migration");
    }

    Ok(())
}

/// Returns the highest version recorded in `migration_log`, or `0`.
///
/// # Errors
/// Returns [`DbError::Query`] when the lookup fails.
pub async fn current_version(pool: &SqlitePool) -> Result<i64, DbError> {
    let row = sqlx::query(
        r"
SELECT COALESCE(MAX(version), 0) AS version
FROM migration_log
        ",
    )
    .fetch_one(pool)
    .await
    .map_err(DbError::query("read schema version"))?;

    Ok(row.get("version"))
}
