//! Database configuration module.
//!
//! This module handles the `SQLite` connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust
//! structs. The one constraint entities cannot express, one active gate pass
//! per student, is added as a partial unique index.

use crate::entities::{GatePass, Student};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use std::path::Path;
use tracing::{debug, info, instrument};

const DEFAULT_DATABASE_URL: &str = "sqlite://data/hostel_gate.sqlite?mode=rwc";

/// Partial unique index backing the one-active-pass-per-student rule.
const ACTIVE_PASS_INDEX: &str = "CREATE UNIQUE INDEX IF NOT EXISTS idx_one_active_gate_pass_per_student \
     ON gate_passes(student_id) \
     WHERE status IN ('pending', 'approved', 'out')";

/// Gets the database URL from environment variable or returns default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the `SQLite` database named by `DATABASE_URL`.
///
/// For file-backed databases the parent directory is created first so a fresh
/// checkout can start without manual setup.
#[instrument]
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();

    if let Some(file) = sqlite_file_path(&database_url) {
        if let Some(parent) = Path::new(file).parent() {
            if !parent.as_os_str().is_empty() {
                debug!("Ensuring database directory {:?} exists", parent);
                std::fs::create_dir_all(parent)?;
            }
        }
    }

    Database::connect(&database_url).await.map_err(Into::into)
}

/// File path of a file-backed `sqlite://` URL, without query parameters.
fn sqlite_file_path(url: &str) -> Option<&str> {
    let rest = url.strip_prefix("sqlite://")?;
    let path = rest.split('?').next().unwrap_or(rest);
    if path.is_empty() || path.contains(":memory:") {
        None
    } else {
        Some(path)
    }
}

/// Creates all necessary database tables and indexes if they do not exist yet.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut student_table = schema.create_table_from_entity(Student);
    student_table.if_not_exists();
    let mut gate_pass_table = schema.create_table_from_entity(GatePass);
    gate_pass_table.if_not_exists();

    db.execute(builder.build(&student_table)).await?;
    db.execute(builder.build(&gate_pass_table)).await?;
    db.execute_unprepared(ACTIVE_PASS_INDEX).await?;

    info!("Database tables ensured.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{GatePassModel, StudentModel};
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _: Vec<StudentModel> = Student::find().limit(1).all(&db).await?;
        let _: Vec<GatePassModel> = GatePass::find().limit(1).all(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_repeatable() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;
        Ok(())
    }

    #[test]
    fn test_sqlite_file_path() {
        assert_eq!(
            sqlite_file_path("sqlite://data/hostel_gate.sqlite?mode=rwc"),
            Some("data/hostel_gate.sqlite")
        );
        assert_eq!(sqlite_file_path("sqlite::memory:"), None);
        assert_eq!(sqlite_file_path("postgres://localhost/db"), None);
    }
}
