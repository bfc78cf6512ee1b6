//! Shared test utilities.
//!
//! This module provides helpers for setting up an in-memory database, seeding
//! students, and observing the notifications a manager sends.

use crate::{
    core::{
        gate_pass::GatePassManager,
        notify::{Notification, Notifier},
        student,
    },
    entities,
    errors::Result,
};
use sea_orm::DatabaseConnection;
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;

/// Manager type used throughout the tests.
pub type TestManager = GatePassManager<DatabaseConnection, Arc<RecordingNotifier>>;

/// Routes tracing output through the test harness. Safe to call repeatedly.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Builds a manager over a fresh database, resolving students from that same
/// database, and hands back the notifier so tests can inspect what was sent.
pub async fn setup_test_manager() -> Result<(TestManager, Arc<RecordingNotifier>)> {
    let db = setup_test_db().await?;
    let notifier = Arc::new(RecordingNotifier::default());
    let manager = GatePassManager::new(db.clone(), db, Arc::clone(&notifier));
    Ok((manager, notifier))
}

/// Creates a student with predictable details derived from `id`.
///
/// # Defaults
/// * `name`: `"Student {id}"`
/// * `roll_number`: `"ROLL-{id}"`
/// * `email`: `"{id}@example.com"`
/// * `discord_user_id`: None
pub async fn create_test_student(
    db: &DatabaseConnection,
    id: &str,
) -> Result<entities::StudentModel> {
    student::create_student(
        db,
        id.to_string(),
        format!("Student {id}"),
        format!("ROLL-{id}"),
        format!("{id}@example.com"),
        None,
    )
    .await
}

/// Notifier that keeps every notification in memory.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    /// Everything notified so far, oldest first.
    #[allow(clippy::unwrap_used)]
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    #[allow(clippy::unwrap_used)]
    fn notify(&self, notification: Notification) {
        self.sent.lock().unwrap().push(notification);
    }
}
