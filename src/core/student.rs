//! Student directory - resolves student ids into the details a gate pass snapshots.
//!
//! The gate pass manager only depends on the [`StudentDirectory`] trait; the
//! database-backed implementation below is the one the bot uses.

use crate::{
    config::hostel::StudentConfig,
    entities::{Student, StudentModel, student},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use std::future::Future;
use tracing::{debug, info, instrument};

/// Lookup of students by directory id.
pub trait StudentDirectory {
    /// Returns the student with `id`, or `None` if the directory has no such student.
    fn resolve_student(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<StudentModel>>> + Send;
}

impl StudentDirectory for DatabaseConnection {
    async fn resolve_student(&self, id: &str) -> Result<Option<StudentModel>> {
        get_student_by_id(self, id).await
    }
}

/// Finds a student by directory id.
pub async fn get_student_by_id<C>(db: &C, id: &str) -> Result<Option<StudentModel>>
where
    C: ConnectionTrait,
{
    Student::find_by_id(id.to_string())
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds the student linked to a Discord user, used to map command authors to students.
pub async fn get_student_by_discord_id(
    db: &DatabaseConnection,
    discord_user_id: &str,
) -> Result<Option<StudentModel>> {
    Student::find()
        .filter(student::Column::DiscordUserId.eq(discord_user_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists the whole directory ordered by roll number.
pub async fn list_students(db: &DatabaseConnection) -> Result<Vec<StudentModel>> {
    Student::find()
        .order_by_asc(student::Column::RollNumber)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Adds a student to the directory after validating the required fields.
pub async fn create_student(
    db: &DatabaseConnection,
    id: String,
    name: String,
    roll_number: String,
    email: String,
    discord_user_id: Option<String>,
) -> Result<StudentModel> {
    if id.trim().is_empty() || name.trim().is_empty() || roll_number.trim().is_empty() {
        return Err(Error::Config {
            message: "Student id, name and roll number cannot be empty".to_string(),
        });
    }

    let student = student::ActiveModel {
        id: Set(id.trim().to_string()),
        name: Set(name.trim().to_string()),
        roll_number: Set(roll_number.trim().to_string()),
        email: Set(email.trim().to_string()),
        discord_user_id: Set(discord_user_id),
        created_at: Set(chrono::Utc::now()),
    };

    student.insert(db).await.map_err(Into::into)
}

/// Seeds the directory from configuration.
///
/// Existing students get their contact details refreshed; passes already filed
/// keep the snapshot they were created with.
#[instrument(skip(db, students), fields(count = students.len()))]
pub async fn seed_students(db: &DatabaseConnection, students: &[StudentConfig]) -> Result<()> {
    for cfg in students {
        match get_student_by_id(db, &cfg.id).await? {
            Some(existing) => {
                debug!("Student '{}' already present, refreshing details", cfg.id);
                let mut active: student::ActiveModel = existing.into();
                active.name = Set(cfg.name.clone());
                active.roll_number = Set(cfg.roll_number.clone());
                active.email = Set(cfg.email.clone());
                active.discord_user_id = Set(cfg.discord_user_id.clone());
                active.update(db).await?;
            }
            None => {
                info!("Adding student '{}' ({})", cfg.id, cfg.roll_number);
                create_student(
                    db,
                    cfg.id.clone(),
                    cfg.name.clone(),
                    cfg.roll_number.clone(),
                    cfg.email.clone(),
                    cfg.discord_user_id.clone(),
                )
                .await?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_resolve_student() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_student(&db, "s1").await?;

        let found = db.resolve_student("s1").await?.unwrap();
        assert_eq!(found.name, "Student s1");
        assert!(db.resolve_student("missing").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_create_student_validation() -> Result<()> {
        let db = setup_test_db().await?;
        let result = create_student(
            &db,
            "s1".to_string(),
            "  ".to_string(),
            "R1".to_string(),
            "s1@example.com".to_string(),
            None,
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::Config { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_seed_students_is_idempotent_and_refreshes() -> Result<()> {
        let db = setup_test_db().await?;
        let mut configs = vec![StudentConfig {
            id: "student1".to_string(),
            name: "Alice Smith".to_string(),
            roll_number: "S2021001".to_string(),
            email: "alice@example.com".to_string(),
            discord_user_id: Some("111".to_string()),
        }];

        seed_students(&db, &configs).await?;
        seed_students(&db, &configs).await?;
        assert_eq!(list_students(&db).await?.len(), 1);

        configs[0].email = "alice.smith@example.com".to_string();
        seed_students(&db, &configs).await?;
        let alice = get_student_by_discord_id(&db, "111").await?.unwrap();
        assert_eq!(alice.email, "alice.smith@example.com");
        Ok(())
    }
}
