//! Hostel configuration loading from config.toml
//!
//! The file seeds the student directory and names the Discord users acting as
//! hostel admins and gate security.

use crate::{
    core::lifecycle::Actor,
    errors::{Error, Result},
};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize)]
pub struct HostelConfig {
    /// Students to seed into the directory
    #[serde(default)]
    pub students: Vec<StudentConfig>,
    /// Staff role assignments
    #[serde(default)]
    pub staff: StaffConfig,
}

/// Configuration for a single student
#[derive(Debug, Deserialize, Clone)]
pub struct StudentConfig {
    /// Directory id
    pub id: String,
    /// Full name
    pub name: String,
    /// Institute roll number
    pub roll_number: String,
    /// Contact email
    pub email: String,
    /// Linked Discord user, if the student uses the bot
    #[serde(default)]
    pub discord_user_id: Option<String>,
}

/// Discord users with staff roles
#[derive(Debug, Deserialize, Clone, Default)]
pub struct StaffConfig {
    /// Users allowed to approve and reject gate passes
    #[serde(default)]
    pub admin_user_ids: Vec<String>,
    /// Users allowed to scan gate payloads
    #[serde(default)]
    pub gate_user_ids: Vec<String>,
}

impl StaffConfig {
    /// Whether the Discord user may act as `actor`.
    ///
    /// Admins may also operate the gate scanner; students are recognised through
    /// the directory, not through this table.
    #[must_use]
    pub fn allows(&self, discord_user_id: &str, actor: Actor) -> bool {
        let is_admin = self.admin_user_ids.iter().any(|id| id == discord_user_id);
        match actor {
            Actor::Admin => is_admin,
            Actor::Gate => is_admin || self.gate_user_ids.iter().any(|id| id == discord_user_id),
            Actor::Student => false,
        }
    }
}

impl HostelConfig {
    /// Rejects duplicate student ids or roll numbers before anything is seeded.
    pub fn validate(&self) -> Result<()> {
        let mut ids = std::collections::HashSet::new();
        let mut rolls = std::collections::HashSet::new();
        for student in &self.students {
            if !ids.insert(student.id.as_str()) {
                return Err(Error::Config {
                    message: format!("Duplicate student id '{}' in config", student.id),
                });
            }
            if !rolls.insert(student.roll_number.as_str()) {
                return Err(Error::Config {
                    message: format!(
                        "Duplicate roll number '{}' in config",
                        student.roll_number
                    ),
                });
            }
        }
        Ok(())
    }
}

/// Loads hostel configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing or students are duplicated
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<HostelConfig> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    let config: HostelConfig = toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {}: {e}", path_ref.display()),
    })?;
    config.validate()?;
    Ok(config)
}

/// Loads configuration from `HOSTEL_CONFIG`, falling back to `./config.toml`.
pub fn load_default_config() -> Result<HostelConfig> {
    let path = std::env::var("HOSTEL_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    load_config(path)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    const SAMPLE: &str = r#"
        [[students]]
        id = "student1"
        name = "Alice Smith"
        roll_number = "S2021001"
        email = "alice@example.com"
        discord_user_id = "1001"

        [[students]]
        id = "student2"
        name = "Bob Johnson"
        roll_number = "S2021002"
        email = "bob@example.com"

        [staff]
        admin_user_ids = ["2001"]
        gate_user_ids = ["3001"]
    "#;

    #[test]
    fn test_parse_hostel_config() {
        let config: HostelConfig = toml::from_str(SAMPLE).unwrap();
        assert_eq!(config.students.len(), 2);
        assert_eq!(config.students[0].discord_user_id.as_deref(), Some("1001"));
        assert!(config.students[1].discord_user_id.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_staff_roles() {
        let config: HostelConfig = toml::from_str(SAMPLE).unwrap();
        let staff = &config.staff;
        assert!(staff.allows("2001", Actor::Admin));
        assert!(staff.allows("2001", Actor::Gate));
        assert!(staff.allows("3001", Actor::Gate));
        assert!(!staff.allows("3001", Actor::Admin));
        assert!(!staff.allows("1001", Actor::Gate));
        assert!(!staff.allows("2001", Actor::Student));
    }

    #[test]
    fn test_empty_config_defaults() {
        let config: HostelConfig = toml::from_str("").unwrap();
        assert!(config.students.is_empty());
        assert!(config.staff.admin_user_ids.is_empty());
    }

    #[test]
    fn test_duplicate_roll_numbers_rejected() {
        let toml_str = r#"
            [[students]]
            id = "a"
            name = "A"
            roll_number = "R1"
            email = "a@example.com"

            [[students]]
            id = "b"
            name = "B"
            roll_number = "R1"
            email = "b@example.com"
        "#;
        let config: HostelConfig = toml::from_str(toml_str).unwrap();
        assert!(matches!(config.validate(), Err(Error::Config { .. })));
    }
}
