//! Student entity - the student directory the gate pass flow resolves against.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Student database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "students")]
pub struct Model {
    /// Directory id (e.g. `"student1"`)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Full name
    pub name: String,
    /// Institute roll number
    #[sea_orm(unique)]
    pub roll_number: String,
    /// Contact email
    pub email: String,
    /// Discord user linked to this student, used for commands and DMs
    #[sea_orm(nullable, unique)]
    pub discord_user_id: Option<String>,
    /// When the student was added to the directory
    pub created_at: DateTimeUtc,
}

/// `Student` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
