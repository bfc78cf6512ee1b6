//! Gate pass entity - one row per request cycle of a student.
//!
//! The student's name and roll number are copied in at submission time and are
//! never refreshed, so a pass stays a faithful historical record.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a gate pass, stored as lowercase text.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum GatePassStatus {
    /// Submitted by the student, waiting for an admin decision
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Approved; the gate payload has been issued
    #[sea_orm(string_value = "approved")]
    Approved,
    /// Student has been scanned out at the gate
    #[sea_orm(string_value = "out")]
    Out,
    /// Student has been scanned back in (terminal)
    #[sea_orm(string_value = "in")]
    In,
    /// Refused by an admin (terminal)
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl GatePassStatus {
    /// Statuses that still block the student from applying again.
    pub const ACTIVE: [Self; 3] = [Self::Pending, Self::Approved, Self::Out];

    /// The stored/displayed form of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Out => "out",
            Self::In => "in",
            Self::Rejected => "rejected",
        }
    }

    /// `IN` and `REJECTED` end the lifecycle.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::In | Self::Rejected)
    }
}

/// Gate pass database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "gate_passes")]
pub struct Model {
    /// Opaque pass id, also the admin approval token
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Directory id of the requesting student
    pub student_id: String,
    /// Student name at submission time
    pub student_name: String,
    /// Student roll number at submission time
    pub roll_number: String,
    /// Reason for leaving
    pub reason: String,
    /// Departure, stored exactly as supplied
    pub from_date: String,
    /// Return, stored exactly as supplied
    pub to_date: String,
    /// Current lifecycle status
    pub status: GatePassStatus,
    /// Content of the admin approval QR code; always equal to `id`
    pub approval_qr_code_data: String,
    /// Gate payload JSON, set once when the pass is approved
    #[sea_orm(column_type = "Text", nullable)]
    pub qr_code_data: Option<String>,
    /// When the student applied
    pub created_at: DateTimeUtc,
    /// Last status change
    pub updated_at: DateTimeUtc,
}

/// Gate passes reference students by id only; the directory may live elsewhere
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
