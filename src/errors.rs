//! Unified error types for the gate pass service.
//!
//! Every variant's `Display` text is written for the actor on the other side
//! of the bot (student, admin, gate operator) and is shown to them verbatim.

use crate::entities::GatePassStatus;
use thiserror::Error;

/// All failures surfaced by the service.
#[derive(Debug, Error)]
pub enum Error {
    /// The student id did not resolve in the student directory
    #[error("Student not found: {id}")]
    UnknownStudent {
        /// The id that failed to resolve
        id: String,
    },

    /// The student already holds a pending, approved or out pass
    #[error("You already have an active gate pass request.")]
    DuplicateActivePass {
        /// The student holding the active pass
        student_id: String,
    },

    /// No gate pass matches the given id (and student, for gate scans)
    #[error("Gate pass not found: {id}")]
    PassNotFound {
        /// The pass id that was looked up
        id: String,
    },

    /// A scanned code could not be decoded into the expected shape
    #[error("Invalid QR code: {reason}")]
    MalformedPayload {
        /// What was wrong with the payload
        reason: String,
    },

    /// The requested event is not allowed from the pass's current status
    #[error("Cannot update status. Current status is {}.", .status.as_str())]
    InvalidTransition {
        /// Status the pass held when the event was rejected
        status: GatePassStatus,
    },

    /// A departure or return date was left blank
    #[error("Both the departure and return dates are required.")]
    MissingTripDates,

    /// The trip starts after it ends
    #[error("Invalid date range: {from} is after {to}")]
    InvalidDateRange {
        /// Departure as supplied
        from: String,
        /// Return as supplied
        to: String,
    },

    /// Configuration could not be loaded or is inconsistent
    #[error("Configuration error: {message}")]
    Config {
        /// Details about the configuration problem
        message: String,
    },

    /// Record store failure, propagated without interpretation
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Payload encoding failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O failure (config file reads)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or unreadable environment variable
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Discord gateway or HTTP failure
    #[error("Serenity/Poise framework error: {0}")]
    #[allow(clippy::enum_variant_names)]
    FrameworkError(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::FrameworkError(Box::new(value))
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
