//! Core business logic - framework-agnostic gate pass lifecycle.
//!
//! Nothing in here knows about Discord; the bot layer calls these modules and
//! renders their results.

/// Gate pass lifecycle manager and gate pass queries
pub mod gate_pass;
/// Status transition table and actor rules
pub mod lifecycle;
/// Fire-and-forget student notifications
pub mod notify;
/// Approval token and gate payload codecs
pub mod payload;
/// Student directory lookups and seeding
pub mod student;
