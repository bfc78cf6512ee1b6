//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Gate pass lifecycle commands
pub mod gate_pass;

/// General utility commands
pub mod general;

// Export commands
pub use gate_pass::*;
pub use general::*;
