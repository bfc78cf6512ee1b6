//! Entity module - Contains the SeaORM entity definitions for the database.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod gate_pass;
pub mod student;

pub use gate_pass::{
    Column as GatePassColumn, Entity as GatePass, GatePassStatus, Model as GatePassModel,
};
pub use student::{Column as StudentColumn, Entity as Student, Model as StudentModel};
