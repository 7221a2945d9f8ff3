//! Domain logic for the fundra campaign and donation engine.
//!
//! Pure functions, state machines, and constants shared by the persistence
//! and API layers. Nothing in this crate performs I/O.

pub mod campaign;
pub mod donation;
pub mod error;
pub mod policy;
pub mod progress;
pub mod roles;
pub mod school;
pub mod signing;
pub mod status;
pub mod tier;
pub mod types;
