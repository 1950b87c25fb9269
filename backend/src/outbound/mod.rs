//! Outbound adapters implementing the repository ports.
//!
//! - **memory**: a process-local store; the default and the test backend.
//! - **persistence**: PostgreSQL repositories using Diesel.
//!
//! Adapters translate between storage representations and domain entities.
//! They contain no business logic.

pub mod memory;
pub mod persistence;
