//! Adapters that live inside the domain crate for convenience.
//!
//! The in-memory backend serves unit tests and hosts that do not need
//! durability. The SQLite backend lives in its own crate.

pub mod memory_repo;
