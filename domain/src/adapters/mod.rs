//! In-process adapters that live inside the domain crate for convenience.
//!
//! These back unit tests and the `memory` storage provider. The durable
//! SQLite adapter lives in its own crate.

pub mod memory_store;
