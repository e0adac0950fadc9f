//! Repository layer: the in-memory book and its SQLite snapshot storage.
//!
//! # Responsibility
//! - Define the store contract used by commands (`BookRepository`).
//! - Keep SQL details inside the snapshot persistence boundary.
//!
//! # Invariants
//! - Repository writes enforce identity uniqueness before mutating.
//! - Snapshot reads reject invalid persisted state instead of masking it.

pub mod book_repo;
pub mod snapshot_repo;
