//! Deterministic, pure logic shared by the route session.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! snapshots and return deterministic outputs suitable for tests.

pub mod bounds;
pub mod invariants;
pub mod map_view;
pub mod polyline;
pub mod preconditions;
pub mod status;
pub mod summary;
pub mod types;
