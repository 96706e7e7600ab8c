//! # Record Storage
//!
//! Containers for snapshot records that outlive a single tick.
//!
//! ## Design Philosophy
//!
//! Records are looked up by the key the simulation gives us, not by where
//! they sit in the container. Sorting and eviction move records around
//! freely; the key index is rebuilt after every structural change.

mod arena;

pub use arena::{Keyed, RecordArena, Upsert};
