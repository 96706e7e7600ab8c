//! # Synchronization Primitives for the Snapshot Cache
//!
//! ## The Problem
//!
//! ```text
//! Thread 1 (Simulation tick):  REBUILD every container
//! Thread 2 (Render frame):     READ containers, project points
//!
//! Without synchronization: torn snapshot (half old, half new)
//! ```
//!
//! ## The Solution: One Coarse Lock, Whole Passes
//!
//! ```text
//! Tick N:
//!   TickGate::enter(N)      → false if N was already processed
//!   SnapshotLock::write()   → exclusive for the entire pass
//!   drop(guard)             → generation += 1 (published)
//!
//! Render frame:
//!   SnapshotLock::read()    → sees pass N-1 or pass N, never in between
//! ```
//!
//! The pass is CPU-bound and proportional to entity count, so a plain
//! mutex is cheaper than any multi-buffer scheme here.

mod snapshot_lock;

pub use snapshot_lock::{ReadGuard, SnapshotLock, TickGate, WriteGuard};
