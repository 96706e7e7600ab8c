//! # VANTAGE Core
//!
//! Domain-free pieces of the snapshot cache:
//! - [`RecordArena`]: records merged by a stable key, updated in place
//! - [`SnapshotLock`]: the one lock producer and consumer share
//! - [`TickGate`]: makes per-tick work idempotent
//!
//! ## Architecture Rules
//!
//! 1. **One boundary** - every structural change happens under a single lock
//! 2. **Whole passes only** - readers see the last finished pass, never a partial one
//! 3. **Keys are borrowed, not owned** - a key is only trusted while it resolves
//!
//! ## Example
//!
//! ```rust,ignore
//! use vantage_core::{SnapshotLock, TickGate};
//!
//! let lock = SnapshotLock::new(State::default());
//! let gate = TickGate::new();
//! if gate.enter(sim.tick()) {
//!     let mut state = lock.write();
//!     state.rebuild(&sim);
//! } // published here
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod memory;
pub mod sync;

pub use memory::{Keyed, RecordArena, Upsert};
pub use sync::{ReadGuard, SnapshotLock, TickGate, WriteGuard};
