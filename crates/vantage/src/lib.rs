//! # VANTAGE
//!
//! Soak driver for the snapshot cache. Runs a seeded scripted world on a
//! producer thread and a headless overlay on a consumer thread, both going
//! through the same [`SnapshotCache`](vantage_snapshot::SnapshotCache).
//!
//! ```text
//! ┌──────────────┐  advance()   ┌───────────────┐  read()/project()  ┌──────────────┐
//! │  SoakWorld   │─────────────>│ SnapshotCache │<───────────────────│   overlay    │
//! │  (producer)  │              └───────────────┘                    │  (consumer)  │
//! └──────┬───────┘                                                   └──────┬───────┘
//!        │ PassStats                                    FrameStats          │
//!        └──────────────────────> main thread <─────────────────────────────┘
//!                                 (per-second summaries)
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod backend;
pub mod config;
pub mod driver;
pub mod world;

pub use backend::{solid_png, HeadlessBackend};
pub use config::{SoakConfig, SoakError, SoakResult};
pub use driver::{run, SoakReport};
pub use world::SoakWorld;

/// Re-export the cache crate so the binary needs one import path.
pub use vantage_snapshot as snapshot;
