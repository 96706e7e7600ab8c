//! View frustum tests for actor visibility.
//!
//! Planes are extracted from the view-projection matrix each pass and
//! bounding boxes are tested against them.

mod frustum;

pub use frustum::{Frustum, Plane};
