//! Probe quadrilateral measured by the decomposer.
//!
//! Purpose
//! - `Quad`: image of the canonical square under a linear part; every length and
//!   angle the triangle solve needs is a pure function of its four vertices.
//! - `Labeling`: which vertex plays A/B/C/D. The alternate view is used when the
//!   primary corner angle is obtuse (a folded image).
//! - `ProbeState`: quadrilateral + labeling, re-derived after each solved primitive.
//!
//! Code cross-refs: `geom2::{Affine2, angle_at}`, `decompose::trace`

mod quad;
mod state;

pub use quad::{Corners, Labeling, Quad};
pub use state::ProbeState;
