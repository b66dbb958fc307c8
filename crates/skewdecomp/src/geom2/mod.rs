//! 2D geometry primitives for the probe decomposer.
//!
//! Purpose
//! - Hold the affine map type (`Affine2`), the tolerance block (`DecompCfg`) and the
//!   small vector helpers (distance, signed corner angle, angle wrap) every other
//!   module measures with.
//! - All helpers are pure; angle normalization is shared so that every caller
//!   compares angles in the same (−π, π] range.
//!
//! Code cross-refs: `probe::Quad`, `decompose::decompose_with`

mod types;
mod util;

pub use types::{Affine2, DecompCfg, EPS, PROBE_SIDE, ROTATE_EPS};
pub use util::{angle_at, direction, distance, normalize_angle};
