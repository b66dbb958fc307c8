//! Decomposition of skewed 2D affine maps into scale/rotate/translate chains.
//!
//! Purpose
//! - Hosts that only nest rotation, (non-uniform) scale and translation cannot
//!   express skew directly. `decompose` returns the chain
//!   `Scale1 → Rotate1 → Scale2 → Rotate2 → Translate` whose product reproduces
//!   the input within tolerance (< 0.3 units on the default 100-unit probe).
//!
//! Layout
//! - `types.rs`: `Slot`, `Primitive`, `Step`, `Decomposition`, `Strategy`, `PathKind`.
//! - `solve.rs`: classification, shortcuts and the triangle solve (`trace`).
//! - `reconstruct.rs`: composition back to `Affine2` and probe error.
//!
//! Code cross-refs: `probe::{ProbeState, Labeling}`, `geom2::DecompCfg`, `chain::replay`

mod reconstruct;
mod solve;
mod types;

pub use reconstruct::probe_error;
pub use solve::{classify, decompose, decompose_with, trace, Trace};
pub use types::{Decomposition, PathKind, Primitive, Slot, Step, Strategy};
