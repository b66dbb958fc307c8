//! Decomposition of skewed 2D affine maps into nested scale/rotate/translate steps.
//!
//! Hosts that only nest rotation, non-uniform scale and translation (scene graphs,
//! UI layout trees) cannot express shear directly. This crate measures the image of
//! a probe square under the input's linear part and solves for the chain
//! `Scale1 → Rotate1 → Scale2 → Rotate2 → Translate` that rebuilds it.
//!
//! Layout
//! - `geom2`: `Affine2`, tolerances (`DecompCfg`), angle/distance helpers.
//! - `probe`: probe quadrilateral, corner labelings, probe state.
//! - `decompose`: classification, shortcuts, triangle solve, reconstruction.
//! - `chain`: hand-off to a node-building host.
//! - `sample`: seeded random affine maps.
//!
//! Numerics
//! - A singular linear part (the probe collapses to a segment) yields `None`, as does
//!   a nearly singular one whose triangle solve produces non-finite factors. A
//!   returned decomposition never carries NaN or infinite values.
//! - Moderately conditioned inputs reconstruct within 0.3 units on the default
//!   100-unit probe; the error scales linearly with the probe side.

pub mod chain;
pub mod decompose;
pub mod geom2;
pub mod probe;
pub mod sample;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use decompose::{
    classify, decompose, decompose_with, probe_error, Decomposition, PathKind, Primitive, Slot,
    Step, Strategy,
};
pub use geom2::{Affine2, DecompCfg, EPS, PROBE_SIDE, ROTATE_EPS};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::chain::{replay, Layer, Layers, NodeSink, Rebuilder, Update};
    pub use crate::decompose::{
        classify, decompose, decompose_with, probe_error, trace, Decomposition, PathKind,
        Primitive, Slot, Step, Strategy, Trace,
    };
    pub use crate::geom2::{Affine2, DecompCfg};
    pub use crate::probe::{Labeling, ProbeState, Quad};
    pub use crate::sample::{draw_affine, draw_batch, ReplayToken, SampleCfg};
    pub use nalgebra::{Matrix2 as Mat2, Vector2 as Vec2};
}
