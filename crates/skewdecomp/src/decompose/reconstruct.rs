//! Rebuild affine maps from a decomposition and measure how close they land.

use super::types::{Decomposition, Primitive};
use crate::geom2::{distance, Affine2};
use crate::probe::Quad;

impl Primitive {
    pub fn to_affine(&self) -> Affine2 {
        match *self {
            Primitive::Scale { sx, sy } => Affine2::scale(sx, sy),
            Primitive::Rotate(a) => Affine2::rotation(a),
            Primitive::Translate(t) => Affine2::translation(t.x, t.y),
        }
    }
}

impl Decomposition {
    /// One matrix per present primitive, in application order.
    pub fn to_affines(&self) -> Vec<Affine2> {
        self.steps()
            .iter()
            .map(|s| s.primitive.to_affine())
            .collect()
    }

    /// Product of all primitives (identity when empty).
    pub fn compose(&self) -> Affine2 {
        self.steps()
            .iter()
            .fold(Affine2::identity(), |acc, s| acc.then(&s.primitive.to_affine()))
    }
}

/// Largest distance between the images of the probe corners under `matrix` and under
/// the composed `decomposition`. Translation included.
///
/// Infinite when any corner distance is NaN or infinite.
pub fn probe_error(matrix: &Affine2, decomposition: &Decomposition, side: f64) -> f64 {
    let composed = decomposition.compose();
    Quad::probe(side)
        .v
        .iter()
        .map(|&p| distance(matrix.apply(p), composed.apply(p)))
        .try_fold(0.0, |worst: f64, d| d.is_finite().then(|| worst.max(d)))
        .unwrap_or(f64::INFINITY)
}
