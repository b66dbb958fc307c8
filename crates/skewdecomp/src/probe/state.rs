//! Probe state: a quadrilateral plus the labeling the solver reads it through.

use super::quad::{Corners, Labeling, Quad};
use crate::geom2::Affine2;

/// Immutable probe snapshot. Transforming yields a new state with the same labeling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProbeState {
    quad: Quad,
    labeling: Labeling,
}

impl ProbeState {
    #[inline]
    pub fn new(quad: Quad, labeling: Labeling) -> Self {
        Self { quad, labeling }
    }

    /// Untransformed probe square, primary labeling.
    pub fn square(side: f64) -> Self {
        Self::new(Quad::probe(side), Labeling::Primary)
    }

    #[inline]
    pub fn quad(&self) -> &Quad {
        &self.quad
    }

    #[inline]
    pub fn labeling(&self) -> Labeling {
        self.labeling
    }

    /// Corners under the active labeling.
    #[inline]
    pub fn corners(&self) -> Corners {
        self.quad.corners(self.labeling)
    }

    #[inline]
    pub fn relabel(self, labeling: Labeling) -> Self {
        Self { labeling, ..self }
    }

    pub fn transform(&self, f: &Affine2) -> Self {
        Self {
            quad: self.quad.transform(f),
            labeling: self.labeling,
        }
    }
}
