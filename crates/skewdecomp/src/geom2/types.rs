//! Affine map and tolerances shared by the probe and the decomposer.
//!
//! - `Affine2`: 2D affine map, stored column-style (`x ↦ M x + t`) but addressed
//!   with the row-vector component names `m11..m22`, `tx`, `ty` (`p' = p·L + t`, `M = Lᵀ`).
//! - `DecompCfg`: identity threshold, right-angle threshold and probe side length.
//!
//! Code cross-refs: `probe::{Quad, ProbeState}`, `decompose::decompose_with`

use nalgebra::{Matrix2, Rotation2, Vector2};

/// Minimal component change treated as non-identity.
/// Tuned together with `ROTATE_EPS` for a total probe error below 0.3 at `PROBE_SIDE`.
pub const EPS: f64 = 1e-5;
/// Minimal deviation of the probe corner angle from π/2 treated as skew.
pub const ROTATE_EPS: f64 = 3e-4;
/// Side length of the canonical probe square.
pub const PROBE_SIDE: f64 = 100.0;

/// Decomposer configuration (tolerances).
///
/// Boundary policy: a deviation `<= eps` (resp. `<= rotate_eps`) counts as identity
/// (resp. right angle); only a strictly larger deviation is emitted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecompCfg {
    pub eps: f64,
    pub rotate_eps: f64,
    pub probe_side: f64,
}

impl Default for DecompCfg {
    fn default() -> Self {
        Self {
            eps: EPS,
            rotate_eps: ROTATE_EPS,
            probe_side: PROBE_SIDE,
        }
    }
}

impl DecompCfg {
    /// `x` is farther than `eps` from `target`.
    #[inline]
    pub fn differs(&self, x: f64, target: f64) -> bool {
        (x - target).abs() > self.eps
    }
    /// `x` is within `eps` of zero.
    #[inline]
    pub fn negligible(&self, x: f64) -> bool {
        x.abs() <= self.eps
    }
}

/// 2D affine map: `x ↦ M x + t` with `M = Lᵀ` for the row-vector matrix `L`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Affine2 {
    pub m: Matrix2<f64>,
    pub t: Vector2<f64>,
}

impl Affine2 {
    #[inline]
    pub fn identity() -> Self {
        Self {
            m: Matrix2::identity(),
            t: Vector2::zeros(),
        }
    }

    /// Build from row-vector components: `p' = (x·m11 + y·m21 + tx, x·m12 + y·m22 + ty)`.
    #[inline]
    pub fn from_components(m11: f64, m12: f64, m21: f64, m22: f64, tx: f64, ty: f64) -> Self {
        Self {
            m: Matrix2::new(m11, m21, m12, m22),
            t: Vector2::new(tx, ty),
        }
    }

    #[inline]
    pub fn scale(sx: f64, sy: f64) -> Self {
        Self {
            m: Matrix2::new(sx, 0.0, 0.0, sy),
            t: Vector2::zeros(),
        }
    }

    /// Counter-clockwise rotation by `theta` radians (y axis up).
    #[inline]
    pub fn rotation(theta: f64) -> Self {
        Self {
            m: Rotation2::new(theta).into_inner(),
            t: Vector2::zeros(),
        }
    }

    #[inline]
    pub fn translation(tx: f64, ty: f64) -> Self {
        Self {
            m: Matrix2::identity(),
            t: Vector2::new(tx, ty),
        }
    }

    #[inline]
    pub fn m11(&self) -> f64 {
        self.m[(0, 0)]
    }
    #[inline]
    pub fn m12(&self) -> f64 {
        self.m[(1, 0)]
    }
    #[inline]
    pub fn m21(&self) -> f64 {
        self.m[(0, 1)]
    }
    #[inline]
    pub fn m22(&self) -> f64 {
        self.m[(1, 1)]
    }
    #[inline]
    pub fn tx(&self) -> f64 {
        self.t.x
    }
    #[inline]
    pub fn ty(&self) -> f64 {
        self.t.y
    }

    /// Row-vector components `[m11, m12, m21, m22, tx, ty]`.
    pub fn components(&self) -> [f64; 6] {
        [
            self.m11(),
            self.m12(),
            self.m21(),
            self.m22(),
            self.tx(),
            self.ty(),
        ]
    }

    /// Same linear part, no translation.
    #[inline]
    pub fn linear(&self) -> Self {
        Self {
            m: self.m,
            t: Vector2::zeros(),
        }
    }

    /// Composition: apply `self` first, then `next`.
    #[inline]
    pub fn then(&self, next: &Affine2) -> Affine2 {
        Affine2 {
            m: next.m * self.m,
            t: next.m * self.t + next.t,
        }
    }

    #[inline]
    pub fn apply(&self, p: Vector2<f64>) -> Vector2<f64> {
        self.m * p + self.t
    }

    #[inline]
    pub fn apply_linear(&self, p: Vector2<f64>) -> Vector2<f64> {
        self.m * p
    }

    #[inline]
    pub fn determinant(&self) -> f64 {
        self.m.determinant()
    }

    pub fn is_finite(&self) -> bool {
        self.m.iter().chain(self.t.iter()).all(|x| x.is_finite())
    }

    /// Max-abs comparison of all six components.
    pub fn approx_eq(&self, other: &Affine2, tol: f64) -> bool {
        (self.m - other.m).amax() <= tol && (self.t - other.t).amax() <= tol
    }
}

impl Default for Affine2 {
    fn default() -> Self {
        Self::identity()
    }
}
