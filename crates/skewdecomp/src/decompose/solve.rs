//! Probe-based decomposition.
//!
//! - `decompose` / `decompose_with`: classify the matrix, take a shortcut for
//!   diagonal and rectangle images, otherwise run the triangle solve.
//! - `trace`: the triangle solve alone, returning every intermediate probe state.
//!
//! Model
//! - The linear part maps the probe square to a parallelogram `need`. Its diagonal
//!   AC and the altitude BH of B over AC fix two edge lengths; scaling the square
//!   to those lengths (Scale1), turning its diagonal onto the x axis (Rotate1),
//!   stretching diagonal and altitude to size (Scale2) and turning the diagonal
//!   to its target direction (Rotate2) rebuilds `need`.
//! - Translation never enters the probe; it is copied from the input.

use std::f64::consts::{FRAC_PI_2, PI};

use super::types::{Decomposition, PathKind, Primitive, Slot, Strategy};
use crate::geom2::{Affine2, DecompCfg};
use crate::probe::{Labeling, ProbeState};

/// Decompose with default tolerances and both shortcuts enabled.
///
/// Returns `None` when the probe image is degenerate (singular linear part, or so
/// close to singular that the triangle solve yields non-finite factors), i.e. no
/// scale/rotate chain reproduces it, or when a component is not finite.
pub fn decompose(matrix: &Affine2) -> Option<Decomposition> {
    decompose_with(matrix, &DecompCfg::default(), Strategy::FastPaths)
}

pub fn decompose_with(
    matrix: &Affine2,
    cfg: &DecompCfg,
    strategy: Strategy,
) -> Option<Decomposition> {
    if !matrix.is_finite() {
        return None;
    }
    let linear = linear_part(matrix, cfg, strategy)?;
    if cfg.negligible(matrix.tx()) && cfg.negligible(matrix.ty()) {
        Some(linear)
    } else {
        Some(linear.with(Slot::Translate, Primitive::Translate(matrix.t)))
    }
}

/// Branch `decompose_with(.., Strategy::FastPaths)` takes for `matrix`.
pub fn classify(matrix: &Affine2, cfg: &DecompCfg) -> PathKind {
    if is_diagonal(matrix, cfg) {
        return PathKind::Diagonal;
    }
    let bad = ProbeState::square(cfg.probe_side)
        .transform(matrix)
        .corners()
        .bad();
    if is_right_angle(bad, cfg) {
        PathKind::Rectangle
    } else if labeling_for(bad) == Labeling::Alternate {
        PathKind::Folded
    } else {
        PathKind::Sheared
    }
}

/// Intermediate states of the triangle solve.
///
/// `start → scaled → rotated` is the partial reconstruction; `need` is the target.
/// Optional fields are `None` when the primitive is within tolerance of identity
/// (in which case the next state equals the previous one).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Trace {
    pub labeling: Labeling,
    pub need: ProbeState,
    pub start: ProbeState,
    pub scaled: ProbeState,
    pub rotated: ProbeState,
    /// Edge factors recovered from the triangle, after the labeling swap.
    pub ab_scale: f64,
    pub ad_scale: f64,
    pub scale1: Option<(f64, f64)>,
    pub rotate1: Option<f64>,
    pub scale2: Option<(f64, f64)>,
    pub rotate2: Option<f64>,
}

impl Trace {
    /// Linear primitives in application order.
    pub fn decomposition(&self) -> Decomposition {
        let mut d = Decomposition::default();
        if let Some((sx, sy)) = self.scale1 {
            d = d.with(Slot::Scale1, Primitive::Scale { sx, sy });
        }
        if let Some(a) = self.rotate1 {
            d = d.with(Slot::Rotate1, Primitive::Rotate(a));
        }
        if let Some((sx, sy)) = self.scale2 {
            d = d.with(Slot::Scale2, Primitive::Scale { sx, sy });
        }
        if let Some(a) = self.rotate2 {
            d = d.with(Slot::Rotate2, Primitive::Rotate(a));
        }
        d
    }
}

/// Run the triangle solve on the linear part of `matrix`, skipping both shortcuts.
pub fn trace(matrix: &Affine2, cfg: &DecompCfg) -> Option<Trace> {
    let need = ProbeState::square(cfg.probe_side).transform(matrix);
    let labeling = labeling_for(need.corners().bad());
    solve(need.relabel(labeling), cfg)
}

fn linear_part(matrix: &Affine2, cfg: &DecompCfg, strategy: Strategy) -> Option<Decomposition> {
    let fast = strategy == Strategy::FastPaths;
    if fast && is_diagonal(matrix, cfg) {
        return Some(diagonal(matrix, cfg));
    }
    let need = ProbeState::square(cfg.probe_side).transform(matrix);
    let bad = need.corners().bad();
    if fast && is_right_angle(bad, cfg) {
        return Some(rectangle(matrix, cfg));
    }
    solve(need.relabel(labeling_for(bad)), cfg).map(|t| t.decomposition())
}

#[inline]
fn is_diagonal(matrix: &Affine2, cfg: &DecompCfg) -> bool {
    cfg.negligible(matrix.m12()) && cfg.negligible(matrix.m21())
}

#[inline]
fn is_right_angle(bad: f64, cfg: &DecompCfg) -> bool {
    (bad - FRAC_PI_2).abs() <= cfg.rotate_eps
}

/// An obtuse corner at the primary A folds the image; read it from the next corner.
#[inline]
fn labeling_for(bad: f64) -> Labeling {
    if bad.abs() > FRAC_PI_2 {
        Labeling::Alternate
    } else {
        Labeling::Primary
    }
}

fn diagonal(matrix: &Affine2, cfg: &DecompCfg) -> Decomposition {
    let (sx, sy) = (matrix.m11(), matrix.m22());
    let d = Decomposition::default();
    if cfg.differs(sx, 1.0) || cfg.differs(sy, 1.0) {
        d.with(Slot::Scale2, Primitive::Scale { sx, sy })
    } else {
        d
    }
}

/// Rows of a rectangle image are orthogonal: their norms are the axis scales and
/// the second row fixes the rotation.
fn rectangle(matrix: &Affine2, cfg: &DecompCfg) -> Decomposition {
    let sx = matrix.m11().hypot(matrix.m12());
    let sy = matrix.m21().hypot(matrix.m22());
    let a = (-matrix.m21()).atan2(matrix.m22());
    let mut d = Decomposition::default();
    if cfg.differs(sx, 1.0) || cfg.differs(sy, 1.0) {
        d = d.with(Slot::Scale2, Primitive::Scale { sx, sy });
    }
    if cfg.differs(a, 0.0) {
        d = d.with(Slot::Rotate2, Primitive::Rotate(a));
    }
    d
}

fn solve(need: ProbeState, cfg: &DecompCfg) -> Option<Trace> {
    let labeling = need.labeling();
    let target = need.corners();
    let (ah, ac, bh) = (target.ah(), target.ac(), target.bh());
    let diagonal_dir = target.diagonal_direction();

    // Triangle over the diagonal: B sits at height `bh` above AC.
    let k = ah / ac;
    let abb = bh / (1.0 - k.abs()).sqrt();
    let bbcca = (bh / abb).acos();
    if bbcca.is_nan() {
        // bh == 0: the image collapsed onto a line.
        return None;
    }
    let add = bh / bbcca.sin();
    if !(abb.is_finite() && add.is_finite()) {
        // |k| below rounding: the triangle is flat even though the map is invertible.
        return None;
    }

    let start = ProbeState::square(cfg.probe_side).relabel(labeling);
    let (ab_scale, ad_scale) = match labeling {
        Labeling::Primary => (abb / start.corners().ab(), add / start.corners().ad()),
        Labeling::Alternate => (add / start.corners().ad(), abb / start.corners().ab()),
    };

    let scale1 =
        (cfg.differs(ad_scale, 1.0) || cfg.differs(ab_scale, 1.0)).then_some((ad_scale, ab_scale));
    let scaled = match scale1 {
        Some((sx, sy)) => start.transform(&Affine2::scale(sx, sy)),
        None => start,
    };

    // Turn the diagonal onto the x axis.
    let rot = match labeling {
        Labeling::Primary => -scaled.corners().cad(),
        Labeling::Alternate => FRAC_PI_2 - scaled.corners().cad(),
    };
    if !(ab_scale.is_finite() && ad_scale.is_finite() && rot.is_finite()) {
        return None;
    }
    let rotate1 = cfg.differs(rot, 0.0).then_some(rot);
    let rotated = match rotate1 {
        Some(a) => scaled.transform(&Affine2::rotation(a)),
        None => scaled,
    };

    let now = rotated.corners();
    let (ac_scale, bh_scale) = (ac / now.ac(), bh / now.bh());
    if !(ac_scale.is_finite() && bh_scale.is_finite()) {
        return None;
    }
    let scale2 =
        (cfg.differs(ac_scale, 1.0) || cfg.differs(bh_scale, 1.0)).then_some((ac_scale, bh_scale));

    // A mirrored first scale leaves the diagonal pointing backwards.
    let ang = if ab_scale < 0.0 {
        PI + diagonal_dir
    } else {
        diagonal_dir
    };
    let rotate2 = cfg.differs(ang, 0.0).then_some(ang);

    Some(Trace {
        labeling,
        need,
        start,
        scaled,
        rotated,
        ab_scale,
        ad_scale,
        scale1,
        rotate1,
        scale2,
        rotate2,
    })
}
