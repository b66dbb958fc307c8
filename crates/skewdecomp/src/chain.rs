//! Hand-off to a host that nests transform nodes.
//!
//! The host implements `NodeSink`; `replay` feeds it one node per present step,
//! outermost last, or asks it to fall back when no decomposition exists.
//! `Layers` packs the chain into the two scale-rotate-translate layers a typical
//! scene-graph node offers, and `Rebuilder` skips work when the input is unchanged.

use nalgebra::Vector2;

use crate::decompose::{decompose_with, Decomposition, Primitive, Slot, Step, Strategy};
use crate::geom2::{Affine2, DecompCfg};

/// Receiver of the node chain.
pub trait NodeSink {
    /// Called before a new chain is pushed; previously built nodes become stale.
    fn begin(&mut self) {}
    /// One nested node applying exactly `step.primitive`.
    fn push(&mut self, step: &Step);
    /// No faithful chain exists; show the target at identity or hide it.
    fn fallback(&mut self);
}

/// Feed `decomposition` to `sink`. Returns `false` when the sink was told to fall back.
pub fn replay<S: NodeSink + ?Sized>(decomposition: Option<&Decomposition>, sink: &mut S) -> bool {
    sink.begin();
    match decomposition {
        Some(d) => {
            d.steps().iter().for_each(|s| sink.push(s));
            true
        }
        None => {
            sink.fallback();
            false
        }
    }
}

/// Local scale → rotate → translate node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Layer {
    pub scale: (f64, f64),
    pub rotation: f64,
    pub offset: Vector2<f64>,
}

impl Layer {
    pub fn identity() -> Self {
        Self {
            scale: (1.0, 1.0),
            rotation: 0.0,
            offset: Vector2::zeros(),
        }
    }

    pub fn to_affine(&self) -> Affine2 {
        Affine2::scale(self.scale.0, self.scale.1)
            .then(&Affine2::rotation(self.rotation))
            .then(&Affine2::translation(self.offset.x, self.offset.y))
    }
}

impl Default for Layer {
    fn default() -> Self {
        Self::identity()
    }
}

/// Two-layer packing: `inner` holds Scale1/Rotate1, `outer` holds Scale2/Rotate2/Translate.
/// A layer is `None` when none of its slots is present.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Layers {
    pub inner: Option<Layer>,
    pub outer: Option<Layer>,
}

impl Layers {
    pub fn group(d: &Decomposition) -> Self {
        let mut layers = Layers::default();
        for step in d.steps() {
            let layer = match step.slot {
                Slot::Scale1 | Slot::Rotate1 => layers.inner.get_or_insert_with(Layer::identity),
                Slot::Scale2 | Slot::Rotate2 | Slot::Translate => {
                    layers.outer.get_or_insert_with(Layer::identity)
                }
            };
            match step.primitive {
                Primitive::Scale { sx, sy } => layer.scale = (sx, sy),
                Primitive::Rotate(a) => layer.rotation = a,
                Primitive::Translate(t) => layer.offset = t,
            }
        }
        layers
    }

    /// Target nested in `inner`, nested in `outer`.
    pub fn compose(&self) -> Affine2 {
        let inner = self.inner.map(|l| l.to_affine()).unwrap_or_default();
        let outer = self.outer.map(|l| l.to_affine()).unwrap_or_default();
        inner.then(&outer)
    }
}

/// Outcome of `Rebuilder::update`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Update {
    /// Same matrix as last time; the sink was not touched.
    Unchanged,
    Rebuilt,
    Fallback,
}

/// Re-decomposes only when the input matrix changes.
#[derive(Clone, Debug, Default)]
pub struct Rebuilder {
    cfg: DecompCfg,
    prev: Option<Affine2>,
}

impl Rebuilder {
    pub fn new(cfg: DecompCfg) -> Self {
        Self { cfg, prev: None }
    }

    pub fn update<S: NodeSink + ?Sized>(&mut self, matrix: &Affine2, sink: &mut S) -> Update {
        if self.prev.as_ref() == Some(matrix) {
            return Update::Unchanged;
        }
        self.prev = Some(*matrix);
        let d = decompose_with(matrix, &self.cfg, Strategy::FastPaths);
        if replay(d.as_ref(), sink) {
            Update::Rebuilt
        } else {
            Update::Fallback
        }
    }
}
