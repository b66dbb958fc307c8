//! Result types of the decomposer.
//!
//! A `Decomposition` is an ordered list of steps; each step carries the slot it
//! fills in the fixed application order and the primitive itself. Absent slots
//! are identity.

use nalgebra::Vector2;

/// Position in the application order `Scale1 → Rotate1 → Scale2 → Rotate2 → Translate`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Slot {
    Scale1,
    Rotate1,
    Scale2,
    Rotate2,
    Translate,
}

impl Slot {
    pub const ALL: [Slot; 5] = [
        Slot::Scale1,
        Slot::Rotate1,
        Slot::Scale2,
        Slot::Rotate2,
        Slot::Translate,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Slot::Scale1 => "scale1",
            Slot::Rotate1 => "rotate1",
            Slot::Scale2 => "scale2",
            Slot::Rotate2 => "rotate2",
            Slot::Translate => "translate",
        }
    }
}

/// Transform a host can apply natively.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Primitive {
    /// Non-uniform scale; factors may be negative for mirrored inputs.
    Scale { sx: f64, sy: f64 },
    /// Counter-clockwise rotation in radians (not wrapped).
    Rotate(f64),
    Translate(Vector2<f64>),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Step {
    pub slot: Slot,
    pub primitive: Primitive,
}

/// Which branch of the decomposer handles a matrix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PathKind {
    /// No off-diagonal terms: a single axis scale.
    Diagonal,
    /// Probe image is a rectangle: scale then rotation, no skew.
    Rectangle,
    /// Full triangle solve, primary labeling.
    Sheared,
    /// Full triangle solve, alternate labeling (obtuse primary corner).
    Folded,
}

impl PathKind {
    pub fn name(self) -> &'static str {
        match self {
            PathKind::Diagonal => "diagonal",
            PathKind::Rectangle => "rectangle",
            PathKind::Sheared => "sheared",
            PathKind::Folded => "folded",
        }
    }
}

/// Whether the diagonal and rectangle shortcuts run before the triangle solve.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Strategy {
    #[default]
    FastPaths,
    /// Always run the triangle solve (same reconstruction, more explicit steps).
    General,
}

/// Ordered primitives reproducing an affine map.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Decomposition {
    steps: Vec<Step>,
}

impl Decomposition {
    #[inline]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// No primitive differs from identity.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, slot: Slot) -> Option<Primitive> {
        self.steps
            .iter()
            .find(|s| s.slot == slot)
            .map(|s| s.primitive)
    }

    pub fn scale1(&self) -> Option<(f64, f64)> {
        self.scale_at(Slot::Scale1)
    }
    pub fn rotate1(&self) -> Option<f64> {
        self.rotate_at(Slot::Rotate1)
    }
    pub fn scale2(&self) -> Option<(f64, f64)> {
        self.scale_at(Slot::Scale2)
    }
    pub fn rotate2(&self) -> Option<f64> {
        self.rotate_at(Slot::Rotate2)
    }
    pub fn translate(&self) -> Option<Vector2<f64>> {
        match self.get(Slot::Translate)? {
            Primitive::Translate(t) => Some(t),
            _ => None,
        }
    }

    fn scale_at(&self, slot: Slot) -> Option<(f64, f64)> {
        match self.get(slot)? {
            Primitive::Scale { sx, sy } => Some((sx, sy)),
            _ => None,
        }
    }

    fn rotate_at(&self, slot: Slot) -> Option<f64> {
        match self.get(slot)? {
            Primitive::Rotate(a) => Some(a),
            _ => None,
        }
    }

    /// Insert (or replace) `slot`, keeping steps in slot order.
    pub(crate) fn with(mut self, slot: Slot, primitive: Primitive) -> Self {
        let step = Step { slot, primitive };
        match self.steps.binary_search_by(|s| s.slot.cmp(&slot)) {
            Ok(i) => self.steps[i] = step,
            Err(i) => self.steps.insert(i, step),
        }
        self
    }
}
