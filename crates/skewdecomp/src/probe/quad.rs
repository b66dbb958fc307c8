//! Probe quadrilateral and its two corner labelings.

use nalgebra::Vector2;

use crate::geom2::{angle_at, direction, distance, Affine2};

/// Assignment of the four probe vertices to the named corners A, B, C, D.
///
/// - `Primary`: A=V1, B=V4, C=V3, D=V2.
/// - `Alternate`: A=V4, B=V3, C=V2, D=V1 (every role moves one corner along the
///   polygon; used when the primary corner angle at A is obtuse).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Labeling {
    #[default]
    Primary,
    Alternate,
}

/// Four ordered vertices V1..V4. Order encodes which probe corner each came from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quad {
    pub v: [Vector2<f64>; 4],
}

impl Quad {
    #[inline]
    pub fn new(v1: Vector2<f64>, v2: Vector2<f64>, v3: Vector2<f64>, v4: Vector2<f64>) -> Self {
        Self {
            v: [v1, v2, v3, v4],
        }
    }

    /// Canonical square `(0,0), (S,0), (S,S), (0,S)`.
    pub fn probe(side: f64) -> Self {
        Self::new(
            Vector2::new(0.0, 0.0),
            Vector2::new(side, 0.0),
            Vector2::new(side, side),
            Vector2::new(0.0, side),
        )
    }

    /// Image of every vertex under the linear part of `f` (translation dropped).
    pub fn transform(&self, f: &Affine2) -> Quad {
        Quad {
            v: self.v.map(|p| f.apply_linear(p)),
        }
    }

    pub fn corners(&self, labeling: Labeling) -> Corners {
        let [v1, v2, v3, v4] = self.v;
        match labeling {
            Labeling::Primary => Corners {
                a: v1,
                b: v4,
                c: v3,
                d: v2,
            },
            Labeling::Alternate => Corners {
                a: v4,
                b: v3,
                c: v2,
                d: v1,
            },
        }
    }
}

/// Named corners of a labeled quadrilateral with the derived lengths and angles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Corners {
    pub a: Vector2<f64>,
    pub b: Vector2<f64>,
    pub c: Vector2<f64>,
    pub d: Vector2<f64>,
}

impl Corners {
    #[inline]
    pub fn ab(&self) -> f64 {
        distance(self.a, self.b)
    }
    /// Diagonal length.
    #[inline]
    pub fn ac(&self) -> f64 {
        distance(self.a, self.c)
    }
    #[inline]
    pub fn ad(&self) -> f64 {
        distance(self.a, self.d)
    }
    #[inline]
    pub fn bac(&self) -> f64 {
        angle_at(self.a, self.b, self.c)
    }
    #[inline]
    pub fn cad(&self) -> f64 {
        angle_at(self.a, self.c, self.d)
    }
    #[inline]
    pub fn bad(&self) -> f64 {
        angle_at(self.a, self.b, self.d)
    }
    /// Projection of AB onto the diagonal AC.
    #[inline]
    pub fn ah(&self) -> f64 {
        self.ab() * self.bac().cos()
    }
    /// Signed offset of B from the diagonal line AC.
    #[inline]
    pub fn bh(&self) -> f64 {
        self.ab() * self.bac().sin()
    }
    /// Direction of the diagonal A → C.
    #[inline]
    pub fn diagonal_direction(&self) -> f64 {
        direction(self.a, self.c)
    }
}
