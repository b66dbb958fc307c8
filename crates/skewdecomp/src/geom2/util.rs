use nalgebra::Vector2;
use std::f64::consts::{PI, TAU};

/// Wrap an angle into (−π, π]. Non-finite input is returned unchanged.
#[inline]
pub fn normalize_angle(mut a: f64) -> f64 {
    if !a.is_finite() {
        return a;
    }
    while a > PI {
        a -= TAU;
    }
    while a <= -PI {
        a += TAU;
    }
    a
}

#[inline]
pub fn distance(p: Vector2<f64>, q: Vector2<f64>) -> f64 {
    (q - p).norm()
}

/// Direction of the ray `from → to`, in (−π, π].
#[inline]
pub fn direction(from: Vector2<f64>, to: Vector2<f64>) -> f64 {
    (to.y - from.y).atan2(to.x - from.x)
}

/// Signed angle at `vertex` from ray `vertex → to` to ray `vertex → from`, normalized.
#[inline]
pub fn angle_at(vertex: Vector2<f64>, from: Vector2<f64>, to: Vector2<f64>) -> f64 {
    normalize_angle(direction(vertex, from) - direction(vertex, to))
}
