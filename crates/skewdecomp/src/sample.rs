//! Random affine maps for sweeps, benches and property checks.
//!
//! Model
//! - Every linear entry is uniform on `[-linear_range, linear_range]`; off-diagonal
//!   entries can be pushed away from zero (`min_off_diagonal`) so that draws exercise
//!   the triangle solve instead of the diagonal shortcut.
//! - Determinism uses a replay token `(seed, index)` mixed into a single RNG, so the
//!   i-th draw of a sweep can be regenerated alone.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::geom2::Affine2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampleCfg {
    pub linear_range: f64,
    pub translation_range: f64,
    /// Lower bound on `|m12|` and `|m21|`. Clamped to `[0, linear_range]`.
    pub min_off_diagonal: f64,
}

impl Default for SampleCfg {
    fn default() -> Self {
        Self {
            linear_range: 3.0,
            translation_range: 50.0,
            min_off_diagonal: 0.0,
        }
    }
}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    #[inline]
    pub fn new(seed: u64, index: u64) -> Self {
        Self { seed, index }
    }

    fn to_std_rng(self) -> StdRng {
        // SplitMix64 finalizer.
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        StdRng::seed_from_u64(mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15))))
    }
}

pub fn draw_affine(cfg: SampleCfg, tok: ReplayToken) -> Affine2 {
    let mut rng = tok.to_std_rng();
    let r = cfg.linear_range.abs();
    let lo = cfg.min_off_diagonal.clamp(0.0, r);
    let entry = |rng: &mut StdRng| if r > 0.0 { rng.gen_range(-r..=r) } else { 0.0 };
    let m11 = entry(&mut rng);
    let m22 = entry(&mut rng);
    let m12 = off_diagonal(&mut rng, lo, r);
    let m21 = off_diagonal(&mut rng, lo, r);
    let t = cfg.translation_range.abs();
    let (tx, ty) = if t > 0.0 {
        (rng.gen_range(-t..=t), rng.gen_range(-t..=t))
    } else {
        (0.0, 0.0)
    };
    Affine2::from_components(m11, m12, m21, m22, tx, ty)
}

/// `count` consecutive draws starting at index 0.
pub fn draw_batch(cfg: SampleCfg, seed: u64, count: u64) -> impl Iterator<Item = Affine2> {
    (0..count).map(move |index| draw_affine(cfg, ReplayToken::new(seed, index)))
}

fn off_diagonal(rng: &mut StdRng, lo: f64, hi: f64) -> f64 {
    if hi <= 0.0 {
        return 0.0;
    }
    let mag = if lo < hi { rng.gen_range(lo..=hi) } else { hi };
    if rng.gen::<bool>() {
        mag
    } else {
        -mag
    }
}
