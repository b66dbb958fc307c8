//! Reconstruction properties over random inputs.
//!
//! The composed chain must land every probe corner within 0.3 units of the input's
//! image (100-unit probe), and the shortcut paths must agree with the full solve.

use proptest::prelude::*;
use skewdecomp::chain::Layers;
use skewdecomp::sample::{draw_batch, SampleCfg};
use skewdecomp::{
    decompose, decompose_with, probe_error, Affine2, DecompCfg, Strategy as Path, PROBE_SIDE,
};

const TOL: f64 = 0.3;

fn affine(range: f64, shift: f64) -> impl Strategy<Value = Affine2> {
    (
        -range..range,
        -range..range,
        -range..range,
        -range..range,
        -shift..shift,
        -shift..shift,
    )
        .prop_map(|(m11, m12, m21, m22, tx, ty)| {
            Affine2::from_components(m11, m12, m21, m22, tx, ty)
        })
}

fn factor() -> impl Strategy<Value = f64> {
    prop_oneof![0.1..3.0f64, -3.0..-0.1f64]
}

proptest! {
    #[test]
    fn prop_invertible_inputs_round_trip(f in affine(3.0, 100.0)) {
        prop_assume!(f.determinant().abs() > 0.05);
        let d = decompose(&f);
        prop_assert!(d.is_some(), "no decomposition for {:?}", f);
        let d = d.unwrap();
        let err = probe_error(&f, &d, PROBE_SIDE);
        prop_assert!(err < TOL, "error {} for {:?}", err, f);
        // the two-layer packing is the same map
        let layered = Layers::group(&d).compose();
        prop_assert!(layered.approx_eq(&d.compose(), 1e-9));
    }

    #[test]
    fn prop_general_path_matches_fast_path(f in affine(3.0, 10.0)) {
        prop_assume!(f.determinant().abs() > 0.05);
        let cfg = DecompCfg::default();
        let fast = decompose_with(&f, &cfg, Path::FastPaths).unwrap();
        let general = decompose_with(&f, &cfg, Path::General).unwrap();
        prop_assert!(probe_error(&f, &general, PROBE_SIDE) < TOL);
        prop_assert!(probe_error(&fast.compose(), &general, PROBE_SIDE) < TOL);
    }

    #[test]
    fn prop_diagonal_shortcut_is_exact(sx in factor(), sy in factor()) {
        let f = Affine2::scale(sx, sy);
        let cfg = DecompCfg::default();
        let fast = decompose_with(&f, &cfg, Path::FastPaths).unwrap();
        let general = decompose_with(&f, &cfg, Path::General).unwrap();
        prop_assert!(fast.compose().approx_eq(&f, 1e-12));
        prop_assert!(general.compose().approx_eq(&fast.compose(), 1e-9));
    }

    #[test]
    fn prop_rectangle_shortcut_is_exact(
        sx in 0.1..3.0f64,
        sy in 0.1..3.0f64,
        theta in -3.1..3.1f64,
    ) {
        // near-zero turns fall into the diagonal shortcut and drop the rotation
        prop_assume!(theta.abs() > 0.01);
        let f = Affine2::scale(sx, sy).then(&Affine2::rotation(theta));
        let cfg = DecompCfg::default();
        let fast = decompose_with(&f, &cfg, Path::FastPaths).unwrap();
        let general = decompose_with(&f, &cfg, Path::General).unwrap();
        prop_assert!(fast.compose().approx_eq(&f, 1e-9));
        prop_assert!(general.compose().approx_eq(&fast.compose(), 1e-9));
    }
}

#[test]
fn seeded_sweep_has_no_failures() {
    let cfg = SampleCfg {
        min_off_diagonal: 0.05,
        ..SampleCfg::default()
    };
    let mut worst: f64 = 0.0;
    for f in draw_batch(cfg, 2024, 2000) {
        let d = decompose(&f).expect("sheared sample decomposes");
        worst = worst.max(probe_error(&f, &d, PROBE_SIDE));
    }
    assert!(worst < TOL, "worst probe error {worst}");
}
