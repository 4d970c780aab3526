//! Property-based tests for the convolution engine.
//!
//! These exercise `Workspace` end to end on random shapes and values and
//! compare against algebraic identities or the direct reference.

use proptest::prelude::*;

use fftconv_core::{direct, Dims, Mode, Workspace};

/// Source dims, kernel dims, source values, kernel values.
type Case = (Dims, Dims, Vec<f64>, Vec<f64>);

fn case(max_src: usize, max_kernel: usize) -> impl Strategy<Value = Case> {
    (1..=max_src, 1..=max_src, 1..=max_kernel, 1..=max_kernel).prop_flat_map(|(h, w, hk, wk)| {
        (
            Just(Dims::new(h, w)),
            Just(Dims::new(hk, wk)),
            prop::collection::vec(-10.0f64..10.0, h * w),
            prop::collection::vec(-2.0f64..2.0, hk * wk),
        )
    })
}

fn mode() -> impl Strategy<Value = Mode> {
    prop::sample::select(Mode::ALL.to_vec())
}

fn run(mode: Mode, src_dims: Dims, kernel_dims: Dims, src: &[f64], kernel: &[f64]) -> Vec<f64> {
    let mut ws = Workspace::configured(mode, src_dims, kernel_dims).unwrap();
    ws.convolve_to_vec(src, kernel).unwrap()
}

/// Absolute tolerance scaled by the largest possible output magnitude.
fn tolerance(src: &[f64], kernel: &[f64]) -> f64 {
    let peak = src.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
    let mass: f64 = kernel.iter().map(|v| v.abs()).sum();
    1e-9 * (1.0 + peak * mass)
}

fn close(a: &[f64], b: &[f64], tol: f64) -> Result<(), TestCaseError> {
    prop_assert_eq!(a.len(), b.len());
    for (k, (x, y)) in a.iter().zip(b).enumerate() {
        prop_assert!((x - y).abs() <= tol, "index {}: {} vs {} (tol {})", k, x, y, tol);
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Every mode agrees with the direct summation reference.
    #[test]
    fn matches_direct_reference(mode in mode(), (sd, kd, src, kernel) in case(7, 6)) {
        let got = run(mode, sd, kd, &src, &kernel);
        let mut want = vec![0.0; sd.len()];
        direct::convolve(mode, &src, sd, &kernel, kd, &mut want).unwrap();
        close(&got, &want, tolerance(&src, &kernel))?;
    }

    /// conv(X + Y, K) = conv(X, K) + conv(Y, K) and conv(cX, K) = c conv(X, K).
    #[test]
    fn linearity(
        mode in mode(),
        (sd, kd, x, kernel) in case(6, 5),
        c in -4.0f64..4.0,
        seed in 0usize..1000,
    ) {
        let y: Vec<f64> = (0..sd.len())
            .map(|k| (((k + seed) * 31 % 17) as f64) - 8.0)
            .collect();
        let sum: Vec<f64> = x.iter().zip(&y).map(|(a, b)| a + b).collect();
        let scaled: Vec<f64> = x.iter().map(|a| c * a).collect();

        let mut ws = Workspace::configured(mode, sd, kd).unwrap();
        let cx = ws.convolve_to_vec(&x, &kernel).unwrap();
        let cy = ws.convolve_to_vec(&y, &kernel).unwrap();
        let csum = ws.convolve_to_vec(&sum, &kernel).unwrap();
        let cscaled = ws.convolve_to_vec(&scaled, &kernel).unwrap();

        let tol = tolerance(&sum, &kernel) + tolerance(&scaled, &kernel);
        let added: Vec<f64> = cx.iter().zip(&cy).map(|(a, b)| a + b).collect();
        close(&csum, &added, tol)?;
        let expected_scaled: Vec<f64> = cx.iter().map(|a| c * a).collect();
        close(&cscaled, &expected_scaled, tol)?;
    }

    /// A 1x1 unit kernel returns the source.
    #[test]
    fn identity_kernel(mode in mode(), (sd, _kd, src, _k) in case(9, 1)) {
        let got = run(mode, sd, Dims::new(1, 1), &src, &[1.0]);
        close(&got, &src, tolerance(&src, &[1.0]))?;
    }

    /// Optimal sizing never changes the result.
    #[test]
    fn optimal_size_equivalence((sd, kd, src, kernel) in case(9, 6)) {
        let tol = tolerance(&src, &kernel);
        close(
            &run(Mode::Linear, sd, kd, &src, &kernel),
            &run(Mode::LinearOptimal, sd, kd, &src, &kernel),
            tol,
        )?;
        close(
            &run(Mode::Circular, sd, kd, &src, &kernel),
            &run(Mode::CircularOptimal, sd, kd, &src, &kernel),
            tol,
        )?;
    }

    /// Moving the kernel by one full source period leaves circular results unchanged.
    #[test]
    fn circular_periodicity(
        circular in prop::sample::select(vec![Mode::Circular, Mode::CircularOptimal]),
        (sd, kd, src, kernel) in case(5, 4),
    ) {
        let (h, w) = (sd.height, sd.width);
        let (hk, wk) = (kd.height, kd.width);
        let base = run(circular, sd, kd, &src, &kernel);
        let tol = tolerance(&src, &kernel);

        // 2h zero rows above the kernel: its centre moves by h, its taps by 2h.
        let rows_dims = Dims::new(hk + 2 * h, wk);
        let mut rows = vec![0.0; rows_dims.len()];
        rows[2 * h * wk..].copy_from_slice(&kernel);
        close(&run(circular, sd, rows_dims, &src, &rows), &base, tol)?;

        // Same along columns.
        let cols_dims = Dims::new(hk, wk + 2 * w);
        let mut cols = vec![0.0; cols_dims.len()];
        for i in 0..hk {
            let dst = i * cols_dims.width + 2 * w;
            cols[dst..dst + wk].copy_from_slice(&kernel[i * wk..(i + 1) * wk]);
        }
        close(&run(circular, sd, cols_dims, &src, &cols), &base, tol)?;
    }

    /// With equal dimensions, circular convolution is commutative.
    #[test]
    fn circular_commutativity(
        circular in prop::sample::select(vec![Mode::Circular, Mode::CircularOptimal]),
        (sd, _kd, x, _k) in case(6, 1),
        seed in 0usize..1000,
    ) {
        let y: Vec<f64> = (0..sd.len())
            .map(|k| (((k + seed) * 13 % 7) as f64) * 0.5 - 1.5)
            .collect();
        let xy = run(circular, sd, sd, &x, &y);
        let yx = run(circular, sd, sd, &y, &x);
        close(&xy, &yx, tolerance(&x, &y) + tolerance(&y, &x))?;
    }

    /// Each factor-optimised size is factorable and not below the exact size.
    #[test]
    fn optimal_sizes_are_factorable(
        (h_src, w_src, hk, wk) in (1usize..60, 1usize..60, 1usize..20, 1usize..20),
    ) {
        let (sd, kd) = (Dims::new(h_src, w_src), Dims::new(hk, wk));
        let factors = fftconv_core::FactorSet::default();
        for (exact, optimal) in [
            (Mode::Linear, Mode::LinearOptimal),
            (Mode::Circular, Mode::CircularOptimal),
        ] {
            let (h, w) = exact.transform_size(sd, kd, &factors).unwrap();
            let (ho, wo) = optimal.transform_size(sd, kd, &factors).unwrap();
            prop_assert!(ho >= h && wo >= w);
            prop_assert!(factors.is_factorable(ho) && factors.is_factorable(wo));
            prop_assert!((h..ho).all(|n| !factors.is_factorable(n)));
            prop_assert!((w..wo).all(|n| !factors.is_factorable(n)));
        }
    }
}

#[test]
fn box_blur_spreads_corner_impulse() {
    let mut src = vec![0.0; 16];
    src[0] = 1.0;
    let out = run(
        Mode::Linear,
        Dims::new(4, 4),
        Dims::new(3, 3),
        &src,
        &[1.0 / 9.0; 9],
    );
    #[rustfmt::skip]
    let expected = [
        1.0 / 9.0, 1.0 / 9.0, 0.0, 0.0,
        1.0 / 9.0, 1.0 / 9.0, 0.0, 0.0,
        0.0,       0.0,       0.0, 0.0,
        0.0,       0.0,       0.0, 0.0,
    ];
    for (k, (g, e)) in out.iter().zip(&expected).enumerate() {
        assert!((g - e).abs() < 1e-12, "index {k}: {g} vs {e}");
    }
}

#[test]
fn circular_box_blur_wraps_impulse_to_far_corners() {
    let mut src = vec![0.0; 16];
    src[0] = 1.0;
    for mode in [Mode::Circular, Mode::CircularOptimal] {
        let out = run(mode, Dims::new(4, 4), Dims::new(3, 3), &src, &[1.0 / 9.0; 9]);
        for i in 0..4 {
            for j in 0..4 {
                let near = |k: usize| k == 0 || k == 1 || k == 3;
                let e = if near(i) && near(j) { 1.0 / 9.0 } else { 0.0 };
                assert!((out[i * 4 + j] - e).abs() < 1e-12, "{mode} ({i},{j})");
            }
        }
    }
}
