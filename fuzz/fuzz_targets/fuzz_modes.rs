#![no_main]

use libfuzzer_sys::fuzz_target;

use fftconv_core::{direct, Dims, Mode, Workspace};

fuzz_target!(|data: &[u8]| {
    if data.len() < 5 {
        return;
    }
    // Header: mode and four extents, kept small so the direct sum stays fast.
    let mode = Mode::ALL[usize::from(data[0]) % 4];
    let src_dims = Dims::new(usize::from(data[1] % 12) + 1, usize::from(data[2] % 12) + 1);
    let kernel_dims = Dims::new(usize::from(data[3] % 9) + 1, usize::from(data[4] % 9) + 1);

    let mut bytes = data[5..].iter().cycle();
    let mut next = || bytes.next().map_or(0.0, |&b| f64::from(b as i8) / 16.0);
    let src: Vec<f64> = (0..src_dims.len()).map(|_| next()).collect();
    let kernel: Vec<f64> = (0..kernel_dims.len()).map(|_| next()).collect();

    let mut ws = Workspace::configured(mode, src_dims, kernel_dims).unwrap();
    let got = ws.convolve_to_vec(&src, &kernel).unwrap();
    let mut want = vec![0.0; src_dims.len()];
    direct::convolve(mode, &src, src_dims, &kernel, kernel_dims, &mut want).unwrap();

    let peak = src.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
    let mass: f64 = kernel.iter().map(|v| v.abs()).sum();
    let tol = 1e-9 * (1.0 + peak * mass);
    for (k, (g, w)) in got.iter().zip(&want).enumerate() {
        assert!((g - w).abs() <= tol, "{mode} {src_dims} {kernel_dims} index {k}: {g} vs {w}");
    }
});
