//! Mode-specific packing of the working buffer and result extraction.
//!
//! Every mode puts the source in the real channel and the kernel in the
//! imaginary channel of the working buffer, then reads the result back from
//! an `h_src × w_src` window of the product. Modes differ only in what
//! surrounds the source and where that window starts.
//!
//! The convolution computed by all strategies is
//!
//! ```text
//! out(y, x) = Σ K(ki, kj) · src(y + ⌊h_k/2⌋ − ki, x + ⌊w_k/2⌋ − kj)
//! ```
//!
//! with `src` zero outside its extent (linear) or periodic (circular).

use rustfft::num_complex::Complex64;

use crate::mode::Mode;
use crate::shape::Dims;

/// Geometry shared by placement and extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub src: Dims,
    pub kernel: Dims,
    pub h_res: usize,
    pub w_res: usize,
}

impl Layout {
    #[inline]
    fn at(&self, i: usize, j: usize) -> usize {
        i * self.w_res + j
    }
}

/// How a mode fills the working buffer and where its result lives.
pub trait Placement: Send + Sync {
    /// Fill `work` (`h_res × w_res`, any prior content) with source and kernel.
    fn pack(&self, work: &mut [Complex64], layout: &Layout, src: &[f64], kernel: &[f64]);

    /// Top-left corner of the result window inside the product buffer.
    fn origin(&self, layout: &Layout) -> (usize, usize);

    /// Name of this strategy.
    fn name(&self) -> &'static str;
}

/// Source at the origin, zeros around it.
pub struct ZeroPadded;

/// Source at the origin, guard band filled with its periodic halo.
pub struct WrappedHalo;

/// Source tiled periodically over `source + kernel`, read back off-centre.
pub struct PeriodicTile;

static ZERO_PADDED: ZeroPadded = ZeroPadded;
static WRAPPED_HALO: WrappedHalo = WrappedHalo;
static PERIODIC_TILE: PeriodicTile = PeriodicTile;

/// Strategy used by `mode`.
#[must_use]
pub fn for_mode(mode: Mode) -> &'static dyn Placement {
    match mode {
        Mode::Linear | Mode::LinearOptimal => &ZERO_PADDED,
        Mode::Circular => &WRAPPED_HALO,
        Mode::CircularOptimal => &PERIODIC_TILE,
    }
}

impl Placement for ZeroPadded {
    fn pack(&self, work: &mut [Complex64], layout: &Layout, src: &[f64], kernel: &[f64]) {
        work.fill(Complex64::new(0.0, 0.0));
        for i in 0..layout.src.height {
            let row = &src[i * layout.src.width..(i + 1) * layout.src.width];
            for (j, &v) in row.iter().enumerate() {
                work[layout.at(i, j)].re = v;
            }
        }
        place_kernel_centered(work, layout, kernel);
    }

    fn origin(&self, _layout: &Layout) -> (usize, usize) {
        (0, 0)
    }

    fn name(&self) -> &'static str {
        "zero-padded"
    }
}

impl Placement for WrappedHalo {
    fn pack(&self, work: &mut [Complex64], layout: &Layout, src: &[f64], kernel: &[f64]) {
        work.fill(Complex64::new(0.0, 0.0));
        let (lead_h, lead_w) = layout.kernel.half_floor();
        let w_src = layout.src.width;
        for i in 0..layout.h_res {
            let si = halo_index(i, layout.src.height, lead_h, layout.h_res);
            for j in 0..layout.w_res {
                let sj = halo_index(j, w_src, lead_w, layout.w_res);
                work[layout.at(i, j)].re = src[si * w_src + sj];
            }
        }
        place_kernel_quadrants(work, layout, kernel);
    }

    fn origin(&self, _layout: &Layout) -> (usize, usize) {
        (0, 0)
    }

    fn name(&self) -> &'static str {
        "wrapped-halo"
    }
}

impl Placement for PeriodicTile {
    fn pack(&self, work: &mut [Complex64], layout: &Layout, src: &[f64], kernel: &[f64]) {
        work.fill(Complex64::new(0.0, 0.0));
        let (shift_h, shift_w) = layout.kernel.half_ceil();
        let (h_src, w_src) = (layout.src.height, layout.src.width);
        let tile_h = h_src + layout.kernel.height;
        let tile_w = w_src + layout.kernel.width;
        for i in 0..tile_h {
            let si = (i + h_src - shift_h % h_src) % h_src;
            for j in 0..tile_w {
                let sj = (j + w_src - shift_w % w_src) % w_src;
                work[layout.at(i, j)].re = src[si * w_src + sj];
            }
        }
        place_kernel_centered(work, layout, kernel);
    }

    fn origin(&self, layout: &Layout) -> (usize, usize) {
        layout.kernel.half_ceil()
    }

    fn name(&self) -> &'static str {
        "periodic-tile"
    }
}

/// Source row/column read at padded position `p` when the guard band wraps.
///
/// Positions up to `n + lead` continue the source forward; positions past
/// that are the tail of the previous period, seen from the far edge.
fn halo_index(p: usize, n: usize, lead: usize, res: usize) -> usize {
    if p < n + lead {
        p % n
    } else {
        (n - (res - p) % n) % n
    }
}

/// Add kernel tap `(i, j)` at `((i − ⌊h_k/2⌋) mod h_res, (j − ⌊w_k/2⌋) mod w_res)`.
///
/// Taps are accumulated: when the kernel is larger than the transform,
/// taps that fold onto the same slot are equivalent modulo the period.
fn place_kernel_centered(work: &mut [Complex64], layout: &Layout, kernel: &[f64]) {
    let (ch, cw) = layout.kernel.half_floor();
    let (h_res, w_res) = (layout.h_res, layout.w_res);
    for i in 0..layout.kernel.height {
        let di = (i + h_res - ch % h_res) % h_res;
        for j in 0..layout.kernel.width {
            let dj = (j + w_res - cw % w_res) % w_res;
            work[layout.at(di, dj)].im += kernel[i * layout.kernel.width + j];
        }
    }
}

/// Same placement as [`place_kernel_centered`], copied quadrant by quadrant.
///
/// Rows above the kernel centre go to the bottom of the buffer and rows from
/// the centre down go to the top; columns left of the centre go to the far
/// right and the rest to the left. Requires `h_k < h_res` and `w_k < w_res`.
fn place_kernel_quadrants(work: &mut [Complex64], layout: &Layout, kernel: &[f64]) {
    let (ch, cw) = layout.kernel.half_floor();
    let (hk, wk) = (layout.kernel.height, layout.kernel.width);
    // (kernel range start, kernel range end, destination of the first entry)
    let row_bands = [(0, ch, layout.h_res - ch), (ch, hk, 0)];
    let col_bands = [(0, cw, layout.w_res - cw), (cw, wk, 0)];

    for &(r0, r1, dr) in &row_bands {
        for &(c0, c1, dc) in &col_bands {
            for i in r0..r1 {
                for j in c0..c1 {
                    let slot = layout.at(dr + i - r0, dc + j - c0);
                    work[slot].im += kernel[i * wk + j];
                }
            }
        }
    }
}

/// Copy the real channel of the result window into `dst`.
pub(crate) fn extract(
    product: &[Complex64],
    layout: &Layout,
    origin: (usize, usize),
    dst: &mut [f64],
) {
    let (oi, oj) = origin;
    let w_src = layout.src.width;
    for (i, row) in dst.chunks_exact_mut(w_src).enumerate() {
        for (j, out) in row.iter_mut().enumerate() {
            *out = product[layout.at(oi + i, oj + j)].re;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factor::FactorSet;

    fn layout(mode: Mode, src: (usize, usize), kernel: (usize, usize)) -> Layout {
        let src = Dims::new(src.0, src.1);
        let kernel = Dims::new(kernel.0, kernel.1);
        let (h_res, w_res) = mode
            .transform_size(src, kernel, &FactorSet::default())
            .unwrap();
        Layout {
            src,
            kernel,
            h_res,
            w_res,
        }
    }

    fn kernel_channel(work: &[Complex64]) -> Vec<f64> {
        work.iter().map(|c| c.im).collect()
    }

    #[test]
    fn quadrants_match_centered_wrap() {
        for &(hk, wk) in &[(1, 1), (2, 3), (3, 2), (4, 4), (5, 3)] {
            let l = layout(Mode::Circular, (3, 4), (hk, wk));
            let kernel: Vec<f64> = (0..hk * wk).map(|k| k as f64 + 1.0).collect();
            let mut a = vec![Complex64::new(0.0, 0.0); l.h_res * l.w_res];
            let mut b = a.clone();
            place_kernel_centered(&mut a, &l, &kernel);
            place_kernel_quadrants(&mut b, &l, &kernel);
            assert_eq!(kernel_channel(&a), kernel_channel(&b), "kernel {hk}x{wk}");
        }
    }

    #[test]
    fn kernel_centre_lands_on_origin() {
        let l = layout(Mode::Linear, (4, 4), (3, 3));
        let mut kernel = vec![0.0; 9];
        kernel[4] = 1.0;
        let mut work = vec![Complex64::new(0.0, 0.0); l.h_res * l.w_res];
        ZERO_PADDED.pack(&mut work, &l, &[0.0; 16], &kernel);
        assert_eq!(work[0].im, 1.0);
        assert_eq!(kernel_channel(&work).iter().sum::<f64>(), 1.0);
    }

    #[test]
    fn oversized_kernel_taps_accumulate() {
        // 1x1 source, 1x5 kernel: w_res = 1 + 3 = 4 < 5.
        let l = layout(Mode::Linear, (1, 1), (1, 5));
        assert_eq!(l.w_res, 4);
        let mut work = vec![Complex64::new(0.0, 0.0); l.h_res * l.w_res];
        place_kernel_centered(&mut work, &l, &[1.0, 2.0, 3.0, 4.0, 5.0]);
        // taps at offsets -2..=2 modulo 4: slot 2 gets taps 0 and 4.
        assert_eq!(work[2].im, 1.0 + 5.0);
        assert_eq!(work[3].im, 2.0);
        assert_eq!(work[0].im, 3.0);
        assert_eq!(work[1].im, 4.0);
    }

    #[test]
    fn halo_wraps_both_sides() {
        // n = 3, kernel 5: lead = 2, res = 8.
        let got: Vec<usize> = (0..8).map(|p| halo_index(p, 3, 2, 8)).collect();
        // forward halo 0,1,2 | 0,1 | unused | tail: -2 -> 1, -1 -> 2
        assert_eq!(got, vec![0, 1, 2, 0, 1, 0, 1, 2]);
    }

    #[test]
    fn periodic_tile_shifts_by_half_kernel() {
        // Width 8 + 3 = 11 rounds up to 12, leaving one zero column.
        let l = layout(Mode::CircularOptimal, (2, 8), (3, 3));
        assert_eq!((l.h_res, l.w_res), (5, 12));
        let src: Vec<f64> = (1..=16).map(f64::from).collect();
        let mut work = vec![Complex64::new(0.0, 0.0); l.h_res * l.w_res];
        PERIODIC_TILE.pack(&mut work, &l, &src, &[0.0; 9]);
        assert_eq!(PERIODIC_TILE.origin(&l), (2, 2));
        // The window origin reads source (0, 0).
        assert_eq!(work[l.at(2, 2)].re, 1.0);
        assert_eq!(work[l.at(2, 3)].re, 2.0);
        assert_eq!(work[l.at(3, 2)].re, 9.0);
        // Position (0, 0) is source ((0 - 2) mod 2, (0 - 2) mod 8) = (0, 6).
        assert_eq!(work[l.at(0, 0)].re, 7.0);
        assert_eq!(work[l.at(0, 11)].re, 0.0);
    }

    #[test]
    fn strategy_names() {
        assert_eq!(for_mode(Mode::Linear).name(), "zero-padded");
        assert_eq!(for_mode(Mode::LinearOptimal).name(), "zero-padded");
        assert_eq!(for_mode(Mode::Circular).name(), "wrapped-halo");
        assert_eq!(for_mode(Mode::CircularOptimal).name(), "periodic-tile");
    }
}
