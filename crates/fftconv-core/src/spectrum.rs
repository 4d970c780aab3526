//! Shared transform-and-multiply pipeline.
//!
//! The working buffer carries two real signals at once: `a` in the real
//! channel and `b` in the imaginary channel. One complex 2-D FFT gives
//! `F = FFT2(a + i·b)`, and Hermitian symmetry of real transforms splits it:
//!
//! ```text
//! A(k) = (F(k) + conj(F(-k))) / 2
//! B(k) = (F(k) - conj(F(-k))) / 2i
//! ```
//!
//! The product `A·B` is formed directly from `F` at `k` and `-k`, and the
//! inverse transform of that product is the circular convolution `a ⊛ b`.

use rustfft::num_complex::Complex64;

use crate::transform::LineTransform;

/// Frequency-domain product `A(i,j)·B(i,j)` read from the packed spectrum.
///
/// `spectrum` is `FFT2(a + i·b)` laid out row-major as `h_res × w_res`
/// samples. With `G = conj(F(-i mod h_res, -j mod w_res))`:
///
/// ```text
/// A·B = (F + G)(F - G) / 4i = (F² - G²) / 4i
/// ```
#[must_use]
pub fn pack_product(
    spectrum: &[Complex64],
    i: usize,
    j: usize,
    h_res: usize,
    w_res: usize,
) -> Complex64 {
    let f = spectrum[i * w_res + j];
    let mi = (h_res - i) % h_res;
    let mj = (w_res - j) % w_res;
    let g = spectrum[mi * w_res + mj].conj();

    Complex64::new(
        0.5 * (f.re * f.im - g.re * g.im),
        -0.25 * (f.re * f.re - f.im * f.im - g.re * g.re + g.im * g.im),
    )
}

/// Forward 2-D transform in place: every row, then every column.
pub(crate) fn forward_2d(
    data: &mut [Complex64],
    rows: &mut LineTransform,
    cols: &mut LineTransform,
) {
    let (h_res, w_res) = (cols.len(), rows.len());
    for i in 0..h_res {
        rows.forward(data, i * w_res, 1);
    }
    for j in 0..w_res {
        cols.forward(data, j, w_res);
    }
}

/// Normalised inverse 2-D transform in place: every row, then every column.
pub(crate) fn inverse_2d(
    data: &mut [Complex64],
    rows: &mut LineTransform,
    cols: &mut LineTransform,
) {
    let (h_res, w_res) = (cols.len(), rows.len());
    for i in 0..h_res {
        rows.inverse(data, i * w_res, 1);
    }
    for j in 0..w_res {
        cols.inverse(data, j, w_res);
    }
}

/// Run the full pipeline on a packed working buffer.
///
/// On return `product` holds `a ⊛ b` in its real channel (circular over
/// `h_res × w_res`); its imaginary channel is rounding noise. `work` is
/// left holding the forward spectrum.
pub(crate) fn convolve_packed(
    work: &mut [Complex64],
    product: &mut [Complex64],
    rows: &mut LineTransform,
    cols: &mut LineTransform,
) {
    let (h_res, w_res) = (cols.len(), rows.len());
    debug_assert_eq!(work.len(), h_res * w_res);
    debug_assert_eq!(product.len(), h_res * w_res);

    forward_2d(work, rows, cols);

    for i in 0..h_res {
        for j in 0..w_res {
            product[i * w_res + j] = pack_product(work, i, j, h_res, w_res);
        }
    }

    inverse_2d(product, rows, cols);
}
