//! Direct (non-FFT) reference convolution.
//!
//! Quadratic in the kernel size, so only meant for checking the FFT engine
//! on small inputs. Uses the same definition and centring as the engine:
//! `out(y, x) = Σ K(ki, kj) · src(y + ⌊h_k/2⌋ − ki, x + ⌊w_k/2⌋ − kj)`.

use crate::error::ConvError;
use crate::mode::Mode;
use crate::shape::Dims;

/// Convolve `src` with `kernel` into `dst` by summing every tap.
///
/// Linear modes treat the source as zero outside its extent; circular
/// modes treat it as periodic.
pub fn convolve(
    mode: Mode,
    src: &[f64],
    src_dims: Dims,
    kernel: &[f64],
    kernel_dims: Dims,
    dst: &mut [f64],
) -> Result<(), ConvError> {
    src_dims.require_non_empty("source")?;
    kernel_dims.require_non_empty("kernel")?;
    if src.len() != src_dims.len() || dst.len() != src_dims.len() {
        return Err(ConvError::invalid(format!(
            "source and destination must hold {} values",
            src_dims.len()
        )));
    }
    if kernel.len() != kernel_dims.len() {
        return Err(ConvError::invalid(format!(
            "kernel must hold {} values",
            kernel_dims.len()
        )));
    }

    let (h, w) = (src_dims.height, src_dims.width);
    let (hk, wk) = (kernel_dims.height, kernel_dims.width);
    let (ch, cw) = kernel_dims.half_floor();
    let periodic = mode.is_circular();

    for y in 0..h {
        for x in 0..w {
            let mut acc = 0.0;
            for ki in 0..hk {
                let Some(sy) = source_index(y + ch, ki, h, periodic) else {
                    continue;
                };
                for kj in 0..wk {
                    if let Some(sx) = source_index(x + cw, kj, w, periodic) {
                        acc += kernel[ki * wk + kj] * src[sy * w + sx];
                    }
                }
            }
            dst[y * w + x] = acc;
        }
    }
    Ok(())
}

/// Source index `pos − tap`, wrapped when periodic, `None` when outside.
fn source_index(pos: usize, tap: usize, n: usize, periodic: bool) -> Option<usize> {
    if periodic {
        Some((pos + n * (tap / n + 1) - tap) % n)
    } else if pos >= tap && pos - tap < n {
        Some(pos - tap)
    } else {
        None
    }
}
