//! Scalar reference kernels.
//!
//! These are the baseline every data-parallel variant is measured against,
//! and the fallback bound when the host reports no vector capability. The
//! vector variants also reuse them for row/tail remainders, so the formulas
//! here are load-bearing for cross-variant equivalence.

use num_complex::Complex32;

use super::log::approx_log;
use crate::plane::PlaneRef;

/// Byte plane -> complex work buffer: dst[y*W+x] = (src[x,y], 0).
pub fn pack(dst: &mut [Complex32], src: &PlaneRef<'_>) {
    let width = src.width();
    for y in 0..src.height() {
        let row = src.row(y);
        let dst_row = &mut dst[y * width..(y + 1) * width];
        for (d, &p) in dst_row.iter_mut().zip(row) {
            *d = Complex32::new(f32::from(p), 0.0);
        }
    }
}

/// Complex spectrum -> log magnitudes: dst[i] = approx_log(|src[i]| + 1).
///
/// The +1 bias keeps the log argument at or above 1 (away from the
/// approximation's domain edge) and compresses dynamic range for display.
/// It is a fixed visualization parameter, not a tunable.
pub fn reduce(dst: &mut [f32], src: &[Complex32]) {
    for (d, c) in dst.iter_mut().zip(src) {
        let mag = (c.re * c.re + c.im * c.im).sqrt();
        *d = approx_log(mag + 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_honors_stride_and_zeroes_imaginary() {
        // 3x2 plane inside rows of stride 5.
        let data = [1u8, 2, 3, 99, 99, 4, 5, 6, 99, 99];
        let plane = PlaneRef::new(&data, 3, 2, 5).unwrap();
        let mut dst = vec![Complex32::new(-1.0, -1.0); 6];
        pack(&mut dst, &plane);
        let expect = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        for (c, &e) in dst.iter().zip(&expect) {
            assert_eq!(c.re, e);
            assert_eq!(c.im, 0.0);
        }
    }

    #[test]
    fn reduce_applies_bias_then_log() {
        let src = [
            Complex32::new(0.0, 0.0),
            Complex32::new(3.0, 4.0),
            Complex32::new(0.0, -1.0),
        ];
        let mut dst = [0.0f32; 3];
        reduce(&mut dst, &src);
        assert_eq!(dst[0], approx_log(1.0));
        assert_eq!(dst[1], approx_log(6.0));
        assert_eq!(dst[2], approx_log(2.0));
    }
}
