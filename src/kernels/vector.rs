//! Data-parallel kernel variants (width 4, 8 and 16).
//!
//! Packing widens bytes into `f32` lane vectors in fixed-width groups that
//! never cross a row boundary, then zero-interleaves them into the complex
//! layout; byte-to-float conversion is exact, so every width is
//! bit-identical to the scalar path. The magnitude-log kernels do the real
//! lane work: deinterleave re/im from the packed complex layout, evaluate
//! magnitude and the shared log approximation on whole lane vectors, four
//! lane-groups per unrolled step. Elements past the last full step go
//! through the scalar kernel, which uses the same bias-then-log
//! composition.

use bytemuck::cast_slice;
use num_complex::Complex32;
use wide::{f32x4, f32x8};

use super::log::{approx_log_x4, approx_log_x8};
use super::scalar;
use crate::plane::PlaneRef;

// Lane-groups folded into one unrolled step of the magnitude kernels.
const UNROLL: usize = 4;

/// Widen 4 plane bytes into an `f32` lane vector. Exact conversion, so
/// every group width stays bit-identical to the scalar path.
#[inline(always)]
fn widen_x4(s: &[u8]) -> f32x4 {
    f32x4::from([
        f32::from(s[0]),
        f32::from(s[1]),
        f32::from(s[2]),
        f32::from(s[3]),
    ])
}

/// Widen 8 plane bytes into an `f32` lane vector.
#[inline(always)]
fn widen_x8(s: &[u8]) -> f32x8 {
    f32x8::from([
        f32::from(s[0]),
        f32::from(s[1]),
        f32::from(s[2]),
        f32::from(s[3]),
        f32::from(s[4]),
        f32::from(s[5]),
        f32::from(s[6]),
        f32::from(s[7]),
    ])
}

/// Interleave one widened lane vector with zero imaginary parts.
#[inline(always)]
fn interleave_zero(dst: &mut [Complex32], reals: &[f32]) {
    for (out, &re) in dst.iter_mut().zip(reals) {
        *out = Complex32::new(re, 0.0);
    }
}

fn pack_group_w4(s: &[u8], d: &mut [Complex32]) {
    interleave_zero(d, &widen_x4(s).to_array());
}

fn pack_group_w8(s: &[u8], d: &mut [Complex32]) {
    interleave_zero(d, &widen_x8(s).to_array());
}

// A 16-wide group is two 8-lane halves, like the reduce kernel.
fn pack_group_w16(s: &[u8], d: &mut [Complex32]) {
    interleave_zero(&mut d[..8], &widen_x8(&s[..8]).to_array());
    interleave_zero(&mut d[8..], &widen_x8(&s[8..]).to_array());
}

fn pack_rows(
    dst: &mut [Complex32],
    src: &PlaneRef<'_>,
    group: usize,
    convert: fn(&[u8], &mut [Complex32]),
) {
    let width = src.width();
    for y in 0..src.height() {
        let row = src.row(y);
        let dst_row = &mut dst[y * width..(y + 1) * width];

        let mut src_groups = row.chunks_exact(group);
        let mut dst_groups = dst_row.chunks_exact_mut(group);
        for (s, d) in (&mut src_groups).zip(&mut dst_groups) {
            convert(s, d);
        }
        for (out, &p) in dst_groups
            .into_remainder()
            .iter_mut()
            .zip(src_groups.remainder())
        {
            *out = Complex32::new(f32::from(p), 0.0);
        }
    }
}

pub fn pack_w4(dst: &mut [Complex32], src: &PlaneRef<'_>) {
    pack_rows(dst, src, 4, pack_group_w4);
}

pub fn pack_w8(dst: &mut [Complex32], src: &PlaneRef<'_>) {
    pack_rows(dst, src, 8, pack_group_w8);
}

pub fn pack_w16(dst: &mut [Complex32], src: &PlaneRef<'_>) {
    pack_rows(dst, src, 16, pack_group_w16);
}

/// Split 4 interleaved complex values into separate re/im lane vectors.
#[inline(always)]
fn deinterleave_x4(s: &[f32]) -> (f32x4, f32x4) {
    (
        f32x4::from([s[0], s[2], s[4], s[6]]),
        f32x4::from([s[1], s[3], s[5], s[7]]),
    )
}

/// Split 8 interleaved complex values into separate re/im lane vectors.
#[inline(always)]
fn deinterleave_x8(s: &[f32]) -> (f32x8, f32x8) {
    (
        f32x8::from([s[0], s[2], s[4], s[6], s[8], s[10], s[12], s[14]]),
        f32x8::from([s[1], s[3], s[5], s[7], s[9], s[11], s[13], s[15]]),
    )
}

#[inline(always)]
fn magnitude_log_x4(s: &[f32]) -> [f32; 4] {
    let (re, im) = deinterleave_x4(s);
    let mag_sq = re.mul_add(re, im * im);
    approx_log_x4(mag_sq.sqrt() + f32x4::ONE).to_array()
}

#[inline(always)]
fn magnitude_log_x8(s: &[f32]) -> [f32; 8] {
    let (re, im) = deinterleave_x8(s);
    let mag_sq = re.mul_add(re, im * im);
    approx_log_x8(mag_sq.sqrt() + f32x8::ONE).to_array()
}

pub fn reduce_w4(dst: &mut [f32], src: &[Complex32]) {
    const STEP: usize = UNROLL * 4;
    let floats: &[f32] = cast_slice(src);
    let len = dst.len().min(src.len());
    let unrolled = len - len % STEP;

    for i in (0..unrolled).step_by(STEP) {
        for j in 0..UNROLL {
            let at = i + j * 4;
            dst[at..at + 4].copy_from_slice(&magnitude_log_x4(&floats[at * 2..at * 2 + 8]));
        }
    }
    scalar::reduce(&mut dst[unrolled..len], &src[unrolled..len]);
}

pub fn reduce_w8(dst: &mut [f32], src: &[Complex32]) {
    const STEP: usize = UNROLL * 8;
    let floats: &[f32] = cast_slice(src);
    let len = dst.len().min(src.len());
    let unrolled = len - len % STEP;

    for i in (0..unrolled).step_by(STEP) {
        for j in 0..UNROLL {
            let at = i + j * 8;
            dst[at..at + 8].copy_from_slice(&magnitude_log_x8(&floats[at * 2..at * 2 + 16]));
        }
    }
    scalar::reduce(&mut dst[unrolled..len], &src[unrolled..len]);
}

pub fn reduce_w16(dst: &mut [f32], src: &[Complex32]) {
    const STEP: usize = UNROLL * 16;
    let floats: &[f32] = cast_slice(src);
    let len = dst.len().min(src.len());
    let unrolled = len - len % STEP;

    // A 16-wide lane-group is two 8-lane halves per operation.
    for i in (0..unrolled).step_by(STEP) {
        for j in 0..UNROLL {
            let at = i + j * 16;
            dst[at..at + 8].copy_from_slice(&magnitude_log_x8(&floats[at * 2..at * 2 + 16]));
            dst[at + 8..at + 16]
                .copy_from_slice(&magnitude_log_x8(&floats[at * 2 + 16..at * 2 + 32]));
        }
    }
    scalar::reduce(&mut dst[unrolled..len], &src[unrolled..len]);
}
