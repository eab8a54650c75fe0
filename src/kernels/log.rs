//! Single-precision natural-log approximation (cephes range reduction +
//! minimax polynomial).
//!
//! The standard library `ln` is neither fast enough nor uniformly
//! vectorizable across dispatch widths, and the renderer's output has to be
//! reproducible across all of them. Every variant below evaluates the same
//! polynomial in the same order; the scalar form is the reference the vector
//! forms are tested against. Do not substitute `f32::ln` here.
//!
//! Algorithm: clamp to the smallest positive normal, split the IEEE-754 bit
//! pattern into exponent and a mantissa forced into [0.5, 1), fold one
//! factor of two when the mantissa is below sqrt(0.5), evaluate a
//! 9-coefficient Horner polynomial on the reduced mantissa, then re-apply
//! the exponent as a split ln(2) contribution (two constants, for
//! precision).

use bytemuck::cast;
use wide::{f32x4, f32x8, i32x4, i32x8, u32x4, u32x8};

// Smallest positive normal f32; denormals never reach this from the
// magnitude stage but are clamped away regardless.
const MIN_NORM_POS_BITS: u32 = 0x0080_0000;
// Keeps sign + mantissa, drops the exponent field.
const INV_MANT_MASK_BITS: u32 = 0x807F_FFFF;
// Exponent bits of 0.5; OR-ing them in puts the mantissa in [0.5, 1).
const HALF_EXP_BITS: u32 = 0x3F00_0000;
const EXP_BIAS: i32 = 127;

const SQRTHF: f32 = 0.707_106_781_186_547_524;

const LOG_P0: f32 = 7.037_683_629_2E-2;
const LOG_P1: f32 = -1.151_461_031_0E-1;
const LOG_P2: f32 = 1.167_699_874_0E-1;
const LOG_P3: f32 = -1.242_014_084_6E-1;
const LOG_P4: f32 = 1.424_932_278_7E-1;
const LOG_P5: f32 = -1.666_805_766_5E-1;
const LOG_P6: f32 = 2.000_071_476_5E-1;
const LOG_P7: f32 = -2.499_999_399_3E-1;
const LOG_P8: f32 = 3.333_333_117_4E-1;
// ln(2) split into a low and high part so e*ln(2) loses no precision.
const LOG_Q1: f32 = -2.121_944_40e-4;
const LOG_Q2: f32 = 0.693_359_375;

/// Scalar reference. Domain rules: input <= 0 or NaN yields NaN, +inf
/// passes through unchanged.
#[inline(always)]
pub fn approx_log(input: f32) -> f32 {
    if input <= 0.0 || input.is_nan() {
        return f32::NAN;
    }
    if input.is_infinite() {
        return input;
    }

    let clamped = input.max(f32::from_bits(MIN_NORM_POS_BITS));
    let bits = clamped.to_bits();

    let exp = ((bits >> 23) & 0xFF) as i32 - EXP_BIAS;
    let mut x = f32::from_bits((bits & INV_MANT_MASK_BITS) | HALF_EXP_BITS);
    let mut e = (exp + 1) as f32;

    if x < SQRTHF {
        e -= 1.0;
        x = x + x - 1.0;
    } else {
        x -= 1.0;
    }

    let z = x * x;

    let mut y = LOG_P0;
    y = y * x + LOG_P1;
    y = y * x + LOG_P2;
    y = y * x + LOG_P3;
    y = y * x + LOG_P4;
    y = y * x + LOG_P5;
    y = y * x + LOG_P6;
    y = y * x + LOG_P7;
    y = y * x + LOG_P8;
    y = y * x;
    y = y * z;

    y += e * LOG_Q1;
    y -= z * 0.5;

    x += y;
    x + e * LOG_Q2
}

macro_rules! lane_approx_log {
    ($name:ident, $f:ty, $i:ty, $u:ty) => {
        /// Lane-parallel form of [`approx_log`]; identical polynomial,
        /// identical evaluation order.
        #[inline(always)]
        pub fn $name(input: $f) -> $f {
            let invalid = input.simd_le(<$f>::ZERO) | input.is_nan();
            let infinite = input.simd_eq(<$f>::splat(f32::INFINITY));

            let clamped = input.max(<$f>::splat(f32::from_bits(MIN_NORM_POS_BITS)));
            let bits: $u = cast(clamped);

            let exp = cast::<$u, $i>(bits >> 23) - <$i>::splat(EXP_BIAS);
            let mant = (bits & <$u>::splat(INV_MANT_MASK_BITS)) | <$u>::splat(HALF_EXP_BITS);
            let mut x: $f = cast(mant);
            let mut e = (exp + <$i>::splat(1)).round_float();

            let below_sqrthf = x.simd_lt(<$f>::splat(SQRTHF));
            e -= below_sqrthf.select(<$f>::ONE, <$f>::ZERO);
            let folded = x + below_sqrthf.select(x, <$f>::ZERO);
            x = folded - <$f>::ONE;

            let z = x * x;

            let mut y = <$f>::splat(LOG_P0);
            y = y.mul_add(x, <$f>::splat(LOG_P1));
            y = y.mul_add(x, <$f>::splat(LOG_P2));
            y = y.mul_add(x, <$f>::splat(LOG_P3));
            y = y.mul_add(x, <$f>::splat(LOG_P4));
            y = y.mul_add(x, <$f>::splat(LOG_P5));
            y = y.mul_add(x, <$f>::splat(LOG_P6));
            y = y.mul_add(x, <$f>::splat(LOG_P7));
            y = y.mul_add(x, <$f>::splat(LOG_P8));
            y = y * x;
            y = y * z;

            y += e * <$f>::splat(LOG_Q1);
            y -= z * <$f>::splat(0.5);

            x += y;
            let result = x + e * <$f>::splat(LOG_Q2);

            let result = infinite.select(<$f>::splat(f32::INFINITY), result);
            invalid.select(<$f>::splat(f32::NAN), result)
        }
    };
}

lane_approx_log!(approx_log_x4, f32x4, i32x4, u32x4);
lane_approx_log!(approx_log_x8, f32x8, i32x8, u32x8);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_exact_log_over_render_range() {
        // Log-spaced sweep of [1, 1e6], the range the +1 bias guarantees.
        let steps = 20_000;
        let ln_max = 1.0e6f64.ln();
        let mut worst = 0.0f64;
        for k in 0..=steps {
            let x = (ln_max * k as f64 / steps as f64).exp() as f32;
            let got = approx_log(x) as f64;
            let exact = (x as f64).ln();
            worst = worst.max((got - exact).abs());
        }
        assert!(worst < 1.0e-5, "worst absolute error {worst}");
    }

    #[test]
    fn unit_input_is_exactly_zero() {
        assert_eq!(approx_log(1.0), 0.0);
    }

    #[test]
    fn domain_edges() {
        assert!(approx_log(0.0).is_nan());
        assert!(approx_log(-1.0).is_nan());
        assert!(approx_log(f32::NAN).is_nan());
        assert_eq!(approx_log(f32::INFINITY), f32::INFINITY);
    }

    #[test]
    fn denormal_input_clamps_instead_of_diverging() {
        let tiny = f32::from_bits(1); // smallest positive denormal
        let clamped = approx_log(tiny);
        assert!(clamped.is_finite());
        assert_eq!(clamped, approx_log(f32::from_bits(MIN_NORM_POS_BITS)));
    }

    fn assert_lanes_close(inputs: &[f32]) {
        for chunk in inputs.chunks_exact(8) {
            let mut arr4a = [0.0f32; 4];
            let mut arr4b = [0.0f32; 4];
            arr4a.copy_from_slice(&chunk[..4]);
            arr4b.copy_from_slice(&chunk[4..]);
            let mut arr8 = [0.0f32; 8];
            arr8.copy_from_slice(chunk);

            let got4 = [
                approx_log_x4(f32x4::from(arr4a)).to_array(),
                approx_log_x4(f32x4::from(arr4b)).to_array(),
            ];
            let got8 = approx_log_x8(f32x8::from(arr8)).to_array();

            for (i, &x) in chunk.iter().enumerate() {
                let reference = approx_log(x);
                let lane4 = got4[i / 4][i % 4];
                let lane8 = got8[i];
                let tol = reference.abs().max(1.0) * 1.0e-6;
                assert!(
                    (lane4 - reference).abs() <= tol,
                    "x4 lane diverged at {x}: {lane4} vs {reference}"
                );
                assert!(
                    (lane8 - reference).abs() <= tol,
                    "x8 lane diverged at {x}: {lane8} vs {reference}"
                );
            }
        }
    }

    #[test]
    fn lane_variants_match_scalar() {
        let inputs: Vec<f32> = (0..4096)
            .map(|k| 1.0 + (k as f32) * (k as f32) * 0.059)
            .collect();
        assert_lanes_close(&inputs);
    }

    #[test]
    fn lane_variants_handle_domain_edges() {
        let v = approx_log_x4(f32x4::from([0.0, -3.0, f32::INFINITY, 2.0])).to_array();
        assert!(v[0].is_nan());
        assert!(v[1].is_nan());
        assert_eq!(v[2], f32::INFINITY);
        let tol = approx_log(2.0).abs() * 1.0e-6;
        assert!((v[3] - approx_log(2.0)).abs() <= tol);

        let nan_in = approx_log_x8(f32x8::splat(f32::NAN)).to_array();
        assert!(nan_in.iter().all(|r| r.is_nan()));
    }
}
