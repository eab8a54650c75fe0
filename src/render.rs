//! Magnitude field to viewable 8-bit plane.
//!
//! Not a throughput bottleneck, so there is a single implementation:
//! normalize against the brightest non-DC bin, keep only bins above half
//! that maximum, scale into [0, 255], and swap the four quadrants diagonally
//! so the DC term lands at the image center. The optional coordinate grid is
//! anchored to that center, keeping it aligned with the shifted spectrum at
//! any resolution.

use crate::plane::PlaneMut;

/// Spacing between grid lines in pixels.
const GRID_STEP: usize = 100;

/// Render `magnitudes` (row-major width*height) into `dst`.
pub fn render_spectrum(dst: &mut PlaneMut<'_>, magnitudes: &[f32], width: usize, height: usize) {
    debug_assert_eq!(magnitudes.len(), width * height);
    debug_assert_eq!(dst.width(), width);
    debug_assert_eq!(dst.height(), height);

    dst.fill_zero();

    // Bin 0 is the DC term: it dwarfs everything else and is excluded from
    // the normalization search.
    let mut max = 0.0f32;
    for &m in &magnitudes[1..] {
        if m > max {
            max = m;
        }
    }

    // Blank frame: nothing to scale against, and 255*v/0 would poison the
    // 8-bit output with NaN. The plane is already zeroed.
    if max == 0.0 {
        return;
    }

    let half_w = width / 2;
    let half_h = height / 2;

    for y in 0..height {
        let out_y = (y + half_h) % height;
        for x in 0..width {
            let value = magnitudes[y * width + x];
            // Half-max threshold suppresses low-magnitude noise and keeps
            // the dominant frequencies.
            let kept = if value > max / 2.0 { value } else { 0.0 };
            let scaled = (255.0 * kept / max).clamp(0.0, 255.0);
            let out_x = (x + half_w) % width;
            dst.put(out_x, out_y, scaled.round_ties_even() as u8);
        }
    }
}

/// Draw the coordinate grid over a rendered plane, full intensity,
/// anchored to the DC center.
pub fn draw_grid(dst: &mut PlaneMut<'_>) {
    let (width, height) = (dst.width(), dst.height());

    let mut x = (width / 2) % GRID_STEP;
    while x < width {
        for y in 0..height {
            dst.put(x, y, 255);
        }
        x += GRID_STEP;
    }

    let mut y = (height / 2) % GRID_STEP;
    while y < height {
        dst.row_mut(y).fill(255);
        y += GRID_STEP;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plane::PlaneMut;

    fn shift_position(x: usize, y: usize, w: usize, h: usize) -> (usize, usize) {
        ((x + w / 2) % w, (y + h / 2) % h)
    }

    #[test]
    fn zero_spectrum_renders_all_zero() {
        for (w, h) in [(4, 4), (7, 3), (16, 9)] {
            let magnitudes = vec![0.0f32; w * h];
            let mut data = vec![0xAAu8; w * h];
            let mut dst = PlaneMut::packed(&mut data, w, h).unwrap();
            render_spectrum(&mut dst, &magnitudes, w, h);
            assert!(data.iter().all(|&p| p == 0), "{w}x{h} not blanked");
        }
    }

    #[test]
    fn nan_magnitudes_do_not_reach_the_output() {
        // Comparisons against NaN are false, so NaN bins fail both the max
        // search and the threshold and come out as zero pixels.
        let (w, h) = (4, 4);
        let mut magnitudes = vec![0.0f32; w * h];
        magnitudes[3] = f32::NAN;
        magnitudes[5] = 8.0;
        let mut data = vec![0u8; w * h];
        let mut dst = PlaneMut::packed(&mut data, w, h).unwrap();
        render_spectrum(&mut dst, &magnitudes, w, h);
        let (sx, sy) = shift_position(3, 0, w, h);
        assert_eq!(dst.get(sx, sy), 0);
        let (sx, sy) = shift_position(1, 1, w, h);
        assert_eq!(dst.get(sx, sy), 255);
    }

    #[test]
    fn dc_is_excluded_from_normalization_but_still_drawn() {
        let (w, h) = (4, 4);
        let mut magnitudes = vec![0.0f32; w * h];
        magnitudes[0] = 1000.0; // DC
        magnitudes[6] = 10.0;
        let mut data = vec![0u8; w * h];
        let mut dst = PlaneMut::packed(&mut data, w, h).unwrap();
        render_spectrum(&mut dst, &magnitudes, w, h);

        // max comes from bin 6, so it renders at full scale...
        let (sx, sy) = shift_position(2, 1, w, h);
        assert_eq!(dst.get(sx, sy), 255);
        // ...and the DC bin, above max, clamps to 255 at the center.
        let (cx, cy) = shift_position(0, 0, w, h);
        assert_eq!((cx, cy), (2, 2));
        assert_eq!(dst.get(cx, cy), 255);
    }

    #[test]
    fn half_max_threshold_zeroes_weak_bins() {
        let (w, h) = (4, 2);
        let mut magnitudes = vec![0.0f32; w * h];
        magnitudes[1] = 10.0;
        magnitudes[2] = 4.9; // below max/2
        magnitudes[3] = 5.1; // above max/2
        let mut data = vec![0u8; w * h];
        let mut dst = PlaneMut::packed(&mut data, w, h).unwrap();
        render_spectrum(&mut dst, &magnitudes, w, h);

        let (sx, sy) = shift_position(2, 0, w, h);
        assert_eq!(dst.get(sx, sy), 0);
        let (sx, sy) = shift_position(3, 0, w, h);
        // 255 * 5.1 / 10 = 130.05
        assert_eq!(dst.get(sx, sy), 130);
    }

    #[test]
    fn quadrant_shift_round_trips_for_even_dimensions() {
        let (w, h) = (8, 6);
        for y in 0..h {
            for x in 0..w {
                let (sx, sy) = shift_position(x, y, w, h);
                let (rx, ry) = shift_position(sx, sy, w, h);
                assert_eq!((rx, ry), (x, y));
            }
        }
    }

    #[test]
    fn quadrant_shift_truncates_for_odd_dimensions() {
        // Defined but asymmetric: the half-offset truncates, so the double
        // shift lands one short of the origin.
        let (w, h) = (5, 5);
        let (sx, sy) = shift_position(0, 0, w, h);
        assert_eq!((sx, sy), (2, 2));
        let (rx, ry) = shift_position(sx, sy, w, h);
        assert_eq!((rx, ry), (4, 4));
    }

    #[test]
    fn rendering_respects_destination_stride() {
        let (w, h, stride) = (4, 4, 7);
        let mut magnitudes = vec![0.0f32; w * h];
        magnitudes[1] = 1.0;
        let mut data = vec![0xEEu8; stride * h];
        let mut dst = PlaneMut::new(&mut data, w, h, stride).unwrap();
        render_spectrum(&mut dst, &magnitudes, w, h);

        let (sx, sy) = shift_position(1, 0, w, h);
        assert_eq!(data[sy * stride + sx], 255);
        // Padding bytes beyond each row's width were zeroed with the plane.
        for y in 0..h - 1 {
            assert!(data[y * stride + w..(y + 1) * stride].iter().all(|&p| p == 0));
        }
    }

    #[test]
    fn grid_is_anchored_to_the_dc_center() {
        let (w, h) = (400, 400);
        let mut data = vec![0u8; w * h];
        let mut dst = PlaneMut::packed(&mut data, w, h).unwrap();
        draw_grid(&mut dst);

        let lines = [0usize, 100, 200, 300];
        for y in 0..h {
            for x in 0..w {
                let on_line = lines.contains(&x) || lines.contains(&y);
                let expected = if on_line { 255 } else { 0 };
                assert_eq!(dst.get(x, y), expected, "pixel ({x},{y})");
            }
        }
    }

    #[test]
    fn grid_overwrites_spectrum_pixels() {
        let (w, h) = (200, 200);
        let mut data = vec![7u8; w * h];
        let mut dst = PlaneMut::packed(&mut data, w, h).unwrap();
        draw_grid(&mut dst);
        assert_eq!(dst.get(0, 13), 255); // vertical line at (200/2) % 100 = 0
        assert_eq!(dst.get(100, 13), 255);
        assert_eq!(dst.get(13, 100), 255);
        assert_eq!(dst.get(13, 13), 7); // untouched between lines
    }
}
