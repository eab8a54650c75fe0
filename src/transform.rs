//! The 2-D complex transform collaborator.
//!
//! The pipeline treats the Fourier transform as an opaque box: same-size
//! complex in, complex out, never in-place. [`FftPlan2d`] is the production
//! implementation on rustfft (a length-W row pass followed by a length-H
//! column pass); tests substitute stubs through the [`Transform2d`] trait.
//!
//! Plan creation and destruction go through one process-wide planner behind
//! a mutex. That serialization is a property of the transform collaborator
//! (FFT planners cache twiddle state), not of the pipeline's own concurrency
//! model: plan execution takes no lock and independent plans run
//! concurrently.

use std::sync::{Arc, Mutex, OnceLock};

use num_complex::Complex32;
use rustfft::{Fft, FftDirection, FftPlanner};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Inverse,
}

impl From<Direction> for FftDirection {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Forward => FftDirection::Forward,
            Direction::Inverse => FftDirection::Inverse,
        }
    }
}

/// Opaque 2-D transform: reads `input`, overwrites `output`. Both buffers
/// hold width*height row-major complex samples and must not alias.
pub trait Transform2d {
    fn execute(&mut self, input: &[Complex32], output: &mut [Complex32]);
}

fn planner() -> &'static Mutex<FftPlanner<f32>> {
    static PLANNER: OnceLock<Mutex<FftPlanner<f32>>> = OnceLock::new();
    PLANNER.get_or_init(|| Mutex::new(FftPlanner::new()))
}

/// Row/column 2-D DFT plan with preallocated scratch.
pub struct FftPlan2d {
    width: usize,
    height: usize,
    row_fft: Arc<dyn Fft<f32>>,
    col_fft: Arc<dyn Fft<f32>>,
    column: Vec<Complex32>,
    scratch: Vec<Complex32>,
}

impl FftPlan2d {
    /// Plan a width*height transform. Planner access is serialized
    /// process-wide; execution is not.
    pub fn new(width: usize, height: usize, direction: Direction) -> Self {
        let (row_fft, col_fft) = {
            let mut planner = planner().lock().expect("fft planner poisoned");
            (
                planner.plan_fft(width, direction.into()),
                planner.plan_fft(height, direction.into()),
            )
        };
        let scratch_len = row_fft
            .get_inplace_scratch_len()
            .max(col_fft.get_inplace_scratch_len());
        debug!("[fft] planned {width}x{height} {direction:?} (scratch {scratch_len})");
        Self {
            width,
            height,
            row_fft,
            col_fft,
            column: vec![Complex32::default(); height],
            scratch: vec![Complex32::default(); scratch_len],
        }
    }
}

impl Transform2d for FftPlan2d {
    fn execute(&mut self, input: &[Complex32], output: &mut [Complex32]) {
        let (w, h) = (self.width, self.height);
        debug_assert_eq!(input.len(), w * h);
        debug_assert_eq!(output.len(), w * h);

        output.copy_from_slice(input);

        for row in output.chunks_exact_mut(w) {
            self.row_fft.process_with_scratch(row, &mut self.scratch);
        }

        for x in 0..w {
            for y in 0..h {
                self.column[y] = output[y * w + x];
            }
            self.col_fft
                .process_with_scratch(&mut self.column, &mut self.scratch);
            for y in 0..h {
                output[y * w + x] = self.column[y];
            }
        }
    }
}
