//! Frame-lifecycle glue: construction-time allocation and the per-frame
//! pack -> transform -> reduce -> render sequence.
//!
//! Everything fallible happens in the constructor; a constructed pipeline
//! processes frames without error paths. One instance handles one frame at
//! a time (`process` takes `&mut self`); independent instances are safe to
//! build and drop concurrently.

use std::path::Path;

use num_complex::Complex32;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::buffer::AlignedBuffer;
use crate::dispatch::{DispatchLevel, DispatchOverride, KernelSet};
use crate::error::SpectrumError;
use crate::plane::{PlaneMut, PlaneRef};
use crate::render;
use crate::transform::{Direction, FftPlan2d, Transform2d};

/// Construction-time configuration, immutable afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpectrumConfig {
    /// Overlay the coordinate grid after rendering.
    pub grid: bool,
    /// Kernel selection; `auto` picks the widest supported tier.
    pub dispatch: DispatchOverride,
}

impl SpectrumConfig {
    /// Read a JSON config, falling back to defaults on a missing file or a
    /// parse error (the latter is worth a warning, the former is not).
    pub fn load_or_default(path: &Path) -> Self {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|text| {
                serde_json::from_str(&text)
                    .map_err(|e| warn!("[config] parse error in {path:?}: {e}"))
                    .ok()
            })
            .unwrap_or_default()
    }
}

pub struct SpectrumPipeline {
    width: usize,
    height: usize,
    grid: bool,
    kernels: KernelSet,
    transform: Box<dyn Transform2d + Send>,
    fft_in: AlignedBuffer<Complex32>,
    fft_out: AlignedBuffer<Complex32>,
    magnitudes: AlignedBuffer<f32>,
}

impl std::fmt::Debug for SpectrumPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpectrumPipeline")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("grid", &self.grid)
            .field("kernels", &self.kernels)
            .finish_non_exhaustive()
    }
}

impl SpectrumPipeline {
    /// Build a pipeline for width*height frames with the production FFT.
    pub fn new(
        width: usize,
        height: usize,
        config: SpectrumConfig,
    ) -> Result<Self, SpectrumError> {
        check_dimensions(width, height)?;
        let transform = Box::new(FftPlan2d::new(width, height, Direction::Forward));
        Self::with_transform(width, height, config, transform)
    }

    /// Same, with a caller-supplied transform (tests inject stubs here).
    pub fn with_transform(
        width: usize,
        height: usize,
        config: SpectrumConfig,
        transform: Box<dyn Transform2d + Send>,
    ) -> Result<Self, SpectrumError> {
        check_dimensions(width, height)?;
        let kernels = KernelSet::select(config.dispatch)?;
        let samples = width * height;

        // All three buffers up front; failure here tears down whatever was
        // already allocated and no partially-built pipeline escapes.
        let fft_in = AlignedBuffer::zeroed(samples, "fft_in")?;
        let fft_out = AlignedBuffer::zeroed(samples, "fft_out")?;
        let magnitudes = AlignedBuffer::zeroed(samples, "magnitudes")?;

        info!(
            "[pipeline] {width}x{height}, dispatch {:?}, grid {}",
            kernels.level(),
            config.grid
        );

        Ok(Self {
            width,
            height,
            grid: config.grid,
            kernels,
            transform,
            fft_in,
            fft_out,
            magnitudes,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn dispatch_level(&self) -> DispatchLevel {
        self.kernels.level()
    }

    /// Process one frame: `src` is read, `dst` fully overwritten.
    ///
    /// Frame geometry is fixed at construction; a mismatched plane is a
    /// caller contract violation and panics rather than producing a
    /// misrendered frame.
    pub fn process(&mut self, src: &PlaneRef<'_>, dst: &mut PlaneMut<'_>) {
        assert_eq!(
            (src.width(), src.height()),
            (self.width, self.height),
            "source plane does not match pipeline geometry"
        );
        assert_eq!(
            (dst.width(), dst.height()),
            (self.width, self.height),
            "destination plane does not match pipeline geometry"
        );

        self.kernels.pack(&mut self.fft_in, src);
        self.transform.execute(&self.fft_in, &mut self.fft_out);
        self.kernels.reduce(&mut self.magnitudes, &self.fft_out);
        render::render_spectrum(dst, &self.magnitudes, self.width, self.height);
        if self.grid {
            render::draw_grid(dst);
        }
    }
}

fn check_dimensions(width: usize, height: usize) -> Result<(), SpectrumError> {
    if width == 0 || height == 0 {
        return Err(SpectrumError::BadGeometry(format!(
            "zero-sized frame ({width}x{height})"
        )));
    }
    if width.checked_mul(height).is_none() {
        return Err(SpectrumError::BadGeometry(format!(
            "frame size overflows ({width}x{height})"
        )));
    }
    Ok(())
}
