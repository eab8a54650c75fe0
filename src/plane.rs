//! Strided views over single-channel 8-bit image planes.
//!
//! A plane is caller-owned memory: width×height pixels, rows separated by a
//! byte stride that may exceed the width (frame caches pad rows for
//! alignment). The views borrow that memory for the duration of one pipeline
//! run and validate the geometry once, at construction.

use crate::error::SpectrumError;

fn check_geometry(
    len: usize,
    width: usize,
    height: usize,
    stride: usize,
) -> Result<(), SpectrumError> {
    if width == 0 || height == 0 {
        return Err(SpectrumError::BadGeometry(format!(
            "zero-sized plane ({width}x{height})"
        )));
    }
    if stride < width {
        return Err(SpectrumError::BadGeometry(format!(
            "stride {stride} smaller than width {width}"
        )));
    }
    // The last row only needs `width` readable bytes, not a full stride.
    let needed = stride * (height - 1) + width;
    if len < needed {
        return Err(SpectrumError::BadGeometry(format!(
            "backing slice holds {len} bytes, geometry needs {needed}"
        )));
    }
    Ok(())
}

/// Read-only 8-bit plane view.
#[derive(Debug, Clone, Copy)]
pub struct PlaneRef<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a> PlaneRef<'a> {
    pub fn new(
        data: &'a [u8],
        width: usize,
        height: usize,
        stride: usize,
    ) -> Result<Self, SpectrumError> {
        check_geometry(data.len(), width, height, stride)?;
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// View over a tightly packed plane (stride == width).
    pub fn packed(data: &'a [u8], width: usize, height: usize) -> Result<Self, SpectrumError> {
        Self::new(data, width, height, width)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// One row, exactly `width` pixels (stride padding excluded).
    #[inline]
    pub fn row(&self, y: usize) -> &'a [u8] {
        let start = y * self.stride;
        &self.data[start..start + self.width]
    }
}

/// Mutable 8-bit plane view.
#[derive(Debug)]
pub struct PlaneMut<'a> {
    data: &'a mut [u8],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a> PlaneMut<'a> {
    pub fn new(
        data: &'a mut [u8],
        width: usize,
        height: usize,
        stride: usize,
    ) -> Result<Self, SpectrumError> {
        check_geometry(data.len(), width, height, stride)?;
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    pub fn packed(data: &'a mut [u8], width: usize, height: usize) -> Result<Self, SpectrumError> {
        Self::new(data, width, height, width)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    #[inline]
    pub fn row_mut(&mut self, y: usize) -> &mut [u8] {
        let start = y * self.stride;
        &mut self.data[start..start + self.width]
    }

    /// Zero every pixel, including stride padding the renderer owns.
    pub fn fill_zero(&mut self) {
        self.data.fill(0);
    }

    #[inline]
    pub fn put(&mut self, x: usize, y: usize, value: u8) {
        self.data[y * self.stride + x] = value;
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.stride + x]
    }
}
