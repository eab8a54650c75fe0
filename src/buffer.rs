//! Owned, 32-byte-aligned numeric buffers.
//!
//! The data-parallel kernels require the complex and magnitude buffers to sit
//! on 32-byte boundaries; `Vec` promises only the element alignment. This is
//! the scoped-ownership counterpart of the aligned allocation the pipeline
//! needs: allocation happens once at pipeline construction, release happens
//! exactly once on drop, including when construction fails partway through.

use std::alloc::{self, Layout};
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;

use bytemuck::Pod;

use crate::error::SpectrumError;

pub const BUFFER_ALIGN: usize = 32;

pub struct AlignedBuffer<T: Pod> {
    ptr: NonNull<T>,
    len: usize,
}

impl<T: Pod> AlignedBuffer<T> {
    /// Allocate `len` zero-initialized elements on a 32-byte boundary.
    pub fn zeroed(len: usize, what: &'static str) -> Result<Self, SpectrumError> {
        let bytes = len
            .checked_mul(size_of::<T>())
            .ok_or(SpectrumError::Allocation { what, bytes: usize::MAX })?;
        if bytes == 0 {
            return Err(SpectrumError::Allocation { what, bytes });
        }
        let layout = Layout::from_size_align(bytes, BUFFER_ALIGN.max(align_of::<T>()))
            .map_err(|_| SpectrumError::Allocation { what, bytes })?;
        // SAFETY: layout has non-zero size; zeroed memory is a valid value
        // for any Pod element type.
        let raw = unsafe { alloc::alloc_zeroed(layout) };
        let ptr = NonNull::new(raw.cast::<T>())
            .ok_or(SpectrumError::Allocation { what, bytes })?;
        Ok(Self { ptr, len })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn layout(&self) -> Layout {
        // Same layout that was validated at allocation.
        Layout::from_size_align(self.len * size_of::<T>(), BUFFER_ALIGN.max(align_of::<T>()))
            .unwrap()
    }
}

impl<T: Pod> Deref for AlignedBuffer<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        // SAFETY: ptr is valid for len elements, initialized at allocation.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }
}

impl<T: Pod> DerefMut for AlignedBuffer<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        // SAFETY: exclusive access through &mut self.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl<T: Pod> Drop for AlignedBuffer<T> {
    fn drop(&mut self) {
        // SAFETY: ptr was allocated with this exact layout.
        unsafe { alloc::dealloc(self.ptr.as_ptr().cast(), self.layout()) };
    }
}

// SAFETY: the buffer exclusively owns its allocation; Pod types carry no
// thread affinity.
unsafe impl<T: Pod + Send> Send for AlignedBuffer<T> {}
unsafe impl<T: Pod + Sync> Sync for AlignedBuffer<T> {}
