//! Numeric kernels of the spectrum pipeline.
//!
//! Two operations dominate per-frame cost: packing the byte plane into the
//! complex work buffer and reducing the transform output to log magnitudes.
//! Both exist as a scalar reference plus width-4/8/16 data-parallel variants
//! with identical semantics; [`crate::dispatch`] binds one pair at pipeline
//! construction.

pub mod log;
pub mod scalar;
pub mod vector;
