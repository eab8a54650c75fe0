//! 2-D FFT log-magnitude spectrum rendering for 8-bit image planes.
//!
//! A frame flows through four stages: the packer widens plane bytes into
//! complex samples, the transform runs a forward 2-D FFT, the reduce kernel
//! collapses each bin to `log(|z| + 1)`, and the renderer quantizes the
//! result into a centered grayscale spectrum. The pack and reduce stages
//! come in scalar and vectorized tiers selected at runtime.
//!
//! [`SpectrumPipeline`] ties the stages together and owns every buffer;
//! the individual stages are public for callers that want to drive them
//! directly.

pub mod buffer;
pub mod dispatch;
pub mod error;
pub mod kernels;
pub mod pipeline;
pub mod plane;
pub mod render;
pub mod transform;

pub use dispatch::{DispatchLevel, DispatchOverride, KernelSet};
pub use error::SpectrumError;
pub use pipeline::{SpectrumConfig, SpectrumPipeline};
pub use plane::{PlaneMut, PlaneRef};
pub use transform::{Direction, FftPlan2d, Transform2d};
