//! Construction-time error taxonomy.
//!
//! Every fallible path is at pipeline construction; once a
//! [`SpectrumPipeline`](crate::pipeline::SpectrumPipeline) exists, frame
//! processing does not fail (numeric edge cases are recovered locally by the
//! renderer and the log approximation).

use crate::dispatch::{DispatchLevel, DispatchOverride};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpectrumError {
    /// Plane dimensions or stride that no pipeline can be built for.
    #[error("bad plane geometry: {0}")]
    BadGeometry(String),

    /// Aligned buffer allocation failed before any kernel ran.
    #[error("buffer allocation failed ({what}: {bytes} bytes)")]
    Allocation { what: &'static str, bytes: usize },

    /// An explicit dispatch override above what the host supports.
    /// Fail fast instead of silently downgrading.
    #[error("dispatch override {requested:?} is not supported on this host (detected {detected:?})")]
    UnsupportedDispatch {
        requested: DispatchOverride,
        detected: DispatchLevel,
    },
}
