//! Runtime selection of the pack/reduce kernel variants.
//!
//! Host capability is probed once at pipeline construction and resolved to a
//! pair of function pointers; nothing downstream ever checks features again.
//! An explicit override above the detected capability is a construction
//! error, never a silent downgrade. `Auto` on a host with no vector
//! capability quietly binds the scalar pair.

use num_complex::Complex32;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SpectrumError;
use crate::kernels::{scalar, vector};
use crate::plane::PlaneRef;

pub type PackFn = fn(&mut [Complex32], &PlaneRef<'_>);
pub type ReduceFn = fn(&mut [f32], &[Complex32]);

/// Capability tier, ordered narrowest to widest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DispatchLevel {
    Scalar,
    Width4,
    Width8,
    Width16,
}

/// Construction-time kernel selection, `Auto` by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchOverride {
    #[default]
    Auto,
    Scalar,
    #[serde(rename = "w4")]
    Width4,
    #[serde(rename = "w8")]
    Width8,
    #[serde(rename = "w16")]
    Width16,
}

impl DispatchOverride {
    fn requested_level(self) -> Option<DispatchLevel> {
        match self {
            DispatchOverride::Auto => None,
            DispatchOverride::Scalar => Some(DispatchLevel::Scalar),
            DispatchOverride::Width4 => Some(DispatchLevel::Width4),
            DispatchOverride::Width8 => Some(DispatchLevel::Width8),
            DispatchOverride::Width16 => Some(DispatchLevel::Width16),
        }
    }
}

/// Widest tier the host supports, consulted once.
pub fn detect_level() -> DispatchLevel {
    #[cfg(target_arch = "x86_64")]
    {
        if is_x86_feature_detected!("avx512f") {
            DispatchLevel::Width16
        } else if is_x86_feature_detected!("avx2") {
            DispatchLevel::Width8
        } else if is_x86_feature_detected!("sse2") {
            DispatchLevel::Width4
        } else {
            DispatchLevel::Scalar
        }
    }
    #[cfg(target_arch = "aarch64")]
    {
        // NEON is baseline on aarch64; nothing wider to probe for.
        DispatchLevel::Width4
    }
    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    {
        DispatchLevel::Scalar
    }
}

/// Kernel pair bound once at pipeline construction.
#[derive(Clone, Copy)]
pub struct KernelSet {
    level: DispatchLevel,
    pack: PackFn,
    reduce: ReduceFn,
}

impl std::fmt::Debug for KernelSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KernelSet").field("level", &self.level).finish()
    }
}

impl KernelSet {
    pub fn select(requested: DispatchOverride) -> Result<Self, SpectrumError> {
        let detected = detect_level();
        let level = match requested.requested_level() {
            None => detected,
            Some(level) if level <= detected => level,
            Some(_) => {
                return Err(SpectrumError::UnsupportedDispatch {
                    requested,
                    detected,
                });
            }
        };
        debug!("[dispatch] requested={requested:?} detected={detected:?} -> {level:?}");
        Ok(Self::for_level(level))
    }

    fn for_level(level: DispatchLevel) -> Self {
        let (pack, reduce): (PackFn, ReduceFn) = match level {
            DispatchLevel::Scalar => (scalar::pack, scalar::reduce),
            DispatchLevel::Width4 => (vector::pack_w4, vector::reduce_w4),
            DispatchLevel::Width8 => (vector::pack_w8, vector::reduce_w8),
            DispatchLevel::Width16 => (vector::pack_w16, vector::reduce_w16),
        };
        Self { level, pack, reduce }
    }

    pub fn level(&self) -> DispatchLevel {
        self.level
    }

    #[inline(always)]
    pub fn pack(&self, dst: &mut [Complex32], src: &PlaneRef<'_>) {
        (self.pack)(dst, src);
    }

    #[inline(always)]
    pub fn reduce(&self, dst: &mut [f32], src: &[Complex32]) {
        (self.reduce)(dst, src);
    }
}
