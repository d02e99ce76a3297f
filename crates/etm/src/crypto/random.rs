//! Source of IV bytes.

use std::io;

use rand::{rngs::OsRng, RngCore};

/// Capability to produce unpredictable bytes.
///
/// Implementations must either fill `dest` completely or return the error
/// that prevented it (for example an unexpected end-of-stream). Partial fills
/// are never treated as success.
#[cfg_attr(test, mockall::automock)]
pub trait RandomSource {
    fn fill(&self, dest: &mut [u8]) -> io::Result<()>;
}

/// The platform CSPRNG.
///
/// Stateless, so a single value can be shared by any number of threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill(&self, dest: &mut [u8]) -> io::Result<()> {
        OsRng
            .try_fill_bytes(dest)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
    }
}
