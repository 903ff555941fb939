//! Conversion results returned to callers.

use serde::{Deserialize, Serialize};

/// Result of a successful conversion via [`convert`](crate::convert::convert).
///
/// `bytes` is exactly what the remote service wrote through the sink; this
/// crate never inspects or rewrites the document payload.
#[derive(Debug, Clone)]
pub struct ConversionOutput {
    /// The converted document.
    pub bytes: Vec<u8>,
    /// Byte counts and timing for the run.
    pub stats: ConversionStats,
}

/// Measurements for one conversion run.
///
/// Serialisable so callers can log or report runs; two stats lines are
/// usually enough to tell an empty-output conversion from a broken one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Size of the input document handed to the service.
    pub input_bytes: u64,
    /// Size of the converted document the service wrote back.
    pub output_bytes: u64,
    /// Wall-clock time for the whole task, facade calls included.
    pub duration_ms: u64,
}
