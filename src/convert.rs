//! One-call conversion entry points.
//!
//! [`convert`] covers the common case: bytes in, bytes out, one filter.
//! It wraps the input in a [`SourceStream`], runs a [`ConversionTask`]
//! against the given service, and drains the sink for you. Drive the task
//! type directly instead when you need a transform hook or want to hold
//! on to the streams yourself.

use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use crate::error::ConvertError;
use crate::output::{ConversionOutput, ConversionStats};
use crate::service::DocumentService;
use crate::stream::{SinkStream, SourceStream};
use crate::task::ConversionTask;

/// Convert an in-memory document to the format selected by `filter_name`.
///
/// # Arguments
/// * `service` — the running document-processing service
/// * `input` — the document bytes, any format the service can load
/// * `filter_name` — the service's export filter for the target format
///
/// # Errors
/// One [`ConvertError`] per failed run; see
/// [`ConversionTask::execute`] for the classification. The streams are
/// closed on every path.
pub async fn convert(
    service: &dyn DocumentService,
    input: impl Into<Vec<u8>>,
    filter_name: impl Into<String>,
) -> Result<ConversionOutput, ConvertError> {
    let start = Instant::now();
    let source = Arc::new(SourceStream::new(input));
    let sink = Arc::new(SinkStream::new());
    let input_bytes = source.len();

    let task = ConversionTask::new(Arc::clone(&source), Arc::clone(&sink), filter_name);
    let result = task.execute(service).await;

    // The streams belong to this invocation; close them regardless of the
    // task outcome before surfacing it. Closing keeps the sink drainable.
    source.close();
    sink.close();
    result?;
    let bytes = sink.to_vec();

    let stats = ConversionStats {
        input_bytes,
        output_bytes: bytes.len() as u64,
        duration_ms: start.elapsed().as_millis() as u64,
    };
    debug!(?stats, "conversion finished");

    Ok(ConversionOutput { bytes, stats })
}

/// Synchronous wrapper around [`convert`].
///
/// Creates a temporary tokio runtime internally; do not call it from
/// inside an async context.
pub fn convert_sync(
    service: &dyn DocumentService,
    input: impl Into<Vec<u8>>,
    filter_name: impl Into<String>,
) -> Result<ConversionOutput, ConvertError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| ConvertError::ConversionFailed {
            source: Box::new(e),
        })?
        .block_on(convert(service, input, filter_name))
}
