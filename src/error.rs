//! Error types for the docbridge library.
//!
//! Two distinct error types reflect two distinct layers:
//!
//! * [`ConvertError`] — the conversion task failed. Returned as
//!   `Err(ConvertError)` from [`ConversionTask::execute`](crate::task::ConversionTask::execute)
//!   and the top-level `convert*` functions. Exactly one of these reaches
//!   the caller per task; partial sink contents on failure are possible and
//!   carry no success meaning.
//!
//! * [`StreamError`] — an I/O-kind condition raised by the stream bridge
//!   itself (a read or write against a closed stream). The remote service
//!   sees these while driving the streams; the task only ever observes them
//!   second-hand, folded into whatever the service reports back.
//!
//! Release-time failures (a refused close, a dispose hiccup) belong to
//! neither type: they are absorbed inside the task's release step and only
//! surface through logging.

use thiserror::Error;

use crate::service::ServiceError;

/// A boxed error that can cross the transform-hook boundary.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// All errors a conversion task can return to its caller.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// No input source was attached to the task. Raised before the remote
    /// service is contacted.
    #[error("no input source attached to the conversion task")]
    InvalidInput,

    /// The remote load was rejected, threw, or produced no document.
    ///
    /// `detail` embeds the service's diagnostic code when one was reported.
    #[error("could not load document from input stream: {detail}")]
    LoadFailed {
        detail: String,
        #[source]
        source: Option<ServiceError>,
    },

    /// No store configuration could be derived for the requested target
    /// filter. The document was loaded but `store` was never attempted.
    #[error("unsupported conversion: no store configuration for filter '{filter}'")]
    UnsupportedConversion { filter: String },

    /// The remote store was rejected or threw.
    ///
    /// `detail` embeds the service's diagnostic code when one was reported.
    #[error("could not store document to output stream: {detail}")]
    StoreFailed {
        detail: String,
        #[source]
        source: Option<ServiceError>,
    },

    /// Uniform wrapper for any otherwise-unclassified failure raised during
    /// the load/transform/store sequence. The original cause is retained.
    #[error("conversion failed")]
    ConversionFailed {
        #[source]
        source: BoxError,
    },

    /// A task was assembled without a required piece (builder validation).
    #[error("invalid task configuration: {0}")]
    InvalidConfig(String),
}

impl ConvertError {
    /// Classify a service failure from the load call, embedding the
    /// diagnostic code in the message when the service reported one.
    pub(crate) fn load(err: ServiceError) -> Self {
        ConvertError::LoadFailed {
            detail: with_error_code(&err),
            source: Some(err),
        }
    }

    /// Classify a service failure from the store call, same embedding rule.
    pub(crate) fn store(err: ServiceError) -> Self {
        ConvertError::StoreFailed {
            detail: with_error_code(&err),
            source: Some(err),
        }
    }
}

fn with_error_code(err: &ServiceError) -> String {
    match err.error_code() {
        Some(code) => format!("{err}; error code {code}"),
        None => err.to_string(),
    }
}

/// An I/O-kind condition from the stream bridge adapter.
///
/// Running out of data is never an error: [`SourceStream::read_chunk`]
/// signals end-of-stream with an empty chunk. The only failure the adapter
/// itself produces is use after close.
///
/// [`SourceStream::read_chunk`]: crate::stream::SourceStream::read_chunk
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StreamError {
    /// The stream was closed; further reads or writes are rejected.
    #[error("stream is closed")]
    Closed,
}
