//! The conversion task: load, transform, store, release.
//!
//! ## Protocol
//!
//! ```text
//! Idle ──▶ Loading ──▶ Transforming ──▶ Storing ──▶ Released
//!            │              │              │
//!            ▼              ▼              ▼
//!         LoadFailed   ConversionFailed  StoreFailed / UnsupportedConversion
//! ```
//!
//! A task runs once, on the caller's thread of control, with the facade
//! calls as its only suspension points. The single most important property
//! of the design is the release guarantee: once a load has succeeded, the
//! document handle is released exactly once before `execute` returns, on
//! every path — store failure, transform failure, all of them. Release
//! itself never fails the task: a vetoed close means another owner took
//! over the closing, and close/dispose hiccups are logged and absorbed.
//!
//! Errors raised mid-sequence are classified into the task's own kinds;
//! anything foreign (a transform hook's own error type, a failure while
//! acquiring the loader capability) is wrapped uniformly as
//! [`ConvertError::ConversionFailed`] with the cause chained.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::config::{LoadConfig, StoreConfig};
use crate::error::{BoxError, ConvertError};
use crate::service::{
    CloseOutcome, DocumentHandle, DocumentService, BLANK_TARGET, NO_FLAGS, STREAM_URL,
};
use crate::stream::{SinkStream, SourceStream};

/// Hook invoked between load and store, with the document open.
///
/// The default (no hook installed) is a no-op. A hook may mutate the
/// document through the facade's manipulation surface
/// ([`DocumentHandle::as_any_mut`]) and signals failure by returning an
/// error. A returned [`ConvertError`] propagates as-is; any other error
/// type is wrapped as [`ConvertError::ConversionFailed`].
#[async_trait]
pub trait DocumentTransform: Send + Sync {
    async fn apply(&self, document: &mut dyn DocumentHandle) -> Result<(), BoxError>;
}

/// One load → transform → store → release cycle against the remote
/// service.
///
/// A task is constructed per conversion request, executed once, and
/// discarded; `execute` consumes it. The source and sink are exclusively
/// owned by this invocation for its duration.
///
/// # Example
/// ```rust,no_run
/// use std::sync::Arc;
/// use docbridge::{ConversionTask, DocumentService, SinkStream, SourceStream};
///
/// async fn run(service: &dyn DocumentService, input: Vec<u8>) -> Result<Vec<u8>, docbridge::ConvertError> {
///     let source = Arc::new(SourceStream::new(input));
///     let sink = Arc::new(SinkStream::new());
///     let task = ConversionTask::new(Arc::clone(&source), Arc::clone(&sink), "writer_pdf_Export");
///     task.execute(service).await?;
///     Ok(sink.to_vec())
/// }
/// ```
pub struct ConversionTask {
    source: Option<Arc<SourceStream>>,
    sink: Arc<SinkStream>,
    filter_name: String,
    transform: Option<Arc<dyn DocumentTransform>>,
}

impl ConversionTask {
    /// Create a task with everything it needs.
    pub fn new(
        source: Arc<SourceStream>,
        sink: Arc<SinkStream>,
        filter_name: impl Into<String>,
    ) -> Self {
        ConversionTask {
            source: Some(source),
            sink,
            filter_name: filter_name.into(),
            transform: None,
        }
    }

    /// Create a builder; use it when assembling a task in pieces or when
    /// installing a transform hook.
    pub fn builder() -> ConversionTaskBuilder {
        ConversionTaskBuilder::default()
    }

    /// Install a transform hook, replacing any previous one.
    pub fn with_transform(mut self, transform: Arc<dyn DocumentTransform>) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Run the conversion against `service`.
    ///
    /// # Errors
    /// - [`ConvertError::InvalidInput`] — no source attached; the service
    ///   is never contacted.
    /// - [`ConvertError::LoadFailed`] — the remote load was rejected,
    ///   threw, or returned no document.
    /// - [`ConvertError::UnsupportedConversion`] — no store configuration
    ///   for the target filter; `store` is never called, but the document
    ///   was loaded and is released.
    /// - [`ConvertError::StoreFailed`] — the remote store was rejected or
    ///   threw; the document is released.
    /// - [`ConvertError::ConversionFailed`] — anything unclassified from
    ///   the load/transform/store sequence, cause attached.
    pub async fn execute(mut self, service: &dyn DocumentService) -> Result<(), ConvertError> {
        let source = self.source.take().ok_or(ConvertError::InvalidInput)?;
        info!(
            filter = %self.filter_name,
            input_bytes = source.len(),
            "starting stream conversion"
        );

        let mut document = self.load_document(service, source).await?;
        let outcome = self.process_document(document.as_mut()).await;
        // Release runs on every path after a successful load, before the
        // outcome is surfaced.
        self.release_document(document).await;

        if outcome.is_ok() {
            info!(output_bytes = self.sink.len(), "conversion complete");
        }
        outcome
    }

    async fn load_document(
        &self,
        service: &dyn DocumentService,
        source: Arc<SourceStream>,
    ) -> Result<Box<dyn DocumentHandle>, ConvertError> {
        let loader = service
            .document_loader()
            .await
            .map_err(|err| ConvertError::ConversionFailed { source: err.into() })?;

        let config = LoadConfig::for_source(source);
        debug!(url = STREAM_URL, "loading document");
        let document = loader
            .load(STREAM_URL, BLANK_TARGET, NO_FLAGS, &config)
            .await
            .map_err(ConvertError::load)?;

        // An absent document from a nominally successful load is a load
        // failure; the service is not trusted to always signal through
        // its error path.
        document.ok_or_else(|| ConvertError::LoadFailed {
            detail: "service returned no document".into(),
            source: None,
        })
    }

    async fn process_document(
        &self,
        document: &mut dyn DocumentHandle,
    ) -> Result<(), ConvertError> {
        if let Some(transform) = &self.transform {
            debug!("applying document transform");
            transform
                .apply(document)
                .await
                .map_err(|err| match err.downcast::<ConvertError>() {
                    Ok(own) => *own,
                    Err(foreign) => ConvertError::ConversionFailed { source: foreign },
                })?;
        }

        let config = StoreConfig::for_filter(Arc::clone(&self.sink), &self.filter_name)
            .ok_or_else(|| ConvertError::UnsupportedConversion {
                filter: self.filter_name.clone(),
            })?;
        debug!(filter = %config.filter_name, "storing document");
        document.store(&config).await.map_err(ConvertError::store)
    }

    /// Release the document: graceful close when supported (a veto means
    /// the vetoing party closes it later), unconditional dispose otherwise.
    /// Never raises past the task boundary.
    async fn release_document(&self, mut document: Box<dyn DocumentHandle>) {
        if document.supports_graceful_close() {
            match document.close(true).await {
                Ok(CloseOutcome::Closed) => debug!("document closed"),
                Ok(CloseOutcome::Vetoed) => {
                    // whoever raised the veto closes the document
                    debug!("document close vetoed")
                }
                Err(err) => warn!("failed to close document: {err}"),
            }
        } else {
            document.dispose().await;
            debug!("document disposed");
        }
    }
}

impl fmt::Debug for ConversionTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionTask")
            .field("source", &self.source)
            .field("sink", &self.sink)
            .field("filter_name", &self.filter_name)
            .field("transform", &self.transform.as_ref().map(|_| "<hook>"))
            .finish()
    }
}

/// Builder for [`ConversionTask`].
///
/// The sink is required; the source may be omitted, in which case
/// `execute` fails with [`ConvertError::InvalidInput`] without contacting
/// the service. The filter name may be omitted or blank; that surfaces as
/// [`ConvertError::UnsupportedConversion`] after the load, when the store
/// configuration cannot be derived.
#[derive(Default)]
pub struct ConversionTaskBuilder {
    source: Option<Arc<SourceStream>>,
    sink: Option<Arc<SinkStream>>,
    filter_name: Option<String>,
    transform: Option<Arc<dyn DocumentTransform>>,
}

impl ConversionTaskBuilder {
    pub fn source(mut self, source: Arc<SourceStream>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn sink(mut self, sink: Arc<SinkStream>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn filter_name(mut self, filter_name: impl Into<String>) -> Self {
        self.filter_name = Some(filter_name.into());
        self
    }

    pub fn transform(mut self, transform: Arc<dyn DocumentTransform>) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Assemble the task.
    pub fn build(self) -> Result<ConversionTask, ConvertError> {
        let sink = self
            .sink
            .ok_or_else(|| ConvertError::InvalidConfig("an output sink is required".into()))?;
        Ok(ConversionTask {
            source: self.source,
            sink,
            filter_name: self.filter_name.unwrap_or_default(),
            transform: self.transform,
        })
    }
}
