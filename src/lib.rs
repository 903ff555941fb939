//! # docbridge
//!
//! Convert documents by delegating the real rendering and filtering to an
//! already-running, remote document-processing service.
//!
//! ## Why this crate?
//!
//! The service does the hard format work; what it cannot do is keep your
//! process honest across its boundary. This crate owns exactly the two
//! pieces that make stream-based remote conversion safe: the *conversion
//! task protocol* (load a document from a stream, optionally transform it
//! in place, store it through an export filter, and release the remote
//! handle on every exit path, even when the service throws mid-sequence)
//! and the *stream bridge* that lets the service consume a plain byte
//! buffer as a seekable, chunked input and accumulate its writes into a
//! drainable output buffer.
//!
//! Everything else — service lifecycle, process pools, format registries,
//! file handling — belongs to the bridge implementing [`DocumentService`]
//! or to the caller.
//!
//! ## Pipeline Overview
//!
//! ```text
//! bytes
//!  │
//!  ├─ 1. Wrap      SourceStream presents the buffer as seekable, chunked input
//!  ├─ 2. Load      the service pulls the stream through its loader capability
//!  ├─ 3. Transform optional hook mutates the open document (default: no-op)
//!  ├─ 4. Store     the export filter writes the target format into SinkStream
//!  ├─ 5. Release   graceful close (vetoes respected) or unconditional dispose
//!  └─ 6. Drain     caller copies the sink wherever the result should go
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docbridge::{convert, ConvertError, DocumentService};
//!
//! async fn to_pdf(
//!     service: &dyn DocumentService,
//!     odt: Vec<u8>,
//! ) -> Result<Vec<u8>, ConvertError> {
//!     let output = convert(service, odt, "writer_pdf_Export").await?;
//!     Ok(output.bytes)
//! }
//! ```
//!
//! ## Resource safety
//!
//! Once a load succeeds, the document handle is released exactly once
//! before the task returns, on every path. A vetoed close is not forced:
//! the vetoing party owns the eventual close. Release-time failures never
//! replace the task's real outcome; they are logged and absorbed. Partial
//! sink contents after a failure carry no meaning — only the task's
//! returned `Result` decides success.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod service;
pub mod stream;
pub mod task;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{LoadConfig, StoreConfig};
pub use convert::{convert, convert_sync};
pub use error::{BoxError, ConvertError, StreamError};
pub use output::{ConversionOutput, ConversionStats};
pub use service::{
    CloseOutcome, DocumentHandle, DocumentLoader, DocumentService, ServiceError, BLANK_TARGET,
    NO_FLAGS, STREAM_URL,
};
pub use stream::{SinkStream, SourceStream};
pub use task::{ConversionTask, ConversionTaskBuilder, DocumentTransform};
