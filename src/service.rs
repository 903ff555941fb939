//! The remote document-processing service, as a conversion task sees it.
//!
//! The service runs out of process and does all the real rendering and
//! filtering. This module declares the narrow capability set the task
//! protocol needs from it: obtain a loader, load a document from a bound
//! input stream, store it through an export filter into a bound output
//! stream, and release it. How the service is started, pooled, supervised,
//! or marshalled to is a bridge concern and lives entirely behind these
//! traits.
//!
//! Two release strategies exist because remote documents can have other
//! interested parties: a graceful close may be *vetoed*, in which case the
//! vetoing party assumes responsibility for eventually closing the
//! document. [`CloseOutcome`] makes the veto an explicit, non-error result
//! so release logic can branch on it without catching anything.

use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{LoadConfig, StoreConfig};

/// URL descriptor telling the service to pull document bytes from the
/// input stream bound in the load configuration.
pub const STREAM_URL: &str = "private:stream";

/// Window target for loads that must never surface a frame.
pub const BLANK_TARGET: &str = "_blank";

/// Search flags for the load call; stream loads need none.
pub const NO_FLAGS: u32 = 0;

/// A failure reported by the service bridge.
///
/// Load and store failures may carry the service's own diagnostic code;
/// the task embeds it in the error it surfaces so operators can look the
/// code up in the service's documentation.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The service rejected the call's arguments outright.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An I/O failure inside the service, optionally with its diagnostic code.
    #[error("I/O error: {detail}")]
    Io {
        detail: String,
        error_code: Option<i32>,
    },

    /// Anything else the bridge reports (lost connection, internal fault).
    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    /// The service-specific diagnostic code, when the failure carried one.
    pub fn error_code(&self) -> Option<i32> {
        match self {
            ServiceError::Io { error_code, .. } => *error_code,
            _ => None,
        }
    }
}

/// Outcome of a graceful close request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// The document was closed and its resources released.
    Closed,
    /// Another owner vetoed the close and took over responsibility for
    /// closing the document later.
    Vetoed,
}

/// The running service. One instance may serve many tasks; each call is
/// independent and the service decides its own concurrency limits.
#[async_trait]
pub trait DocumentService: Send + Sync {
    /// The loader capability used to open documents inside the service.
    async fn document_loader(&self) -> Result<Arc<dyn DocumentLoader>, ServiceError>;
}

/// Capability for loading documents into the service.
#[async_trait]
pub trait DocumentLoader: Send + Sync {
    /// Load the document described by `url` into the service.
    ///
    /// For stream-based loads `url` is [`STREAM_URL`] and the bytes come
    /// from the input stream bound in `config`. `Ok(None)` means the
    /// service signalled success but produced no document; callers must
    /// treat that as a load failure rather than trusting the service to
    /// always fail through its error path.
    async fn load(
        &self,
        url: &str,
        target: &str,
        flags: u32,
        config: &LoadConfig,
    ) -> Result<Option<Box<dyn DocumentHandle>>, ServiceError>;
}

/// A document currently open inside the service.
///
/// Exclusively owned by one conversion task for the duration of its
/// execution and released before the task returns, on every exit path.
#[async_trait]
pub trait DocumentHandle: Send {
    /// Persist the document through the output stream bound in `config`,
    /// encoded by the configured export filter.
    async fn store(&mut self, config: &StoreConfig) -> Result<(), ServiceError>;

    /// Whether this document supports the veto-able close protocol.
    fn supports_graceful_close(&self) -> bool;

    /// Request a graceful close. `deliver_ownership` asks the service to
    /// deliver pending changes before closing. A veto is a legitimate
    /// outcome, not an error: the vetoing party closes the document later.
    async fn close(&mut self, deliver_ownership: bool) -> Result<CloseOutcome, ServiceError>;

    /// Release the document unconditionally and forcibly. Used when the
    /// graceful protocol is unsupported.
    async fn dispose(&mut self);

    /// Service-specific manipulation surface, for transform hooks that
    /// know the concrete bridge type.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
