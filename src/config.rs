//! Typed load/store configurations passed to the remote service.
//!
//! The service's native call surface takes open-ended property bags. This
//! crate deliberately does not: the recognized keys are few and fixed, so
//! each configuration is an explicit struct carrying exactly those keys.
//! An unrecognized option has nowhere to go, which is the point — it gets
//! rejected at compile time instead of silently ignored at the far end of
//! a process boundary.
//!
//! Recognized load keys: the bound input stream and `Hidden` (always true
//! for conversion loads, so the service never raises a window). Recognized
//! store keys: the bound output stream and `FilterName`, the opaque
//! identifier of the target format's export codec.

use std::fmt;
use std::sync::Arc;

use crate::stream::{SinkStream, SourceStream};

/// Configuration for loading a document from a stream.
pub struct LoadConfig {
    /// Input stream the service pulls document bytes from.
    pub input_stream: Arc<SourceStream>,
    /// Suppress any UI frame while the document is open.
    pub hidden: bool,
}

impl LoadConfig {
    /// Build the load configuration for a conversion: the given source,
    /// hidden unconditionally.
    pub fn for_source(input_stream: Arc<SourceStream>) -> Self {
        LoadConfig {
            input_stream,
            hidden: true,
        }
    }
}

impl fmt::Debug for LoadConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadConfig")
            .field(
                "input_stream",
                &format_args!("<{} bytes>", self.input_stream.len()),
            )
            .field("hidden", &self.hidden)
            .finish()
    }
}

/// Configuration for storing a document into a stream through an export
/// filter.
pub struct StoreConfig {
    /// Output stream the service writes the converted document into.
    pub output_stream: Arc<SinkStream>,
    /// Export filter identifying the target format inside the service,
    /// e.g. `writer_pdf_Export`.
    pub filter_name: String,
}

impl StoreConfig {
    /// Derive the store configuration for a target filter.
    ///
    /// Returns `None` when `filter_name` is blank: with the key set closed,
    /// a missing filter identifier is the one case where no valid store
    /// configuration exists.
    pub fn for_filter(output_stream: Arc<SinkStream>, filter_name: &str) -> Option<Self> {
        let filter_name = filter_name.trim();
        if filter_name.is_empty() {
            return None;
        }
        Some(StoreConfig {
            output_stream,
            filter_name: filter_name.to_owned(),
        })
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field(
                "output_stream",
                &format_args!("<{} bytes>", self.output_stream.len()),
            )
            .field("filter_name", &self.filter_name)
            .finish()
    }
}
