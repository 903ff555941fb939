//! Stream bridge between in-memory buffers and the remote service.
//!
//! ## Why a bridge?
//!
//! The remote document-processing service reads and writes through its own
//! stream interfaces, pulling input in chunks of whatever size it likes and
//! probing length/position before deciding how much to request. The caller,
//! on the other hand, has a plain byte buffer. [`SourceStream`] presents
//! that buffer as a seekable, chunked input the service can drive at its
//! own pace; [`SinkStream`] accumulates the service's writes so the caller
//! can drain the converted document afterwards.
//!
//! Both types take `&self` for every operation and keep their cursor state
//! behind a mutex, so a single `Arc<SourceStream>` / `Arc<SinkStream>` can
//! be handed to the service while the caller retains its own reference for
//! bookkeeping and draining. Neither stream is meant to be driven by two
//! parties at once; the task protocol gives the service exclusive use for
//! the duration of a conversion.
//!
//! End-of-stream is not an error: `read_chunk` returns an empty chunk once
//! the buffer is exhausted. The only failure either stream produces is use
//! after [`close`](SourceStream::close), reported as [`StreamError::Closed`].

use std::fmt;
use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard};

use crate::error::StreamError;

/// An immutable byte buffer exposed as a seekable, chunked input stream.
///
/// Created by the caller before a conversion; consumed read-only by the
/// remote service while loading; closed after the task completes.
pub struct SourceStream {
    data: Vec<u8>,
    state: Mutex<SourceState>,
}

struct SourceState {
    pos: usize,
    closed: bool,
}

impl SourceStream {
    /// Wrap a byte buffer. The buffer is owned and never mutated.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        SourceStream {
            data: bytes.into(),
            state: Mutex::new(SourceState {
                pos: 0,
                closed: false,
            }),
        }
    }

    // A poisoned lock only means another caller panicked mid-operation;
    // the cursor itself is still a valid usize, so recover it.
    fn state(&self) -> MutexGuard<'_, SourceState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Read up to `requested` bytes from the current position.
    ///
    /// Returns exactly the remaining bytes when fewer than `requested`
    /// remain, and an empty chunk (position unchanged) at end-of-stream.
    /// Advances the position by the number of bytes returned. Allocates
    /// only the returned chunk, never the full `requested` size.
    pub fn read_chunk(&self, requested: usize) -> Result<Vec<u8>, StreamError> {
        let mut state = self.state();
        if state.closed {
            return Err(StreamError::Closed);
        }
        let n = requested.min(self.data.len() - state.pos);
        let chunk = self.data[state.pos..state.pos + n].to_vec();
        state.pos += n;
        Ok(chunk)
    }

    /// Advance the position by `n` bytes, clamped to the end of the buffer.
    /// Over-skipping is not an error.
    pub fn skip(&self, n: u64) {
        let mut state = self.state();
        state.pos = (state.pos as u64).saturating_add(n).min(self.len()) as usize;
    }

    /// Set the position directly, clamped to the end of the buffer.
    ///
    /// Out-of-range positions are clamped rather than rejected, keeping the
    /// `position <= length` invariant without surprising remote callers
    /// that probe past the end.
    pub fn seek(&self, pos: u64) {
        self.state().pos = pos.min(self.len()) as usize;
    }

    /// Total length of the underlying buffer. O(1).
    pub fn len(&self) -> u64 {
        self.data.len() as u64
    }

    /// Whether the underlying buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Current read position. O(1), always consistent with prior reads,
    /// skips, and seeks.
    pub fn position(&self) -> u64 {
        self.state().pos as u64
    }

    /// Close the stream. Idempotent. Subsequent `read_chunk` calls return
    /// [`StreamError::Closed`]; `len` and `position` still answer so late
    /// bookkeeping probes stay harmless.
    pub fn close(&self) {
        self.state().closed = true;
    }

    /// Whether `close` has been called.
    pub fn is_closed(&self) -> bool {
        self.state().closed
    }
}

impl fmt::Debug for SourceStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state();
        f.debug_struct("SourceStream")
            .field("len", &self.data.len())
            .field("position", &state.pos)
            .field("closed", &state.closed)
            .finish()
    }
}

/// An append-only accumulation buffer exposed as a writable output stream.
///
/// Created empty by the caller; written to by the remote service while
/// storing; drained by the caller after the task completes. Draining never
/// clears the contents, so repeated drains reproduce the same bytes.
#[derive(Default)]
pub struct SinkStream {
    state: Mutex<SinkState>,
}

#[derive(Default)]
struct SinkState {
    data: Vec<u8>,
    closed: bool,
}

impl SinkStream {
    /// Create an empty sink.
    pub fn new() -> Self {
        SinkStream::default()
    }

    fn state(&self) -> MutexGuard<'_, SinkState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Append bytes to the accumulator.
    pub fn write(&self, bytes: &[u8]) -> Result<(), StreamError> {
        let mut state = self.state();
        if state.closed {
            return Err(StreamError::Closed);
        }
        state.data.extend_from_slice(bytes);
        Ok(())
    }

    /// No-op on an open sink; writes land in memory immediately.
    pub fn flush(&self) -> Result<(), StreamError> {
        if self.state().closed {
            return Err(StreamError::Closed);
        }
        Ok(())
    }

    /// Copy the full accumulated contents into `dest`.
    ///
    /// Repeatable: the contents are never cleared by a drain, so every call
    /// reproduces the same bytes.
    pub fn drain_to<W: Write>(&self, dest: &mut W) -> io::Result<()> {
        dest.write_all(&self.state().data)
    }

    /// The accumulated contents as an owned vector.
    pub fn to_vec(&self) -> Vec<u8> {
        self.state().data.clone()
    }

    /// Number of bytes accumulated so far.
    pub fn len(&self) -> u64 {
        self.state().data.len() as u64
    }

    /// Whether nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.state().data.is_empty()
    }

    /// Close the sink. Idempotent. Further writes are rejected with
    /// [`StreamError::Closed`]; the accumulated contents stay drainable.
    pub fn close(&self) {
        self.state().closed = true;
    }

    /// Whether `close` has been called.
    pub fn is_closed(&self) -> bool {
        self.state().closed
    }
}

impl fmt::Debug for SinkStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state();
        f.debug_struct("SinkStream")
            .field("len", &state.data.len())
            .field("closed", &state.closed)
            .finish()
    }
}
