//! Stream observer port
//!
//! Receives the incremental answer of a streaming chat request.

use crate::error::ChatError;

/// Callbacks for one streaming request.
///
/// Implementations live in the presentation layer. For every call to
/// [`ChatSession::send_streaming`](crate::ChatSession::send_streaming)
/// exactly one of [`on_complete`](Self::on_complete) and
/// [`on_error`](Self::on_error) is invoked, after any number of
/// [`on_chunk`](Self::on_chunk) calls.
pub trait StreamObserver: Send {
    /// A fragment arrived; `running_total` already includes it.
    fn on_chunk(&mut self, fragment: &str, running_total: &str);

    /// The answer is complete.
    fn on_complete(&mut self, full_text: &str);

    /// The request failed for good.
    fn on_error(&mut self, error: &ChatError);
}

/// Observer that ignores every callback
pub struct NoopObserver;

impl StreamObserver for NoopObserver {
    fn on_chunk(&mut self, _fragment: &str, _running_total: &str) {}
    fn on_complete(&mut self, _full_text: &str) {}
    fn on_error(&mut self, _error: &ChatError) {}
}
