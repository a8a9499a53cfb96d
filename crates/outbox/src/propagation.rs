//! Tracing propagation seam.
//!
//! The outbox only depends on these signatures; the concrete wire format
//! (e.g. W3C `traceparent`) lives in a backend crate such as `outbox-otel`.

use crate::message::TracingContext;
use tracing::Span;

/// Captures the caller's active tracing context at send time and rebuilds
/// an execution wrapper for it at delivery time.
pub trait TracingPropagation: Send + Sync {
    /// Snapshot whatever tracing context is active at the call site.
    /// Returns an empty snapshot when none is.
    fn capture(&self) -> TracingContext;

    /// Span wrapping one delivery attempt, parented to the captured
    /// context so spans created by the transport join the producer's
    /// trace. Must yield a neutral span — never fail — when the snapshot
    /// is empty or cannot be decoded.
    fn delivery_span(&self, context: &TracingContext) -> Span;
}

/// Propagation that captures nothing and never augments delivery.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPropagation;

impl TracingPropagation for NoopPropagation {
    fn capture(&self) -> TracingContext {
        TracingContext::new()
    }

    fn delivery_span(&self, _context: &TracingContext) -> Span {
        Span::none()
    }
}
