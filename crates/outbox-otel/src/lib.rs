//! OpenTelemetry backend for the outbox tracing-propagation seam.
//!
//! Captures the caller's active trace context into the portable
//! [`TracingContext`] map using the W3C Trace Context propagator, and
//! rebuilds an equivalent execution context around delivery. The outbox
//! core never sees any of this; it only depends on the
//! [`TracingPropagation`] trait.
//!
//! Key names inside the map (`traceparent`, `tracestate`) are owned by the
//! propagator; everything here treats the map as opaque.

use opentelemetry::propagation::TextMapPropagator;
use opentelemetry::trace::TraceContextExt;
use opentelemetry::Context;
use opentelemetry_sdk::propagation::TraceContextPropagator;
use outbox::{TracingContext, TracingPropagation};
use std::collections::HashMap;
use tracing::Span;
use tracing_opentelemetry::OpenTelemetrySpanExt;

/// Tracing propagation over the W3C Trace Context wire format.
#[derive(Debug, Default)]
pub struct OtelPropagation {
    propagator: TraceContextPropagator,
}

impl OtelPropagation {
    pub fn new() -> Self {
        Self {
            propagator: TraceContextPropagator::new(),
        }
    }

    /// Snapshot the caller's active trace context. Empty when no valid
    /// context is active.
    pub fn capture_tracing_context(&self) -> TracingContext {
        let context = active_context();
        let mut fields: HashMap<String, String> = HashMap::new();
        self.propagator.inject_context(&context, &mut fields);
        TracingContext::from(fields)
    }

    /// Rebuild an execution context from a snapshot. For an empty or
    /// undecodable snapshot the returned context carries no valid span and
    /// performs no tracing augmentation.
    pub fn execution_context(&self, context: &TracingContext) -> Context {
        self.propagator.extract(context.fields())
    }

    /// Run `f` with the rebuilt context attached as the ambient context.
    ///
    /// The previously ambient context is restored when the guard drops, on
    /// every exit path including unwinding.
    pub fn run_in_execution_context<T>(
        &self,
        context: &TracingContext,
        f: impl FnOnce() -> T,
    ) -> T {
        let _guard = self.execution_context(context).attach();
        f()
    }
}

impl TracingPropagation for OtelPropagation {
    fn capture(&self) -> TracingContext {
        self.capture_tracing_context()
    }

    fn delivery_span(&self, context: &TracingContext) -> Span {
        let span = tracing::info_span!("deliver_message");
        let remote = self.execution_context(context);
        if remote.span().span_context().is_valid() {
            span.set_parent(remote);
        }
        span
    }
}

/// The trace context active at the call site: the current `tracing` span's
/// OTel context when it carries a valid span, otherwise the ambient
/// attached context.
fn active_context() -> Context {
    let span_context = Span::current().context();
    if span_context.span().span_context().is_valid() {
        span_context
    } else {
        Context::current()
    }
}
