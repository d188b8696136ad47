//! W3C Trace Context extraction for inbound requests.
//!
//! When a form post carries `traceparent`, the submission span becomes a
//! child of the caller's trace, and the Telegram calls made while handling
//! it inherit the same trace id.

use axum::extract::Request;
use axum::http::{HeaderMap, HeaderName};
use axum::middleware::Next;
use axum::response::Response;
use opentelemetry::propagation::Extractor;
use opentelemetry::{global, trace::TraceContextExt};
use tracing_opentelemetry::OpenTelemetrySpanExt;

struct HeaderExtractor<'a>(&'a HeaderMap);

impl Extractor for HeaderExtractor<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(HeaderName::as_str).collect()
    }
}

/// Middleware that parents the current span on an incoming remote context.
pub async fn propagate_trace_context(request: Request, next: Next) -> Response {
    let parent =
        global::get_text_map_propagator(|p| p.extract(&HeaderExtractor(request.headers())));

    if parent.span().span_context().is_remote() {
        tracing::Span::current().set_parent(parent);
    }

    next.run(request).await
}
