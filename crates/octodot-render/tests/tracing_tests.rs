#![forbid(unsafe_code)]

//! Tracing span tests for the renderers.
//!
//! Spans enabled:
//!   cargo test -p octodot-render --features tracing --test tracing_tests
//!
//! Zero-overhead verification (no feature):
//!   cargo test -p octodot-render --test tracing_tests -- zero_overhead

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use octodot_render::{render_heatmap, render_multi_row, render_sparkline, render_waveform};

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

// ============================================================================
// Test Infrastructure
// ============================================================================

#[derive(Debug, Clone)]
#[allow(dead_code)]
struct CapturedSpan {
    name: String,
    fields: HashMap<String, String>,
    parent_name: Option<String>,
}

struct SpanCapture {
    spans: Arc<Mutex<Vec<CapturedSpan>>>,
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S> tracing_subscriber::Layer<S> for SpanCapture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::span::Id,
        ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor(Vec::new());
        attrs.record(&mut visitor);

        let parent_name = ctx
            .current_span()
            .id()
            .and_then(|id| ctx.span(id))
            .map(|span_ref| span_ref.name().to_string());

        self.spans.lock().unwrap().push(CapturedSpan {
            name: attrs.metadata().name().to_string(),
            fields: visitor.0.into_iter().collect(),
            parent_name,
        });
    }
}

fn with_captured_spans<F: FnOnce()>(f: F) -> Vec<CapturedSpan> {
    let spans = Arc::new(Mutex::new(Vec::new()));
    let layer = SpanCapture {
        spans: spans.clone(),
    };
    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(subscriber, f);
    let captured = spans.lock().unwrap().clone();
    captured
}

// ============================================================================
// Tests
// ============================================================================

#[test]
#[cfg(feature = "tracing")]
fn waveform_span_records_input_size() {
    let spans = with_captured_spans(|| {
        render_waveform(&[0.0, 3.0, 1.0, 2.0], false);
    });
    let span = spans
        .iter()
        .find(|s| s.name == "render_waveform")
        .expect("render_waveform span");
    assert_eq!(span.fields.get("samples").map(String::as_str), Some("4"));
    assert_eq!(span.fields.get("connect").map(String::as_str), Some("false"));
}

#[test]
#[cfg(feature = "tracing")]
fn multi_row_nests_waveform_spans() {
    let spans = with_captured_spans(|| {
        render_multi_row(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0], 2);
    });
    let nested: Vec<_> = spans
        .iter()
        .filter(|s| s.name == "render_waveform")
        .collect();
    assert_eq!(nested.len(), 2, "one waveform span per band: {spans:?}");
    assert!(
        nested
            .iter()
            .all(|s| s.parent_name.as_deref() == Some("render_multi_row"))
    );
}

#[test]
#[cfg(feature = "tracing")]
fn sparkline_and_heatmap_spans() {
    let spans = with_captured_spans(|| {
        render_sparkline(&[1.0, 2.0, 3.0], Some(4));
        render_heatmap(&[[0.0, 1.0]], true);
    });
    let names: Vec<&str> = spans.iter().map(|s| s.name.as_str()).collect();
    assert!(names.contains(&"render_sparkline"), "{names:?}");
    assert!(names.contains(&"render_heatmap"), "{names:?}");
}

/// Without the feature the span blocks compile away entirely.
#[test]
fn zero_overhead_when_disabled() {
    let spans = with_captured_spans(|| {
        render_waveform(&[0.0, 3.0], true);
        render_multi_row(&[0.0, 1.0], 1);
        render_sparkline(&[0.0, 1.0], None);
        render_heatmap(&[[0.5]], false);
    });
    if cfg!(feature = "tracing") {
        assert!(!spans.is_empty());
    } else {
        assert!(spans.is_empty(), "unexpected spans: {spans:?}");
    }
}
