#![forbid(unsafe_code)]

//! Structured diagnostics emitted by the engine.

use std::sync::{Arc, Mutex};

use spectrum_core::sim::{ClassSpec, SimulatedUi};
use spectrum_core::LifecycleState;
use spectrum_render::MemorySink;
use spectrum_runtime::{ReportEngine, SpectrumConfig};
use tracing_subscriber::layer::SubscriberExt;

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: tracing::Level,
    span: Option<&'static str>,
    fields: Vec<(String, String)>,
}

struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }
}

impl<S> tracing_subscriber::Layer<S> for EventCapture
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            span: ctx.event_span(event).map(|span| span.name()),
            fields: visitor.0,
        });
    }
}

fn capture(f: impl FnOnce()) -> Vec<CapturedEvent> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::registry().with(EventCapture {
        events: events.clone(),
    });
    tracing::subscriber::with_default(subscriber, f);
    let captured = events.lock().unwrap().clone();
    captured
}

fn field<'a>(event: &'a CapturedEvent, name: &str) -> Option<&'a str> {
    event
        .fields
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

fn with_message<'a>(events: &'a [CapturedEvent], message: &str) -> Vec<&'a CapturedEvent> {
    events
        .iter()
        .filter(|e| field(e, "message") == Some(message))
        .collect()
}

#[test]
fn each_report_emits_a_debug_summary() {
    let mut ui = SimulatedUi::new();
    let window = ui.add_activity(ClassSpec::kotlin("com.acme.MainActivity"));
    ui.add_view(window.content, ClassSpec::java("android.widget.TextView"));
    ui.set_state(window.activity, LifecycleState::Resumed);

    let events = capture(|| {
        let config = SpectrumConfig::default()
            .with_enabled(true)
            .with_auto_report(false);
        let mut engine = ReportEngine::new(config, MemorySink::new());
        engine.explore(&ui, window.activity).unwrap();
        engine.report(&ui);
        engine.report(&ui);
    });

    let summaries = with_message(&events, "report emitted");
    assert_eq!(summaries.len(), 2);
    for summary in summaries {
        assert_eq!(summary.level, tracing::Level::DEBUG);
        assert_eq!(field(summary, "activities"), Some("1"));
        assert_eq!(field(summary, "messages"), Some("1"));
        assert_eq!(field(summary, "warnings"), Some("0"));
        assert!(field(summary, "build_us").is_some());
    }
    assert_eq!(with_message(&events, "activity explored").len(), 1);

    let builds = with_message(&events, "composite tree built");
    assert_eq!(builds.len(), 2);
    assert!(builds.iter().all(|e| e.span == Some("tree_build")));
}

#[test]
fn missing_lifecycle_warns_through_tracing() {
    let mut ui = SimulatedUi::new();
    let window = ui.add_plain_activity(ClassSpec::java("com.acme.LegacyActivity"));

    let events = capture(|| {
        let config = SpectrumConfig::default().with_enabled(true);
        let mut engine = ReportEngine::new(config, MemorySink::new());
        assert!(engine.explore(&ui, window.activity).is_err());
    });

    let warnings: Vec<_> = events
        .iter()
        .filter(|e| e.level == tracing::Level::WARN)
        .collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(field(warnings[0], "tag"), Some("Spectrum"));
}
