#![forbid(unsafe_code)]

//! `TracingSink` emits one event per message, at the mapped level.

use std::sync::{Arc, Mutex};

use spectrum_render::{LogSink, Severity, TracingSink};
use tracing_subscriber::layer::SubscriberExt;

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: tracing::Level,
    target: String,
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

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for EventCapture {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            target: event.metadata().target().to_string(),
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

#[test]
fn one_event_per_message_with_tag() {
    let events = capture(|| {
        let mut sink = TracingSink;
        sink.print(Severity::Debug, "Spectrum", "HIERARCHY:\n");
        sink.print(Severity::Debug, "Spectrum", "CHANGES:\n");
    });
    assert_eq!(events.len(), 2);
    for event in &events {
        assert_eq!(event.target, "spectrum");
        assert_eq!(event.level, tracing::Level::DEBUG);
        assert_eq!(field(event, "tag"), Some("Spectrum"));
    }
    assert!(field(&events[0], "message").is_some_and(|m| m.contains("HIERARCHY:")));
}

#[test]
fn severities_map_to_levels() {
    let events = capture(|| {
        let mut sink = TracingSink;
        for severity in Severity::ALL {
            sink.print(severity, "T", severity.as_str());
        }
    });
    let levels: Vec<tracing::Level> = events.iter().map(|e| e.level).collect();
    assert_eq!(
        levels,
        vec![
            tracing::Level::TRACE,
            tracing::Level::DEBUG,
            tracing::Level::INFO,
            tracing::Level::WARN,
            tracing::Level::ERROR,
            tracing::Level::ERROR,
        ]
    );
}
