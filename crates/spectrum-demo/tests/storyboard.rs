use std::time::{Duration, Instant};

use spectrum::{MemorySink, ReportEngine, Severity, SpectrumConfig};
use spectrum_demo::scenario::{self, STEP_INTERVAL};

fn engine(config: SpectrumConfig) -> (ReportEngine, MemorySink) {
    let sink = MemorySink::new();
    (ReportEngine::new(config, sink.clone()), sink)
}

fn config() -> SpectrumConfig {
    SpectrumConfig::default().with_enabled(true)
}

#[test]
fn throttled_run_reports_every_element() {
    let (mut engine, sink) = engine(config());
    let outcome = scenario::run(&mut engine, Instant::now());

    assert!(outcome.steps > 10);
    let reports = sink.messages_at(Severity::Debug);
    assert!(!reports.is_empty());
    // Throttling folds the storyboard into far fewer reports than steps.
    assert!(reports.len() < outcome.steps);

    let all = reports.concat();
    for needle in [
        ".(MainActivity.kt:0)",
        ".(SecondaryActivity.kt:0)",
        "[tag 'fragment without container']",
        ".(RedFragment.kt:0)",
        "[tag 'orange dialog']",
        "[tag 'green dialog']",
        "[id/page_container]",
        "[id/footer_container]",
        "[id/child_fragment_container]",
    ] {
        assert!(all.contains(needle), "missing {needle}");
    }
    assert!(sink.messages_at(Severity::Warn).is_empty());
}

#[test]
fn final_report_shows_final_states() {
    let (mut engine, sink) = engine(
        config()
            .with_element_location(true)
            .with_max_message_bytes(1 << 20),
    );
    scenario::run(&mut engine, Instant::now());

    let reports = sink.messages_at(Severity::Debug);
    let last = reports.last().expect("at least one report");
    assert!(last.contains(".(MainActivity.kt:0) [stopped]"), "{last}");
    assert!(last.contains(".(SecondaryActivity.kt:0) [resumed]"), "{last}");
    assert!(last.contains("[gone]"), "{last}");
    assert!(engine.pending_changes().is_empty());
    assert_eq!(engine.next_deadline(), None);
}

#[test]
fn unthrottled_run_reports_each_step() {
    let (mut engine, _sink) = engine(config().with_throttle(false));
    let outcome = scenario::run(&mut engine, Instant::now());
    assert_eq!(engine.reports_emitted(), outcome.steps as u64);
}

#[test]
fn pool_is_empty_after_run() {
    let (mut engine, _sink) = engine(config());
    scenario::run(&mut engine, Instant::now());
    assert_eq!(engine.store_stats().live(), 0);
}

#[test]
fn runs_are_deterministic() {
    let start = Instant::now();
    let ascii = || {
        config()
            .with_glyphs(spectrum::GlyphSet::Ascii)
            .with_max_message_bytes(1 << 20)
    };
    let (mut first, first_sink) = engine(ascii());
    let (mut second, second_sink) = engine(ascii());
    scenario::run(&mut first, start);
    scenario::run(&mut second, start + Duration::from_secs(5));

    let strip = |messages: Vec<String>| -> Vec<String> {
        messages
            .iter()
            .map(|m| {
                m.lines()
                    .filter(|l| !l.starts_with("Report built in"))
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .collect()
    };
    assert_eq!(
        strip(first_sink.messages_at(Severity::Debug)),
        strip(second_sink.messages_at(Severity::Debug))
    );
}

#[test]
fn step_interval_is_shorter_than_default_window() {
    assert!(STEP_INTERVAL < config().throttle_window);
}
