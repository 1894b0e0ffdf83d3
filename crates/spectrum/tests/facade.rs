#![forbid(unsafe_code)]

use spectrum::prelude::*;
use spectrum::{ClassSpec, MemorySink, SimulatedUi};

fn track(engine: &mut ReportEngine, ui: &SimulatedUi, activity: ActivityId) -> Result<()> {
    engine.explore(ui, activity)?;
    Ok(())
}

#[test]
fn prelude_drives_a_report() {
    let mut ui = SimulatedUi::new();
    let window = ui.add_activity(ClassSpec::kotlin("com.acme.MainActivity"));
    let sink = MemorySink::new();
    let mut engine = ReportEngine::new(
        SpectrumConfig::default().with_enabled(true).with_auto_report(false),
        sink.clone(),
    );
    track(&mut engine, &ui, window.activity).unwrap();
    engine.report(&ui);
    assert!(sink.text_at(Severity::Debug).contains("[created]"));
}

#[test]
fn explore_errors_convert() {
    let mut ui = SimulatedUi::new();
    let plain = ui.add_plain_activity(ClassSpec::java("com.acme.LegacyActivity"));
    let mut engine = ReportEngine::new(SpectrumConfig::default().with_enabled(true), MemorySink::new());
    let err = track(&mut engine, &ui, plain.activity).unwrap_err();
    assert!(matches!(err, Error::Explore(_)));
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn config_errors_convert() {
    let errors = SpectrumConfig::default()
        .with_max_message_bytes(0)
        .validate()
        .unwrap_err();
    let err: Error = errors.into();
    assert!(err.to_string().starts_with("invalid configuration: max_message_bytes=0"));
}
