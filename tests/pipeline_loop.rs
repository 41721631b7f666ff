use std::sync::atomic::AtomicBool;

use anyhow::anyhow;
use tempfile::tempdir;

use safewatch_kernel::{
    incident, pipeline, CameraConfig, CameraSource, CsvIncidentStore, FixedContextProvider,
    FrameAnalysis, IncidentCondition, IncidentRecord, IncidentSink, Location, NullNotifier,
    StubBackend,
};

/// Sink whose appends always fail, counting the attempts.
struct FailingSink {
    attempts: u32,
}

impl IncidentSink for FailingSink {
    fn append(
        &mut self,
        _condition: &IncidentCondition,
        _location: &Location,
    ) -> anyhow::Result<IncidentRecord> {
        self.attempts += 1;
        Err(anyhow!("disk full"))
    }
}

fn fast_camera() -> CameraConfig {
    CameraConfig {
        target_fps: 1000,
        width: 8,
        height: 8,
        ..CameraConfig::default()
    }
}

#[test]
fn sustained_condition_records_one_incident_per_frame() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("incidents.csv");

    // The synthetic source holds one scene across these frames, so the stub
    // returns the same lone-woman analysis every frame. With no debounce,
    // every frame must record an incident.
    let mut source = CameraSource::bounded(fast_camera(), 3);
    let mut backend = StubBackend::scripted(vec![FrameAnalysis {
        persons: vec![safewatch_kernel::PersonDetection {
            bbox: safewatch_kernel::BoundingBox::default(),
            confidence: 0.9,
            gender: safewatch_kernel::Gender::Female,
        }],
        gesture_detected: false,
    }]);
    let provider = FixedContextProvider::nighttime(true);
    let mut store = CsvIncidentStore::open(&path).expect("open store");
    let quit = AtomicBool::new(false);

    let stats = pipeline::run(
        &mut source,
        &mut backend,
        &provider,
        &mut store,
        &NullNotifier,
        &quit,
    )
    .expect("pipeline run");

    assert_eq!(stats.frames_processed, 3);
    assert_eq!(stats.incidents_recorded, 3);

    let records = incident::read_all(&path).expect("read back");
    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| r.label == "Woman Alone at Night"));
}

#[test]
fn quiet_scenes_record_nothing() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("incidents.csv");

    let mut source = CameraSource::bounded(fast_camera(), 5);
    let mut backend = StubBackend::scripted(vec![FrameAnalysis::default()]);
    let provider = FixedContextProvider::nighttime(true);
    let mut store = CsvIncidentStore::open(&path).expect("open store");
    let quit = AtomicBool::new(false);

    let stats = pipeline::run(
        &mut source,
        &mut backend,
        &provider,
        &mut store,
        &NullNotifier,
        &quit,
    )
    .expect("pipeline run");

    assert_eq!(stats.frames_processed, 5);
    assert_eq!(stats.incidents_recorded, 0);
    // No incidents means no appends, so the store file stays empty.
    let raw = std::fs::read_to_string(&path).expect("read store");
    assert!(raw.is_empty());
}

#[test]
fn preset_quit_flag_stops_before_any_frame() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("incidents.csv");

    let mut source = CameraSource::bounded(fast_camera(), 100);
    let mut backend = StubBackend::new();
    let provider = FixedContextProvider::nighttime(false);
    let mut store = CsvIncidentStore::open(&path).expect("open store");
    let quit = AtomicBool::new(true);

    let stats = pipeline::run(
        &mut source,
        &mut backend,
        &provider,
        &mut store,
        &NullNotifier,
        &quit,
    )
    .expect("pipeline run");

    assert_eq!(stats.frames_processed, 0);
    assert_eq!(stats.incidents_recorded, 0);
}

#[test]
fn append_failure_stops_the_loop() {
    // Every frame alerts, but the first append fails; the loop must return
    // the append error without processing further frames.
    let mut source = CameraSource::bounded(fast_camera(), 100);
    let mut backend = StubBackend::scripted(vec![FrameAnalysis {
        persons: vec![],
        gesture_detected: true,
    }]);
    let provider = FixedContextProvider::nighttime(false);
    let mut sink = FailingSink { attempts: 0 };
    let quit = AtomicBool::new(false);

    let result = pipeline::run(
        &mut source,
        &mut backend,
        &provider,
        &mut sink,
        &NullNotifier,
        &quit,
    );

    let err = result.expect_err("append failure must surface");
    assert!(err.to_string().contains("disk full"), "got: {:#}", err);
    assert_eq!(sink.attempts, 1);
    assert_eq!(source.stats().frames_captured, 1);
}

#[test]
fn end_of_stream_terminates_the_loop() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("incidents.csv");

    let mut source = CameraSource::bounded(fast_camera(), 2);
    let mut backend = StubBackend::scripted(vec![FrameAnalysis {
        persons: vec![],
        gesture_detected: true,
    }]);
    let provider = FixedContextProvider::nighttime(false);
    let mut store = CsvIncidentStore::open(&path).expect("open store");
    let quit = AtomicBool::new(false);

    let stats = pipeline::run(
        &mut source,
        &mut backend,
        &provider,
        &mut store,
        &NullNotifier,
        &quit,
    )
    .expect("pipeline run");

    assert_eq!(stats.frames_processed, 2);
    assert_eq!(stats.incidents_recorded, 2);
    let records = incident::read_all(&path).expect("read back");
    assert!(records.iter().all(|r| r.label == "SOS Gesture Detected"));
}
