//! Safety Incident Watch Kernel
//!
//! This crate implements the core of a camera-watching daemon that turns
//! per-frame detections into a deduplicated, persisted incident record.
//!
//! # Architecture
//!
//! - `ingest`: frame sources (synthetic `stub://` camera)
//! - `detect`: the detection adapter boundary (person + gender + SOS gesture)
//! - `context`: ambient facts (time-of-day bucket, resolved location)
//! - `decision`: the incident decision engine (pure, stateless)
//! - `incident`: the append-only incident store
//! - `alert`: fire-and-forget notification side effects
//! - `pipeline`: the frame loop driver tying the above together
//!
//! The decision engine evaluates three fixed rules per frame, in order, with
//! first-match-wins semantics, so at most one incident record is created per
//! processed frame. The store append and the audio notification are
//! independent failure domains: append failures stop the loop, notification
//! failures never do.

pub mod alert;
pub mod config;
pub mod context;
pub mod decision;
pub mod detect;
pub mod frame;
pub mod incident;
pub mod ingest;
pub mod pipeline;

pub use alert::{AlertNotifier, LogNotifier, NullNotifier};
#[cfg(feature = "alert-sound")]
pub use alert::SoundNotifier;
pub use config::{CameraSettings, WatchdConfig};
pub use context::{
    is_nighttime_at, Context, ContextProvider, FixedContextProvider, Location,
    SystemContextProvider, UNKNOWN_CITY,
};
pub use decision::{evaluate, IncidentCondition};
pub use detect::{
    BoundingBox, DetectionSummary, DetectorBackend, FrameAnalysis, Gender, PersonDetection,
    StubBackend, CONFIDENCE_THRESHOLD,
};
pub use frame::RawFrame;
pub use incident::{read_all, CsvIncidentStore, IncidentRecord, IncidentSink, STORE_HEADER};
pub use ingest::{CameraConfig, CameraSource, CameraStats};
pub use pipeline::PipelineStats;
