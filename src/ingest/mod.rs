//! Frame ingestion sources.
//!
//! Camera driver handling is deliberately out of scope for this kernel; the
//! only built-in source is the synthetic `stub://` camera, which cycles a
//! scene state so the stub detector backend produces a deterministic, varied
//! sequence of analyses. Real capture belongs behind the same `CameraSource`
//! interface.
//!
//! Sources produce `RawFrame` instances and signal end-of-stream by
//! returning `None`; the loop driver treats that as its termination path.

pub mod camera;

pub use camera::{CameraConfig, CameraSource, CameraStats};
