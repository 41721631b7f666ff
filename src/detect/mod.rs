mod backend;
mod backends;
mod result;

pub use backend::DetectorBackend;
pub use backends::StubBackend;
pub use result::{
    BoundingBox, DetectionSummary, FrameAnalysis, Gender, PersonDetection, CONFIDENCE_THRESHOLD,
};
