/// Acceptance threshold for person detections. Detections at or below this
/// confidence are dropped during summarization.
pub const CONFIDENCE_THRESHOLD: f32 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
}

/// Bounding box in normalized 0..1 coordinates.
#[derive(Clone, Copy, Debug, Default)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

#[derive(Clone, Debug)]
pub struct PersonDetection {
    pub bbox: BoundingBox,
    pub confidence: f32,
    pub gender: Gender,
}

/// Raw per-frame output of a detector backend.
#[derive(Clone, Debug, Default)]
pub struct FrameAnalysis {
    /// Person detections with classified gender.
    pub persons: Vec<PersonDetection>,
    /// Was the SOS hand gesture recognized anywhere in the frame?
    pub gesture_detected: bool,
}

/// Aggregated per-frame counts fed into the decision engine.
///
/// Ephemeral: lives only for the duration of one frame's processing and is
/// never persisted directly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DetectionSummary {
    pub male_count: u32,
    pub female_count: u32,
    pub gesture_detected: bool,
}

impl FrameAnalysis {
    /// Count accepted persons per gender, applying the confidence threshold.
    pub fn summarize(&self) -> DetectionSummary {
        let mut summary = DetectionSummary {
            gesture_detected: self.gesture_detected,
            ..DetectionSummary::default()
        };
        for person in &self.persons {
            if person.confidence <= CONFIDENCE_THRESHOLD {
                continue;
            }
            match person.gender {
                Gender::Male => summary.male_count += 1,
                Gender::Female => summary.female_count += 1,
            }
        }
        summary
    }
}
